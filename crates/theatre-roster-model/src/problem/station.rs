// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::common::StationId;
use theatre_roster_core::prelude::ShiftWindow;

/// Closed classification of workstations.
///
/// Every station-specific rule in the constraint checker and the
/// constructors dispatches on this kind, resolved once when the instance
/// is assembled. String-keyed dispatch is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StationKind {
    /// First (heaviest) on-call role. Triggers rest-day rules.
    OnCallFirst,
    /// Second on-call role.
    OnCallSecond,
    IntensiveCare,
    Cardiothoracic,
    Obstetrics,
    PainClinic,
    DaySurgery,
    MorningShift,
    EveningShift,
    LateEveningShift,
    OfficeHours,
    General,
}

impl StationKind {
    /// The two highest-acuity on-call roles, subject to the
    /// consecutive-weekday restriction and the weekday seniority check.
    #[inline]
    pub fn is_oncall(self) -> bool {
        matches!(self, StationKind::OnCallFirst | StationKind::OnCallSecond)
    }

    /// The heavy on-call role whose following day must be kept free.
    #[inline]
    pub fn is_heavy_oncall(self) -> bool {
        matches!(self, StationKind::OnCallFirst)
    }

    /// Kinds whose weekend presence must span both days of the pair.
    #[inline]
    pub fn is_weekend_paired(self) -> bool {
        matches!(
            self,
            StationKind::OnCallFirst | StationKind::OnCallSecond | StationKind::IntensiveCare
        )
    }

    /// The mutually-exclusive weekly shift trio, assigned before all other
    /// weekly stations.
    #[inline]
    pub fn is_multi_location(self) -> bool {
        matches!(
            self,
            StationKind::MorningShift | StationKind::EveningShift | StationKind::LateEveningShift
        )
    }

    /// Monthly kinds that clash with an examination request on the same day.
    #[inline]
    pub fn conflicts_with_examination(self) -> bool {
        matches!(
            self,
            StationKind::OnCallFirst
                | StationKind::OnCallSecond
                | StationKind::IntensiveCare
                | StationKind::Cardiothoracic
                | StationKind::Obstetrics
        )
    }

    #[inline]
    pub fn is_morning(self) -> bool {
        matches!(self, StationKind::MorningShift)
    }

    #[inline]
    pub fn is_evening(self) -> bool {
        matches!(self, StationKind::EveningShift)
    }

    #[inline]
    pub fn is_late_evening(self) -> bool {
        matches!(self, StationKind::LateEveningShift)
    }

    #[inline]
    pub fn is_office_hours(self) -> bool {
        matches!(self, StationKind::OfficeHours)
    }

    /// Ordering used by the preference-driven constructor: morning shifts
    /// first, then evening, then office hours, then everything else.
    #[inline]
    pub fn fill_priority(self) -> u8 {
        match self {
            StationKind::MorningShift => 0,
            StationKind::EveningShift | StationKind::LateEveningShift => 1,
            StationKind::OfficeHours => 2,
            _ => 3,
        }
    }
}

impl std::fmt::Display for StationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Whether a station is rostered over the whole period or week by week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Monthly,
    Weekly,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Monthly => write!(f, "Monthly"),
            Granularity::Weekly => write!(f, "Weekly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workstation {
    id: StationId,
    name: String,
    kind: StationKind,
    granularity: Granularity,
    shift: ShiftWindow,
    workload_weight: f64,
    max_weekly_hours: Option<f64>,
    major: bool,
}

impl Workstation {
    #[inline]
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        kind: StationKind,
        granularity: Granularity,
        shift: ShiftWindow,
        workload_weight: f64,
        max_weekly_hours: Option<f64>,
        major: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            granularity,
            shift,
            workload_weight,
            max_weekly_hours,
            major,
        }
    }

    #[inline]
    pub fn id(&self) -> StationId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> StationKind {
        self.kind
    }

    #[inline]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[inline]
    pub fn is_monthly(&self) -> bool {
        self.granularity == Granularity::Monthly
    }

    #[inline]
    pub fn is_weekly(&self) -> bool {
        self.granularity == Granularity::Weekly
    }

    #[inline]
    pub fn shift(&self) -> ShiftWindow {
        self.shift
    }

    #[inline]
    pub fn workload_weight(&self) -> f64 {
        self.workload_weight
    }

    #[inline]
    pub fn max_weekly_hours(&self) -> Option<f64> {
        self.max_weekly_hours
    }

    #[inline]
    pub fn is_major(&self) -> bool {
        self.major
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkstationContainer(std::collections::BTreeMap<StationId, Workstation>);

impl WorkstationContainer {
    #[inline]
    pub fn new() -> Self {
        Self(std::collections::BTreeMap::new())
    }

    #[inline]
    pub fn insert(&mut self, w: Workstation) -> Option<Workstation> {
        self.0.insert(w.id(), w)
    }

    #[inline]
    pub fn get(&self, id: StationId) -> Option<&Workstation> {
        self.0.get(&id)
    }

    #[inline]
    pub fn contains_id(&self, id: StationId) -> bool {
        self.0.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Workstation> {
        self.0.values()
    }

    #[inline]
    pub fn iter_monthly(&self) -> impl Iterator<Item = &Workstation> {
        self.0.values().filter(|w| w.is_monthly())
    }

    #[inline]
    pub fn iter_weekly(&self) -> impl Iterator<Item = &Workstation> {
        self.0.values().filter(|w| w.is_weekly())
    }

    #[inline]
    pub fn iter_of_kind(&self, kind: StationKind) -> impl Iterator<Item = &Workstation> + '_ {
        self.0.values().filter(move |w| w.kind() == kind)
    }
}
