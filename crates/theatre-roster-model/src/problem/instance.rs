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

use crate::common::{AnaesthetistId, StationId};
use crate::problem::{
    anaesthetist::{Anaesthetist, AnaesthetistContainer},
    calendar::Calendar,
    demand::DemandTable,
    err::{InstanceError, UnknownAnaesthetistError, UnknownStationError},
    history::AssignmentHistory,
    request::RequestTable,
    station::{StationKind, Workstation, WorkstationContainer},
};
use theatre_roster_core::prelude::Day;

pub const DEFAULT_DAILY_WORKLOAD_CAP: f64 = 2.0;

/// A declared mandatory pairing: assignment to `first` over a weekend
/// period implies assignment to `second` on both days of that weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationPairing {
    first: StationId,
    second: StationId,
}

impl StationPairing {
    #[inline]
    pub fn new(first: StationId, second: StationId) -> Self {
        Self { first, second }
    }

    #[inline]
    pub fn first(&self) -> StationId {
        self.first
    }

    #[inline]
    pub fn second(&self) -> StationId {
        self.second
    }
}

/// The immutable problem input. Constructed once per run and read-only for
/// the run's duration; safe to share across concurrent roster builds.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    anaesthetists: AnaesthetistContainer,
    stations: WorkstationContainer,
    requests: RequestTable,
    calendar: Calendar,
    demand: DemandTable,
    pairings: Vec<StationPairing>,
    history: AssignmentHistory,
    daily_workload_cap: f64,
}

impl ProblemInstance {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        anaesthetists: AnaesthetistContainer,
        stations: WorkstationContainer,
        requests: RequestTable,
        calendar: Calendar,
        demand: DemandTable,
        pairings: Vec<StationPairing>,
        history: AssignmentHistory,
        daily_workload_cap: f64,
    ) -> Result<Self, InstanceError> {
        // Every qualification must reference a known station
        for a in anaesthetists.iter() {
            for q in a.iter_qualifications() {
                if !stations.contains_id(q) {
                    return Err(UnknownStationError::new(q, "qualification").into());
                }
            }
        }

        // Every demand entry must reference a known station
        for (sid, _, _) in demand.iter() {
            if !stations.contains_id(sid) {
                return Err(UnknownStationError::new(sid, "demand table").into());
            }
        }

        // Every request must reference a known anaesthetist
        for (aid, _, _) in requests.iter() {
            if !anaesthetists.contains_id(aid) {
                return Err(UnknownAnaesthetistError::new(aid, "request table").into());
            }
        }

        // Pairing rules must reference known stations
        for p in &pairings {
            if !stations.contains_id(p.first()) {
                return Err(UnknownStationError::new(p.first(), "pairing rule").into());
            }
            if !stations.contains_id(p.second()) {
                return Err(UnknownStationError::new(p.second(), "pairing rule").into());
            }
        }

        Ok(Self {
            anaesthetists,
            stations,
            requests,
            calendar,
            demand,
            pairings,
            history,
            daily_workload_cap,
        })
    }

    #[inline]
    pub fn anaesthetists(&self) -> &AnaesthetistContainer {
        &self.anaesthetists
    }

    #[inline]
    pub fn anaesthetist(&self, id: AnaesthetistId) -> Option<&Anaesthetist> {
        self.anaesthetists.get(id)
    }

    #[inline]
    pub fn stations(&self) -> &WorkstationContainer {
        &self.stations
    }

    #[inline]
    pub fn station(&self, id: StationId) -> Option<&Workstation> {
        self.stations.get(id)
    }

    #[inline]
    pub fn station_kind(&self, id: StationId) -> Option<StationKind> {
        self.stations.get(id).map(|w| w.kind())
    }

    #[inline]
    pub fn requests(&self) -> &RequestTable {
        &self.requests
    }

    #[inline]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    #[inline]
    pub fn demand(&self) -> &DemandTable {
        &self.demand
    }

    #[inline]
    pub fn pairings(&self) -> &[StationPairing] {
        &self.pairings
    }

    #[inline]
    pub fn history(&self) -> &AssignmentHistory {
        &self.history
    }

    #[inline]
    pub fn daily_workload_cap(&self) -> f64 {
        self.daily_workload_cap
    }

    #[inline]
    pub fn is_weekend_or_holiday(&self, day: Day) -> bool {
        self.calendar.is_weekend_or_holiday(day)
    }

    #[inline]
    pub fn weekend_partner(&self, day: Day) -> Option<Day> {
        self.calendar.weekend_partner(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::anaesthetist::Seniority;
    use crate::problem::station::Granularity;
    use std::collections::BTreeSet;
    use theatre_roster_core::prelude::ShiftWindow;

    #[inline]
    fn aid(n: u32) -> AnaesthetistId {
        AnaesthetistId::new(n)
    }

    #[inline]
    fn sid(n: u32) -> StationId {
        StationId::new(n)
    }

    #[inline]
    fn day(n: u8) -> Day {
        Day::new(n).unwrap()
    }

    fn one_station() -> WorkstationContainer {
        let mut c = WorkstationContainer::new();
        c.insert(Workstation::new(
            sid(1),
            "ICU",
            StationKind::IntensiveCare,
            Granularity::Monthly,
            ShiftWindow::from_hours(8, 16).unwrap(),
            1.0,
            None,
            true,
        ));
        c
    }

    fn one_anaesthetist(quals: &[u32]) -> AnaesthetistContainer {
        let mut c = AnaesthetistContainer::new();
        c.insert(Anaesthetist::new(
            aid(1),
            "A1",
            Seniority::Senior,
            true,
            quals.iter().map(|&q| sid(q)).collect(),
            BTreeSet::new(),
            BTreeSet::new(),
        ));
        c
    }

    #[test]
    fn test_valid_instance_builds() {
        let instance = ProblemInstance::new(
            one_anaesthetist(&[1]),
            one_station(),
            RequestTable::new(),
            Calendar::standard(),
            DemandTable::new(),
            Vec::new(),
            AssignmentHistory::new(),
            DEFAULT_DAILY_WORKLOAD_CAP,
        )
        .unwrap();
        assert_eq!(instance.anaesthetists().len(), 1);
        assert_eq!(
            instance.station_kind(sid(1)),
            Some(StationKind::IntensiveCare)
        );
    }

    #[test]
    fn test_qualification_referencing_unknown_station_is_rejected() {
        let err = ProblemInstance::new(
            one_anaesthetist(&[9]),
            one_station(),
            RequestTable::new(),
            Calendar::standard(),
            DemandTable::new(),
            Vec::new(),
            AssignmentHistory::new(),
            DEFAULT_DAILY_WORKLOAD_CAP,
        )
        .unwrap_err();
        match err {
            InstanceError::UnknownStation(e) => assert_eq!(e.station(), sid(9)),
            other => panic!("expected UnknownStation, got {other:?}"),
        }
    }

    #[test]
    fn test_demand_referencing_unknown_station_is_rejected() {
        let mut demand = DemandTable::new();
        demand.set(sid(5), day(1), 1);
        let err = ProblemInstance::new(
            one_anaesthetist(&[1]),
            one_station(),
            RequestTable::new(),
            Calendar::standard(),
            demand,
            Vec::new(),
            AssignmentHistory::new(),
            DEFAULT_DAILY_WORKLOAD_CAP,
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::UnknownStation(_)));
    }

    #[test]
    fn test_request_referencing_unknown_anaesthetist_is_rejected() {
        let mut requests = RequestTable::new();
        requests.add(aid(42), day(3), crate::problem::RequestKind::Absence);
        let err = ProblemInstance::new(
            one_anaesthetist(&[1]),
            one_station(),
            requests,
            Calendar::standard(),
            DemandTable::new(),
            Vec::new(),
            AssignmentHistory::new(),
            DEFAULT_DAILY_WORKLOAD_CAP,
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::UnknownAnaesthetist(_)));
    }

    #[test]
    fn test_pairing_referencing_unknown_station_is_rejected() {
        let err = ProblemInstance::new(
            one_anaesthetist(&[1]),
            one_station(),
            RequestTable::new(),
            Calendar::standard(),
            DemandTable::new(),
            vec![StationPairing::new(sid(1), sid(77))],
            AssignmentHistory::new(),
            DEFAULT_DAILY_WORKLOAD_CAP,
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::UnknownStation(_)));
    }
}
