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
    err::InstanceError,
    history::{AssignmentHistory, HistoryRecord},
    instance::{ProblemInstance, StationPairing, DEFAULT_DAILY_WORKLOAD_CAP},
    request::{RequestKind, RequestTable},
    station::{Workstation, WorkstationContainer},
};
use theatre_roster_core::prelude::Day;

/// In-memory assembly surface for [`ProblemInstance`]. The tabular-file
/// loader that feeds it lives outside this crate.
#[derive(Debug, Clone, Default)]
pub struct ProblemInstanceBuilder {
    anaesthetists: AnaesthetistContainer,
    stations: WorkstationContainer,
    requests: RequestTable,
    calendar: Option<Calendar>,
    demand: DemandTable,
    pairings: Vec<StationPairing>,
    history: AssignmentHistory,
    daily_workload_cap: f64,
}

impl ProblemInstanceBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            daily_workload_cap: DEFAULT_DAILY_WORKLOAD_CAP,
            ..Self::default()
        }
    }

    #[inline]
    pub fn anaesthetist(mut self, a: Anaesthetist) -> Self {
        self.anaesthetists.insert(a);
        self
    }

    #[inline]
    pub fn station(mut self, w: Workstation) -> Self {
        self.stations.insert(w);
        self
    }

    #[inline]
    pub fn request(mut self, a: AnaesthetistId, day: Day, kind: RequestKind) -> Self {
        self.requests.add(a, day, kind);
        self
    }

    #[inline]
    pub fn calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    #[inline]
    pub fn demand(mut self, station: StationId, day: Day, count: u32) -> Self {
        self.demand.set(station, day, count);
        self
    }

    #[inline]
    pub fn pairing(mut self, first: StationId, second: StationId) -> Self {
        self.pairings.push(StationPairing::new(first, second));
        self
    }

    #[inline]
    pub fn history(mut self, a: AnaesthetistId, record: HistoryRecord) -> Self {
        self.history.set(a, record);
        self
    }

    #[inline]
    pub fn daily_workload_cap(mut self, cap: f64) -> Self {
        self.daily_workload_cap = cap;
        self
    }

    pub fn build(self) -> Result<ProblemInstance, InstanceError> {
        ProblemInstance::new(
            self.anaesthetists,
            self.stations,
            self.requests,
            self.calendar.unwrap_or_else(Calendar::standard),
            self.demand,
            self.pairings,
            self.history,
            self.daily_workload_cap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::anaesthetist::Seniority;
    use crate::problem::station::{Granularity, StationKind};
    use std::collections::BTreeSet;
    use theatre_roster_core::prelude::ShiftWindow;

    #[test]
    fn test_builder_assembles_instance() {
        let instance = ProblemInstanceBuilder::new()
            .station(Workstation::new(
                StationId::new(1),
                "OnCall-1",
                StationKind::OnCallFirst,
                Granularity::Monthly,
                ShiftWindow::from_hours(8, 8).unwrap(),
                1.5,
                None,
                true,
            ))
            .anaesthetist(Anaesthetist::new(
                AnaesthetistId::new(1),
                "A1",
                Seniority::Senior,
                true,
                [StationId::new(1)].into_iter().collect(),
                BTreeSet::new(),
                BTreeSet::new(),
            ))
            .demand(StationId::new(1), Day::new(5).unwrap(), 1)
            .build()
            .unwrap();

        assert_eq!(instance.demand().demand_for(StationId::new(1), Day::new(5).unwrap()), 1);
        assert!((instance.daily_workload_cap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_surfaces_validation_errors() {
        let err = ProblemInstanceBuilder::new()
            .demand(StationId::new(7), Day::new(1).unwrap(), 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, InstanceError::UnknownStation(_)));
    }
}
