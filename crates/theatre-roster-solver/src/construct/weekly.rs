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

use crate::construct::{
    MultiLocationConstructor, PreferenceDrivenConstructor, WeeklyConstraintHandler,
};
use crate::err::SolverError;
use crate::selection::{CandidateSelector, PriorityCalculator, SelectorKind};
use crate::transition::TransitionRules;
use theatre_roster_core::prelude::Week;
use theatre_roster_model::prelude::{
    ConstructionMethod, ProblemInstance, RosterSolution,
};

/// Builds one week's roster: shift trio first, then the remaining weekly
/// stations, then week-scoped validation and repair.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyRosterConstructor {
    multi_location: MultiLocationConstructor,
    preference: PreferenceDrivenConstructor,
}

impl WeeklyRosterConstructor {
    pub fn new() -> Self {
        Self {
            multi_location: MultiLocationConstructor::new(),
            preference: PreferenceDrivenConstructor::new(),
        }
    }

    #[tracing::instrument(level = "debug", name = "weekly_roster", skip_all, fields(week = week.value()))]
    pub fn construct_week(
        &self,
        week: Week,
        instance: &ProblemInstance,
        monthly: &RosterSolution,
        rules: &TransitionRules,
        selector: &mut dyn CandidateSelector,
        priority: &dyn PriorityCalculator,
    ) -> Result<RosterSolution, SolverError> {
        let method = match selector.selector_kind() {
            SelectorKind::Deterministic => ConstructionMethod::DeterministicGreedy,
            SelectorKind::BiasedRandom => ConstructionMethod::RandomizedGreedy,
        };
        let mut out = RosterSolution::new(method);

        self.multi_location
            .construct(week, instance, monthly, rules, selector, priority, &mut out)?;
        self.preference
            .construct(week, instance, monthly, rules, selector, priority, &mut out)?;
        WeeklyConstraintHandler::new().validate_and_repair(week, &mut out, monthly, instance);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{DefaultPriorityCalculator, DeterministicSelector};
    use std::collections::BTreeSet;
    use theatre_roster_core::prelude::Day;
    use theatre_roster_model::prelude::{
        Anaesthetist, AnaesthetistId, Granularity, ProblemInstanceBuilder, Seniority, ShiftWindow,
        StationId, StationKind, Workstation,
    };

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

    fn weekly_station(id: u32, kind: StationKind) -> Workstation {
        Workstation::new(
            sid(id),
            format!("S{id}"),
            kind,
            Granularity::Weekly,
            ShiftWindow::from_hours(8, 16).unwrap(),
            1.0,
            None,
            false,
        )
    }

    fn senior(id: u32, quals: &[u32]) -> Anaesthetist {
        Anaesthetist::new(
            aid(id),
            format!("A{id}"),
            Seniority::Senior,
            true,
            quals.iter().map(|&q| sid(q)).collect(),
            BTreeSet::new(),
            BTreeSet::new(),
        )
    }

    #[test]
    fn test_week_is_fully_scoped() {
        let instance = ProblemInstanceBuilder::new()
            .station(weekly_station(1, StationKind::MorningShift))
            .station(weekly_station(2, StationKind::DaySurgery))
            .anaesthetist(senior(1, &[1, 2]))
            .anaesthetist(senior(2, &[1, 2]))
            .demand(sid(1), day(9), 1)
            .demand(sid(2), day(10), 1)
            .demand(sid(2), day(3), 1) // other week, must be ignored
            .build()
            .unwrap();

        let week = day(9).week();
        let monthly = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        let out = WeeklyRosterConstructor::new()
            .construct_week(
                week,
                &instance,
                &monthly,
                &TransitionRules::new(),
                &mut DeterministicSelector::new(),
                &DefaultPriorityCalculator::new(),
            )
            .unwrap();

        assert!(out.iter_weekly().all(|w| w.week == week));
        assert!(out.iter_weekly().all(|w| week.contains(w.day)));
        assert_eq!(out.weekly_count_for(sid(1), week, day(9)), 1);
        assert_eq!(out.weekly_count_for(sid(2), week, day(10)), 1);
    }

    #[test]
    fn test_method_follows_selector_kind() {
        let instance = ProblemInstanceBuilder::new()
            .station(weekly_station(1, StationKind::DaySurgery))
            .anaesthetist(senior(1, &[1]))
            .build()
            .unwrap();
        let monthly = RosterSolution::new(ConstructionMethod::DeterministicGreedy);

        let out = WeeklyRosterConstructor::new()
            .construct_week(
                day(1).week(),
                &instance,
                &monthly,
                &TransitionRules::new(),
                &mut DeterministicSelector::new(),
                &DefaultPriorityCalculator::new(),
            )
            .unwrap();
        assert_eq!(out.method(), ConstructionMethod::DeterministicGreedy);

        let mut random = crate::selection::BiasedRandomSelector::new(0.5, 9);
        let out = WeeklyRosterConstructor::new()
            .construct_week(
                day(1).week(),
                &instance,
                &monthly,
                &TransitionRules::new(),
                &mut random,
                &DefaultPriorityCalculator::new(),
            )
            .unwrap();
        assert_eq!(out.method(), ConstructionMethod::RandomizedGreedy);
    }

    #[test]
    fn test_same_seed_reproduces_the_week() {
        let instance = ProblemInstanceBuilder::new()
            .station(weekly_station(1, StationKind::DaySurgery))
            .station(weekly_station(2, StationKind::PainClinic))
            .anaesthetist(senior(1, &[1, 2]))
            .anaesthetist(senior(2, &[1, 2]))
            .anaesthetist(senior(3, &[1, 2]))
            .demand(sid(1), day(2), 1)
            .demand(sid(2), day(3), 1)
            .demand(sid(1), day(4), 1)
            .build()
            .unwrap();
        let monthly = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        let week = day(2).week();

        let build = |seed: u64| {
            let mut selector = crate::selection::BiasedRandomSelector::new(0.7, seed);
            WeeklyRosterConstructor::new()
                .construct_week(
                    week,
                    &instance,
                    &monthly,
                    &TransitionRules::new(),
                    &mut selector,
                    &DefaultPriorityCalculator::new(),
                )
                .unwrap()
        };

        let a = build(11);
        let b = build(11);
        let a_assignments: Vec<_> = a.iter_weekly().collect();
        let b_assignments: Vec<_> = b.iter_weekly().collect();
        assert_eq!(a_assignments, b_assignments);
    }
}
