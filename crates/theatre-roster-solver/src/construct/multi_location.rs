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

use crate::construct::{fits_daily_workload, weekly_eligible};
use crate::err::SolverError;
use crate::selection::{CandidateSelector, PriorityCalculator};
use crate::transition::{TransitionManager, TransitionRules};
use theatre_roster_core::prelude::{Day, Week};
use theatre_roster_model::prelude::{
    AnaesthetistId, ProblemInstance, RequestKind, RosterSolution, StationKind, Workstation,
};

/// Fixed fill order for the three mutually-exclusive shift kinds. Morning
/// first: it is the scarcest slot and every later pick narrows it further.
const SHIFT_ORDER: [StationKind; 3] = [
    StationKind::MorningShift,
    StationKind::EveningShift,
    StationKind::LateEveningShift,
];

const SPECIALTY_REQUEST_BONUS: f64 = 15.0;
const BALANCE_TARGET: u32 = 2;
const BALANCE_BONUS: f64 = 2.0;

/// Staffs the three mutually-exclusive weekly shift kinds for one week,
/// before any other weekly station is considered.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiLocationConstructor {
    manager: TransitionManager,
}

impl MultiLocationConstructor {
    #[inline]
    pub fn new() -> Self {
        Self {
            manager: TransitionManager::new(),
        }
    }

    #[tracing::instrument(level = "debug", name = "multi_location", skip_all, fields(week = week.value()))]
    pub fn construct(
        &self,
        week: Week,
        instance: &ProblemInstance,
        monthly: &RosterSolution,
        rules: &TransitionRules,
        selector: &mut dyn CandidateSelector,
        priority: &dyn PriorityCalculator,
        out: &mut RosterSolution,
    ) -> Result<(), SolverError> {
        for kind in SHIFT_ORDER {
            for st in instance
                .stations()
                .iter_of_kind(kind)
                .filter(|s| s.is_weekly())
            {
                for day in week.days() {
                    let required = instance.demand().demand_for(st.id(), day) as usize;
                    if required == 0 {
                        continue;
                    }
                    self.fill_slot(
                        week, day, st, required, instance, monthly, rules, selector, priority,
                        out,
                    )?;
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_slot(
        &self,
        week: Week,
        day: Day,
        st: &Workstation,
        required: usize,
        instance: &ProblemInstance,
        monthly: &RosterSolution,
        rules: &TransitionRules,
        selector: &mut dyn CandidateSelector,
        priority: &dyn PriorityCalculator,
        out: &mut RosterSolution,
    ) -> Result<(), SolverError> {
        let mut candidates: Vec<AnaesthetistId> = Vec::new();
        let mut scores: Vec<f64> = Vec::new();

        for a in instance.anaesthetists().iter_active() {
            if !weekly_eligible(a, st, day, monthly, instance)
                || !fits_daily_workload(a, st, day, monthly, out, instance)
                || self.clashes_with_shift_trio(a.id(), day, out, instance)
            {
                continue;
            }
            let rule_list = rules.get(&a.id()).map(Vec::as_slice).unwrap_or(&[]);
            if self.manager.violates_transition(st.id(), day, rule_list) {
                continue;
            }

            let mut score = priority.priority_of(a.id(), st.id(), day, out, instance);
            score += self.specialty_bonus(a.id(), st, day, instance);
            let shortfall = BALANCE_TARGET.saturating_sub(out.weekly_count_of_in_week(a.id(), week));
            score += f64::from(shortfall) * BALANCE_BONUS;
            score += self
                .manager
                .transition_bonus(st.id(), day, rule_list, out, a.id());

            candidates.push(a.id());
            scores.push(score);
        }

        let picks = selector.select(&candidates, &scores, required);
        if picks.len() < required {
            tracing::warn!(
                station = st.name(),
                day = day.value(),
                required,
                found = picks.len(),
                "shift slot understaffed, continuing with partial coverage"
            );
        }
        for aid in picks {
            out.assign_weekly(aid, st.id(), week, day)
                .map_err(|e| SolverError::weekly_scope(week, e))?;
        }
        Ok(())
    }

    /// The three shift kinds exclude one another on the same day.
    fn clashes_with_shift_trio(
        &self,
        aid: AnaesthetistId,
        day: Day,
        out: &RosterSolution,
        instance: &ProblemInstance,
    ) -> bool {
        out.weekly_of_on(aid, day)
            .filter_map(|w| instance.station_kind(w.station))
            .any(StationKind::is_multi_location)
    }

    fn specialty_bonus(
        &self,
        aid: AnaesthetistId,
        st: &Workstation,
        day: Day,
        instance: &ProblemInstance,
    ) -> f64 {
        let wanted = if st.kind().is_morning() {
            RequestKind::MorningPreferred
        } else if st.kind().is_evening() || st.kind().is_late_evening() {
            RequestKind::EveningPreferred
        } else {
            return 0.0;
        };
        if instance.requests().has(aid, day, wanted) {
            SPECIALTY_REQUEST_BONUS
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{DefaultPriorityCalculator, DeterministicSelector};
    use std::collections::BTreeSet;
    use theatre_roster_core::prelude::Day;
    use theatre_roster_model::prelude::{
        Anaesthetist, ConstructionMethod, Granularity, ProblemInstanceBuilder, Seniority,
        ShiftWindow, StationId, Workstation,
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

    fn shift_station(id: u32, kind: StationKind) -> Workstation {
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

    fn empty() -> RosterSolution {
        RosterSolution::new(ConstructionMethod::DeterministicGreedy)
    }

    #[test]
    fn test_fills_demanded_shift_slots() {
        let instance = ProblemInstanceBuilder::new()
            .station(shift_station(1, StationKind::MorningShift))
            .station(shift_station(2, StationKind::EveningShift))
            .anaesthetist(senior(1, &[1, 2]))
            .anaesthetist(senior(2, &[1, 2]))
            .demand(sid(1), day(2), 1)
            .demand(sid(2), day(2), 1)
            .build()
            .unwrap();

        let week = day(2).week();
        let mut out = empty();
        MultiLocationConstructor::new()
            .construct(
                week,
                &instance,
                &empty(),
                &TransitionRules::new(),
                &mut DeterministicSelector::new(),
                &DefaultPriorityCalculator::new(),
                &mut out,
            )
            .unwrap();

        assert_eq!(out.weekly_count_for(sid(1), week, day(2)), 1);
        assert_eq!(out.weekly_count_for(sid(2), week, day(2)), 1);
        // the trio is mutually exclusive, so the two slots go to two people
        let holders: BTreeSet<_> = out.iter_weekly().map(|w| w.anaesthetist).collect();
        assert_eq!(holders.len(), 2);
    }

    #[test]
    fn test_absent_staff_are_never_picked() {
        let instance = ProblemInstanceBuilder::new()
            .station(shift_station(1, StationKind::MorningShift))
            .anaesthetist(senior(1, &[1]))
            .anaesthetist(senior(2, &[1]))
            .request(aid(1), day(2), RequestKind::Absence)
            .demand(sid(1), day(2), 1)
            .build()
            .unwrap();

        let week = day(2).week();
        let mut out = empty();
        MultiLocationConstructor::new()
            .construct(
                week,
                &instance,
                &empty(),
                &TransitionRules::new(),
                &mut DeterministicSelector::new(),
                &DefaultPriorityCalculator::new(),
                &mut out,
            )
            .unwrap();

        let holders: Vec<_> = out.iter_weekly().map(|w| w.anaesthetist).collect();
        assert_eq!(holders, vec![aid(2)]);
    }

    #[test]
    fn test_shortfall_leaves_partial_coverage() {
        let instance = ProblemInstanceBuilder::new()
            .station(shift_station(1, StationKind::MorningShift))
            .anaesthetist(senior(1, &[1]))
            .demand(sid(1), day(2), 3)
            .build()
            .unwrap();

        let week = day(2).week();
        let mut out = empty();
        MultiLocationConstructor::new()
            .construct(
                week,
                &instance,
                &empty(),
                &TransitionRules::new(),
                &mut DeterministicSelector::new(),
                &DefaultPriorityCalculator::new(),
                &mut out,
            )
            .unwrap();

        // one of three slots staffed, construction still succeeded
        assert_eq!(out.weekly_count_for(sid(1), week, day(2)), 1);
    }

    #[test]
    fn test_monthly_duty_blocks_weekly_shift() {
        let instance = ProblemInstanceBuilder::new()
            .station(shift_station(1, StationKind::MorningShift))
            .anaesthetist(senior(1, &[1]))
            .demand(sid(1), day(2), 1)
            .build()
            .unwrap();

        let mut monthly = empty();
        monthly.assign_monthly(aid(1), sid(9), day(2));

        let week = day(2).week();
        let mut out = empty();
        MultiLocationConstructor::new()
            .construct(
                week,
                &instance,
                &monthly,
                &TransitionRules::new(),
                &mut DeterministicSelector::new(),
                &DefaultPriorityCalculator::new(),
                &mut out,
            )
            .unwrap();

        assert!(out.is_empty());
    }
}
