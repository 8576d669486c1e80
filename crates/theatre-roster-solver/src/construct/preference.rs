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

const PREFERENCE_BONUS: f64 = 10.0;
const SHIFT_REQUEST_BONUS: f64 = 30.0;
const WEEKLY_BALANCE_LOW: u32 = 2;
const WEEKLY_BALANCE_HIGH: u32 = 3;
const WEEKLY_BALANCE_NUDGE: f64 = 6.0;
const WEEKEND_CONTINUITY_BONUS: f64 = 8.0;

/// Staffs the remaining weekly stations of one week after the shift trio
/// is placed, scoring candidates on declared preferences, explicit
/// requests and weekly balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceDrivenConstructor {
    manager: TransitionManager,
}

impl PreferenceDrivenConstructor {
    #[inline]
    pub fn new() -> Self {
        Self {
            manager: TransitionManager::new(),
        }
    }

    #[tracing::instrument(level = "debug", name = "preference_driven", skip_all, fields(week = week.value()))]
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
        let mut stations: Vec<&Workstation> = instance
            .stations()
            .iter_weekly()
            .filter(|s| !s.kind().is_multi_location())
            .collect();
        stations.sort_by_key(|s| (s.kind().fill_priority(), s.id()));

        for st in stations {
            for day in week.days() {
                let demand = instance.demand().demand_for(st.id(), day);
                let staffed = out.weekly_count_for(st.id(), week, day);
                let required = demand.saturating_sub(staffed) as usize;
                if required == 0 {
                    continue;
                }
                self.fill_slot(
                    week, day, st, required, instance, monthly, rules, selector, priority, out,
                )?;
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
                || self.clashes_same_day(a.id(), st, day, out, instance)
            {
                continue;
            }
            let rule_list = rules.get(&a.id()).map(Vec::as_slice).unwrap_or(&[]);
            if self.manager.violates_transition(st.id(), day, rule_list) {
                continue;
            }

            let mut score = priority.priority_of(a.id(), st.id(), day, out, instance);
            if a.prefers(st.id()) {
                score += PREFERENCE_BONUS;
            }
            if a.dislikes(st.id()) {
                score -= PREFERENCE_BONUS;
            }
            score += self.request_bonus(a.id(), st, day, instance);
            score += self.balance_nudge(a.id(), week, out);
            score += self.weekend_continuity_bonus(a.id(), st, day, out, instance);
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
                "weekly slot understaffed, continuing with partial coverage"
            );
        }
        for aid in picks {
            out.assign_weekly(aid, st.id(), week, day)
                .map_err(|e| SolverError::weekly_scope(week, e))?;
        }
        Ok(())
    }

    /// Same-day exclusivity: never double-book a weekly day, and keep
    /// office hours away from shift work.
    fn clashes_same_day(
        &self,
        aid: AnaesthetistId,
        st: &Workstation,
        day: Day,
        out: &RosterSolution,
        instance: &ProblemInstance,
    ) -> bool {
        let mut kinds = out
            .weekly_of_on(aid, day)
            .filter_map(|w| instance.station_kind(w.station));
        if st.kind().is_office_hours() {
            kinds.any(|k| k.is_morning() || k.is_evening() || k.is_office_hours())
        } else {
            kinds.next().is_some()
        }
    }

    fn request_bonus(
        &self,
        aid: AnaesthetistId,
        st: &Workstation,
        day: Day,
        instance: &ProblemInstance,
    ) -> f64 {
        let fulfilled = (st.kind().is_morning()
            && instance
                .requests()
                .has(aid, day, RequestKind::MorningPreferred))
            || (st.kind().is_evening()
                && instance
                    .requests()
                    .has(aid, day, RequestKind::EveningPreferred))
            || (st.kind() == StationKind::Cardiothoracic
                && instance
                    .requests()
                    .has(aid, day, RequestKind::Cardiothoracic));
        if fulfilled {
            SHIFT_REQUEST_BONUS
        } else {
            0.0
        }
    }

    /// Nudge weekly load toward the comfortable 2..=3 band.
    fn balance_nudge(&self, aid: AnaesthetistId, week: Week, out: &RosterSolution) -> f64 {
        let count = out.weekly_count_of_in_week(aid, week);
        if count < WEEKLY_BALANCE_LOW {
            WEEKLY_BALANCE_NUDGE
        } else if count > WEEKLY_BALANCE_HIGH {
            -WEEKLY_BALANCE_NUDGE
        } else {
            0.0
        }
    }

    /// Office hours spanning a weekend read best with the same person on
    /// both days.
    fn weekend_continuity_bonus(
        &self,
        aid: AnaesthetistId,
        st: &Workstation,
        day: Day,
        out: &RosterSolution,
        instance: &ProblemInstance,
    ) -> f64 {
        if !st.kind().is_office_hours() {
            return 0.0;
        }
        let Some(partner) = instance.weekend_partner(day) else {
            return 0.0;
        };
        if partner < day
            && out
                .weekly_of_on(aid, partner)
                .any(|w| w.station == st.id())
        {
            WEEKEND_CONTINUITY_BONUS
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
    use theatre_roster_model::prelude::{
        Anaesthetist, ConstructionMethod, Granularity, ProblemInstanceBuilder, Seniority,
        ShiftWindow, StationId,
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

    fn anaesthetist(id: u32, quals: &[u32], preferred: &[u32]) -> Anaesthetist {
        Anaesthetist::new(
            aid(id),
            format!("A{id}"),
            Seniority::Senior,
            true,
            quals.iter().map(|&q| sid(q)).collect(),
            preferred.iter().map(|&q| sid(q)).collect(),
            BTreeSet::new(),
        )
    }

    fn empty() -> RosterSolution {
        RosterSolution::new(ConstructionMethod::DeterministicGreedy)
    }

    fn run(
        instance: &ProblemInstance,
        week: Week,
        monthly: &RosterSolution,
    ) -> RosterSolution {
        let mut out = empty();
        PreferenceDrivenConstructor::new()
            .construct(
                week,
                instance,
                monthly,
                &TransitionRules::new(),
                &mut DeterministicSelector::new(),
                &DefaultPriorityCalculator::new(),
                &mut out,
            )
            .unwrap();
        out
    }

    #[test]
    fn test_preference_wins_the_slot() {
        let instance = ProblemInstanceBuilder::new()
            .station(weekly_station(1, StationKind::DaySurgery))
            .anaesthetist(anaesthetist(1, &[1], &[]))
            .anaesthetist(anaesthetist(2, &[1], &[1]))
            .demand(sid(1), day(2), 1)
            .build()
            .unwrap();

        let out = run(&instance, day(2).week(), &empty());
        let holders: Vec<_> = out.iter_weekly().map(|w| w.anaesthetist).collect();
        assert_eq!(holders, vec![aid(2)]);
    }

    #[test]
    fn test_fills_stations_in_priority_order() {
        let instance = ProblemInstanceBuilder::new()
            .station(weekly_station(5, StationKind::OfficeHours))
            .station(weekly_station(6, StationKind::DaySurgery))
            .anaesthetist(anaesthetist(1, &[5, 6], &[]))
            .demand(sid(5), day(2), 1)
            .demand(sid(6), day(2), 1)
            .build()
            .unwrap();

        let out = run(&instance, day(2).week(), &empty());
        // only one of the two can be staffed (same person, same day);
        // office hours outranks the generic station in fill order
        assert_eq!(out.weekly_count_for(sid(5), day(2).week(), day(2)), 1);
        assert_eq!(out.weekly_count_for(sid(6), day(2).week(), day(2)), 0);
    }

    #[test]
    fn test_rest_day_marker_blocks_assignment() {
        let instance = ProblemInstanceBuilder::new()
            .station(weekly_station(1, StationKind::DaySurgery))
            .anaesthetist(anaesthetist(1, &[1], &[]))
            .demand(sid(1), day(3), 1)
            .build()
            .unwrap();

        let mut monthly = empty();
        monthly.mark_rest_day(aid(1), day(3));

        let out = run(&instance, day(3).week(), &monthly);
        assert!(out.is_empty());
    }

    #[test]
    fn test_never_double_books_a_day() {
        let instance = ProblemInstanceBuilder::new()
            .station(weekly_station(1, StationKind::DaySurgery))
            .station(weekly_station(2, StationKind::PainClinic))
            .anaesthetist(anaesthetist(1, &[1, 2], &[]))
            .demand(sid(1), day(2), 1)
            .demand(sid(2), day(2), 1)
            .build()
            .unwrap();

        let out = run(&instance, day(2).week(), &empty());
        assert_eq!(out.assignment_count_on(aid(1), day(2)), 1);
    }
}
