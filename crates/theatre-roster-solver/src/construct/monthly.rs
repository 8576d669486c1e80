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

use crate::err::SolverError;
use crate::selection::{CandidateSelector, PriorityCalculator, SelectorKind};
use theatre_roster_core::prelude::Day;
use theatre_roster_model::prelude::{
    Anaesthetist, AnaesthetistId, ConstructionMethod, ProblemInstance, RequestKind,
    RosterSolution, StationKind, Workstation,
};

const PREFERENCE_BONUS: f64 = 10.0;

/// Contract of the monthly construction phase: fill every monthly-rostered
/// station over the full 28-day period.
pub trait MonthlyConstructor {
    fn construct_monthly(
        &self,
        instance: &ProblemInstance,
        selector: &mut dyn CandidateSelector,
        priority: &dyn PriorityCalculator,
    ) -> Result<RosterSolution, SolverError>;
}

/// Day-by-day greedy fill. On-call stations are staffed before the rest
/// of each day; weekend-paired kinds propagate an assignment to the
/// partner day, and heavy on-call leaves a rest marker behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMonthlyConstructor;

impl GreedyMonthlyConstructor {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    fn eligible(
        &self,
        a: &Anaesthetist,
        st: &Workstation,
        day: Day,
        out: &RosterSolution,
        instance: &ProblemInstance,
    ) -> bool {
        if !a.is_active()
            || !a.is_qualified_for(st.id())
            || instance.requests().has(a.id(), day, RequestKind::Absence)
            || out.is_rest_day(a.id(), day)
        {
            return false;
        }
        // weekday on-call needs a senior
        let weekday = instance.calendar().is_weekday(day);
        if st.kind().is_oncall() && weekday && !a.is_senior() {
            return false;
        }
        // no two on-call duties on consecutive weekdays, and never both
        // roles on one day
        if st.kind().is_oncall() {
            if self.holds_oncall_on(a.id(), day, out, instance) {
                return false;
            }
            for neighbour in [day.prev(), day.next()].into_iter().flatten() {
                if instance.calendar().is_weekday(day)
                    && instance.calendar().is_weekday(neighbour)
                    && self.holds_oncall_on(a.id(), neighbour, out, instance)
                {
                    return false;
                }
            }
        }
        // rest after heavy on-call the previous day, unless the previous
        // day is the first half of this weekend's pairing on this station
        if let Some(prev) = day.prev() {
            let continuing = instance.weekend_partner(prev) == Some(day)
                && out
                    .monthly_of_on(a.id(), prev)
                    .any(|m| m.station == st.id());
            if !continuing
                && out.monthly_of_on(a.id(), prev).any(|m| {
                    instance
                        .station_kind(m.station)
                        .is_some_and(StationKind::is_heavy_oncall)
                })
            {
                return false;
            }
        }
        // daily workload headroom on weekdays
        if weekday {
            let current: f64 = out
                .monthly_of_on(a.id(), day)
                .filter_map(|m| instance.station(m.station))
                .map(Workstation::workload_weight)
                .sum();
            if current + st.workload_weight() > instance.daily_workload_cap() + 1e-9 {
                return false;
            }
        }
        true
    }

    fn holds_oncall_on(
        &self,
        aid: AnaesthetistId,
        day: Day,
        out: &RosterSolution,
        instance: &ProblemInstance,
    ) -> bool {
        out.monthly_of_on(aid, day).any(|m| {
            instance
                .station_kind(m.station)
                .is_some_and(StationKind::is_oncall)
        })
    }

    fn place(
        &self,
        aid: AnaesthetistId,
        st: &Workstation,
        day: Day,
        out: &mut RosterSolution,
        instance: &ProblemInstance,
    ) {
        out.assign_monthly(aid, st.id(), day);

        // weekend-paired duties cover both days of the pair
        let partner = instance
            .weekend_partner(day)
            .filter(|&p| p > day && st.kind().is_weekend_paired());
        if let Some(p) = partner {
            out.assign_monthly(aid, st.id(), p);
        }

        if st.kind().is_heavy_oncall() {
            let last_duty_day = partner.unwrap_or(day);
            if let Some(rest) = last_duty_day.next() {
                out.mark_rest_day(aid, rest);
            }
        }
    }
}

impl MonthlyConstructor for GreedyMonthlyConstructor {
    #[tracing::instrument(level = "debug", name = "monthly_roster", skip_all)]
    fn construct_monthly(
        &self,
        instance: &ProblemInstance,
        selector: &mut dyn CandidateSelector,
        priority: &dyn PriorityCalculator,
    ) -> Result<RosterSolution, SolverError> {
        let method = match selector.selector_kind() {
            SelectorKind::Deterministic => ConstructionMethod::DeterministicGreedy,
            SelectorKind::BiasedRandom => ConstructionMethod::RandomizedGreedy,
        };
        let mut out = RosterSolution::new(method);

        // on-call stations first so the scarcest duties get first pick
        let mut stations: Vec<&Workstation> = instance.stations().iter_monthly().collect();
        stations.sort_by_key(|s| (!s.kind().is_oncall(), s.id()));

        for day in Day::all() {
            for st in &stations {
                let demand = instance.demand().demand_for(st.id(), day);
                let staffed = out.monthly_count_for(st.id(), day);
                let required = demand.saturating_sub(staffed) as usize;
                if required == 0 {
                    continue;
                }

                let mut candidates: Vec<AnaesthetistId> = Vec::new();
                let mut scores: Vec<f64> = Vec::new();
                for a in instance.anaesthetists().iter_active() {
                    if !self.eligible(a, st, day, &out, instance) {
                        continue;
                    }
                    let mut score = priority.priority_of(a.id(), st.id(), day, &out, instance);
                    if a.prefers(st.id()) {
                        score += PREFERENCE_BONUS;
                    }
                    if a.dislikes(st.id()) {
                        score -= PREFERENCE_BONUS;
                    }
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
                        "monthly slot understaffed, continuing with partial coverage"
                    );
                }
                for aid in picks {
                    self.place(aid, st, day, &mut out, instance);
                }
            }
        }
        Ok(out)
    }
}
