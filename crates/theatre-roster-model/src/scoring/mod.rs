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

use crate::common::AnaesthetistId;
use crate::constraint::{ConstraintFamily, ConstraintViolation, PenaltyWeights};
use crate::problem::{ProblemInstance, RequestKind, StationKind};
use crate::solution::RosterSolution;
use theatre_roster_core::prelude::{Day, Penalty};

const FAIRNESS_TOLERANCE: f64 = 1.0;
const MAX_COMFORTABLE_RUN: u32 = 3;

/// Penalty-weighted evaluator for the ten soft-constraint families.
///
/// The weight table is fixed at construction, so differently-tuned
/// evaluators can coexist (one per benchmark run, for instance) without
/// any shared state.
#[derive(Debug, Clone, Copy)]
pub struct SoftConstraintEvaluator {
    weights: PenaltyWeights,
}

impl SoftConstraintEvaluator {
    #[inline]
    pub fn new(weights: PenaltyWeights) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn evaluate_all(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
    ) -> Vec<ConstraintViolation> {
        let mut out = Vec::new();
        self.score_rest_day_compliance(solution, instance, &mut out);
        self.score_no_call(solution, instance, &mut out);
        self.score_shift_requests(solution, instance, &mut out);
        self.score_weekend_continuity(solution, instance, &mut out);
        self.score_workload_fairness(solution, instance, &mut out);
        self.score_weekend_fairness(solution, instance, &mut out);
        self.score_pre_holiday_fairness(solution, instance, &mut out);
        self.score_preferences(solution, instance, &mut out);
        self.score_consecutive_days(solution, instance, &mut out);
        self.score_undesired_combinations(solution, instance, &mut out);
        out
    }

    #[inline]
    pub fn total_penalty(&self, solution: &RosterSolution, instance: &ProblemInstance) -> Penalty {
        self.evaluate_all(solution, instance)
            .iter()
            .map(|v| v.penalty(&self.weights))
            .sum()
    }

    /// SC1: the day after a heavy on-call duty should carry an explicit
    /// rest-day marker.
    fn score_rest_day_compliance(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for asg in solution.iter_monthly() {
            if !instance
                .station_kind(asg.station)
                .is_some_and(StationKind::is_heavy_oncall)
            {
                continue;
            }
            let Some(rest) = asg.day.next() else { continue };
            let continues = instance.weekend_partner(asg.day) == Some(rest)
                && solution
                    .monthly_of_on(asg.anaesthetist, rest)
                    .any(|n| n.station == asg.station);
            if continues {
                continue;
            }
            if !solution.is_rest_day(asg.anaesthetist, rest) {
                out.push(
                    ConstraintViolation::new(
                        ConstraintFamily::Sc1,
                        format!(
                            "{} lacks a rest-day marker on {} after on-call on {}",
                            asg.anaesthetist, rest, asg.day
                        ),
                        1,
                    )
                    .with_anaesthetist(asg.anaesthetist)
                    .with_day(rest),
                );
            }
        }
    }

    /// SC2: a no-call request should keep that day free of on-call duty.
    fn score_no_call(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for (aid, day, kind) in instance.requests().iter() {
            if kind != RequestKind::NoCall {
                continue;
            }
            let oncall = solution
                .monthly_of_on(aid, day)
                .filter(|m| {
                    instance
                        .station_kind(m.station)
                        .is_some_and(StationKind::is_oncall)
                })
                .count() as u32;
            if oncall > 0 {
                out.push(
                    ConstraintViolation::new(
                        ConstraintFamily::Sc2,
                        format!("{} placed on call on {} despite a no-call request", aid, day),
                        oncall,
                    )
                    .with_anaesthetist(aid)
                    .with_day(day),
                );
            }
        }
    }

    /// SC3: a morning/evening shift request should be met with the
    /// matching shift whenever the person works that day at all.
    fn score_shift_requests(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for (aid, day, kind) in instance.requests().iter() {
            let wanted = match kind {
                RequestKind::MorningPreferred => StationKind::is_morning as fn(StationKind) -> bool,
                RequestKind::EveningPreferred => StationKind::is_evening,
                _ => continue,
            };
            if solution.assignment_count_on(aid, day) == 0 {
                continue;
            }
            let granted = solution
                .weekly_of_on(aid, day)
                .filter_map(|w| instance.station_kind(w.station))
                .any(wanted);
            if !granted {
                out.push(
                    ConstraintViolation::new(
                        ConstraintFamily::Sc3,
                        format!("{} works {} without the requested shift kind", aid, day),
                        1,
                    )
                    .with_anaesthetist(aid)
                    .with_day(day),
                );
            }
        }
    }

    /// SC4: someone working both days of a weekend should stay on the
    /// same station across the pair.
    fn score_weekend_continuity(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for pair in instance.calendar().iter_weekend_pairs() {
            let (d1, d2) = (pair.first(), pair.second());
            for a in instance.anaesthetists().iter() {
                let on_first: Vec<_> = solution
                    .monthly_of_on(a.id(), d1)
                    .map(|m| m.station)
                    .chain(solution.weekly_of_on(a.id(), d1).map(|w| w.station))
                    .collect();
                let on_second: Vec<_> = solution
                    .monthly_of_on(a.id(), d2)
                    .map(|m| m.station)
                    .chain(solution.weekly_of_on(a.id(), d2).map(|w| w.station))
                    .collect();
                if on_first.is_empty() || on_second.is_empty() {
                    continue;
                }
                if !on_first.iter().any(|s| on_second.contains(s)) {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Sc4,
                            format!(
                                "{} changes station between weekend days {} and {}",
                                a.id(),
                                d1,
                                d2
                            ),
                            1,
                        )
                        .with_anaesthetist(a.id())
                        .with_day(d1),
                    );
                }
            }
        }
    }

    /// SC5: total load (current roster plus carried-over history) should
    /// stay close to the active-staff mean.
    fn score_workload_fairness(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        self.score_fairness(
            instance,
            ConstraintFamily::Sc5,
            "total workload",
            out,
            |aid| {
                solution.total_assignments_of(aid) + instance.history().record_for(aid).total_shifts
            },
        );
    }

    /// SC6: weekend duties should be spread evenly.
    fn score_weekend_fairness(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        self.score_fairness(
            instance,
            ConstraintFamily::Sc6,
            "weekend duty",
            out,
            |aid| {
                let current = Day::all()
                    .filter(|&d| instance.is_weekend_or_holiday(d))
                    .map(|d| solution.assignment_count_on(aid, d))
                    .sum::<u32>();
                current + instance.history().record_for(aid).weekend_shifts
            },
        );
    }

    /// SC7: pre-holiday duties should be spread evenly.
    fn score_pre_holiday_fairness(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        self.score_fairness(
            instance,
            ConstraintFamily::Sc7,
            "pre-holiday duty",
            out,
            |aid| {
                let current = Day::all()
                    .filter(|&d| instance.calendar().is_pre_holiday(d))
                    .map(|d| solution.assignment_count_on(aid, d))
                    .sum::<u32>();
                current + instance.history().record_for(aid).pre_holiday_shifts
            },
        );
    }

    fn score_fairness<F>(
        &self,
        instance: &ProblemInstance,
        family: ConstraintFamily,
        what: &str,
        out: &mut Vec<ConstraintViolation>,
        load_of: F,
    ) where
        F: Fn(AnaesthetistId) -> u32,
    {
        let loads: Vec<(AnaesthetistId, u32)> = instance
            .anaesthetists()
            .iter_active()
            .map(|a| (a.id(), load_of(a.id())))
            .collect();
        if loads.is_empty() {
            return;
        }
        let mean = loads.iter().map(|&(_, l)| f64::from(l)).sum::<f64>() / loads.len() as f64;
        for (aid, load) in loads {
            let excess = f64::from(load) - mean - FAIRNESS_TOLERANCE;
            if excess > 0.0 {
                out.push(
                    ConstraintViolation::new(
                        family,
                        format!(
                            "{} carries {} {} against a mean of {:.1}",
                            aid, load, what, mean
                        ),
                        excess.ceil() as u32,
                    )
                    .with_anaesthetist(aid),
                );
            }
        }
    }

    /// SC8: assignments to explicitly less-preferred stations.
    fn score_preferences(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        let assignments = solution
            .iter_monthly()
            .map(|a| (a.anaesthetist, a.station, a.day))
            .chain(solution.iter_weekly().map(|a| (a.anaesthetist, a.station, a.day)));
        for (aid, sid, day) in assignments {
            let Some(a) = instance.anaesthetist(aid) else { continue };
            if a.dislikes(sid) {
                out.push(
                    ConstraintViolation::new(
                        ConstraintFamily::Sc8,
                        format!("{} assigned to less-preferred station on {}", aid, day),
                        1,
                    )
                    .with_anaesthetist(aid)
                    .with_station(sid)
                    .with_day(day),
                );
            }
        }
    }

    /// SC9: working runs longer than three consecutive days.
    fn score_consecutive_days(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for a in instance.anaesthetists().iter() {
            let mut run: u32 = 0;
            let mut run_start: Option<Day> = None;
            for day in Day::all() {
                if solution.assignment_count_on(a.id(), day) > 0 {
                    if run == 0 {
                        run_start = Some(day);
                    }
                    run += 1;
                } else {
                    self.flush_run(a.id(), run, run_start, out);
                    run = 0;
                    run_start = None;
                }
            }
            self.flush_run(a.id(), run, run_start, out);
        }
    }

    fn flush_run(
        &self,
        aid: AnaesthetistId,
        run: u32,
        run_start: Option<Day>,
        out: &mut Vec<ConstraintViolation>,
    ) {
        if run <= MAX_COMFORTABLE_RUN {
            return;
        }
        let mut v = ConstraintViolation::new(
            ConstraintFamily::Sc9,
            format!("{} works {} consecutive days", aid, run),
            run - MAX_COMFORTABLE_RUN,
        )
        .with_anaesthetist(aid);
        if let Some(start) = run_start {
            v = v.with_day(start);
        }
        out.push(v);
    }

    /// SC10: legal but undesired same-day/next-day combinations.
    fn score_undesired_combinations(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for a in instance.anaesthetists().iter() {
            for day in Day::all() {
                // doubling a monthly duty with weekly shift work
                if solution.has_monthly_on(a.id(), day) && solution.has_weekly_on(a.id(), day) {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Sc10,
                            format!("{} doubles monthly and weekly duty on {}", a.id(), day),
                            1,
                        )
                        .with_anaesthetist(a.id())
                        .with_day(day),
                    );
                }

                // second-line on-call rolling straight into first-line
                let Some(next) = day.next() else { continue };
                let second_today = solution.monthly_of_on(a.id(), day).any(|m| {
                    instance.station_kind(m.station) == Some(StationKind::OnCallSecond)
                });
                let first_tomorrow = solution.monthly_of_on(a.id(), next).any(|m| {
                    instance.station_kind(m.station) == Some(StationKind::OnCallFirst)
                });
                if second_today && first_tomorrow {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Sc10,
                            format!(
                                "{} rolls from second-line to first-line on-call on {}",
                                a.id(),
                                next
                            ),
                            1,
                        )
                        .with_anaesthetist(a.id())
                        .with_day(day),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::StationId;
    use crate::problem::{
        Anaesthetist, Granularity, ProblemInstanceBuilder, Seniority, Workstation,
    };
    use crate::solution::ConstructionMethod;
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

    fn station(id: u32, kind: StationKind, granularity: Granularity) -> Workstation {
        Workstation::new(
            sid(id),
            format!("S{id}"),
            kind,
            granularity,
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

    fn evaluator() -> SoftConstraintEvaluator {
        SoftConstraintEvaluator::new(PenaltyWeights::default())
    }

    fn empty_solution() -> RosterSolution {
        RosterSolution::new(ConstructionMethod::DeterministicGreedy)
    }

    fn of_family(
        family: ConstraintFamily,
        all: &[ConstraintViolation],
    ) -> Vec<&ConstraintViolation> {
        all.iter().filter(|v| v.family() == family).collect()
    }

    #[test]
    fn test_missing_rest_marker_scored() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::OnCallFirst, Granularity::Monthly))
            .anaesthetist(senior(1, &[1]))
            .build()
            .unwrap();
        let ev = evaluator();

        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(2));
        let all = ev.evaluate_all(&sol, &instance);
        assert_eq!(of_family(ConstraintFamily::Sc1, &all).len(), 1);

        sol.mark_rest_day(aid(1), day(3));
        let all = ev.evaluate_all(&sol, &instance);
        assert!(of_family(ConstraintFamily::Sc1, &all).is_empty());
    }

    #[test]
    fn test_no_call_request_scored() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::OnCallSecond, Granularity::Monthly))
            .anaesthetist(senior(1, &[1]))
            .request(aid(1), day(4), RequestKind::NoCall)
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(4));

        let all = evaluator().evaluate_all(&sol, &instance);
        let sc2 = of_family(ConstraintFamily::Sc2, &all);
        assert_eq!(sc2.len(), 1);
        assert_eq!(sc2[0].day(), Some(day(4)));
    }

    #[test]
    fn test_shift_request_only_scored_when_working() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::MorningShift, Granularity::Weekly))
            .station(station(2, StationKind::DaySurgery, Granularity::Weekly))
            .anaesthetist(senior(1, &[1, 2]))
            .request(aid(1), day(3), RequestKind::MorningPreferred)
            .build()
            .unwrap();
        let ev = evaluator();
        let w = day(3).week();

        // not working that day: no penalty
        let sol = empty_solution();
        assert!(of_family(ConstraintFamily::Sc3, &ev.evaluate_all(&sol, &instance)).is_empty());

        // working a non-morning shift: penalty
        let mut sol = empty_solution();
        sol.assign_weekly(aid(1), sid(2), w, day(3)).unwrap();
        assert_eq!(
            of_family(ConstraintFamily::Sc3, &ev.evaluate_all(&sol, &instance)).len(),
            1
        );

        // granted the morning shift: no penalty
        let mut sol = empty_solution();
        sol.assign_weekly(aid(1), sid(1), w, day(3)).unwrap();
        assert!(of_family(ConstraintFamily::Sc3, &ev.evaluate_all(&sol, &instance)).is_empty());
    }

    #[test]
    fn test_weekend_station_change_scored() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::General, Granularity::Monthly))
            .station(station(2, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[1, 2]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(6));
        sol.assign_monthly(aid(1), sid(2), day(7));

        let all = evaluator().evaluate_all(&sol, &instance);
        assert_eq!(of_family(ConstraintFamily::Sc4, &all).len(), 1);
    }

    #[test]
    fn test_workload_fairness_flags_outlier() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[1]))
            .anaesthetist(senior(2, &[1]))
            .anaesthetist(senior(3, &[1]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        // loads: 4, 0, 0 -> mean 1.33, excess for A1 = 1.67 -> count 2
        for d in [2u8, 3, 4, 5] {
            sol.assign_monthly(aid(1), sid(1), day(d));
        }

        let all = evaluator().evaluate_all(&sol, &instance);
        let sc5 = of_family(ConstraintFamily::Sc5, &all);
        assert_eq!(sc5.len(), 1);
        assert_eq!(sc5[0].anaesthetist(), Some(aid(1)));
        assert_eq!(sc5[0].count(), 2);
    }

    #[test]
    fn test_balanced_load_is_fair() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[1]))
            .anaesthetist(senior(2, &[1]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(2));
        sol.assign_monthly(aid(2), sid(1), day(3));

        let all = evaluator().evaluate_all(&sol, &instance);
        assert!(of_family(ConstraintFamily::Sc5, &all).is_empty());
    }

    #[test]
    fn test_less_preferred_assignment_scored() {
        let reluctant = Anaesthetist::new(
            aid(1),
            "A1",
            Seniority::Senior,
            true,
            [sid(1)].into_iter().collect(),
            BTreeSet::new(),
            [sid(1)].into_iter().collect(),
        );
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::General, Granularity::Monthly))
            .anaesthetist(reluctant)
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(2));

        let all = evaluator().evaluate_all(&sol, &instance);
        assert_eq!(of_family(ConstraintFamily::Sc8, &all).len(), 1);
    }

    #[test]
    fn test_long_run_scored_beyond_three_days() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[1]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        for d in [2u8, 3, 4, 5, 6] {
            sol.assign_monthly(aid(1), sid(1), day(d));
        }

        let all = evaluator().evaluate_all(&sol, &instance);
        let sc9 = of_family(ConstraintFamily::Sc9, &all);
        assert_eq!(sc9.len(), 1);
        assert_eq!(sc9[0].count(), 2);
        assert_eq!(sc9[0].day(), Some(day(2)));
    }

    #[test]
    fn test_double_duty_scored() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::General, Granularity::Monthly))
            .station(station(2, StationKind::DaySurgery, Granularity::Weekly))
            .anaesthetist(senior(1, &[1, 2]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(2));
        sol.assign_weekly(aid(1), sid(2), day(2).week(), day(2)).unwrap();

        let all = evaluator().evaluate_all(&sol, &instance);
        assert_eq!(of_family(ConstraintFamily::Sc10, &all).len(), 1);
    }

    #[test]
    fn test_total_penalty_sums_count_times_weight() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::OnCallSecond, Granularity::Monthly))
            .anaesthetist(senior(1, &[1]))
            .request(aid(1), day(4), RequestKind::NoCall)
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(4));

        let ev = evaluator();
        let total = ev.total_penalty(&sol, &instance);
        let expected: Penalty = ev
            .evaluate_all(&sol, &instance)
            .iter()
            .map(|v| v.penalty(ev.weights()))
            .sum();
        assert_eq!(total, expected);
        // at least the no-call family contributes
        assert!(total >= Penalty::new(5));
    }
}
