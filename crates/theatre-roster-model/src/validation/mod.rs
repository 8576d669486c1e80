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
use crate::constraint::{ConstraintFamily, ConstraintViolation};
use crate::problem::{ProblemInstance, RequestKind, StationKind, Workstation};
use crate::solution::RosterSolution;
use std::collections::BTreeSet;
use theatre_roster_core::prelude::{Day, Week};

const EPSILON: f64 = 1e-9;

/// Stateless validator for the eleven hard-constraint families.
///
/// `check_all` is a pure function of the solution and the instance: it
/// builds a violation list and has no other effect. Feasibility is defined
/// as that list being empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardConstraintChecker;

impl HardConstraintChecker {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    pub fn check_all(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
    ) -> Vec<ConstraintViolation> {
        let mut out = Vec::new();
        self.check_coverage(solution, instance, &mut out);
        self.check_availability(solution, instance, &mut out);
        self.check_consecutive_oncall(solution, instance, &mut out);
        self.check_qualification(solution, instance, &mut out);
        self.check_weekly_hours(solution, instance, &mut out);
        self.check_rest_after_oncall(solution, instance, &mut out);
        self.check_weekend_pairing(solution, instance, &mut out);
        self.check_daily_workload(solution, instance, &mut out);
        self.check_invalid_combinations(solution, instance, &mut out);
        self.check_shift_succession(solution, instance, &mut out);
        self.check_mandatory_pairing(solution, instance, &mut out);
        out
    }

    #[inline]
    pub fn is_feasible(&self, solution: &RosterSolution, instance: &ProblemInstance) -> bool {
        self.check_all(solution, instance).is_empty()
    }

    /// HC1: assigned head count must equal demand exactly, in both
    /// directions, at the station's own granularity.
    fn check_coverage(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for st in instance.stations().iter() {
            for day in Day::all() {
                let demand = instance.demand().demand_for(st.id(), day);
                let assigned = if st.is_monthly() {
                    solution.monthly_count_for(st.id(), day)
                } else {
                    solution.weekly_count_for(st.id(), day.week(), day)
                };
                if assigned != demand {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Hc1,
                            format!(
                                "{} on {}: assigned {} of {} required",
                                st.name(),
                                day,
                                assigned,
                                demand
                            ),
                            assigned.abs_diff(demand),
                        )
                        .with_station(st.id())
                        .with_day(day),
                    );
                }
            }
        }
    }

    /// HC2: an absence request excludes every assignment that day.
    fn check_availability(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for (aid, day, kind) in instance.requests().iter() {
            if kind != RequestKind::Absence {
                continue;
            }
            let count = solution.assignment_count_on(aid, day);
            if count > 0 {
                out.push(
                    ConstraintViolation::new(
                        ConstraintFamily::Hc2,
                        format!("{} assigned on {} despite absence request", aid, day),
                        count,
                    )
                    .with_anaesthetist(aid)
                    .with_day(day),
                );
            }
        }
    }

    /// HC3: no on-call duty on two consecutive weekdays.
    fn check_consecutive_oncall(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for a in instance.anaesthetists().iter() {
            for day in Day::all() {
                let Some(next) = day.next() else { continue };
                if instance.is_weekend_or_holiday(day) || instance.is_weekend_or_holiday(next) {
                    continue;
                }
                if self.holds_oncall_on(solution, instance, a.id(), day)
                    && self.holds_oncall_on(solution, instance, a.id(), next)
                {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Hc3,
                            format!("{} on call on consecutive weekdays {} and {}", a.id(), day, next),
                            1,
                        )
                        .with_anaesthetist(a.id())
                        .with_day(day),
                    );
                }
            }
        }
    }

    fn holds_oncall_on(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        aid: AnaesthetistId,
        day: Day,
    ) -> bool {
        solution.monthly_of_on(aid, day).any(|a| {
            instance
                .station_kind(a.station)
                .is_some_and(StationKind::is_oncall)
        })
    }

    /// HC4: every assignment needs the matching qualification; on-call
    /// roles additionally require seniority on weekdays.
    fn check_qualification(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        let mut push = |aid: AnaesthetistId, st: &Workstation, day: Day, reason: &str| {
            out.push(
                ConstraintViolation::new(
                    ConstraintFamily::Hc4,
                    format!("{} on {} ({}): {}", aid, st.name(), day, reason),
                    1,
                )
                .with_anaesthetist(aid)
                .with_station(st.id())
                .with_day(day),
            );
        };

        let assignments = solution
            .iter_monthly()
            .map(|a| (a.anaesthetist, a.station, a.day))
            .chain(solution.iter_weekly().map(|a| (a.anaesthetist, a.station, a.day)));

        for (aid, sid, day) in assignments {
            let Some(st) = instance.station(sid) else { continue };
            let Some(a) = instance.anaesthetist(aid) else { continue };
            if !a.is_qualified_for(sid) {
                push(aid, st, day, "missing qualification");
            }
            if st.kind().is_oncall() && instance.calendar().is_weekday(day) && !a.is_senior() {
                push(aid, st, day, "weekday on-call requires a senior");
            }
        }
    }

    /// HC5: hour-capped stations must stay under their weekly limit.
    fn check_weekly_hours(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for st in instance.stations().iter() {
            let Some(cap) = st.max_weekly_hours() else { continue };
            let shift_hours = st.shift().duration_hours();
            for week in Week::all() {
                for a in instance.anaesthetists().iter() {
                    let count = week
                        .days()
                        .map(|d| {
                            solution
                                .monthly_of_on(a.id(), d)
                                .filter(|m| m.station == st.id())
                                .count()
                                + solution
                                    .weekly_of_on(a.id(), d)
                                    .filter(|w| w.station == st.id())
                                    .count()
                        })
                        .sum::<usize>();
                    let hours = shift_hours * count as f64;
                    if hours > cap + EPSILON {
                        out.push(
                            ConstraintViolation::new(
                                ConstraintFamily::Hc5,
                                format!(
                                    "{} exceeds {:.1}h cap on {} in {} ({:.1}h)",
                                    a.id(),
                                    cap,
                                    st.name(),
                                    week,
                                    hours
                                ),
                                1,
                            )
                            .with_anaesthetist(a.id())
                            .with_station(st.id()),
                        );
                    }
                }
            }
        }
    }

    /// HC6: the day after a heavy on-call shift (or after the second day
    /// of a weekend on-call pairing) must be free of assignments and of
    /// teaching/examination/dissertation/cardiothoracic requests.
    fn check_rest_after_oncall(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for asg in solution.iter_monthly() {
            let kind = instance.station_kind(asg.station);
            if !kind.is_some_and(StationKind::is_heavy_oncall) {
                continue;
            }
            let Some(rest) = asg.day.next() else { continue };

            // A weekend pairing continues the same duty; rest is enforced
            // after the pairing's second day instead.
            let continues = instance.weekend_partner(asg.day) == Some(rest)
                && solution
                    .monthly_of_on(asg.anaesthetist, rest)
                    .any(|n| n.station == asg.station);
            if continues {
                continue;
            }

            let worked = solution.assignment_count_on(asg.anaesthetist, rest);
            if worked > 0 {
                out.push(
                    ConstraintViolation::new(
                        ConstraintFamily::Hc6,
                        format!(
                            "{} works on {} after heavy on-call on {}",
                            asg.anaesthetist, rest, asg.day
                        ),
                        worked,
                    )
                    .with_anaesthetist(asg.anaesthetist)
                    .with_station(asg.station)
                    .with_day(asg.day),
                );
            }

            let blocked_requests = instance
                .requests()
                .kinds_for(asg.anaesthetist, rest)
                .filter(|k| k.blocks_rest_day())
                .count() as u32;
            if blocked_requests > 0 {
                out.push(
                    ConstraintViolation::new(
                        ConstraintFamily::Hc6,
                        format!(
                            "{} has conflicting requests on rest day {} after on-call on {}",
                            asg.anaesthetist, rest, asg.day
                        ),
                        blocked_requests,
                    )
                    .with_anaesthetist(asg.anaesthetist)
                    .with_station(asg.station)
                    .with_day(asg.day),
                );
            }
        }
    }

    /// HC7: weekend-paired kinds require presence on both days of a
    /// weekend pair, at both granularities.
    fn check_weekend_pairing(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for pair in instance.calendar().iter_weekend_pairs() {
            let (d1, d2) = (pair.first(), pair.second());
            for st in instance.stations().iter() {
                if !st.kind().is_weekend_paired() {
                    continue;
                }
                let (on_first, on_second): (BTreeSet<AnaesthetistId>, BTreeSet<AnaesthetistId>) =
                    if st.is_monthly() {
                        (
                            solution
                                .iter_monthly()
                                .filter(|a| a.station == st.id() && a.day == d1)
                                .map(|a| a.anaesthetist)
                                .collect(),
                            solution
                                .iter_monthly()
                                .filter(|a| a.station == st.id() && a.day == d2)
                                .map(|a| a.anaesthetist)
                                .collect(),
                        )
                    } else {
                        (
                            solution
                                .iter_weekly()
                                .filter(|a| a.station == st.id() && a.day == d1)
                                .map(|a| a.anaesthetist)
                                .collect(),
                            solution
                                .iter_weekly()
                                .filter(|a| a.station == st.id() && a.day == d2)
                                .map(|a| a.anaesthetist)
                                .collect(),
                        )
                    };

                for &aid in on_first.symmetric_difference(&on_second) {
                    let present_on = if on_first.contains(&aid) { d1 } else { d2 };
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Hc7,
                            format!(
                                "{} covers {} on only one day ({}) of weekend ({}, {})",
                                aid,
                                st.name(),
                                present_on,
                                d1,
                                d2
                            ),
                            1,
                        )
                        .with_anaesthetist(aid)
                        .with_station(st.id())
                        .with_day(present_on),
                    );
                }
            }
        }
    }

    /// HC8: summed workload weights on a weekday must stay under the cap.
    fn check_daily_workload(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        let cap = instance.daily_workload_cap();
        for a in instance.anaesthetists().iter() {
            for day in Day::all() {
                if instance.is_weekend_or_holiday(day) {
                    continue;
                }
                let load: f64 = solution
                    .monthly_of_on(a.id(), day)
                    .filter_map(|m| instance.station(m.station))
                    .map(Workstation::workload_weight)
                    .chain(
                        solution
                            .weekly_of_on(a.id(), day)
                            .filter_map(|w| instance.station(w.station))
                            .map(Workstation::workload_weight),
                    )
                    .sum();
                if load > cap + EPSILON {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Hc8,
                            format!(
                                "{} carries workload {:.2} on {} (cap {:.2})",
                                a.id(),
                                load,
                                day,
                                cap
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

    /// HC9: named mutually-exclusive combinations must not co-occur.
    fn check_invalid_combinations(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        // Examination request vs. conflicting monthly duties
        for (aid, day, kind) in instance.requests().iter() {
            if kind != RequestKind::Examination {
                continue;
            }
            for asg in solution.monthly_of_on(aid, day) {
                if instance
                    .station_kind(asg.station)
                    .is_some_and(StationKind::conflicts_with_examination)
                {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Hc9,
                            format!(
                                "{} holds an examination-conflicting duty on {}",
                                aid, day
                            ),
                            1,
                        )
                        .with_anaesthetist(aid)
                        .with_station(asg.station)
                        .with_day(day),
                    );
                }
            }
        }

        for a in instance.anaesthetists().iter() {
            for day in Day::all() {
                // Both on-call roles on a weekday
                if instance.calendar().is_weekday(day) {
                    let kinds: BTreeSet<StationKind> = solution
                        .monthly_of_on(a.id(), day)
                        .filter_map(|m| instance.station_kind(m.station))
                        .filter(|k| k.is_oncall())
                        .collect();
                    if kinds.len() > 1 {
                        out.push(
                            ConstraintViolation::new(
                                ConstraintFamily::Hc9,
                                format!("{} holds both on-call roles on {}", a.id(), day),
                                1,
                            )
                            .with_anaesthetist(a.id())
                            .with_day(day),
                        );
                    }
                }

                // Weekly shift-trio exclusivity
                let trio: BTreeSet<StationKind> = solution
                    .weekly_of_on(a.id(), day)
                    .filter_map(|w| instance.station_kind(w.station))
                    .filter(|k| k.is_multi_location())
                    .collect();
                if trio.len() > 1 {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Hc9,
                            format!(
                                "{} holds {} mutually-exclusive weekly shifts on {}",
                                a.id(),
                                trio.len(),
                                day
                            ),
                            trio.len() as u32 - 1,
                        )
                        .with_anaesthetist(a.id())
                        .with_day(day),
                    );
                }
            }
        }
    }

    /// HC10: same-day shift-succession incompatibilities.
    fn check_shift_succession(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for a in instance.anaesthetists().iter() {
            for day in Day::all() {
                let weekly_kinds: BTreeSet<StationKind> = solution
                    .weekly_of_on(a.id(), day)
                    .filter_map(|w| instance.station_kind(w.station))
                    .collect();
                let has_monthly = solution.has_monthly_on(a.id(), day);

                let morning = weekly_kinds.contains(&StationKind::MorningShift);
                let evening = weekly_kinds.contains(&StationKind::EveningShift);
                let late = weekly_kinds.contains(&StationKind::LateEveningShift);
                let office = weekly_kinds.contains(&StationKind::OfficeHours);

                let mut push = |what: &str| {
                    out.push(
                        ConstraintViolation::new(
                            ConstraintFamily::Hc10,
                            format!("{} on {}: {}", a.id(), day, what),
                            1,
                        )
                        .with_anaesthetist(a.id())
                        .with_day(day),
                    );
                };

                if evening && late {
                    push("evening combined with late evening");
                }
                if (morning || evening) && office {
                    push("shift work combined with office hours");
                }
                if has_monthly && evening {
                    push("monthly duty combined with evening shift");
                }
            }
        }
    }

    /// HC11: declared mandatory pairings across both days of a weekend.
    fn check_mandatory_pairing(
        &self,
        solution: &RosterSolution,
        instance: &ProblemInstance,
        out: &mut Vec<ConstraintViolation>,
    ) {
        for pairing in instance.pairings() {
            for pair in instance.calendar().iter_weekend_pairs() {
                let (d1, d2) = (pair.first(), pair.second());
                for a in instance.anaesthetists().iter() {
                    let holds_first = [d1, d2].into_iter().any(|d| {
                        solution
                            .monthly_of_on(a.id(), d)
                            .any(|m| m.station == pairing.first())
                            || solution
                                .weekly_of_on(a.id(), d)
                                .any(|w| w.station == pairing.first())
                    });
                    if !holds_first {
                        continue;
                    }
                    let missing = [d1, d2]
                        .into_iter()
                        .filter(|&d| {
                            !solution
                                .monthly_of_on(a.id(), d)
                                .any(|m| m.station == pairing.second())
                                && !solution
                                    .weekly_of_on(a.id(), d)
                                    .any(|w| w.station == pairing.second())
                        })
                        .count() as u32;
                    if missing > 0 {
                        out.push(
                            ConstraintViolation::new(
                                ConstraintFamily::Hc11,
                                format!(
                                    "{} holds {} but not {} across weekend ({}, {})",
                                    a.id(),
                                    pairing.first(),
                                    pairing.second(),
                                    d1,
                                    d2
                                ),
                                missing,
                            )
                            .with_anaesthetist(a.id())
                            .with_station(pairing.second())
                            .with_day(d1),
                        );
                    }
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

    fn builder_with_oncall() -> ProblemInstanceBuilder {
        ProblemInstanceBuilder::new()
            .station(station(1, StationKind::OnCallFirst, Granularity::Monthly))
            .station(station(2, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[1, 2]))
            .anaesthetist(senior(2, &[1, 2]))
    }

    fn empty_solution() -> RosterSolution {
        RosterSolution::new(ConstructionMethod::DeterministicGreedy)
    }

    fn violations_of(
        family: ConstraintFamily,
        all: &[ConstraintViolation],
    ) -> Vec<&ConstraintViolation> {
        all.iter().filter(|v| v.family() == family).collect()
    }

    #[test]
    fn test_coverage_exact_match_is_clean() {
        let instance = builder_with_oncall()
            .demand(sid(1), day(5), 1)
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(5));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert!(violations_of(ConstraintFamily::Hc1, &all).is_empty());
    }

    #[test]
    fn test_coverage_flags_under_and_over_assignment() {
        let instance = builder_with_oncall()
            .demand(sid(1), day(5), 2)
            .build()
            .unwrap();
        let checker = HardConstraintChecker::new();

        // under-assignment: 1 of 2
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(5));
        let under = checker.check_all(&sol, &instance);
        let hc1 = violations_of(ConstraintFamily::Hc1, &under);
        assert_eq!(hc1.len(), 1);
        assert_eq!(hc1[0].count(), 1);

        // over-assignment: demand 0 on day 6, one assigned
        let mut sol2 = empty_solution();
        sol2.assign_monthly(aid(1), sid(1), day(5));
        sol2.assign_monthly(aid(2), sid(1), day(5));
        sol2.assign_monthly(aid(1), sid(1), day(4));
        let over = checker.check_all(&sol2, &instance);
        let hc1 = violations_of(ConstraintFamily::Hc1, &over);
        assert_eq!(hc1.len(), 1);
        assert_eq!(hc1[0].day(), Some(day(4)));
    }

    #[test]
    fn test_availability_blocks_all_assignments() {
        let instance = builder_with_oncall()
            .request(aid(1), day(3), RequestKind::Absence)
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(2), day(3));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        let hc2 = violations_of(ConstraintFamily::Hc2, &all);
        assert_eq!(hc2.len(), 1);
        assert_eq!(hc2[0].anaesthetist(), Some(aid(1)));
        assert_eq!(hc2[0].day(), Some(day(3)));
    }

    #[test]
    fn test_availability_invariant_holds_without_assignments() {
        let instance = builder_with_oncall()
            .request(aid(1), day(3), RequestKind::Absence)
            .build()
            .unwrap();
        let all = HardConstraintChecker::new().check_all(&empty_solution(), &instance);
        assert!(violations_of(ConstraintFamily::Hc2, &all).is_empty());
    }

    #[test]
    fn test_consecutive_oncall_weekdays_flagged() {
        let instance = builder_with_oncall().build().unwrap();
        let mut sol = empty_solution();
        // days 2 and 3 are weekdays in the standard calendar
        sol.assign_monthly(aid(1), sid(1), day(2));
        sol.assign_monthly(aid(1), sid(1), day(3));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        let hc3 = violations_of(ConstraintFamily::Hc3, &all);
        assert_eq!(hc3.len(), 1);
        assert_eq!(hc3[0].day(), Some(day(2)));
    }

    #[test]
    fn test_consecutive_oncall_across_weekend_is_allowed() {
        let instance = builder_with_oncall().build().unwrap();
        let mut sol = empty_solution();
        // day 5 (Friday) and day 6 (Saturday): the pair touches a weekend
        sol.assign_monthly(aid(1), sid(1), day(5));
        sol.assign_monthly(aid(1), sid(1), day(6));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert!(violations_of(ConstraintFamily::Hc3, &all).is_empty());
    }

    #[test]
    fn test_qualification_missing_is_flagged() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(2));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert_eq!(violations_of(ConstraintFamily::Hc4, &all).len(), 1);
    }

    #[test]
    fn test_weekday_oncall_requires_senior() {
        let junior = Anaesthetist::new(
            aid(3),
            "J",
            Seniority::Junior,
            true,
            [sid(1)].into_iter().collect(),
            BTreeSet::new(),
            BTreeSet::new(),
        );
        let instance = ProblemInstanceBuilder::new()
            .station(station(1, StationKind::OnCallFirst, Granularity::Monthly))
            .anaesthetist(junior)
            .build()
            .unwrap();
        let checker = HardConstraintChecker::new();

        let mut weekday = empty_solution();
        weekday.assign_monthly(aid(3), sid(1), day(2));
        let all = checker.check_all(&weekday, &instance);
        assert_eq!(violations_of(ConstraintFamily::Hc4, &all).len(), 1);

        // the weekday-only check does not fire on a Saturday
        let mut weekend = empty_solution();
        weekend.assign_monthly(aid(3), sid(1), day(6));
        let all = checker.check_all(&weekend, &instance);
        assert!(violations_of(ConstraintFamily::Hc4, &all).is_empty());
    }

    #[test]
    fn test_weekly_hours_cap() {
        let capped = Workstation::new(
            sid(5),
            "Capped",
            StationKind::DaySurgery,
            Granularity::Weekly,
            ShiftWindow::from_hours(8, 16).unwrap(), // 8h shifts
            1.0,
            Some(16.0), // two shifts per week at most
            false,
        );
        let instance = ProblemInstanceBuilder::new()
            .station(capped)
            .anaesthetist(senior(1, &[5]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        let w = day(1).week();
        for d in [1u8, 2, 3] {
            sol.assign_weekly(aid(1), sid(5), w, day(d)).unwrap();
        }

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert_eq!(violations_of(ConstraintFamily::Hc5, &all).len(), 1);
    }

    #[test]
    fn test_rest_after_oncall_scenario() {
        // Heavy on-call on weekday d, any other monthly duty on d+1:
        // exactly one HC6 violation referencing day d.
        let instance = builder_with_oncall().build().unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(2));
        sol.assign_monthly(aid(1), sid(2), day(3));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        let hc6 = violations_of(ConstraintFamily::Hc6, &all);
        assert_eq!(hc6.len(), 1);
        assert_eq!(hc6[0].day(), Some(day(2)));
        assert_eq!(hc6[0].count(), 1);
    }

    #[test]
    fn test_rest_after_weekend_pairing_checked_after_second_day() {
        let instance = builder_with_oncall().build().unwrap();
        let mut sol = empty_solution();
        // Weekend pairing: same duty Saturday (6) and Sunday (7)
        sol.assign_monthly(aid(1), sid(1), day(6));
        sol.assign_monthly(aid(1), sid(1), day(7));
        // Working Monday (8) violates the rest rule after the pairing
        sol.assign_monthly(aid(1), sid(2), day(8));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        let hc6 = violations_of(ConstraintFamily::Hc6, &all);
        assert_eq!(hc6.len(), 1);
        assert_eq!(hc6[0].day(), Some(day(7)));
    }

    #[test]
    fn test_rest_day_conflicting_request_flagged() {
        let instance = builder_with_oncall()
            .request(aid(1), day(3), RequestKind::Examination)
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(2));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert_eq!(violations_of(ConstraintFamily::Hc6, &all).len(), 1);
    }

    #[test]
    fn test_weekend_pairing_requires_both_days() {
        let instance = builder_with_oncall().build().unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(6)); // Saturday only

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        let hc7 = violations_of(ConstraintFamily::Hc7, &all);
        assert_eq!(hc7.len(), 1);
        assert_eq!(hc7[0].day(), Some(day(6)));
    }

    #[test]
    fn test_daily_workload_cap() {
        let heavy = Workstation::new(
            sid(9),
            "Heavy",
            StationKind::General,
            Granularity::Monthly,
            ShiftWindow::from_hours(8, 16).unwrap(),
            1.5,
            None,
            true,
        );
        let instance = ProblemInstanceBuilder::new()
            .station(heavy.clone())
            .station(station(2, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[9, 2]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(9), day(2));
        sol.assign_monthly(aid(1), sid(2), day(2)); // 1.5 + 1.0 > 2.0

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert_eq!(violations_of(ConstraintFamily::Hc8, &all).len(), 1);
    }

    #[test]
    fn test_examination_conflicts_with_oncall_duty() {
        let instance = builder_with_oncall()
            .request(aid(1), day(4), RequestKind::Examination)
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(1), day(4));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert!(!violations_of(ConstraintFamily::Hc9, &all).is_empty());
    }

    #[test]
    fn test_both_oncall_roles_on_weekday_flagged() {
        let instance = builder_with_oncall()
            .station(station(3, StationKind::OnCallSecond, Granularity::Monthly))
            .anaesthetist(senior(4, &[1, 3]))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        sol.assign_monthly(aid(4), sid(1), day(2));
        sol.assign_monthly(aid(4), sid(3), day(2));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        assert!(!violations_of(ConstraintFamily::Hc9, &all).is_empty());
    }

    #[test]
    fn test_shift_succession_incompatibilities() {
        let instance = ProblemInstanceBuilder::new()
            .station(station(10, StationKind::EveningShift, Granularity::Weekly))
            .station(station(11, StationKind::LateEveningShift, Granularity::Weekly))
            .station(station(12, StationKind::OfficeHours, Granularity::Weekly))
            .station(station(13, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(1, &[10, 11, 12, 13]))
            .build()
            .unwrap();
        let checker = HardConstraintChecker::new();
        let w = day(2).week();

        let mut sol = empty_solution();
        sol.assign_weekly(aid(1), sid(10), w, day(2)).unwrap();
        sol.assign_weekly(aid(1), sid(11), w, day(2)).unwrap();
        let all = checker.check_all(&sol, &instance);
        assert!(!violations_of(ConstraintFamily::Hc10, &all).is_empty());

        let mut sol = empty_solution();
        sol.assign_monthly(aid(1), sid(13), day(2));
        sol.assign_weekly(aid(1), sid(10), w, day(2)).unwrap();
        let all = checker.check_all(&sol, &instance);
        assert!(!violations_of(ConstraintFamily::Hc10, &all).is_empty());
    }

    #[test]
    fn test_mandatory_pairing_spans_weekend() {
        let instance = builder_with_oncall()
            .station(station(7, StationKind::General, Granularity::Monthly))
            .anaesthetist(senior(5, &[1, 2, 7]))
            .pairing(sid(2), sid(7))
            .build()
            .unwrap();
        let mut sol = empty_solution();
        // holds the first station on Saturday, never the second
        sol.assign_monthly(aid(5), sid(2), day(6));

        let all = HardConstraintChecker::new().check_all(&sol, &instance);
        let hc11 = violations_of(ConstraintFamily::Hc11, &all);
        assert_eq!(hc11.len(), 1);
        assert_eq!(hc11[0].count(), 2); // missing on both weekend days
    }

    #[test]
    fn test_empty_solution_with_no_demand_is_feasible() {
        let instance = builder_with_oncall().build().unwrap();
        assert!(HardConstraintChecker::new().is_feasible(&empty_solution(), &instance));
    }
}
