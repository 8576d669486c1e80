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

use theatre_roster_core::prelude::{Day, Week};
use theatre_roster_model::prelude::{
    ConstraintFamily, ConstraintViolation, ConstructionMethod, HardConstraintChecker,
    PenaltyWeights, ProblemInstance, RosterSolution, SoftConstraintEvaluator,
};

/// Repair order: cheapest fixes first, coverage last (removals can only
/// make over-assignment coverage better, never shortfalls).
const REPAIR_ORDER: [ConstraintFamily; 9] = [
    ConstraintFamily::Hc2,
    ConstraintFamily::Hc9,
    ConstraintFamily::Hc8,
    ConstraintFamily::Hc6,
    ConstraintFamily::Hc3,
    ConstraintFamily::Hc10,
    ConstraintFamily::Hc7,
    ConstraintFamily::Hc11,
    ConstraintFamily::Hc1,
];

/// Accumulates the monthly and four weekly phase results into one final
/// roster and finalises it: full hard check, one ordered repair pass,
/// soft scoring, objective and coverage statistics.
#[derive(Debug, Clone, Copy)]
pub struct IntegratedSolutionBuilder {
    checker: HardConstraintChecker,
    evaluator: SoftConstraintEvaluator,
}

impl Default for IntegratedSolutionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegratedSolutionBuilder {
    pub fn new() -> Self {
        Self::with_weights(PenaltyWeights::default())
    }

    pub fn with_weights(weights: PenaltyWeights) -> Self {
        Self {
            checker: HardConstraintChecker::new(),
            evaluator: SoftConstraintEvaluator::new(weights),
        }
    }

    #[inline]
    pub fn create_integrated_solution(&self) -> RosterSolution {
        RosterSolution::new(ConstructionMethod::Integrated)
    }

    /// Copies a monthly phase result (assignments, rest markers and
    /// violation counters) into the accumulating solution.
    #[inline]
    pub fn add_monthly_assignments(&self, target: &mut RosterSolution, monthly: &RosterSolution) {
        target.absorb_monthly(monthly);
    }

    /// Copies one weekly phase result; its violation counters are
    /// re-keyed under a `w{k}:` prefix so the four weeks never collide.
    #[inline]
    pub fn add_weekly_assignments(
        &self,
        target: &mut RosterSolution,
        weekly: &RosterSolution,
        week: Week,
    ) {
        target.absorb_weekly(weekly, week);
    }

    /// Full-roster finalisation. Running it twice on an already finalised
    /// solution yields the same objective and feasibility flag.
    #[tracing::instrument(level = "debug", name = "finalize", skip_all)]
    pub fn finalize_integrated_solution(
        &self,
        solution: &mut RosterSolution,
        instance: &ProblemInstance,
    ) {
        let mut hard = self.checker.check_all(solution, instance);
        if !hard.is_empty() {
            self.repair_pass(solution, &hard, instance);
            hard = self.checker.check_all(solution, instance);
        }

        let soft = self.evaluator.evaluate_all(solution, instance);

        for family in REPAIR_ORDER {
            let count = hard
                .iter()
                .filter(|v| v.family() == family)
                .map(ConstraintViolation::count)
                .sum::<u32>();
            solution.record_violation_count(family.code(), count);
        }
        // HC4 and HC5 have no removal-based repair but are still counted
        for family in [ConstraintFamily::Hc4, ConstraintFamily::Hc5] {
            let count = hard
                .iter()
                .filter(|v| v.family() == family)
                .map(ConstraintViolation::count)
                .sum::<u32>();
            solution.record_violation_count(family.code(), count);
        }
        let mut soft_families: Vec<ConstraintFamily> =
            soft.iter().map(ConstraintViolation::family).collect();
        soft_families.sort();
        soft_families.dedup();
        for family in soft_families {
            let count = soft
                .iter()
                .filter(|v| v.family() == family)
                .map(ConstraintViolation::count)
                .sum::<u32>();
            solution.record_violation_count(family.code(), count);
        }

        let objective = soft
            .iter()
            .map(|v| v.penalty(self.evaluator.weights()))
            .sum();
        solution.set_objective(objective);
        solution.set_feasible(hard.is_empty());
        solution.set_coverage_ratio(self.coverage_ratio(solution, instance));

        tracing::debug!(
            hard = hard.len(),
            soft = soft.len(),
            objective = %objective,
            "roster finalised"
        );
    }

    /// One ordered removal pass. Every removal genuinely mutates the
    /// solution; the caller re-checks afterwards.
    fn repair_pass(
        &self,
        solution: &mut RosterSolution,
        violations: &[ConstraintViolation],
        instance: &ProblemInstance,
    ) {
        for family in REPAIR_ORDER {
            for violation in violations.iter().filter(|v| v.family() == family) {
                if self.try_repair(solution, violation, instance) {
                    tracing::debug!(
                        family = violation.family().code(),
                        "removed offending assignment during repair"
                    );
                }
            }
        }
    }

    fn try_repair(
        &self,
        solution: &mut RosterSolution,
        violation: &ConstraintViolation,
        instance: &ProblemInstance,
    ) -> bool {
        match violation.family() {
            // remove everything the person holds on the day
            ConstraintFamily::Hc2 => {
                let (Some(aid), Some(day)) = (violation.anaesthetist(), violation.day()) else {
                    return false;
                };
                self.remove_all_on(solution, aid, day)
            }
            // remove one assignment on the located day
            ConstraintFamily::Hc8 | ConstraintFamily::Hc9 | ConstraintFamily::Hc10 => {
                let (Some(aid), Some(day)) = (violation.anaesthetist(), violation.day()) else {
                    return false;
                };
                self.remove_one_on(solution, aid, day)
            }
            // the violation day is the on-call day; the offending work
            // sits on the day after
            ConstraintFamily::Hc6 => {
                let (Some(aid), Some(day)) = (violation.anaesthetist(), violation.day()) else {
                    return false;
                };
                match day.next() {
                    Some(rest) => self.remove_all_on(solution, aid, rest),
                    None => false,
                }
            }
            // drop the second day of the consecutive pair
            ConstraintFamily::Hc3 => {
                let (Some(aid), Some(day)) = (violation.anaesthetist(), violation.day()) else {
                    return false;
                };
                match day.next() {
                    Some(second) => self.remove_one_on(solution, aid, second),
                    None => false,
                }
            }
            // drop the half-covered weekend day
            ConstraintFamily::Hc7 => {
                let (Some(aid), Some(sid), Some(day)) = (
                    violation.anaesthetist(),
                    violation.station(),
                    violation.day(),
                ) else {
                    return false;
                };
                solution.unassign_monthly(aid, sid, day)
                    || solution.unassign_weekly(aid, sid, day.week(), day)
            }
            // drop the orphaned first-station assignment
            ConstraintFamily::Hc11 => {
                let (Some(aid), Some(day)) = (violation.anaesthetist(), violation.day()) else {
                    return false;
                };
                self.remove_one_on(solution, aid, day)
            }
            // only over-assignment can be repaired by removal
            ConstraintFamily::Hc1 => {
                let (Some(sid), Some(day)) = (violation.station(), violation.day()) else {
                    return false;
                };
                let demand = instance.demand().demand_for(sid, day);
                let mut removed = false;
                while self.station_count_on(solution, sid, day) > demand {
                    let holder = solution
                        .iter_monthly()
                        .find(|m| m.station == sid && m.day == day)
                        .map(|m| m.anaesthetist)
                        .or_else(|| {
                            solution
                                .iter_weekly()
                                .find(|w| w.station == sid && w.day == day)
                                .map(|w| w.anaesthetist)
                        });
                    let Some(aid) = holder else { break };
                    let gone = solution.unassign_monthly(aid, sid, day)
                        || solution.unassign_weekly(aid, sid, day.week(), day);
                    if !gone {
                        break;
                    }
                    removed = true;
                }
                removed
            }
            _ => false,
        }
    }

    fn remove_all_on(
        &self,
        solution: &mut RosterSolution,
        aid: theatre_roster_model::prelude::AnaesthetistId,
        day: Day,
    ) -> bool {
        let mut removed = false;
        while self.remove_one_on(solution, aid, day) {
            removed = true;
        }
        removed
    }

    fn remove_one_on(
        &self,
        solution: &mut RosterSolution,
        aid: theatre_roster_model::prelude::AnaesthetistId,
        day: Day,
    ) -> bool {
        if let Some(sid) = solution.monthly_of_on(aid, day).map(|m| m.station).last() {
            return solution.unassign_monthly(aid, sid, day);
        }
        if let Some(sid) = solution.weekly_of_on(aid, day).map(|w| w.station).last() {
            return solution.unassign_weekly(aid, sid, day.week(), day);
        }
        false
    }

    fn station_count_on(
        &self,
        solution: &RosterSolution,
        sid: theatre_roster_model::prelude::StationId,
        day: Day,
    ) -> u32 {
        solution.monthly_count_for(sid, day) + solution.weekly_count_for(sid, day.week(), day)
    }

    fn coverage_ratio(&self, solution: &RosterSolution, instance: &ProblemInstance) -> f64 {
        let total = instance.demand().total_demand();
        if total == 0 {
            return 1.0;
        }
        let covered: u64 = instance
            .demand()
            .iter()
            .map(|(sid, day, demand)| {
                u64::from(self.station_count_on(solution, sid, day).min(demand))
            })
            .sum();
        covered as f64 / total as f64
    }
}
