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

use theatre_roster_core::prelude::Week;
use theatre_roster_model::prelude::{
    ConstraintFamily, ConstraintViolation, HardConstraintChecker, PenaltyWeights, ProblemInstance,
    RosterSolution, SoftConstraintEvaluator,
};

/// Hard families the handler re-validates on a single week's roster.
const WEEK_HARD_FAMILIES: [ConstraintFamily; 4] = [
    ConstraintFamily::Hc1,
    ConstraintFamily::Hc2,
    ConstraintFamily::Hc9,
    ConstraintFamily::Hc10,
];

/// Soft families the handler counts on a single week's roster.
const WEEK_SOFT_FAMILIES: [ConstraintFamily; 3] = [
    ConstraintFamily::Sc3,
    ConstraintFamily::Sc8,
    ConstraintFamily::Sc10,
];

/// Re-validates one week's partial roster against the week-scoped rule
/// subset, records violation counts on the solution, and attempts
/// removal-based repair. Repair is best-effort: every removal is followed
/// by a full re-check, and counts reflect what is still broken afterwards.
#[derive(Debug, Clone, Copy)]
pub struct WeeklyConstraintHandler {
    checker: HardConstraintChecker,
    evaluator: SoftConstraintEvaluator,
}

impl Default for WeeklyConstraintHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl WeeklyConstraintHandler {
    pub fn new() -> Self {
        Self {
            checker: HardConstraintChecker::new(),
            evaluator: SoftConstraintEvaluator::new(PenaltyWeights::default()),
        }
    }

    #[tracing::instrument(level = "debug", name = "weekly_handler", skip_all, fields(week = week.value()))]
    pub fn validate_and_repair(
        &self,
        week: Week,
        solution: &mut RosterSolution,
        monthly: &RosterSolution,
        instance: &ProblemInstance,
    ) {
        let mut hard = self.week_hard_violations(week, solution, monthly, instance);

        // One removal attempt per violation, re-checking after each.
        let mut attempts = hard.len();
        while attempts > 0 && !hard.is_empty() {
            let repaired = hard
                .iter()
                .any(|v| self.try_remove_offender(v, week, solution));
            if !repaired {
                break;
            }
            attempts -= 1;
            hard = self.week_hard_violations(week, solution, monthly, instance);
        }

        for family in WEEK_HARD_FAMILIES {
            let count = hard
                .iter()
                .filter(|v| v.family() == family)
                .map(ConstraintViolation::count)
                .sum::<u32>();
            solution.record_violation_count(family.code(), count);
        }

        let soft = self.week_soft_violations(week, solution, monthly, instance);
        for family in WEEK_SOFT_FAMILIES {
            let count = soft
                .iter()
                .filter(|v| v.family() == family)
                .map(ConstraintViolation::count)
                .sum::<u32>();
            solution.record_violation_count(family.code(), count);
        }
    }

    fn week_hard_violations(
        &self,
        week: Week,
        solution: &RosterSolution,
        monthly: &RosterSolution,
        instance: &ProblemInstance,
    ) -> Vec<ConstraintViolation> {
        let combined = self.combined_view(solution, monthly);
        self.checker
            .check_all(&combined, instance)
            .into_iter()
            .filter(|v| WEEK_HARD_FAMILIES.contains(&v.family()))
            .filter(|v| self.in_week_scope(week, v, instance))
            .collect()
    }

    fn week_soft_violations(
        &self,
        week: Week,
        solution: &RosterSolution,
        monthly: &RosterSolution,
        instance: &ProblemInstance,
    ) -> Vec<ConstraintViolation> {
        let combined = self.combined_view(solution, monthly);
        self.evaluator
            .evaluate_all(&combined, instance)
            .into_iter()
            .filter(|v| WEEK_SOFT_FAMILIES.contains(&v.family()))
            .filter(|v| self.in_week_scope(week, v, instance))
            .collect()
    }

    /// Weekly roster on top of the monthly backdrop, so cross-granularity
    /// rules (double duty, coverage) see the full picture.
    fn combined_view(&self, solution: &RosterSolution, monthly: &RosterSolution) -> RosterSolution {
        let mut combined = solution.clone();
        combined.absorb_monthly(monthly);
        combined
    }

    /// A violation belongs to this week's scope when its day lies in the
    /// week, or (for coverage) when it names a weekly station.
    fn in_week_scope(
        &self,
        week: Week,
        violation: &ConstraintViolation,
        instance: &ProblemInstance,
    ) -> bool {
        let day_in_week = violation.day().is_some_and(|d| week.contains(d));
        if violation.family() != ConstraintFamily::Hc1 {
            return day_in_week;
        }
        day_in_week
            && violation
                .station()
                .and_then(|s| instance.station(s))
                .is_some_and(|s| s.is_weekly())
    }

    /// Removes the single weekly assignment behind a violation, when one
    /// exists. Coverage shortfalls have nothing to remove. When the
    /// violation does not name a station, the last of the person's weekly
    /// assignments that day is taken, which is deterministic over the
    /// ordered store.
    fn try_remove_offender(
        &self,
        violation: &ConstraintViolation,
        week: Week,
        solution: &mut RosterSolution,
    ) -> bool {
        if !matches!(
            violation.family(),
            ConstraintFamily::Hc2 | ConstraintFamily::Hc9 | ConstraintFamily::Hc10
        ) {
            return false;
        }
        let (Some(aid), Some(day)) = (violation.anaesthetist(), violation.day()) else {
            return false;
        };
        if let Some(sid) = violation.station() {
            if solution.unassign_weekly(aid, sid, week, day) {
                tracing::debug!(
                    family = violation.family().code(),
                    day = day.value(),
                    "removed weekly assignment during repair"
                );
                return true;
            }
        }
        let last = solution.weekly_of_on(aid, day).map(|w| w.station).last();
        match last {
            Some(sid) if solution.unassign_weekly(aid, sid, week, day) => {
                tracing::debug!(
                    family = violation.family().code(),
                    day = day.value(),
                    "removed weekly assignment during repair"
                );
                true
            }
            _ => false,
        }
    }
}
