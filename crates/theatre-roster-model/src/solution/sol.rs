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
use crate::solution::err::WeekScopeError;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use theatre_roster_core::prelude::{Day, Penalty, Week};

/// A whole-period assignment, evaluated per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthlyAssignment {
    pub anaesthetist: AnaesthetistId,
    pub station: StationId,
    pub day: Day,
}

/// An assignment scoped to one of the four weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeeklyAssignment {
    pub anaesthetist: AnaesthetistId,
    pub station: StationId,
    pub week: Week,
    pub day: Day,
}

/// How a solution was constructed, carried as metadata for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructionMethod {
    DeterministicGreedy,
    RandomizedGreedy,
    Integrated,
}

impl ConstructionMethod {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            ConstructionMethod::DeterministicGreedy => "deterministic-greedy",
            ConstructionMethod::RandomizedGreedy => "randomized-greedy",
            ConstructionMethod::Integrated => "integrated",
        }
    }
}

impl std::fmt::Display for ConstructionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable roster state, built incrementally by the constructors and
/// frozen conceptually once the integrated builder finalises it.
///
/// Must only ever be mutated by the single thread building it.
#[derive(Debug, Clone)]
pub struct RosterSolution {
    monthly: BTreeSet<MonthlyAssignment>,
    weekly: BTreeSet<WeeklyAssignment>,
    rest_days: BTreeSet<(AnaesthetistId, Day)>,
    violation_counts: BTreeMap<String, u32>,
    objective: Penalty,
    feasible: bool,
    coverage_ratio: f64,
    computation_time: Duration,
    method: ConstructionMethod,
}

impl RosterSolution {
    #[inline]
    pub fn new(method: ConstructionMethod) -> Self {
        Self {
            monthly: BTreeSet::new(),
            weekly: BTreeSet::new(),
            rest_days: BTreeSet::new(),
            violation_counts: BTreeMap::new(),
            objective: Penalty::zero(),
            feasible: false,
            coverage_ratio: 0.0,
            computation_time: Duration::ZERO,
            method,
        }
    }

    // ---- assignment mutation ----

    #[inline]
    pub fn assign_monthly(&mut self, anaesthetist: AnaesthetistId, station: StationId, day: Day) {
        self.monthly.insert(MonthlyAssignment {
            anaesthetist,
            station,
            day,
        });
    }

    #[inline]
    pub fn unassign_monthly(
        &mut self,
        anaesthetist: AnaesthetistId,
        station: StationId,
        day: Day,
    ) -> bool {
        self.monthly.remove(&MonthlyAssignment {
            anaesthetist,
            station,
            day,
        })
    }

    /// Inserts a weekly assignment. The day must lie inside the given week;
    /// storing it anywhere else would break every week-scoped query.
    #[inline]
    pub fn assign_weekly(
        &mut self,
        anaesthetist: AnaesthetistId,
        station: StationId,
        week: Week,
        day: Day,
    ) -> Result<(), WeekScopeError> {
        if !week.contains(day) {
            return Err(WeekScopeError::new(week, day));
        }
        self.weekly.insert(WeeklyAssignment {
            anaesthetist,
            station,
            week,
            day,
        });
        Ok(())
    }

    #[inline]
    pub fn unassign_weekly(
        &mut self,
        anaesthetist: AnaesthetistId,
        station: StationId,
        week: Week,
        day: Day,
    ) -> bool {
        self.weekly.remove(&WeeklyAssignment {
            anaesthetist,
            station,
            week,
            day,
        })
    }

    #[inline]
    pub fn mark_rest_day(&mut self, anaesthetist: AnaesthetistId, day: Day) {
        self.rest_days.insert((anaesthetist, day));
    }

    #[inline]
    pub fn is_rest_day(&self, anaesthetist: AnaesthetistId, day: Day) -> bool {
        self.rest_days.contains(&(anaesthetist, day))
    }

    // ---- queries ----

    #[inline]
    pub fn iter_monthly(&self) -> impl Iterator<Item = &MonthlyAssignment> {
        self.monthly.iter()
    }

    #[inline]
    pub fn iter_weekly(&self) -> impl Iterator<Item = &WeeklyAssignment> {
        self.weekly.iter()
    }

    #[inline]
    pub fn iter_rest_days(&self) -> impl Iterator<Item = (AnaesthetistId, Day)> + '_ {
        self.rest_days.iter().copied()
    }

    #[inline]
    pub fn monthly_count_for(&self, station: StationId, day: Day) -> u32 {
        self.monthly
            .iter()
            .filter(|a| a.station == station && a.day == day)
            .count() as u32
    }

    #[inline]
    pub fn weekly_count_for(&self, station: StationId, week: Week, day: Day) -> u32 {
        self.weekly
            .iter()
            .filter(|a| a.station == station && a.week == week && a.day == day)
            .count() as u32
    }

    #[inline]
    pub fn monthly_of_on(
        &self,
        anaesthetist: AnaesthetistId,
        day: Day,
    ) -> impl Iterator<Item = &MonthlyAssignment> {
        self.monthly
            .iter()
            .filter(move |a| a.anaesthetist == anaesthetist && a.day == day)
    }

    #[inline]
    pub fn weekly_of_on(
        &self,
        anaesthetist: AnaesthetistId,
        day: Day,
    ) -> impl Iterator<Item = &WeeklyAssignment> {
        self.weekly
            .iter()
            .filter(move |a| a.anaesthetist == anaesthetist && a.day == day)
    }

    /// Total assignments (monthly + weekly) an anaesthetist holds on a day.
    #[inline]
    pub fn assignment_count_on(&self, anaesthetist: AnaesthetistId, day: Day) -> u32 {
        (self.monthly_of_on(anaesthetist, day).count() + self.weekly_of_on(anaesthetist, day).count())
            as u32
    }

    #[inline]
    pub fn has_monthly_on(&self, anaesthetist: AnaesthetistId, day: Day) -> bool {
        self.monthly_of_on(anaesthetist, day).next().is_some()
    }

    #[inline]
    pub fn has_weekly_on(&self, anaesthetist: AnaesthetistId, day: Day) -> bool {
        self.weekly_of_on(anaesthetist, day).next().is_some()
    }

    /// Weekly assignments an anaesthetist holds within one week.
    #[inline]
    pub fn weekly_count_of_in_week(&self, anaesthetist: AnaesthetistId, week: Week) -> u32 {
        self.weekly
            .iter()
            .filter(|a| a.anaesthetist == anaesthetist && a.week == week)
            .count() as u32
    }

    #[inline]
    pub fn total_assignments_of(&self, anaesthetist: AnaesthetistId) -> u32 {
        (self
            .monthly
            .iter()
            .filter(|a| a.anaesthetist == anaesthetist)
            .count()
            + self
                .weekly
                .iter()
                .filter(|a| a.anaesthetist == anaesthetist)
                .count()) as u32
    }

    #[inline]
    pub fn assignment_len(&self) -> usize {
        self.monthly.len() + self.weekly.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty() && self.weekly.is_empty()
    }

    // ---- merge support for the integrated builder ----

    /// Copies every monthly assignment and rest marker from `other`.
    pub fn absorb_monthly(&mut self, other: &RosterSolution) {
        self.monthly.extend(other.monthly.iter().copied());
        self.rest_days.extend(other.rest_days.iter().copied());
        for (key, &count) in &other.violation_counts {
            *self.violation_counts.entry(key.clone()).or_insert(0) += count;
        }
    }

    /// Copies every weekly assignment and rest marker from `other`;
    /// violation counters are re-keyed with a `w{n}:` prefix so the four
    /// weekly phases never collide.
    pub fn absorb_weekly(&mut self, other: &RosterSolution, week: Week) {
        self.weekly
            .extend(other.weekly.iter().copied().filter(|a| a.week == week));
        self.rest_days.extend(other.rest_days.iter().copied());
        for (key, &count) in &other.violation_counts {
            let prefixed = format!("w{}:{}", week.value(), key);
            *self.violation_counts.entry(prefixed).or_insert(0) += count;
        }
    }

    // ---- metadata ----

    #[inline]
    pub fn record_violation_count(&mut self, key: impl Into<String>, count: u32) {
        self.violation_counts.insert(key.into(), count);
    }

    #[inline]
    pub fn violation_count(&self, key: &str) -> u32 {
        self.violation_counts.get(key).copied().unwrap_or(0)
    }

    #[inline]
    pub fn violation_counts(&self) -> &BTreeMap<String, u32> {
        &self.violation_counts
    }

    #[inline]
    pub fn clear_violation_counts(&mut self) {
        self.violation_counts.clear();
    }

    #[inline]
    pub fn objective(&self) -> Penalty {
        self.objective
    }

    #[inline]
    pub fn set_objective(&mut self, objective: Penalty) {
        self.objective = objective;
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    #[inline]
    pub fn set_feasible(&mut self, feasible: bool) {
        self.feasible = feasible;
    }

    #[inline]
    pub fn coverage_ratio(&self) -> f64 {
        self.coverage_ratio
    }

    #[inline]
    pub fn set_coverage_ratio(&mut self, ratio: f64) {
        self.coverage_ratio = ratio;
    }

    #[inline]
    pub fn computation_time(&self) -> Duration {
        self.computation_time
    }

    #[inline]
    pub fn set_computation_time(&mut self, elapsed: Duration) {
        self.computation_time = elapsed;
    }

    #[inline]
    pub fn method(&self) -> ConstructionMethod {
        self.method
    }

    #[inline]
    pub fn set_method(&mut self, method: ConstructionMethod) {
        self.method = method;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[inline]
    fn week(n: u8) -> Week {
        Week::new(n).unwrap()
    }

    #[test]
    fn test_weekly_assignment_must_match_week() {
        let mut s = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        // day 10 lies in week 2
        assert!(s.assign_weekly(aid(1), sid(1), week(2), day(10)).is_ok());
        let err = s.assign_weekly(aid(1), sid(1), week(1), day(10)).unwrap_err();
        assert_eq!(err.week(), week(1));
        assert_eq!(err.day(), day(10));
        // only the valid assignment landed
        assert_eq!(s.iter_weekly().count(), 1);
    }

    #[test]
    fn test_no_weekly_assignment_outside_its_week() {
        let mut s = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        for d in [1u8, 8, 15, 22] {
            let d = day(d);
            s.assign_weekly(aid(1), sid(1), d.week(), d).unwrap();
        }
        for a in s.iter_weekly() {
            assert!(a.week.contains(a.day));
        }
    }

    #[test]
    fn test_assign_unassign_roundtrip() {
        let mut s = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        s.assign_monthly(aid(1), sid(2), day(5));
        assert_eq!(s.monthly_count_for(sid(2), day(5)), 1);
        assert!(s.unassign_monthly(aid(1), sid(2), day(5)));
        assert!(!s.unassign_monthly(aid(1), sid(2), day(5)));
        assert!(s.is_empty());
    }

    #[test]
    fn test_duplicate_assignment_is_idempotent() {
        let mut s = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        s.assign_monthly(aid(1), sid(1), day(3));
        s.assign_monthly(aid(1), sid(1), day(3));
        assert_eq!(s.assignment_len(), 1);
    }

    #[test]
    fn test_assignment_count_on_spans_granularities() {
        let mut s = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        s.assign_monthly(aid(1), sid(1), day(9));
        s.assign_weekly(aid(1), sid(2), week(2), day(9)).unwrap();
        assert_eq!(s.assignment_count_on(aid(1), day(9)), 2);
        assert_eq!(s.assignment_count_on(aid(1), day(10)), 0);
        assert_eq!(s.total_assignments_of(aid(1)), 2);
    }

    #[test]
    fn test_absorb_weekly_prefixes_violation_keys() {
        let mut weekly = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        weekly.assign_weekly(aid(1), sid(1), week(3), day(16)).unwrap();
        weekly.record_violation_count("HC2", 2);

        let mut merged = RosterSolution::new(ConstructionMethod::Integrated);
        merged.absorb_weekly(&weekly, week(3));

        assert_eq!(merged.iter_weekly().count(), 1);
        assert_eq!(merged.violation_count("w3:HC2"), 2);
        assert_eq!(merged.violation_count("HC2"), 0);
    }

    #[test]
    fn test_absorb_weekly_ignores_foreign_weeks() {
        let mut weekly = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        weekly.assign_weekly(aid(1), sid(1), week(1), day(2)).unwrap();
        weekly.assign_weekly(aid(1), sid(1), week(2), day(9)).unwrap();

        let mut merged = RosterSolution::new(ConstructionMethod::Integrated);
        merged.absorb_weekly(&weekly, week(1));
        assert_eq!(merged.iter_weekly().count(), 1);
    }

    #[test]
    fn test_rest_day_markers() {
        let mut s = RosterSolution::new(ConstructionMethod::DeterministicGreedy);
        s.mark_rest_day(aid(4), day(12));
        assert!(s.is_rest_day(aid(4), day(12)));
        assert!(!s.is_rest_day(aid(4), day(13)));
    }
}
