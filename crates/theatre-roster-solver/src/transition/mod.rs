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

use std::collections::BTreeMap;
use theatre_roster_core::prelude::{Day, Week};
use theatre_roster_model::prelude::{
    AnaesthetistId, ProblemInstance, RosterSolution, StationId, StationKind,
};

/// Cross-period restriction or bonus threaded from one roster phase into
/// the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransitionRule {
    /// No assignment at all on `day`.
    RestRequired { day: Day },
    /// Avoid putting the same person back on `station` this week.
    AvoidRepeat { station: StationId },
    /// At most `max_run` consecutive days on `station`.
    LimitConsecutive { station: StationId, max_run: u8 },
    /// Evening work on the previous day; keep `day` light.
    RestAfterEvening { day: Day },
    /// Continuity is desirable: reward keeping `station`.
    BonusConsecutive { station: StationId },
    /// The person ran light last week; reward any assignment.
    BonusBalance,
}

pub type TransitionRules = BTreeMap<AnaesthetistId, Vec<TransitionRule>>;

const CARDIOTHORACIC_MAX_RUN: u8 = 3;
const TRANSITION_BONUS: f64 = 8.0;
const LIGHT_WEEK_THRESHOLD: u32 = 2;

/// Derives the per-anaesthetist transition rules consulted by the weekly
/// constructors as soft filters and scoring bonuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionManager;

impl TransitionManager {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Rules for constructing week `week`. `monthly` is the finished
    /// monthly phase; `previous_week` the already-built weekly roster of
    /// week-1 (absent for week 1, whose inherited tail is the monthly
    /// roster itself).
    pub fn rules_for_week(
        &self,
        week: Week,
        monthly: &RosterSolution,
        previous_week: Option<&RosterSolution>,
        instance: &ProblemInstance,
    ) -> TransitionRules {
        let mut rules: TransitionRules = BTreeMap::new();

        self.derive_from_monthly(week, monthly, instance, &mut rules);
        if let Some(prev) = previous_week {
            self.derive_from_previous_week(week, prev, instance, &mut rules);
        }
        self.derive_forward_balance(week, monthly, previous_week, instance, &mut rules);

        for list in rules.values_mut() {
            list.sort();
            list.dedup();
        }
        rules
    }

    /// Heavy on-call inside the week blocks the following day and makes
    /// repeating the same on-call role undesirable.
    fn derive_from_monthly(
        &self,
        week: Week,
        monthly: &RosterSolution,
        instance: &ProblemInstance,
        rules: &mut TransitionRules,
    ) {
        for asg in monthly.iter_monthly() {
            let Some(kind) = instance.station_kind(asg.station) else { continue };
            let in_week = week.contains(asg.day)
                || asg.day.next().is_some_and(|n| week.contains(n));
            if !in_week {
                continue;
            }
            let entry = rules.entry(asg.anaesthetist).or_default();
            if kind.is_heavy_oncall() {
                if let Some(rest) = asg.day.next() {
                    entry.push(TransitionRule::RestRequired { day: rest });
                }
                entry.push(TransitionRule::AvoidRepeat {
                    station: asg.station,
                });
            }
            if kind == StationKind::Cardiothoracic {
                entry.push(TransitionRule::LimitConsecutive {
                    station: asg.station,
                    max_run: CARDIOTHORACIC_MAX_RUN,
                });
            }
        }
    }

    /// The tail (last day) of the previous week constrains the head of
    /// this one.
    fn derive_from_previous_week(
        &self,
        week: Week,
        previous: &RosterSolution,
        instance: &ProblemInstance,
        rules: &mut TransitionRules,
    ) {
        let Some(prev_week) = week.value().checked_sub(1).and_then(|v| Week::new(v).ok()) else {
            return;
        };
        let tail = prev_week.last_day();
        let head = week.first_day();

        for asg in previous.iter_weekly() {
            if asg.day != tail {
                continue;
            }
            let Some(kind) = instance.station_kind(asg.station) else { continue };
            let entry = rules.entry(asg.anaesthetist).or_default();
            if kind.is_evening() || kind.is_late_evening() {
                entry.push(TransitionRule::RestAfterEvening { day: head });
            }
            if kind == StationKind::Cardiothoracic {
                entry.push(TransitionRule::LimitConsecutive {
                    station: asg.station,
                    max_run: CARDIOTHORACIC_MAX_RUN,
                });
            }
            if kind.is_office_hours() {
                entry.push(TransitionRule::BonusConsecutive {
                    station: asg.station,
                });
            }
        }
    }

    /// Forward look-ahead: reward balancing anaesthetists who ran light
    /// in the previous phase. Applies to weeks 1..=3 seeding the next
    /// week as well, but the balancing signal itself is week-local.
    fn derive_forward_balance(
        &self,
        week: Week,
        monthly: &RosterSolution,
        previous_week: Option<&RosterSolution>,
        instance: &ProblemInstance,
        rules: &mut TransitionRules,
    ) {
        for a in instance.anaesthetists().iter_active() {
            let monthly_load = week
                .days()
                .map(|d| monthly.assignment_count_on(a.id(), d))
                .sum::<u32>();
            let weekly_load = previous_week
                .map(|prev| prev.total_assignments_of(a.id()))
                .unwrap_or(0);
            if monthly_load + weekly_load < LIGHT_WEEK_THRESHOLD {
                rules
                    .entry(a.id())
                    .or_default()
                    .push(TransitionRule::BonusBalance);
            }
        }
    }

    /// Hard-filter side of the rule list: true when placing `station` on
    /// `day` would break an inherited restriction.
    pub fn violates_transition(
        &self,
        station: StationId,
        day: Day,
        rules: &[TransitionRule],
    ) -> bool {
        rules.iter().any(|rule| match *rule {
            TransitionRule::RestRequired { day: rest } => day == rest,
            TransitionRule::AvoidRepeat { station: avoided } => station == avoided,
            TransitionRule::RestAfterEvening { day: rest } => day == rest,
            TransitionRule::LimitConsecutive { .. } | TransitionRule::BonusConsecutive { .. } => {
                false
            }
            TransitionRule::BonusBalance => false,
        })
    }

    /// Scoring side: additive bonus for placements the rule list wants to
    /// encourage, small malus for runs beyond an inherited limit.
    pub fn transition_bonus(
        &self,
        station: StationId,
        day: Day,
        rules: &[TransitionRule],
        solution: &RosterSolution,
        anaesthetist: AnaesthetistId,
    ) -> f64 {
        let mut bonus = 0.0;
        for rule in rules {
            match *rule {
                TransitionRule::BonusConsecutive { station: wanted } if station == wanted => {
                    bonus += TRANSITION_BONUS;
                }
                TransitionRule::BonusBalance => {
                    bonus += TRANSITION_BONUS / 2.0;
                }
                TransitionRule::LimitConsecutive {
                    station: limited,
                    max_run,
                } if station == limited => {
                    let run = self.run_ending_before(solution, anaesthetist, limited, day);
                    if run >= u32::from(max_run) {
                        bonus -= TRANSITION_BONUS * 2.0;
                    }
                }
                _ => {}
            }
        }
        bonus
    }

    fn run_ending_before(
        &self,
        solution: &RosterSolution,
        anaesthetist: AnaesthetistId,
        station: StationId,
        day: Day,
    ) -> u32 {
        let mut run = 0;
        let mut cursor = day.prev();
        while let Some(d) = cursor {
            let held = solution
                .monthly_of_on(anaesthetist, d)
                .any(|m| m.station == station)
                || solution
                    .weekly_of_on(anaesthetist, d)
                    .any(|w| w.station == station);
            if !held {
                break;
            }
            run += 1;
            cursor = d.prev();
        }
        run
    }
}
