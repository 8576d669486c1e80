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

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use theatre_roster_core::prelude::Day;
use theatre_roster_model::prelude::{
    AnaesthetistId, ProblemInstance, RosterSolution, StationId,
};

/// Scores how attractive a candidate is for a slot. Constructors consume
/// this only through the trait so the exact numeric tuning stays swappable.
pub trait PriorityCalculator {
    fn priority_of(
        &self,
        anaesthetist: AnaesthetistId,
        station: StationId,
        day: Day,
        solution: &RosterSolution,
        instance: &ProblemInstance,
    ) -> f64;
}

/// Fairness-leaning default: start everyone level, then push down whoever
/// already carries load (historic or current) and nudge toward declared
/// preferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPriorityCalculator;

impl DefaultPriorityCalculator {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl PriorityCalculator for DefaultPriorityCalculator {
    fn priority_of(
        &self,
        anaesthetist: AnaesthetistId,
        station: StationId,
        day: Day,
        solution: &RosterSolution,
        instance: &ProblemInstance,
    ) -> f64 {
        let mut score = 100.0;

        let history = instance.history().record_for(anaesthetist);
        score -= f64::from(history.total_shifts) * 2.0;
        score -= f64::from(solution.total_assignments_of(anaesthetist)) * 5.0;

        if instance.is_weekend_or_holiday(day) {
            score -= f64::from(history.weekend_shifts) * 3.0;
        }
        if instance.calendar().is_pre_holiday(day) {
            score -= f64::from(history.pre_holiday_shifts) * 2.0;
        }

        if let Some(a) = instance.anaesthetist(anaesthetist) {
            if a.prefers(station) {
                score += 10.0;
            }
            if a.dislikes(station) {
                score -= 10.0;
            }
        }

        score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Deterministic,
    BiasedRandom,
}

impl SelectorKind {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorKind::Deterministic => "deterministic",
            SelectorKind::BiasedRandom => "biased-random",
        }
    }
}

impl std::fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Picks up to `required` candidates from a scored slate. `candidates`
/// and `scores` are parallel slices.
pub trait CandidateSelector {
    fn select(
        &mut self,
        candidates: &[AnaesthetistId],
        scores: &[f64],
        required: usize,
    ) -> SmallVec<[AnaesthetistId; 4]>;

    fn selector_kind(&self) -> SelectorKind;
}

/// Stable sort by descending score; ties keep input order. Two calls with
/// the same slate always return the same picks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicSelector;

impl DeterministicSelector {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl CandidateSelector for DeterministicSelector {
    fn select(
        &mut self,
        candidates: &[AnaesthetistId],
        scores: &[f64],
        required: usize,
    ) -> SmallVec<[AnaesthetistId; 4]> {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
            .into_iter()
            .take(required)
            .map(|i| candidates[i])
            .collect()
    }

    #[inline]
    fn selector_kind(&self) -> SelectorKind {
        SelectorKind::Deterministic
    }
}

/// Mixes greedy and uniform-random picks: each slot takes the best-scored
/// remaining candidate with probability `1 - bias` and a uniform random
/// one otherwise. `bias = 0` reproduces the deterministic selector.
#[derive(Debug, Clone)]
pub struct BiasedRandomSelector {
    bias: f64,
    rng: ChaCha8Rng,
}

impl BiasedRandomSelector {
    pub fn new(bias: f64, seed: u64) -> Self {
        Self {
            bias: bias.clamp(0.0, 1.0),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl CandidateSelector for BiasedRandomSelector {
    fn select(
        &mut self,
        candidates: &[AnaesthetistId],
        scores: &[f64],
        required: usize,
    ) -> SmallVec<[AnaesthetistId; 4]> {
        let mut remaining: Vec<usize> = (0..candidates.len()).collect();
        remaining.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut picks = SmallVec::new();
        while picks.len() < required && !remaining.is_empty() {
            let pos = if self.bias > 0.0 && self.rng.random_bool(self.bias) {
                self.rng.random_range(0..remaining.len())
            } else {
                0
            };
            picks.push(candidates[remaining.remove(pos)]);
        }
        picks
    }

    #[inline]
    fn selector_kind(&self) -> SelectorKind {
        SelectorKind::BiasedRandom
    }
}
