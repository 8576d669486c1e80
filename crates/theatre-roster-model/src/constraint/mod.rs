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
use theatre_roster_core::prelude::{Day, Penalty};

/// The closed set of constraint families. Hard families gate feasibility,
/// soft families contribute weighted penalties to the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintFamily {
    /// Coverage: assigned count must equal demand exactly.
    Hc1,
    /// Availability: absence requests exclude all assignments.
    Hc2,
    /// Consecutive on-call restriction.
    Hc3,
    /// Qualification (plus weekday seniority for on-call roles).
    Hc4,
    /// Weekly hour caps.
    Hc5,
    /// Rest after heavy on-call.
    Hc6,
    /// Weekend pairing.
    Hc7,
    /// Daily workload cap.
    Hc8,
    /// Invalid combinations.
    Hc9,
    /// Shift succession.
    Hc10,
    /// Mandatory station pairing.
    Hc11,
    /// Rest-day compliance.
    Sc1,
    /// No-call honouring.
    Sc2,
    /// Shift-request honouring.
    Sc3,
    /// Preferred weekend pairings.
    Sc4,
    /// Workload fairness.
    Sc5,
    /// Weekend fairness.
    Sc6,
    /// Pre-holiday fairness.
    Sc7,
    /// Preference accommodation.
    Sc8,
    /// Consecutive-day avoidance.
    Sc9,
    /// Undesired combinations.
    Sc10,
}

impl ConstraintFamily {
    #[inline]
    pub fn code(self) -> &'static str {
        match self {
            ConstraintFamily::Hc1 => "HC1",
            ConstraintFamily::Hc2 => "HC2",
            ConstraintFamily::Hc3 => "HC3",
            ConstraintFamily::Hc4 => "HC4",
            ConstraintFamily::Hc5 => "HC5",
            ConstraintFamily::Hc6 => "HC6",
            ConstraintFamily::Hc7 => "HC7",
            ConstraintFamily::Hc8 => "HC8",
            ConstraintFamily::Hc9 => "HC9",
            ConstraintFamily::Hc10 => "HC10",
            ConstraintFamily::Hc11 => "HC11",
            ConstraintFamily::Sc1 => "SC1",
            ConstraintFamily::Sc2 => "SC2",
            ConstraintFamily::Sc3 => "SC3",
            ConstraintFamily::Sc4 => "SC4",
            ConstraintFamily::Sc5 => "SC5",
            ConstraintFamily::Sc6 => "SC6",
            ConstraintFamily::Sc7 => "SC7",
            ConstraintFamily::Sc8 => "SC8",
            ConstraintFamily::Sc9 => "SC9",
            ConstraintFamily::Sc10 => "SC10",
        }
    }

    #[inline]
    pub fn is_hard(self) -> bool {
        matches!(
            self,
            ConstraintFamily::Hc1
                | ConstraintFamily::Hc2
                | ConstraintFamily::Hc3
                | ConstraintFamily::Hc4
                | ConstraintFamily::Hc5
                | ConstraintFamily::Hc6
                | ConstraintFamily::Hc7
                | ConstraintFamily::Hc8
                | ConstraintFamily::Hc9
                | ConstraintFamily::Hc10
                | ConstraintFamily::Hc11
        )
    }

    #[inline]
    pub fn is_soft(self) -> bool {
        !self.is_hard()
    }
}

impl std::fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Immutable per-family penalty weight table, passed into the soft
/// evaluator at construction. Hard families always weigh zero; they gate
/// feasibility instead of contributing to the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyWeights {
    sc1: i64,
    sc2: i64,
    sc3: i64,
    sc4: i64,
    sc5: i64,
    sc6: i64,
    sc7: i64,
    sc8: i64,
    sc9: i64,
    sc10: i64,
}

impl Default for PenaltyWeights {
    #[inline]
    fn default() -> Self {
        Self {
            sc1: 10,
            sc2: 5,
            sc3: 30,
            sc4: 8,
            sc5: 10,
            sc6: 10,
            sc7: 3,
            sc8: 8,
            sc9: 8,
            sc10: 8,
        }
    }
}

impl PenaltyWeights {
    #[inline]
    pub fn weight_of(&self, family: ConstraintFamily) -> i64 {
        match family {
            ConstraintFamily::Sc1 => self.sc1,
            ConstraintFamily::Sc2 => self.sc2,
            ConstraintFamily::Sc3 => self.sc3,
            ConstraintFamily::Sc4 => self.sc4,
            ConstraintFamily::Sc5 => self.sc5,
            ConstraintFamily::Sc6 => self.sc6,
            ConstraintFamily::Sc7 => self.sc7,
            ConstraintFamily::Sc8 => self.sc8,
            ConstraintFamily::Sc9 => self.sc9,
            ConstraintFamily::Sc10 => self.sc10,
            _ => 0,
        }
    }

    /// Returns a copy with one soft family reweighted. Hard families are
    /// ignored: their weight is fixed at zero.
    #[inline]
    pub fn with_weight(mut self, family: ConstraintFamily, weight: i64) -> Self {
        match family {
            ConstraintFamily::Sc1 => self.sc1 = weight,
            ConstraintFamily::Sc2 => self.sc2 = weight,
            ConstraintFamily::Sc3 => self.sc3 = weight,
            ConstraintFamily::Sc4 => self.sc4 = weight,
            ConstraintFamily::Sc5 => self.sc5 = weight,
            ConstraintFamily::Sc6 => self.sc6 = weight,
            ConstraintFamily::Sc7 => self.sc7 = weight,
            ConstraintFamily::Sc8 => self.sc8 = weight,
            ConstraintFamily::Sc9 => self.sc9 = weight,
            ConstraintFamily::Sc10 => self.sc10 = weight,
            _ => {}
        }
        self
    }
}

/// One detected violation. Locator fields carry enough context for the
/// repair machinery to find and remove the offending assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    family: ConstraintFamily,
    description: String,
    anaesthetist: Option<AnaesthetistId>,
    station: Option<StationId>,
    day: Option<Day>,
    count: u32,
}

impl ConstraintViolation {
    #[inline]
    pub fn new(family: ConstraintFamily, description: impl Into<String>, count: u32) -> Self {
        Self {
            family,
            description: description.into(),
            anaesthetist: None,
            station: None,
            day: None,
            count,
        }
    }

    #[inline]
    pub fn with_anaesthetist(mut self, a: AnaesthetistId) -> Self {
        self.anaesthetist = Some(a);
        self
    }

    #[inline]
    pub fn with_station(mut self, s: StationId) -> Self {
        self.station = Some(s);
        self
    }

    #[inline]
    pub fn with_day(mut self, d: Day) -> Self {
        self.day = Some(d);
        self
    }

    #[inline]
    pub fn family(&self) -> ConstraintFamily {
        self.family
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn anaesthetist(&self) -> Option<AnaesthetistId> {
        self.anaesthetist
    }

    #[inline]
    pub fn station(&self) -> Option<StationId> {
        self.station
    }

    #[inline]
    pub fn day(&self) -> Option<Day> {
        self.day
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn penalty(&self, weights: &PenaltyWeights) -> Penalty {
        Penalty::new(i64::from(self.count) * weights.weight_of(self.family))
    }
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} (x{})", self.family, self.description, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_design() {
        let w = PenaltyWeights::default();
        assert_eq!(w.weight_of(ConstraintFamily::Sc3), 30);
        assert_eq!(w.weight_of(ConstraintFamily::Sc1), 10);
        assert_eq!(w.weight_of(ConstraintFamily::Sc2), 5);
        assert_eq!(w.weight_of(ConstraintFamily::Sc7), 3);
        assert_eq!(w.weight_of(ConstraintFamily::Sc9), 8);
    }

    #[test]
    fn test_hard_families_weigh_zero() {
        let w = PenaltyWeights::default();
        assert_eq!(w.weight_of(ConstraintFamily::Hc1), 0);
        assert_eq!(w.weight_of(ConstraintFamily::Hc11), 0);
        // Reweighting a hard family is a no-op
        let w2 = w.with_weight(ConstraintFamily::Hc1, 100);
        assert_eq!(w2.weight_of(ConstraintFamily::Hc1), 0);
    }

    #[test]
    fn test_violation_penalty_is_count_times_weight() {
        let w = PenaltyWeights::default();
        let v = ConstraintViolation::new(ConstraintFamily::Sc3, "missed shift request", 2);
        assert_eq!(v.penalty(&w), Penalty::new(60));
    }

    #[test]
    fn test_coexisting_weight_tables() {
        let base = PenaltyWeights::default();
        let tweaked = base.with_weight(ConstraintFamily::Sc3, 1);
        // Two evaluator configurations can live side by side
        assert_eq!(base.weight_of(ConstraintFamily::Sc3), 30);
        assert_eq!(tweaked.weight_of(ConstraintFamily::Sc3), 1);
    }

    #[test]
    fn test_family_partition() {
        assert!(ConstraintFamily::Hc6.is_hard());
        assert!(!ConstraintFamily::Hc6.is_soft());
        assert!(ConstraintFamily::Sc5.is_soft());
        assert_eq!(ConstraintFamily::Hc10.code(), "HC10");
    }
}
