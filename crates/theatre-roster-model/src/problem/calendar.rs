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

use crate::problem::err::WeekendPairError;
use std::collections::BTreeSet;
use theatre_roster_core::prelude::Day;

/// The two calendar days forming one weekend (or holiday) period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekendPair {
    first: Day,
    second: Day,
}

impl WeekendPair {
    #[inline]
    pub fn new(first: Day, second: Day) -> Result<Self, WeekendPairError> {
        if first >= second {
            return Err(WeekendPairError::new(first, second));
        }
        Ok(Self { first, second })
    }

    #[inline]
    pub fn first(&self) -> Day {
        self.first
    }

    #[inline]
    pub fn second(&self) -> Day {
        self.second
    }

    #[inline]
    pub fn contains(&self, day: Day) -> bool {
        self.first == day || self.second == day
    }

    #[inline]
    pub fn partner_of(&self, day: Day) -> Option<Day> {
        if day == self.first {
            Some(self.second)
        } else if day == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Calendar {
    weekend_or_holiday: BTreeSet<Day>,
    weekend_pairs: Vec<WeekendPair>,
    pre_holiday: BTreeSet<Day>,
}

impl Calendar {
    #[inline]
    pub fn new(
        weekend_or_holiday: BTreeSet<Day>,
        weekend_pairs: Vec<WeekendPair>,
        pre_holiday: BTreeSet<Day>,
    ) -> Result<Self, WeekendPairError> {
        for pair in &weekend_pairs {
            if !weekend_or_holiday.contains(&pair.first())
                || !weekend_or_holiday.contains(&pair.second())
            {
                return Err(WeekendPairError::new(pair.first(), pair.second()));
            }
        }
        Ok(Self {
            weekend_or_holiday,
            weekend_pairs,
            pre_holiday,
        })
    }

    /// The plain four-week calendar: days 1..=28 starting on a Monday,
    /// Saturday/Sunday weekends, Fridays as pre-holiday days.
    pub fn standard() -> Self {
        let mut weekend = BTreeSet::new();
        let mut pairs = Vec::new();
        let mut pre_holiday = BTreeSet::new();
        for week in 0..4u8 {
            let fri = Day::new(week * 7 + 5).unwrap_or(Day::FIRST);
            let sat = Day::new(week * 7 + 6).unwrap_or(Day::FIRST);
            let sun = Day::new(week * 7 + 7).unwrap_or(Day::FIRST);
            weekend.insert(sat);
            weekend.insert(sun);
            pre_holiday.insert(fri);
            if let Ok(p) = WeekendPair::new(sat, sun) {
                pairs.push(p);
            }
        }
        Self {
            weekend_or_holiday: weekend,
            weekend_pairs: pairs,
            pre_holiday,
        }
    }

    #[inline]
    pub fn is_weekend_or_holiday(&self, day: Day) -> bool {
        self.weekend_or_holiday.contains(&day)
    }

    #[inline]
    pub fn is_weekday(&self, day: Day) -> bool {
        !self.is_weekend_or_holiday(day)
    }

    #[inline]
    pub fn is_pre_holiday(&self, day: Day) -> bool {
        self.pre_holiday.contains(&day)
    }

    #[inline]
    pub fn weekend_partner(&self, day: Day) -> Option<Day> {
        self.weekend_pairs.iter().find_map(|p| p.partner_of(day))
    }

    #[inline]
    pub fn iter_weekend_pairs(&self) -> impl Iterator<Item = &WeekendPair> {
        self.weekend_pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn day(n: u8) -> Day {
        Day::new(n).unwrap()
    }

    #[test]
    fn test_standard_calendar_weekends() {
        let c = Calendar::standard();
        assert!(c.is_weekend_or_holiday(day(6)));
        assert!(c.is_weekend_or_holiday(day(7)));
        assert!(c.is_weekday(day(5)));
        assert!(c.is_pre_holiday(day(5)));
        assert_eq!(c.iter_weekend_pairs().count(), 4);
    }

    #[test]
    fn test_weekend_partner_is_symmetric() {
        let c = Calendar::standard();
        assert_eq!(c.weekend_partner(day(6)), Some(day(7)));
        assert_eq!(c.weekend_partner(day(7)), Some(day(6)));
        assert_eq!(c.weekend_partner(day(3)), None);
    }

    #[test]
    fn test_pair_rejects_reversed_days() {
        assert!(WeekendPair::new(day(7), day(6)).is_err());
        assert!(WeekendPair::new(day(6), day(6)).is_err());
    }

    #[test]
    fn test_calendar_rejects_pair_outside_weekend_set() {
        let pair = WeekendPair::new(day(6), day(7)).unwrap();
        let err = Calendar::new(BTreeSet::new(), vec![pair], BTreeSet::new());
        assert!(err.is_err());
    }
}
