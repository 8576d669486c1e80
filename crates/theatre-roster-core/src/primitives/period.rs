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

/// A planning day within the 28-day roster period.
///
/// Days are numbered 1..=28. Each day belongs to exactly one [`Week`],
/// derived from its position; this is a structural invariant, not data.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Day(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOutOfRangeError {
    value: u8,
}

impl DayOutOfRangeError {
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

impl std::fmt::Display for DayOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Day {} is outside the planning period 1..=28", self.value)
    }
}

impl std::error::Error for DayOutOfRangeError {}

impl Day {
    pub const FIRST: Day = Day(1);
    pub const LAST: Day = Day(28);

    #[inline]
    pub fn new(value: u8) -> Result<Self, DayOutOfRangeError> {
        if (1..=28).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DayOutOfRangeError::new(value))
        }
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The week this day belongs to.
    #[inline]
    pub fn week(&self) -> Week {
        Week((self.0 - 1) / 7 + 1)
    }

    #[inline]
    pub fn next(&self) -> Option<Day> {
        if self.0 < 28 { Some(Day(self.0 + 1)) } else { None }
    }

    #[inline]
    pub fn prev(&self) -> Option<Day> {
        if self.0 > 1 { Some(Day(self.0 - 1)) } else { None }
    }

    #[inline]
    pub fn all() -> impl Iterator<Item = Day> {
        (1..=28).map(Day)
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Day({})", self.0)
    }
}

/// One of the four weeks of the planning period.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Week(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekOutOfRangeError {
    value: u8,
}

impl WeekOutOfRangeError {
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

impl std::fmt::Display for WeekOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Week {} is outside the planning period 1..=4", self.value)
    }
}

impl std::error::Error for WeekOutOfRangeError {}

impl Week {
    pub const FIRST: Week = Week(1);
    pub const LAST: Week = Week(4);

    #[inline]
    pub fn new(value: u8) -> Result<Self, WeekOutOfRangeError> {
        if (1..=4).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WeekOutOfRangeError::new(value))
        }
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn first_day(&self) -> Day {
        Day((self.0 - 1) * 7 + 1)
    }

    #[inline]
    pub fn last_day(&self) -> Day {
        Day(self.0 * 7)
    }

    #[inline]
    pub fn days(&self) -> impl Iterator<Item = Day> {
        let start = (self.0 - 1) * 7 + 1;
        (start..start + 7).map(Day)
    }

    #[inline]
    pub fn contains(&self, day: Day) -> bool {
        day.week() == *self
    }

    #[inline]
    pub fn next(&self) -> Option<Week> {
        if self.0 < 4 { Some(Week(self.0 + 1)) } else { None }
    }

    #[inline]
    pub fn all() -> impl Iterator<Item = Week> {
        (1..=4).map(Week)
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Week({})", self.0)
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
    fn test_day_rejects_out_of_range() {
        assert!(Day::new(0).is_err());
        assert!(Day::new(29).is_err());
        assert_eq!(Day::new(0).unwrap_err().value(), 0);
    }

    #[test]
    fn test_every_day_belongs_to_exactly_one_week() {
        for d in Day::all() {
            let weeks: Vec<_> = Week::all().filter(|w| w.contains(d)).collect();
            assert_eq!(weeks.len(), 1, "day {} must be in exactly one week", d);
            assert_eq!(weeks[0], d.week());
        }
    }

    #[test]
    fn test_week_boundaries() {
        assert_eq!(day(1).week(), Week::new(1).unwrap());
        assert_eq!(day(7).week(), Week::new(1).unwrap());
        assert_eq!(day(8).week(), Week::new(2).unwrap());
        assert_eq!(day(28).week(), Week::new(4).unwrap());
    }

    #[test]
    fn test_week_days_iterates_seven_days() {
        let w = Week::new(3).unwrap();
        let days: Vec<_> = w.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], day(15));
        assert_eq!(days[6], day(21));
        assert_eq!(w.first_day(), day(15));
        assert_eq!(w.last_day(), day(21));
    }

    #[test]
    fn test_day_next_prev_at_period_edges() {
        assert_eq!(day(1).prev(), None);
        assert_eq!(day(28).next(), None);
        assert_eq!(day(14).next(), Some(day(15)));
        assert_eq!(day(14).prev(), Some(day(13)));
    }

    #[test]
    fn test_week_next_terminates() {
        assert_eq!(Week::LAST.next(), None);
        assert_eq!(Week::FIRST.next(), Some(Week::new(2).unwrap()));
    }
}
