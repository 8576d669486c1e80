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

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A daily shift window in minutes since midnight.
///
/// A window whose end lies at or before its start wraps past midnight,
/// which is how overnight on-call shifts are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftWindow {
    start_minute: u16,
    end_minute: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftWindowError {
    start_minute: u16,
    end_minute: u16,
}

impl ShiftWindowError {
    pub fn new(start_minute: u16, end_minute: u16) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    pub fn start_minute(&self) -> u16 {
        self.start_minute
    }

    pub fn end_minute(&self) -> u16 {
        self.end_minute
    }
}

impl std::fmt::Display for ShiftWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Shift window [{}, {}) has a minute outside 0..1440",
            self.start_minute, self.end_minute
        )
    }
}

impl std::error::Error for ShiftWindowError {}

impl ShiftWindow {
    #[inline]
    pub fn new(start_minute: u16, end_minute: u16) -> Result<Self, ShiftWindowError> {
        if start_minute >= MINUTES_PER_DAY || end_minute >= MINUTES_PER_DAY {
            return Err(ShiftWindowError::new(start_minute, end_minute));
        }
        Ok(Self {
            start_minute,
            end_minute,
        })
    }

    /// Convenience constructor from whole hours.
    #[inline]
    pub fn from_hours(start_hour: u16, end_hour: u16) -> Result<Self, ShiftWindowError> {
        Self::new(start_hour * 60, end_hour % 24 * 60)
    }

    #[inline]
    pub fn start_minute(&self) -> u16 {
        self.start_minute
    }

    #[inline]
    pub fn end_minute(&self) -> u16 {
        self.end_minute
    }

    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        if self.end_minute > self.start_minute {
            self.end_minute - self.start_minute
        } else {
            MINUTES_PER_DAY - self.start_minute + self.end_minute
        }
    }

    #[inline]
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes()) / 60.0
    }
}

impl std::fmt::Display for ShiftWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daytime_window_duration() {
        let w = ShiftWindow::from_hours(8, 16).unwrap();
        assert_eq!(w.duration_minutes(), 480);
        assert!((w.duration_hours() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overnight_window_wraps() {
        let w = ShiftWindow::from_hours(16, 8).unwrap();
        assert_eq!(w.duration_minutes(), 960);
        assert!((w.duration_hours() - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_day_oncall_window() {
        // 08:00 to 08:00 next morning
        let w = ShiftWindow::from_hours(8, 8).unwrap();
        assert_eq!(w.duration_minutes(), 1440);
    }

    #[test]
    fn test_rejects_out_of_range_minutes() {
        assert!(ShiftWindow::new(1440, 0).is_err());
        assert!(ShiftWindow::new(0, 1500).is_err());
    }

    #[test]
    fn test_display_formats_clock_times() {
        let w = ShiftWindow::from_hours(8, 16).unwrap();
        assert_eq!(w.to_string(), "08:00-16:00");
    }
}
