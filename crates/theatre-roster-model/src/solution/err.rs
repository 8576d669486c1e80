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

/// A weekly assignment was stored under a week that does not contain its
/// day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekScopeError {
    week: Week,
    day: Day,
}

impl WeekScopeError {
    pub fn new(week: Week, day: Day) -> Self {
        Self { week, day }
    }

    pub fn week(&self) -> Week {
        self.week
    }

    pub fn day(&self) -> Day {
        self.day
    }
}

impl std::fmt::Display for WeekScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} does not lie in {}; weekly assignments must be scoped to the week containing their day",
            self.day, self.week
        )
    }
}

impl std::error::Error for WeekScopeError {}
