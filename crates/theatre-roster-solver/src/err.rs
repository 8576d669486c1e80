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

use crate::config::ConfigError;
use theatre_roster_core::prelude::Week;
use theatre_roster_model::solution::WeekScopeError;

/// The instance was missing a population the engine cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyInstanceError {
    what: &'static str,
}

impl EmptyInstanceError {
    #[inline]
    pub fn new(what: &'static str) -> Self {
        Self { what }
    }

    #[inline]
    pub fn what(&self) -> &'static str {
        self.what
    }
}

impl std::fmt::Display for EmptyInstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "problem instance has no {}", self.what)
    }
}

impl std::error::Error for EmptyInstanceError {}

/// A construction phase failed; the run is aborted and no partial roster
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseFailure {
    week: Option<Week>,
    message: String,
}

impl PhaseFailure {
    #[inline]
    pub fn monthly(message: impl Into<String>) -> Self {
        Self {
            week: None,
            message: message.into(),
        }
    }

    #[inline]
    pub fn weekly(week: Week, message: impl Into<String>) -> Self {
        Self {
            week: Some(week),
            message: message.into(),
        }
    }

    #[inline]
    pub fn week(&self) -> Option<Week> {
        self.week
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for PhaseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.week {
            Some(week) => write!(f, "weekly phase failed in {}: {}", week, self.message),
            None => write!(f, "monthly phase failed: {}", self.message),
        }
    }
}

impl std::error::Error for PhaseFailure {}

/// Aggregate error surface of the scheduling engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    EmptyInstance(EmptyInstanceError),
    Config(ConfigError),
    MonthlyPhase(PhaseFailure),
    WeeklyPhase(PhaseFailure),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyInstance(e) => write!(f, "{}", e),
            SolverError::Config(e) => write!(f, "{}", e),
            SolverError::MonthlyPhase(e) => write!(f, "{}", e),
            SolverError::WeeklyPhase(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::EmptyInstance(e) => Some(e),
            SolverError::Config(e) => Some(e),
            SolverError::MonthlyPhase(e) | SolverError::WeeklyPhase(e) => Some(e),
        }
    }
}

impl From<EmptyInstanceError> for SolverError {
    fn from(e: EmptyInstanceError) -> Self {
        SolverError::EmptyInstance(e)
    }
}

impl From<ConfigError> for SolverError {
    fn from(e: ConfigError) -> Self {
        SolverError::Config(e)
    }
}

impl SolverError {
    /// Wraps a week-scoping failure raised while assembling week `week`.
    pub fn weekly_scope(week: Week, source: WeekScopeError) -> Self {
        SolverError::WeeklyPhase(PhaseFailure::weekly(week, source.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theatre_roster_core::prelude::Day;

    #[test]
    fn test_display_carries_context() {
        let e = SolverError::from(EmptyInstanceError::new("anaesthetists"));
        assert_eq!(e.to_string(), "problem instance has no anaesthetists");

        let week = Day::new(9).unwrap().week();
        let e = SolverError::WeeklyPhase(PhaseFailure::weekly(week, "no candidates"));
        assert!(e.to_string().contains("weekly phase failed"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let e = SolverError::MonthlyPhase(PhaseFailure::monthly("boom"));
        assert!(e.source().is_some());
    }
}
