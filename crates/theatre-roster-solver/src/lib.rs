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

pub mod bench;
pub mod config;
pub mod construct;
pub mod coordinate;
pub mod err;
pub mod integrate;
pub mod selection;
pub mod transition;

pub mod prelude {
    pub use crate::bench::{ParallelHarness, RunOutcome, StrategyFactory};
    pub use crate::config::{ConfigError, SolverConfig};
    pub use crate::construct::{
        GreedyMonthlyConstructor, MonthlyConstructor, MultiLocationConstructor,
        PreferenceDrivenConstructor, WeeklyConstraintHandler, WeeklyRosterConstructor,
    };
    pub use crate::coordinate::TemporalCoordinator;
    pub use crate::err::SolverError;
    pub use crate::integrate::IntegratedSolutionBuilder;
    pub use crate::selection::{
        BiasedRandomSelector, CandidateSelector, DefaultPriorityCalculator, DeterministicSelector,
        PriorityCalculator, SelectorKind,
    };
    pub use crate::transition::{TransitionManager, TransitionRule};
}
