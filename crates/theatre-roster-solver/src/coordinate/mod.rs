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

use crate::config::SolverConfig;
use crate::construct::{GreedyMonthlyConstructor, MonthlyConstructor, WeeklyRosterConstructor};
use crate::err::{EmptyInstanceError, SolverError};
use crate::integrate::IntegratedSolutionBuilder;
use crate::selection::{
    BiasedRandomSelector, CandidateSelector, DefaultPriorityCalculator, DeterministicSelector,
    PriorityCalculator, SelectorKind,
};
use crate::transition::TransitionManager;
use std::time::Instant;
use theatre_roster_core::prelude::Week;
use theatre_roster_model::prelude::{ProblemInstance, RosterSolution};

/// Drives a full run: monthly phase, the four weekly phases threaded
/// through the transition manager, merge, finalisation. Any phase error
/// aborts the run; no partial roster is returned.
pub struct TemporalCoordinator {
    config: SolverConfig,
    selector_kind: SelectorKind,
}

impl TemporalCoordinator {
    pub fn new(config: SolverConfig, selector_kind: SelectorKind) -> Self {
        Self {
            config,
            selector_kind,
        }
    }

    #[inline]
    pub fn deterministic(config: SolverConfig) -> Self {
        Self::new(config, SelectorKind::Deterministic)
    }

    #[inline]
    pub fn randomized(config: SolverConfig) -> Self {
        Self::new(config, SelectorKind::BiasedRandom)
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[inline]
    pub fn selector_kind(&self) -> SelectorKind {
        self.selector_kind
    }

    fn build_selector(&self) -> Box<dyn CandidateSelector> {
        match self.selector_kind {
            SelectorKind::Deterministic => Box::new(DeterministicSelector::new()),
            SelectorKind::BiasedRandom => Box::new(BiasedRandomSelector::new(
                self.config.bias(),
                self.config.seed(),
            )),
        }
    }

    #[tracing::instrument(level = "info", name = "roster_run", skip_all, fields(selector = %self.selector_kind))]
    pub fn run(&self, instance: &ProblemInstance) -> Result<RosterSolution, SolverError> {
        if instance.anaesthetists().is_empty() {
            return Err(EmptyInstanceError::new("anaesthetists").into());
        }
        if instance.stations().is_empty() {
            return Err(EmptyInstanceError::new("workstations").into());
        }

        let started = Instant::now();
        let mut selector = self.build_selector();
        let priority: &dyn PriorityCalculator = &DefaultPriorityCalculator::new();
        let manager = TransitionManager::new();
        let builder = IntegratedSolutionBuilder::new();
        let weekly_constructor = WeeklyRosterConstructor::new();

        let monthly = GreedyMonthlyConstructor::new().construct_monthly(
            instance,
            selector.as_mut(),
            priority,
        )?;
        tracing::debug!(
            assignments = monthly.assignment_len(),
            "monthly phase complete"
        );

        let mut integrated = builder.create_integrated_solution();
        builder.add_monthly_assignments(&mut integrated, &monthly);

        let mut previous_week: Option<RosterSolution> = None;
        for week in Week::all() {
            let rules =
                manager.rules_for_week(week, &monthly, previous_week.as_ref(), instance);
            let weekly = weekly_constructor.construct_week(
                week,
                instance,
                &monthly,
                &rules,
                selector.as_mut(),
                priority,
            )?;
            tracing::debug!(
                week = week.value(),
                assignments = weekly.assignment_len(),
                "weekly phase complete"
            );
            builder.add_weekly_assignments(&mut integrated, &weekly, week);
            previous_week = Some(weekly);
        }

        builder.finalize_integrated_solution(&mut integrated, instance);
        integrated.set_computation_time(started.elapsed());

        tracing::info!(
            feasible = integrated.is_feasible(),
            objective = %integrated.objective(),
            coverage = integrated.coverage_ratio(),
            "run complete"
        );
        Ok(integrated)
    }
}
