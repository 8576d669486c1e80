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

use crate::coordinate::TemporalCoordinator;
use std::time::{Duration, Instant};
use theatre_roster_model::prelude::{ProblemInstance, RosterSolution};

/// Builds the coordinator for one benchmark run. Implementations derive
/// the run's seed from the run index so a sweep is reproducible.
pub trait StrategyFactory: Sync {
    fn build(&self, run_index: usize) -> TemporalCoordinator;
}

impl<F> StrategyFactory for F
where
    F: Fn(usize) -> TemporalCoordinator + Sync,
{
    fn build(&self, run_index: usize) -> TemporalCoordinator {
        self(run_index)
    }
}

/// Result of one benchmark run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed {
        run: usize,
        solution: RosterSolution,
        runtime: Duration,
    },
    Failed {
        run: usize,
        error: String,
        runtime: Duration,
    },
    /// The run finished after its deadline; its solution is discarded.
    TimedOut { run: usize, runtime: Duration },
}

impl RunOutcome {
    #[inline]
    pub fn run(&self) -> usize {
        match self {
            RunOutcome::Completed { run, .. }
            | RunOutcome::Failed { run, .. }
            | RunOutcome::TimedOut { run, .. } => *run,
        }
    }

    #[inline]
    pub fn runtime(&self) -> Duration {
        match self {
            RunOutcome::Completed { runtime, .. }
            | RunOutcome::Failed { runtime, .. }
            | RunOutcome::TimedOut { runtime, .. } => *runtime,
        }
    }

    #[inline]
    pub fn solution(&self) -> Option<&RosterSolution> {
        match self {
            RunOutcome::Completed { solution, .. } => Some(solution),
            _ => None,
        }
    }

    #[inline]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, RunOutcome::TimedOut { .. })
    }
}

/// Fans a benchmark sweep out over a scoped worker pool. Workers share
/// nothing but the immutable instance; outcomes come back in run order.
#[derive(Debug, Clone, Copy)]
pub struct ParallelHarness {
    workers: usize,
    deadline: Duration,
}

impl ParallelHarness {
    pub fn new(workers: usize, deadline: Duration) -> Self {
        Self {
            workers: workers.max(1),
            deadline,
        }
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    #[inline]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    #[tracing::instrument(level = "info", name = "benchmark_sweep", skip_all, fields(runs = runs, workers = self.workers))]
    pub fn run_all<F>(
        &self,
        instance: &ProblemInstance,
        factory: &F,
        runs: usize,
    ) -> Vec<RunOutcome>
    where
        F: StrategyFactory,
    {
        let mut outcomes: Vec<RunOutcome> = Vec::with_capacity(runs);

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            for worker in 0..self.workers {
                let deadline = self.deadline;
                handles.push(scope.spawn(move || {
                    let mut local = Vec::new();
                    // static round-robin split of the run indices
                    let mut run = worker;
                    while run < runs {
                        local.push(Self::execute_one(instance, factory, run, deadline));
                        run += self.workers;
                    }
                    local
                }));
            }
            for handle in handles {
                if let Ok(local) = handle.join() {
                    outcomes.extend(local);
                }
            }
        });

        outcomes.sort_by_key(RunOutcome::run);
        outcomes
    }

    fn execute_one<F>(
        instance: &ProblemInstance,
        factory: &F,
        run: usize,
        deadline: Duration,
    ) -> RunOutcome
    where
        F: StrategyFactory,
    {
        let started = Instant::now();
        let coordinator = factory.build(run);
        let result = coordinator.run(instance);
        let runtime = started.elapsed();

        if runtime > deadline {
            tracing::warn!(run, ?runtime, "run exceeded its deadline, discarding");
            return RunOutcome::TimedOut { run, runtime };
        }
        match result {
            Ok(solution) => RunOutcome::Completed {
                run,
                solution,
                runtime,
            },
            Err(e) => {
                tracing::warn!(run, error = %e, "run failed");
                RunOutcome::Failed {
                    run,
                    error: e.to_string(),
                    runtime,
                }
            }
        }
    }
}
