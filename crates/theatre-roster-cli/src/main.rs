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

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use theatre_roster_model::prelude::{
    Anaesthetist, AnaesthetistId, Calendar, Day, Granularity, HistoryRecord, ProblemInstance,
    ProblemInstanceBuilder, RequestKind, RosterSolution, Seniority, ShiftWindow, StationId,
    StationKind, Workstation,
};
use theatre_roster_solver::prelude::{
    ParallelHarness, RunOutcome, SolverConfig, TemporalCoordinator,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

const SWEEP_RUNS: usize = 8;
const RUN_DEADLINE: Duration = Duration::from_secs(60);

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn day(n: u8) -> Day {
    Day::new(n).expect("demo days stay within the planning period")
}

fn aid(n: u32) -> AnaesthetistId {
    AnaesthetistId::new(n)
}

fn sid(n: u32) -> StationId {
    StationId::new(n)
}

fn shift(start: u16, end: u16) -> ShiftWindow {
    ShiftWindow::from_hours(start, end).expect("demo shift windows are well-formed")
}

fn station(
    id: u32,
    name: &str,
    kind: StationKind,
    granularity: Granularity,
    window: ShiftWindow,
    weight: f64,
    major: bool,
) -> Workstation {
    Workstation::new(sid(id), name, kind, granularity, window, weight, None, major)
}

fn anaesthetist(
    id: u32,
    name: &str,
    seniority: Seniority,
    qualifications: &[u32],
    preferred: &[u32],
    less_preferred: &[u32],
) -> Anaesthetist {
    Anaesthetist::new(
        aid(id),
        name,
        seniority,
        true,
        qualifications.iter().map(|&q| sid(q)).collect(),
        preferred.iter().map(|&p| sid(p)).collect(),
        less_preferred.iter().map(|&l| sid(l)).collect(),
    )
}

/// A department-sized demo instance: four monthly stations (the two
/// on-call roles, intensive care, cardiothoracic theatre) and six weekly
/// ones, staffed by fourteen anaesthetists over the four-week period.
fn demo_instance() -> ProblemInstance {
    let mut builder = ProblemInstanceBuilder::new()
        .calendar(Calendar::standard())
        .daily_workload_cap(2.0)
        .station(station(
            1,
            "First on-call",
            StationKind::OnCallFirst,
            Granularity::Monthly,
            shift(8, 22),
            1.5,
            true,
        ))
        .station(station(
            2,
            "Second on-call",
            StationKind::OnCallSecond,
            Granularity::Monthly,
            shift(8, 20),
            1.25,
            true,
        ))
        .station(station(
            3,
            "Intensive care",
            StationKind::IntensiveCare,
            Granularity::Monthly,
            shift(8, 18),
            1.0,
            true,
        ))
        .station(station(
            4,
            "Cardiothoracic theatre",
            StationKind::Cardiothoracic,
            Granularity::Monthly,
            shift(8, 16),
            1.0,
            true,
        ))
        .station(station(
            5,
            "Morning shift",
            StationKind::MorningShift,
            Granularity::Weekly,
            shift(7, 15),
            1.0,
            false,
        ))
        .station(station(
            6,
            "Evening shift",
            StationKind::EveningShift,
            Granularity::Weekly,
            shift(14, 22),
            1.0,
            false,
        ))
        .station(station(
            7,
            "Late evening shift",
            StationKind::LateEveningShift,
            Granularity::Weekly,
            shift(16, 23),
            1.0,
            false,
        ))
        .station(station(
            8,
            "Office hours",
            StationKind::OfficeHours,
            Granularity::Weekly,
            shift(9, 17),
            0.5,
            false,
        ))
        .station(station(
            9,
            "Day surgery",
            StationKind::DaySurgery,
            Granularity::Weekly,
            shift(8, 16),
            1.0,
            false,
        ))
        .station(station(
            10,
            "Pain clinic",
            StationKind::PainClinic,
            Granularity::Weekly,
            shift(9, 15),
            0.75,
            false,
        ))
        .pairing(sid(1), sid(2));

    // On-call and intensive care run every day, the rest on weekdays only.
    let calendar = Calendar::standard();
    for d in 1..=28u8 {
        let current = day(d);
        builder = builder
            .demand(sid(1), current, 1)
            .demand(sid(2), current, 1)
            .demand(sid(3), current, 1);
        if !calendar.is_weekend_or_holiday(current) {
            builder = builder
                .demand(sid(4), current, 1)
                .demand(sid(5), current, 1)
                .demand(sid(6), current, 1)
                .demand(sid(7), current, 1)
                .demand(sid(8), current, 2)
                .demand(sid(9), current, 1);
        }
    }
    for d in [2u8, 4, 9, 11, 16, 18, 23, 25] {
        builder = builder.demand(sid(10), day(d), 1);
    }

    let all = [1u32, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let no_theatre = [1u32, 2, 3, 5, 6, 7, 8, 9, 10];
    let juniors_scope = [3u32, 5, 6, 7, 8, 9, 10];
    builder = builder
        .anaesthetist(anaesthetist(1, "Adler", Seniority::Senior, &all, &[4], &[]))
        .anaesthetist(anaesthetist(2, "Becker", Seniority::Senior, &all, &[1], &[8]))
        .anaesthetist(anaesthetist(3, "Conrad", Seniority::Senior, &all, &[3], &[]))
        .anaesthetist(anaesthetist(
            4,
            "Dietrich",
            Seniority::Senior,
            &no_theatre,
            &[2],
            &[10],
        ))
        .anaesthetist(anaesthetist(5, "Engel", Seniority::Senior, &all, &[], &[]))
        .anaesthetist(anaesthetist(
            6,
            "Fischer",
            Seniority::Senior,
            &no_theatre,
            &[8],
            &[],
        ))
        .anaesthetist(anaesthetist(7, "Graf", Seniority::Senior, &all, &[9], &[]))
        .anaesthetist(anaesthetist(
            8,
            "Hartmann",
            Seniority::Senior,
            &no_theatre,
            &[],
            &[1],
        ))
        .anaesthetist(anaesthetist(9, "Ilgner", Seniority::Senior, &all, &[5], &[]))
        .anaesthetist(anaesthetist(
            10,
            "Jansen",
            Seniority::Senior,
            &no_theatre,
            &[6],
            &[],
        ))
        .anaesthetist(anaesthetist(
            11,
            "Kaiser",
            Seniority::Junior,
            &juniors_scope,
            &[9],
            &[],
        ))
        .anaesthetist(anaesthetist(
            12,
            "Lorenz",
            Seniority::Junior,
            &juniors_scope,
            &[10],
            &[],
        ))
        .anaesthetist(anaesthetist(
            13,
            "Martens",
            Seniority::Junior,
            &juniors_scope,
            &[],
            &[7],
        ))
        .anaesthetist(anaesthetist(
            14,
            "Neumann",
            Seniority::Junior,
            &juniors_scope,
            &[5],
            &[],
        ));

    builder = builder
        .request(aid(1), day(10), RequestKind::Absence)
        .request(aid(1), day(11), RequestKind::Absence)
        .request(aid(2), day(15), RequestKind::NoCall)
        .request(aid(3), day(4), RequestKind::MorningPreferred)
        .request(aid(5), day(22), RequestKind::Examination)
        .request(aid(7), day(9), RequestKind::Cardiothoracic)
        .request(aid(9), day(17), RequestKind::EveningPreferred)
        .request(aid(11), day(8), RequestKind::Teaching)
        .request(aid(12), day(24), RequestKind::Dissertation);

    builder = builder
        .history(
            aid(1),
            HistoryRecord {
                total_shifts: 22,
                weekend_shifts: 6,
                pre_holiday_shifts: 3,
            },
        )
        .history(
            aid(2),
            HistoryRecord {
                total_shifts: 18,
                weekend_shifts: 4,
                pre_holiday_shifts: 2,
            },
        )
        .history(
            aid(5),
            HistoryRecord {
                total_shifts: 12,
                weekend_shifts: 2,
                pre_holiday_shifts: 1,
            },
        )
        .history(
            aid(11),
            HistoryRecord {
                total_shifts: 6,
                weekend_shifts: 1,
                pre_holiday_shifts: 0,
            },
        );

    builder
        .build()
        .expect("demo instance is internally consistent")
}

#[derive(Serialize)]
struct RunRecord {
    run: usize,
    method: String,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    objective: Option<i64>,
    feasible: Option<bool>,
    coverage: Option<f64>,
    hard_violations: Option<u32>,
    soft_violations: Option<u32>,
    timed_out: bool,
}

fn violation_totals(solution: &RosterSolution) -> (u32, u32) {
    let mut hard = 0;
    let mut soft = 0;
    for (key, count) in solution.violation_counts() {
        let family = key.rsplit(':').next().unwrap_or(key.as_str());
        if family.starts_with("HC") {
            hard += *count;
        } else {
            soft += *count;
        }
    }
    (hard, soft)
}

fn record_for(run: usize, method: &str, start_ts: DateTime<Utc>, outcome: &RunOutcome) -> RunRecord {
    let end_ts = start_ts + chrono::Duration::from_std(outcome.runtime()).unwrap_or_default();
    match outcome.solution() {
        Some(solution) => {
            let (hard, soft) = violation_totals(solution);
            RunRecord {
                run,
                method: method.to_string(),
                start_ts,
                end_ts,
                runtime_ms: outcome.runtime().as_millis(),
                objective: Some(solution.objective().value()),
                feasible: Some(solution.is_feasible()),
                coverage: Some(solution.coverage_ratio()),
                hard_violations: Some(hard),
                soft_violations: Some(soft),
                timed_out: false,
            }
        }
        None => RunRecord {
            run,
            method: method.to_string(),
            start_ts,
            end_ts,
            runtime_ms: outcome.runtime().as_millis(),
            objective: None,
            feasible: None,
            coverage: None,
            hard_violations: None,
            soft_violations: None,
            timed_out: outcome.is_timed_out(),
        },
    }
}

fn main() {
    enable_tracing();

    let instance = demo_instance();
    tracing::info!(
        anaesthetists = instance.anaesthetists().len(),
        stations = instance.stations().len(),
        "Built demo instance"
    );

    let mut results: Vec<RunRecord> = Vec::new();

    // Baseline: one deterministic pass.
    let start_ts = Utc::now();
    let t0 = Instant::now();
    let deterministic = TemporalCoordinator::deterministic(SolverConfig::default());
    match deterministic.run(&instance) {
        Ok(solution) => {
            let (hard, soft) = violation_totals(&solution);
            tracing::info!(
                objective = solution.objective().value(),
                feasible = solution.is_feasible(),
                coverage = solution.coverage_ratio(),
                hard,
                soft,
                "Deterministic baseline finished"
            );
            let runtime = t0.elapsed();
            results.push(RunRecord {
                run: 0,
                method: solution.method().as_str().to_string(),
                start_ts,
                end_ts: Utc::now(),
                runtime_ms: runtime.as_millis(),
                objective: Some(solution.objective().value()),
                feasible: Some(solution.is_feasible()),
                coverage: Some(solution.coverage_ratio()),
                hard_violations: Some(hard),
                soft_violations: Some(soft),
                timed_out: false,
            });
        }
        Err(e) => {
            tracing::error!("Deterministic baseline failed: {e}");
        }
    }

    // Seeded randomized sweep over the worker pool.
    let base_config = SolverConfig::default().with_bias(0.3);
    let base_seed = base_config.seed();
    let harness = ParallelHarness::new(base_config.workers(), RUN_DEADLINE);
    let factory = move |run: usize| {
        TemporalCoordinator::randomized(base_config.clone().with_seed(base_seed + run as u64))
    };

    let sweep_start = Utc::now();
    let outcomes = harness.run_all(&instance, &factory, SWEEP_RUNS);
    for outcome in &outcomes {
        results.push(record_for(
            outcome.run() + 1,
            "randomized-greedy",
            sweep_start,
            outcome,
        ));
    }

    let best = outcomes
        .iter()
        .filter_map(RunOutcome::solution)
        .filter(|s| s.is_feasible())
        .min_by_key(|s| s.objective());
    match best {
        Some(solution) => tracing::info!(
            objective = solution.objective().value(),
            coverage = solution.coverage_ratio(),
            "Best feasible sweep roster"
        ),
        None => tracing::warn!("Sweep produced no feasible roster"),
    }

    // Persist results
    let out_path = PathBuf::from("roster_results.json");
    match File::create(&out_path).and_then(|mut f| {
        let json = serde_json::to_string_pretty(&results).expect("serialize results");
        f.write_all(json.as_bytes())
    }) {
        Ok(()) => {
            tracing::info!(
                "Wrote {} run record(s) to {}",
                results.len(),
                out_path.display()
            );
        }
        Err(e) => {
            tracing::error!("Failed to write results to {}: {}", out_path.display(), e);
        }
    }
}
