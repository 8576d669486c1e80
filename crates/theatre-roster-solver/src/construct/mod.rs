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

pub mod handler;
pub mod monthly;
pub mod multi_location;
pub mod preference;
pub mod weekly;

pub use handler::WeeklyConstraintHandler;
pub use monthly::{GreedyMonthlyConstructor, MonthlyConstructor};
pub use multi_location::MultiLocationConstructor;
pub use preference::PreferenceDrivenConstructor;
pub use weekly::WeeklyRosterConstructor;

use theatre_roster_core::prelude::Day;
use theatre_roster_model::prelude::{
    Anaesthetist, ProblemInstance, RequestKind, RosterSolution, Workstation,
};

/// Baseline weekly eligibility shared by the weekly sub-constructors:
/// active and qualified staff, no absence that day, and no monthly duty
/// or rest marker blocking the day.
pub(crate) fn weekly_eligible(
    a: &Anaesthetist,
    station: &Workstation,
    day: Day,
    monthly: &RosterSolution,
    instance: &ProblemInstance,
) -> bool {
    a.is_active()
        && a.is_qualified_for(station.id())
        && !instance.requests().has(a.id(), day, RequestKind::Absence)
        && !monthly.has_monthly_on(a.id(), day)
        && !monthly.is_rest_day(a.id(), day)
}

/// Daily workload headroom check against the instance cap, counting both
/// the monthly backdrop and the week under construction.
pub(crate) fn fits_daily_workload(
    a: &Anaesthetist,
    station: &Workstation,
    day: Day,
    monthly: &RosterSolution,
    week_solution: &RosterSolution,
    instance: &ProblemInstance,
) -> bool {
    if instance.is_weekend_or_holiday(day) {
        return true;
    }
    let current: f64 = monthly
        .monthly_of_on(a.id(), day)
        .chain(week_solution.monthly_of_on(a.id(), day))
        .filter_map(|m| instance.station(m.station))
        .map(Workstation::workload_weight)
        .chain(
            week_solution
                .weekly_of_on(a.id(), day)
                .filter_map(|w| instance.station(w.station))
                .map(Workstation::workload_weight),
        )
        .sum();
    current + station.workload_weight() <= instance.daily_workload_cap() + 1e-9
}
