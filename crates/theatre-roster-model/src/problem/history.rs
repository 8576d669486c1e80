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

use crate::common::AnaesthetistId;
use std::collections::BTreeMap;

/// Assignment counts carried over from prior planning periods, consumed by
/// the fairness scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryRecord {
    pub total_shifts: u32,
    pub weekend_shifts: u32,
    pub pre_holiday_shifts: u32,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentHistory(BTreeMap<AnaesthetistId, HistoryRecord>);

impl AssignmentHistory {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn set(&mut self, anaesthetist: AnaesthetistId, record: HistoryRecord) {
        self.0.insert(anaesthetist, record);
    }

    /// Anaesthetists without prior history count as zero everywhere.
    #[inline]
    pub fn record_for(&self, anaesthetist: AnaesthetistId) -> HistoryRecord {
        self.0.get(&anaesthetist).copied().unwrap_or_default()
    }
}
