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

use crate::common::StationId;
use std::collections::BTreeMap;
use theatre_roster_core::prelude::Day;

/// Required head count per (workstation, day). Missing entries mean zero.
#[derive(Debug, Clone, Default)]
pub struct DemandTable(BTreeMap<(StationId, Day), u32>);

impl DemandTable {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn set(&mut self, station: StationId, day: Day, count: u32) {
        if count == 0 {
            self.0.remove(&(station, day));
        } else {
            self.0.insert((station, day), count);
        }
    }

    #[inline]
    pub fn demand_for(&self, station: StationId, day: Day) -> u32 {
        self.0.get(&(station, day)).copied().unwrap_or(0)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (StationId, Day, u32)> + '_ {
        self.0.iter().map(|(&(s, d), &c)| (s, d, c))
    }

    #[inline]
    pub fn total_demand(&self) -> u64 {
        self.0.values().map(|&c| u64::from(c)).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
