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
use std::collections::{BTreeMap, BTreeSet};
use theatre_roster_core::prelude::Day;

/// A staffing request an anaesthetist has filed for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestKind {
    Absence,
    NoCall,
    MorningPreferred,
    EveningPreferred,
    Teaching,
    Examination,
    Dissertation,
    Cardiothoracic,
}

impl RequestKind {
    /// Request kinds that must not coincide with the rest day following a
    /// heavy on-call shift.
    #[inline]
    pub fn blocks_rest_day(self) -> bool {
        matches!(
            self,
            RequestKind::Teaching
                | RequestKind::Examination
                | RequestKind::Dissertation
                | RequestKind::Cardiothoracic
        )
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestTable(BTreeMap<(AnaesthetistId, Day), BTreeSet<RequestKind>>);

impl RequestTable {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn add(&mut self, anaesthetist: AnaesthetistId, day: Day, kind: RequestKind) {
        self.0.entry((anaesthetist, day)).or_default().insert(kind);
    }

    #[inline]
    pub fn has(&self, anaesthetist: AnaesthetistId, day: Day, kind: RequestKind) -> bool {
        self.0
            .get(&(anaesthetist, day))
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    #[inline]
    pub fn kinds_for(
        &self,
        anaesthetist: AnaesthetistId,
        day: Day,
    ) -> impl Iterator<Item = RequestKind> + '_ {
        self.0
            .get(&(anaesthetist, day))
            .into_iter()
            .flat_map(|kinds| kinds.iter().copied())
    }

    #[inline]
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (AnaesthetistId, Day, RequestKind)> + '_ {
        self.0
            .iter()
            .flat_map(|(&(a, d), kinds)| kinds.iter().map(move |&k| (a, d, k)))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn aid(n: u32) -> AnaesthetistId {
        AnaesthetistId::new(n)
    }

    #[inline]
    fn day(n: u8) -> Day {
        Day::new(n).unwrap()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut t = RequestTable::new();
        t.add(aid(1), day(5), RequestKind::Absence);
        t.add(aid(1), day(5), RequestKind::Teaching);

        assert!(t.has(aid(1), day(5), RequestKind::Absence));
        assert!(!t.has(aid(1), day(6), RequestKind::Absence));
        assert_eq!(t.kinds_for(aid(1), day(5)).count(), 2);
        assert_eq!(t.kinds_for(aid(2), day(5)).count(), 0);
    }

    #[test]
    fn test_duplicate_add_is_idempotent() {
        let mut t = RequestTable::new();
        t.add(aid(1), day(3), RequestKind::NoCall);
        t.add(aid(1), day(3), RequestKind::NoCall);
        assert_eq!(t.iter().count(), 1);
    }

    #[test]
    fn test_rest_day_blocking_kinds() {
        assert!(RequestKind::Examination.blocks_rest_day());
        assert!(RequestKind::Cardiothoracic.blocks_rest_day());
        assert!(!RequestKind::Absence.blocks_rest_day());
        assert!(!RequestKind::MorningPreferred.blocks_rest_day());
    }
}
