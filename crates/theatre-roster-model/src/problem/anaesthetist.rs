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

use crate::common::{AnaesthetistId, StationId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seniority {
    Junior,
    Senior,
}

impl std::fmt::Display for Seniority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seniority::Junior => write!(f, "Junior"),
            Seniority::Senior => write!(f, "Senior"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anaesthetist {
    id: AnaesthetistId,
    name: String,
    seniority: Seniority,
    active: bool,
    qualifications: BTreeSet<StationId>,
    preferred: BTreeSet<StationId>,
    less_preferred: BTreeSet<StationId>,
}

impl Anaesthetist {
    #[inline]
    pub fn new(
        id: AnaesthetistId,
        name: impl Into<String>,
        seniority: Seniority,
        active: bool,
        qualifications: BTreeSet<StationId>,
        preferred: BTreeSet<StationId>,
        less_preferred: BTreeSet<StationId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            seniority,
            active,
            qualifications,
            preferred,
            less_preferred,
        }
    }

    #[inline]
    pub fn id(&self) -> AnaesthetistId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn seniority(&self) -> Seniority {
        self.seniority
    }

    #[inline]
    pub fn is_senior(&self) -> bool {
        self.seniority == Seniority::Senior
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_qualified_for(&self, station: StationId) -> bool {
        self.qualifications.contains(&station)
    }

    #[inline]
    pub fn prefers(&self, station: StationId) -> bool {
        self.preferred.contains(&station)
    }

    #[inline]
    pub fn dislikes(&self, station: StationId) -> bool {
        self.less_preferred.contains(&station)
    }

    #[inline]
    pub fn iter_qualifications(&self) -> impl Iterator<Item = StationId> + '_ {
        self.qualifications.iter().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnaesthetistContainer(std::collections::BTreeMap<AnaesthetistId, Anaesthetist>);

impl AnaesthetistContainer {
    #[inline]
    pub fn new() -> Self {
        Self(std::collections::BTreeMap::new())
    }

    /// Inserts an anaesthetist, replacing any previous entry with the same id.
    #[inline]
    pub fn insert(&mut self, a: Anaesthetist) -> Option<Anaesthetist> {
        self.0.insert(a.id(), a)
    }

    #[inline]
    pub fn get(&self, id: AnaesthetistId) -> Option<&Anaesthetist> {
        self.0.get(&id)
    }

    #[inline]
    pub fn contains_id(&self, id: AnaesthetistId) -> bool {
        self.0.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Anaesthetist> {
        self.0.values()
    }

    #[inline]
    pub fn iter_active(&self) -> impl Iterator<Item = &Anaesthetist> {
        self.0.values().filter(|a| a.is_active())
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
    fn sid(n: u32) -> StationId {
        StationId::new(n)
    }

    fn anaesthetist(id: u32, active: bool, quals: &[u32]) -> Anaesthetist {
        Anaesthetist::new(
            aid(id),
            format!("A{id}"),
            Seniority::Senior,
            active,
            quals.iter().map(|&q| sid(q)).collect(),
            BTreeSet::new(),
            BTreeSet::new(),
        )
    }

    #[test]
    fn test_qualification_lookup() {
        let a = anaesthetist(1, true, &[1, 3]);
        assert!(a.is_qualified_for(sid(1)));
        assert!(!a.is_qualified_for(sid(2)));
    }

    #[test]
    fn test_container_iter_active_skips_inactive() {
        let mut c = AnaesthetistContainer::new();
        c.insert(anaesthetist(1, true, &[]));
        c.insert(anaesthetist(2, false, &[]));
        c.insert(anaesthetist(3, true, &[]));

        let active: Vec<_> = c.iter_active().map(|a| a.id()).collect();
        assert_eq!(active, vec![aid(1), aid(3)]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut c = AnaesthetistContainer::new();
        c.insert(anaesthetist(1, true, &[]));
        let prev = c.insert(anaesthetist(1, false, &[]));
        assert!(prev.is_some());
        assert!(!c.get(aid(1)).unwrap().is_active());
    }
}
