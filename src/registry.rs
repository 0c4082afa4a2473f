// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Point registry: stable integer ids for keys, with group merging.
//
// Each key gets an id the first time it is seen. Ids form a disjoint-set
// forest, so after `merge(a, b)` every key that resolved to `a` or `b`
// resolves to one surviving id. Union is by rank with ties going to the
// smaller id, which keeps the survivor deterministic.

use std::collections::HashMap;
use std::hash::Hash;

use crate::geom::Point;

pub struct PointRegistry<K = Point> {
    ids: HashMap<K, usize>,
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl<K: Eq + Hash> PointRegistry<K> {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }

    /// Number of ids handed out (merged ids still count).
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Resolved id of `key`, allocating a fresh singleton group if the key
    /// has not been seen.
    pub fn lookup_or_create(&mut self, key: K) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return self.find(id);
        }
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        self.ids.insert(key, id);
        id
    }

    /// Resolved id of `key` if it is registered.
    pub fn lookup(&self, key: &K) -> Option<usize> {
        self.ids.get(key).map(|&id| self.resolve(id))
    }

    /// The id `key` was first registered under, before any merging.
    pub fn raw_id(&self, key: &K) -> Option<usize> {
        self.ids.get(key).copied()
    }

    /// Representative of `id`, compressing the path behind it.
    pub fn find(&mut self, id: usize) -> usize {
        self.check(id);
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = id;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Representative of `id` without mutating the forest.
    pub fn resolve(&self, id: usize) -> usize {
        self.check(id);
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    /// Union the groups of `a` and `b`; returns the surviving id.
    /// Merging two ids already in one group is a no-op.
    pub fn merge(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (keep, gone) = match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Greater => (ra, rb),
            std::cmp::Ordering::Less => (rb, ra),
            std::cmp::Ordering::Equal => {
                let (keep, gone) = if ra < rb { (ra, rb) } else { (rb, ra) };
                self.rank[keep] += 1;
                (keep, gone)
            }
        };
        self.parent[gone] = keep;
        keep
    }

    pub fn same_group(&self, a: usize, b: usize) -> bool {
        self.resolve(a) == self.resolve(b)
    }

    #[inline]
    fn check(&self, id: usize) {
        assert!(id < self.parent.len(), "unknown registry id {id} (registry holds {})", self.parent.len());
    }
}

impl<K: Eq + Hash> Default for PointRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
