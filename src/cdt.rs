// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Constrained Delaunay triangulation kernel.
//
// Vertices are inserted Bowyer-Watson style into a triangulation seeded with
// a large super-triangle. Constraint edges are then forced in: the triangles
// they cross are removed and the two pseudo-polygons on either side are
// re-triangulated (Anglada's recursive scheme). Finally triangles are
// classified by how many constraints separate them from the super-triangle;
// odd depth means inside.
//
// All predicates are exact. Input coordinates are limited to
// `COORD_LIMIT` so the in-circle determinant of super-triangle vertices still
// fits in i128.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{MeshError, MeshResult};
use crate::geom::{in_circle, orient2d_i64, Point};

pub type VertIdx = u32;
pub type TriIdx = u32;

pub const INVALID: u32 = u32::MAX;

/// Largest absolute input coordinate accepted.
pub const COORD_LIMIT: i32 = 1 << 22;

/// Index of the first non-super vertex.
pub const FIRST_VERTEX: VertIdx = 3;

/// Triangulation state. Triangles are stored counter-clockwise in an arena
/// with a free list; adjacency is recovered from a directed-edge map.
pub struct Cdt {
    verts: Vec<[i64; 2]>,
    tris: Vec<Option<[VertIdx; 3]>>,
    free_list: Vec<TriIdx>,
    edges: HashMap<(VertIdx, VertIdx), TriIdx>,
    constrained: HashSet<(VertIdx, VertIdx)>,
    vert_tri: Vec<TriIdx>,
    last: TriIdx,
}

#[inline]
fn undirected(a: VertIdx, b: VertIdx) -> (VertIdx, VertIdx) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Cdt {
    /// Empty triangulation able to hold points inside `[min, max]`.
    pub fn with_bounds(min: Point, max: Point) -> MeshResult<Self> {
        for c in [min.x, min.y, max.x, max.y] {
            if c.unsigned_abs() > COORD_LIMIT as u32 {
                return Err(MeshError::CoordinateOverflow { limit: COORD_LIMIT });
            }
        }
        let (minx, miny) = (i64::from(min.x), i64::from(min.y));
        let (maxx, maxy) = (i64::from(max.x), i64::from(max.y));
        let d = (maxx - minx).max(maxy - miny).max(1);
        let cx = (minx + maxx) / 2;
        let cy = (miny + maxy) / 2;

        let mut cdt = Cdt {
            verts: vec![[cx - 20 * d, cy - 10 * d], [cx + 20 * d, cy - 10 * d], [cx, cy + 20 * d]],
            tris: Vec::new(),
            free_list: Vec::new(),
            edges: HashMap::new(),
            constrained: HashSet::new(),
            vert_tri: vec![INVALID; 3],
            last: 0,
        };
        cdt.last = cdt.add_triangle(0, 1, 2);
        Ok(cdt)
    }

    /// Number of real (non-super) vertices.
    pub fn vertex_count(&self) -> usize {
        self.verts.len() - FIRST_VERTEX as usize
    }

    /// Number of live triangles, including those touching the super-triangle.
    pub fn triangle_count(&self) -> usize {
        self.tris.iter().filter(|t| t.is_some()).count()
    }

    pub fn point(&self, v: VertIdx) -> Point {
        let [x, y] = self.verts[v as usize];
        Point::new(x as i32, y as i32)
    }

    pub fn is_constrained(&self, a: VertIdx, b: VertIdx) -> bool {
        self.constrained.contains(&undirected(a, b))
    }

    pub fn has_edge(&self, a: VertIdx, b: VertIdx) -> bool {
        self.edges.contains_key(&(a, b)) || self.edges.contains_key(&(b, a))
    }

    // ---- arena ----

    fn add_triangle(&mut self, a: VertIdx, b: VertIdx, c: VertIdx) -> TriIdx {
        let t = if let Some(t) = self.free_list.pop() {
            self.tris[t as usize] = Some([a, b, c]);
            t
        } else {
            self.tris.push(Some([a, b, c]));
            (self.tris.len() - 1) as TriIdx
        };
        self.edges.insert((a, b), t);
        self.edges.insert((b, c), t);
        self.edges.insert((c, a), t);
        for v in [a, b, c] {
            self.vert_tri[v as usize] = t;
        }
        t
    }

    fn remove_triangle(&mut self, t: TriIdx) {
        let Some([a, b, c]) = self.tris[t as usize].take() else {
            return;
        };
        for e in [(a, b), (b, c), (c, a)] {
            if self.edges.get(&e) == Some(&t) {
                self.edges.remove(&e);
            }
        }
        self.free_list.push(t);
    }

    #[inline]
    fn tri(&self, t: TriIdx) -> Option<[VertIdx; 3]> {
        self.tris.get(t as usize).copied().flatten()
    }

    #[inline]
    fn orient(&self, a: VertIdx, b: VertIdx, c: VertIdx) -> i128 {
        orient2d_i64(self.verts[a as usize], self.verts[b as usize], self.verts[c as usize])
    }

    fn circumcircle_contains(&self, t: TriIdx, q: [i64; 2]) -> bool {
        match self.tri(t) {
            Some([a, b, c]) => {
                in_circle(self.verts[a as usize], self.verts[b as usize], self.verts[c as usize], q) > 0
            }
            None => false,
        }
    }

    // ---- point insertion ----

    /// Triangle containing `q` (inside or on its boundary).
    fn locate(&self, q: [i64; 2]) -> Option<TriIdx> {
        let mut t = self.last;
        if self.tri(t).is_none() {
            t = self.tris.iter().position(Option::is_some)? as TriIdx;
        }
        let limit = self.tris.len() + 8;
        'walk: for _ in 0..limit {
            let [a, b, c] = self.tri(t)?;
            for (u, w) in [(a, b), (b, c), (c, a)] {
                if orient2d_i64(self.verts[u as usize], self.verts[w as usize], q) < 0 {
                    match self.edges.get(&(w, u)) {
                        Some(&n) => {
                            t = n;
                            continue 'walk;
                        }
                        None => break 'walk,
                    }
                }
            }
            return Some(t);
        }
        self.locate_brute_force(q)
    }

    fn locate_brute_force(&self, q: [i64; 2]) -> Option<TriIdx> {
        self.tris.iter().enumerate().find_map(|(t, tri)| {
            let [a, b, c] = (*tri)?;
            let inside = [(a, b), (b, c), (c, a)]
                .iter()
                .all(|&(u, w)| orient2d_i64(self.verts[u as usize], self.verts[w as usize], q) >= 0);
            inside.then_some(t as TriIdx)
        })
    }

    /// Insert `p` and return its vertex id. Inserting an existing vertex
    /// returns the existing id.
    ///
    /// Points outside the super-triangle cannot be located and are an
    /// error. The cavity never grows across a constraint edge.
    pub fn insert_point(&mut self, p: Point) -> MeshResult<VertIdx> {
        let q = [i64::from(p.x), i64::from(p.y)];
        let start = self.locate(q).ok_or(MeshError::PointOutsideBounds { point: p })?;
        if let Some(tri) = self.tri(start) {
            if let Some(&v) = tri.iter().find(|&&v| self.verts[v as usize] == q) {
                return Ok(v);
            }
        }

        let v = self.verts.len() as VertIdx;
        self.verts.push(q);
        self.vert_tri.push(INVALID);

        let mut cavity = vec![start];
        let mut in_cavity: HashSet<TriIdx> = HashSet::from([start]);
        let mut boundary: Vec<(VertIdx, VertIdx)> = Vec::new();
        let mut stack = vec![start];
        while let Some(t) = stack.pop() {
            let Some([a, b, c]) = self.tri(t) else {
                continue;
            };
            for (u, w) in [(a, b), (b, c), (c, a)] {
                let across = if self.is_constrained(u, w) { None } else { self.edges.get(&(w, u)).copied() };
                match across {
                    Some(n) if in_cavity.contains(&n) => {}
                    Some(n) if self.circumcircle_contains(n, q) => {
                        in_cavity.insert(n);
                        cavity.push(n);
                        stack.push(n);
                    }
                    _ => boundary.push((u, w)),
                }
            }
        }

        for t in cavity {
            self.remove_triangle(t);
        }
        for (u, w) in boundary {
            self.last = self.add_triangle(u, w, v);
        }
        Ok(v)
    }

    // ---- constraints ----

    fn triangle_around(&self, v: VertIdx) -> Option<TriIdx> {
        let hint = self.vert_tri[v as usize];
        if let Some(tri) = self.tri(hint) {
            if tri.contains(&v) {
                return Some(hint);
            }
        }
        self.tris
            .iter()
            .position(|t| t.is_some_and(|tri| tri.contains(&v)))
            .map(|t| t as TriIdx)
    }

    fn through_vertex(&self, a: VertIdx, b: VertIdx, v: VertIdx) -> MeshError {
        MeshError::ConstraintThroughVertex { from: self.point(a), to: self.point(b), through: self.point(v) }
    }

    /// Is `u` on the ray from `a` through `b`? (Callers already know the
    /// three are collinear.)
    fn ahead(&self, a: VertIdx, b: VertIdx, u: VertIdx) -> bool {
        let [ax, ay] = self.verts[a as usize];
        let [bx, by] = self.verts[b as usize];
        let [ux, uy] = self.verts[u as usize];
        (ux - ax) * (bx - ax) + (uy - ay) * (by - ay) > 0
    }

    /// Rotate around `a` to the triangle whose corner at `a` the segment
    /// `a -> b` leaves through. Returns the two other corners `(right, left)`.
    fn leaving_wedge(&self, a: VertIdx, b: VertIdx) -> MeshResult<(VertIdx, VertIdx)> {
        let start = self.triangle_around(a).ok_or(MeshError::CrossingConstraints {
            from: self.point(a),
            to: self.point(b),
        })?;
        let mut t = start;
        for _ in 0..=self.tris.len() {
            let Some(tri) = self.tri(t) else { break };
            let k = tri.iter().position(|&x| x == a).unwrap_or(0);
            let u = tri[(k + 1) % 3];
            let w = tri[(k + 2) % 3];

            let ou = self.orient(a, u, b);
            let ow = self.orient(a, w, b);
            if ou == 0 && self.ahead(a, b, u) {
                return Err(self.through_vertex(a, b, u));
            }
            if ow == 0 && self.ahead(a, b, w) {
                return Err(self.through_vertex(a, b, w));
            }
            if ou > 0 && ow < 0 {
                return Ok((u, w));
            }
            match self.edges.get(&(a, w)) {
                Some(&n) if n != start => t = n,
                _ => break,
            }
        }
        Err(MeshError::CrossingConstraints { from: self.point(a), to: self.point(b) })
    }

    /// Force the segment `a -> b` to be an edge of the triangulation.
    pub fn insert_constraint(&mut self, a: VertIdx, b: VertIdx) -> MeshResult<()> {
        if a == b {
            return Ok(());
        }
        if self.has_edge(a, b) {
            self.constrained.insert(undirected(a, b));
            return Ok(());
        }

        let (mut r, mut l) = self.leaving_wedge(a, b)?;
        let mut right = vec![r];
        let mut left = vec![l];
        let mut crossed = Vec::new();
        if let Some(&t) = self.edges.get(&(r, l)) {
            crossed.push(t);
        }

        loop {
            if self.is_constrained(r, l) {
                return Err(MeshError::CrossingConstraints { from: self.point(a), to: self.point(b) });
            }
            let Some(&t) = self.edges.get(&(l, r)) else {
                return Err(MeshError::CrossingConstraints { from: self.point(a), to: self.point(b) });
            };
            crossed.push(t);
            let Some(tri) = self.tri(t) else {
                return Err(MeshError::CrossingConstraints { from: self.point(a), to: self.point(b) });
            };
            let k = tri.iter().position(|&x| x == l).unwrap_or(0);
            let x = tri[(k + 2) % 3];
            if x == b {
                break;
            }
            match self.orient(a, b, x) {
                o if o > 0 => {
                    left.push(x);
                    l = x;
                }
                o if o < 0 => {
                    right.push(x);
                    r = x;
                }
                _ => return Err(self.through_vertex(a, b, x)),
            }
        }

        for t in crossed {
            self.remove_triangle(t);
        }
        self.fill_pseudo_polygon(a, b, &left);
        right.reverse();
        self.fill_pseudo_polygon(b, a, &right);
        self.constrained.insert(undirected(a, b));
        Ok(())
    }

    /// Triangulate the pseudo-polygon bounded by the edge `a -> b` and the
    /// chain of vertices left of it, listed from `a` towards `b`.
    fn fill_pseudo_polygon(&mut self, a: VertIdx, b: VertIdx, chain: &[VertIdx]) {
        let mut work = vec![(a, b, 0usize, chain.len())];
        while let Some((a, b, lo, hi)) = work.pop() {
            if lo >= hi {
                continue;
            }
            let mut ci = lo;
            for i in lo + 1..hi {
                let [pa, pb, pc] = [a, b, chain[ci]].map(|v| self.verts[v as usize]);
                if in_circle(pa, pb, pc, self.verts[chain[i] as usize]) > 0 {
                    ci = i;
                }
            }
            let c = chain[ci];
            self.last = self.add_triangle(a, b, c);
            work.push((a, c, lo, ci));
            work.push((c, b, ci + 1, hi));
        }
    }

    // ---- classification ----

    /// Triangles separated from the super-triangle by an odd number of
    /// constraint edges, in arena order.
    pub fn interior_triangles(&self) -> Vec<[Point; 3]> {
        let mut depth = vec![u32::MAX; self.tris.len()];
        let mut queue = VecDeque::new();
        for (t, tri) in self.tris.iter().enumerate() {
            if let Some(tri) = tri {
                if tri.iter().any(|&v| v < FIRST_VERTEX) {
                    depth[t] = 0;
                    queue.push_back(t as TriIdx);
                }
            }
        }
        while let Some(t) = queue.pop_front() {
            let d = depth[t as usize];
            let Some([a, b, c]) = self.tri(t) else { continue };
            for (u, w) in [(a, b), (b, c), (c, a)] {
                let Some(&n) = self.edges.get(&(w, u)) else { continue };
                let crossing = self.is_constrained(u, w);
                let nd = if crossing { d + 1 } else { d };
                if nd < depth[n as usize] {
                    depth[n as usize] = nd;
                    if crossing {
                        queue.push_back(n);
                    } else {
                        queue.push_front(n);
                    }
                }
            }
        }

        self.tris
            .iter()
            .enumerate()
            .filter_map(|(t, tri)| {
                let tri = (*tri)?;
                let d = depth[t];
                (d != u32::MAX && d % 2 == 1).then(|| tri.map(|v| self.point(v)))
            })
            .collect()
    }

    /// Every live triangle is CCW and every directed edge maps back to it.
    #[cfg(test)]
    fn check_consistency(&self) {
        for (t, tri) in self.tris.iter().enumerate() {
            let Some([a, b, c]) = *tri else { continue };
            assert!(self.orient(a, b, c) > 0, "triangle {t} not ccw");
            for e in [(a, b), (b, c), (c, a)] {
                assert_eq!(self.edges.get(&e), Some(&(t as TriIdx)));
            }
        }
    }
}
