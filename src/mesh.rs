// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Output model shared by all meshing strategies.
//
// A Mesh owns its triangles outright. Triangles are stored counter-clockwise
// with integer corners; degenerate ones never enter the list and are only
// counted. Regions that could not be meshed are recorded alongside.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MeshError;
use crate::geom::{orient2d, Point};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub points: [Point; 3],
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Triangle { points: [a, b, c] }
    }

    /// Twice the signed area; positive for counter-clockwise triangles.
    #[inline]
    pub fn doubled_area(&self) -> i64 {
        let [a, b, c] = self.points;
        orient2d(a, b, c)
    }

    pub fn area(&self) -> f64 {
        self.doubled_area().abs() as f64 * 0.5
    }

    pub fn centroid(&self) -> (f64, f64) {
        let [a, b, c] = self.points.map(Point::as_f64);
        ((a.0 + b.0 + c.0) / 3.0, (a.1 + b.1 + c.1) / 3.0)
    }

    pub fn edges(&self) -> [(Point, Point); 3] {
        let [a, b, c] = self.points;
        [(a, b), (b, c), (c, a)]
    }
}

/// A vertex touching the open interior of a triangle edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TJunction {
    pub vertex: Point,
    pub edge: (Point, Point),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    dropped: usize,
    #[serde(skip)]
    skipped: Vec<MeshError>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add triangle (a, b, c), reordering it counter-clockwise. A triangle
    /// with zero area is dropped and counted; returns whether it was kept.
    pub fn push(&mut self, a: Point, b: Point, c: Point) -> bool {
        match orient2d(a, b, c) {
            0 => {
                self.dropped += 1;
                false
            }
            o if o > 0 => {
                self.triangles.push(Triangle::new(a, b, c));
                true
            }
            _ => {
                self.triangles.push(Triangle::new(a, c, b));
                true
            }
        }
    }

    pub fn push_triangle(&mut self, tri: Triangle) -> bool {
        let [a, b, c] = tri.points;
        self.push(a, b, c)
    }

    /// Record a region that was left out of the mesh.
    pub fn record_skipped(&mut self, err: impl Into<MeshError>) {
        let err = err.into();
        warn!(error = %err, "skipping region");
        self.skipped.push(err);
    }

    /// Move the triangles and diagnostics of `other` into this mesh.
    pub fn append(&mut self, mut other: Mesh) {
        self.triangles.append(&mut other.triangles);
        self.dropped += other.dropped;
        self.skipped.append(&mut other.skipped);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Number of zero-area triangles rejected while building the mesh.
    pub fn dropped_triangles(&self) -> usize {
        self.dropped
    }

    /// Errors of regions that were skipped.
    pub fn skipped_regions(&self) -> &[MeshError] {
        &self.skipped
    }

    /// Exact doubled total area.
    pub fn doubled_area(&self) -> i64 {
        self.triangles.iter().map(Triangle::doubled_area).sum()
    }

    pub fn area(&self) -> f64 {
        self.doubled_area() as f64 * 0.5
    }

    /// Triangle corners as a flat `x0, y0, x1, y1, ...` list, three vertices
    /// per triangle.
    pub fn flat_vertices(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.triangles.len() * 6);
        for tri in &self.triangles {
            for p in tri.points {
                out.push(p.x as f32);
                out.push(p.y as f32);
            }
        }
        out
    }

    /// Shared-vertex form: unique vertices in first-use order, and index
    /// triples into them.
    pub fn indexed(&self) -> (Vec<Point>, Vec<[u32; 3]>) {
        let mut verts = Vec::new();
        let mut ids: HashMap<Point, u32> = HashMap::new();
        let mut elements = Vec::with_capacity(self.triangles.len());
        for tri in &self.triangles {
            elements.push(tri.points.map(|p| {
                *ids.entry(p).or_insert_with(|| {
                    verts.push(p);
                    (verts.len() - 1) as u32
                })
            }));
        }
        (verts, elements)
    }

    /// Every vertex lying strictly inside some triangle edge.
    ///
    /// All corners are lattice points, so only the lattice points on each
    /// edge need checking.
    pub fn t_junctions(&self) -> Vec<TJunction> {
        let verts: HashSet<Point> = self.triangles.iter().flat_map(|t| t.points).collect();
        let mut seen: HashSet<(Point, Point)> = HashSet::new();
        let mut found = Vec::new();
        for tri in &self.triangles {
            for (a, b) in tri.edges() {
                let key = if a <= b { (a, b) } else { (b, a) };
                if !seen.insert(key) {
                    continue;
                }
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let g = gcd(dx.unsigned_abs(), dy.unsigned_abs()) as i32;
                for k in 1..g {
                    let q = Point::new(a.x + dx / g * k, a.y + dy / g * k);
                    if verts.contains(&q) {
                        found.push(TJunction { vertex: q, edge: key });
                    }
                }
            }
        }
        found
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn push_orders_ccw_and_drops_degenerate() {
        let mut mesh = Mesh::new();
        assert!(mesh.push(p(0, 0), p(0, 1), p(1, 0)));
        assert!(!mesh.push(p(0, 0), p(1, 1), p(2, 2)));
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.dropped_triangles(), 1);
        assert!(mesh.triangles()[0].doubled_area() > 0);
        assert_eq!(mesh.area(), 0.5);
    }

    #[test]
    fn centroid_and_edges() {
        let tri = Triangle::new(p(0, 0), p(3, 0), p(0, 3));
        assert_eq!(tri.centroid(), (1.0, 1.0));
        assert_eq!(tri.edges()[2], (p(0, 3), p(0, 0)));
        assert_eq!(tri.area(), 4.5);
    }

    #[test]
    fn indexed_shares_vertices() {
        let mut mesh = Mesh::new();
        mesh.push(p(0, 0), p(1, 0), p(1, 1));
        mesh.push(p(0, 0), p(1, 1), p(0, 1));
        let (verts, elements) = mesh.indexed();
        assert_eq!(verts.len(), 4);
        assert_eq!(elements, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.flat_vertices().len(), 12);
    }

    #[test]
    fn t_junction_audit() {
        let mut mesh = Mesh::new();
        mesh.push(p(0, 0), p(2, 0), p(2, 1));
        mesh.push(p(0, 0), p(1, 1), p(0, 1));
        mesh.push(p(0, 0), p(2, 1), p(1, 1));
        assert!(mesh.t_junctions().is_empty());

        // (1, 1) sits on the diagonal of the big triangle.
        let mut cracked = Mesh::new();
        cracked.push(p(0, 0), p(2, 0), p(2, 2));
        cracked.push(p(0, 0), p(1, 1), p(0, 2));
        cracked.push(p(1, 1), p(2, 2), p(0, 2));
        let tj = cracked.t_junctions();
        assert_eq!(tj, vec![TJunction { vertex: p(1, 1), edge: (p(0, 0), p(2, 2)) }]);
    }

    #[test]
    fn append_merges_diagnostics() {
        let mut a = Mesh::new();
        a.push(p(0, 0), p(1, 0), p(0, 1));
        let mut b = Mesh::new();
        b.push(p(0, 0), p(0, 0), p(0, 1));
        b.record_skipped(MeshError::CoordinateOverflow { limit: 4 });
        a.append(b);
        assert_eq!(a.len(), 1);
        assert_eq!(a.dropped_triangles(), 1);
        assert_eq!(a.skipped_regions().len(), 1);
    }

    #[test]
    fn serializes_without_diagnostics() {
        let mut mesh = Mesh::new();
        mesh.push(p(0, 0), p(1, 0), p(0, 1));
        mesh.record_skipped(MeshError::CoordinateOverflow { limit: 4 });
        let json = serde_json::to_string(&mesh).unwrap();
        let back: Mesh = serde_json::from_str(&json).unwrap();
        assert_eq!(back.triangles(), mesh.triangles());
        assert!(back.skipped_regions().is_empty());
    }
}
