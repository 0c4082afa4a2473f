// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Rings and polygons-with-holes.

use serde::{Deserialize, Serialize};

use crate::geom::{orient2d, ring_contains_doubled, ring_contains_scaled, ring_signed_area2, Point};

/// Closed cyclic point sequence. The closing edge from the last point back to
/// the first is implicit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    pub points: Vec<Point>,
}

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        Ring { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Twice the signed area, exact. Positive for counter-clockwise rings.
    pub fn signed_area2(&self) -> i64 {
        ring_signed_area2(&self.points)
    }

    pub fn area(&self) -> f64 {
        self.signed_area2().abs() as f64 * 0.5
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area2() > 0
    }

    /// Even-odd containment of the point `(x2 / 2, y2 / 2)`.
    pub fn contains(&self, x2: i64, y2: i64) -> bool {
        ring_contains_doubled(&self.points, x2, y2)
    }

    /// Even-odd containment of the point `(x3 / 3, y3 / 3)`.
    pub fn contains_tripled(&self, x3: i64, y3: i64) -> bool {
        ring_contains_scaled(&self.points, x3, y3, 3)
    }

    /// A point strictly inside the ring, as tripled coordinates: the centroid
    /// of the first ear found. An ear is a convex corner whose closed triangle
    /// holds no other vertex. Independent of where the ring starts and of
    /// its orientation; `None` for degenerate rings.
    pub fn interior_point_tripled(&self) -> Option<(i64, i64)> {
        let n = self.points.len();
        if n < 3 {
            return None;
        }
        let sign = self.signed_area2().signum();
        if sign == 0 {
            return None;
        }
        (0..n).find_map(|i| {
            let prev = self.points[(i + n - 1) % n];
            let cur = self.points[i];
            let next = self.points[(i + 1) % n];
            if orient2d(prev, cur, next) * sign <= 0 {
                return None;
            }
            let blocked = self.points.iter().enumerate().any(|(j, &q)| {
                j != i
                    && j != (i + 1) % n
                    && j != (i + n - 1) % n
                    && orient2d(prev, cur, q) * sign >= 0
                    && orient2d(cur, next, q) * sign >= 0
                    && orient2d(next, prev, q) * sign >= 0
            });
            if blocked {
                return None;
            }
            let x3 = i64::from(prev.x) + i64::from(cur.x) + i64::from(next.x);
            let y3 = i64::from(prev.y) + i64::from(cur.y) + i64::from(next.y);
            Some((x3, y3))
        })
    }

    pub fn reversed(&self) -> Ring {
        let mut points = self.points.clone();
        points.reverse();
        Ring { points }
    }

    /// Same cycle, rotated to start at the lowest `(y, x)` vertex.
    pub fn canonicalized(&self) -> Ring {
        let Some(start) = (0..self.points.len()).min_by_key(|&i| self.points[i].sweep_key()) else {
            return self.clone();
        };
        let mut points = Vec::with_capacity(self.points.len());
        points.extend_from_slice(&self.points[start..]);
        points.extend_from_slice(&self.points[..start]);
        Ring { points }
    }

    /// Directed edges `(p[i], p[i+1])`, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// One outer boundary plus the holes cut out of it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Polygon { outer, holes }
    }

    /// Outer area minus hole areas.
    pub fn area(&self) -> f64 {
        self.doubled_area() as f64 * 0.5
    }

    pub fn doubled_area(&self) -> i64 {
        let holes: i64 = self.holes.iter().map(|h| h.signed_area2().abs()).sum();
        self.outer.signed_area2().abs() - holes
    }

    /// Even-odd containment over all rings, on doubled coordinates.
    pub fn contains_point(&self, x2: i64, y2: i64) -> bool {
        let mut inside = self.outer.contains(x2, y2);
        for hole in &self.holes {
            if hole.contains(x2, y2) {
                inside = !inside;
            }
        }
        inside
    }

    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Ring::len).sum::<usize>()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }
}
