// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Geometric primitives on integer grid corners.
//
// Every vertex produced by the engine is a grid corner, so all predicates here
// are exact: orientation fits in i64 and the in-circle determinant in i128.
// Equality is exact-value equality; there is no geometric tolerance anywhere.

use serde::{Deserialize, Serialize};

/// A grid corner. Cell `(x, y)` spans `[x, x+1] x [y, y+1]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Row-major sweep key: lower `y` first, then lower `x`.
    #[inline]
    pub fn sweep_key(self) -> (i32, i32) {
        (self.y, self.x)
    }

    #[inline]
    pub fn step(self, dir: Direction) -> Point {
        let (dx, dy) = dir.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    #[inline]
    pub fn as_f64(self) -> (f64, f64) {
        (f64::from(self.x), f64::from(self.y))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// Axis direction of a single boundary step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    North,
    West,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::East, Direction::North, Direction::West, Direction::South];

    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::North => (0, 1),
            Direction::West => (-1, 0),
            Direction::South => (0, -1),
        }
    }

    /// Counter-clockwise quarter turn.
    #[inline]
    pub fn left(self) -> Direction {
        match self {
            Direction::East => Direction::North,
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
        }
    }

    /// Clockwise quarter turn.
    #[inline]
    pub fn right(self) -> Direction {
        match self {
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
        }
    }

    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Direction::East => 1,
            Direction::North => 2,
            Direction::West => 4,
            Direction::South => 8,
        }
    }

    /// Direction of the axis-aligned segment `a -> b`, or None if the segment
    /// is diagonal or empty.
    pub fn between(a: Point, b: Point) -> Option<Direction> {
        match ((b.x - a.x).signum(), (b.y - a.y).signum()) {
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (0, 1) => Some(Direction::North),
            (0, -1) => Some(Direction::South),
            _ => None,
        }
    }
}

/// Twice the signed area of triangle (a, b, c). Positive when CCW.
#[inline]
pub fn orient2d(a: Point, b: Point, c: Point) -> i64 {
    let (ax, ay) = (i64::from(a.x), i64::from(a.y));
    let (bx, by) = (i64::from(b.x), i64::from(b.y));
    let (cx, cy) = (i64::from(c.x), i64::from(c.y));
    (bx - ax) * (cy - ay) - (cx - ax) * (by - ay)
}

/// In-circle determinant for `d` against the circle through (a, b, c).
/// Positive when `d` is strictly inside and (a, b, c) is CCW; the sign flips
/// with the orientation of (a, b, c).
pub fn in_circle(a: [i64; 2], b: [i64; 2], c: [i64; 2], d: [i64; 2]) -> i128 {
    let adx = i128::from(a[0] - d[0]);
    let ady = i128::from(a[1] - d[1]);
    let bdx = i128::from(b[0] - d[0]);
    let bdy = i128::from(b[1] - d[1]);
    let cdx = i128::from(c[0] - d[0]);
    let cdy = i128::from(c[1] - d[1]);

    let ab_det = adx * bdy - bdx * ady;
    let bc_det = bdx * cdy - cdx * bdy;
    let ca_det = cdx * ady - adx * cdy;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    a_lift * bc_det + b_lift * ca_det + c_lift * ab_det
}

/// Orientation on raw i64 coordinates (used by the CDT kernel, whose
/// super-triangle lies outside the i32 range).
#[inline]
pub fn orient2d_i64(a: [i64; 2], b: [i64; 2], c: [i64; 2]) -> i128 {
    let abx = i128::from(b[0] - a[0]);
    let aby = i128::from(b[1] - a[1]);
    let acx = i128::from(c[0] - a[0]);
    let acy = i128::from(c[1] - a[1]);
    abx * acy - acx * aby
}

/// True if `c` lies on segment `ab` strictly between its endpoints.
/// This is the T-junction test: a vertex touching the open interior of an edge.
pub fn lies_strictly_between(a: Point, b: Point, c: Point) -> bool {
    if c == a || c == b || orient2d(a, b, c) != 0 {
        return false;
    }
    (a.x < c.x) == (c.x < b.x) && (a.y < c.y) == (c.y < b.y)
}

/// Twice the signed area of a closed ring (shoelace). Positive when CCW.
pub fn ring_signed_area2(points: &[Point]) -> i64 {
    let n = points.len();
    if n < 3 {
        return 0;
    }
    let mut sum = 0i64;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        sum += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    sum
}

/// Even-odd point-in-ring test on doubled coordinates.
///
/// The query point is given as `(2x, 2y)` so that cell centres (odd doubled
/// coordinates) never coincide with a ring vertex or edge.
pub fn ring_contains_doubled(points: &[Point], qx2: i64, qy2: i64) -> bool {
    ring_contains_scaled(points, qx2, qy2, 2)
}

/// Even-odd test of the point `(qx / scale, qy / scale)`, exact: the ring is
/// scaled up instead of the query being divided down.
pub fn ring_contains_scaled(points: &[Point], qx: i64, qy: i64, scale: i64) -> bool {
    let n = points.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = (scale * i64::from(points[i].x), scale * i64::from(points[i].y));
        let (xj, yj) = (scale * i64::from(points[j].x), scale * i64::from(points[j].y));
        if (yi > qy) != (yj > qy) {
            // x of the edge at qy, compared without division.
            let lhs = (qx - xi) * (yj - yi);
            let rhs = (xj - xi) * (qy - yi);
            if (yj > yi && lhs < rhs) || (yj < yi && lhs > rhs) {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Drop vertices whose neighbours make them collinear, treating the ring as
/// cyclic. Zero-length steps (repeated neighbours) are dropped too.
pub fn remove_collinear(points: &mut Vec<Point>) {
    let mut changed = true;
    while changed && points.len() >= 3 {
        changed = false;
        let n = points.len();
        let mut kept = Vec::with_capacity(n);
        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            if cur == prev || (orient2d(prev, cur, next) == 0 && !is_spike(prev, cur, next)) {
                changed = true;
                continue;
            }
            kept.push(cur);
        }
        *points = kept;
    }
}

// A collinear reversal (prev -> cur -> prev) is not a straight run.
#[inline]
fn is_spike(prev: Point, cur: Point, next: Point) -> bool {
    let d1 = (i64::from(cur.x - prev.x), i64::from(cur.y - prev.y));
    let d2 = (i64::from(next.x - cur.x), i64::from(next.y - cur.y));
    d1.0 * d2.0 + d1.1 * d2.1 < 0
}
