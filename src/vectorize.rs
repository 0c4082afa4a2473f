// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Boundary vectorizer.
//
// Every unit edge between an occupied and an empty cell becomes a directed
// boundary edge with the occupied cell on its left, so outer boundaries run
// counter-clockwise and hole boundaries clockwise. A corner where two
// occupied cells touch only diagonally has two outgoing edges; these are the
// junctions. The edges are traced into chains that run from junction to
// junction, plus closed loops that never meet a junction. The assembler then
// stitches chains into rings, turning left at every junction so that
// diagonal neighbours stay in separate regions (4-connectivity).

use tracing::debug;

use crate::assemble::{Assembly, PolygonAssembler};
use crate::geom::{remove_collinear, Direction, Point};
use crate::grid::VoxelGrid;

/// A traced piece of boundary.
///
/// Open fragments start and end on junction vertices and keep both
/// endpoints. Closed fragments are complete loops; the closing edge back to
/// the first point is implicit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Fragment {
    pub fn open(points: Vec<Point>) -> Self {
        Fragment { points, closed: false }
    }

    pub fn closed(points: Vec<Point>) -> Self {
        Fragment { points, closed: true }
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Direction of the first step.
    pub fn first_direction(&self) -> Option<Direction> {
        match self.points.as_slice() {
            [a, b, ..] => Direction::between(*a, *b),
            _ => None,
        }
    }

    /// Direction of the step arriving at the last point.
    pub fn last_direction(&self) -> Option<Direction> {
        match self.points.as_slice() {
            [.., a, b] => Direction::between(*a, *b),
            _ => None,
        }
    }
}

/// Polygons of a grid plus the rings that could not be assembled.
pub type Vectorization = Assembly;

/// Trace `grid` and assemble one polygon per 4-connected occupied region.
pub fn vectorize(grid: &VoxelGrid) -> Vectorization {
    let fragments = trace_fragments(grid);
    let mut assembler = PolygonAssembler::new();
    for fragment in fragments {
        assembler.add_fragment(fragment);
    }
    let assembly = assembler.finish();
    debug!(
        width = grid.width(),
        height = grid.height(),
        polygons = assembly.polygons.len(),
        errors = assembly.errors.len(),
        "vectorized grid"
    );
    assembly
}

/// Trace all boundary edges of `grid` into fragments.
///
/// Open chains come first, ordered by their junction in row-major order and
/// then by leaving direction (east, north, west, south); closed loops follow,
/// ordered by their lowest vertex. Collinear unit steps are merged.
pub fn trace_fragments(grid: &VoxelGrid) -> Vec<Fragment> {
    if grid.is_empty() {
        return Vec::new();
    }
    let mut tracer = EdgeTracer::new(grid);
    let mut fragments = Vec::new();

    for v in 0..tracer.masks.len() {
        if !is_junction(tracer.masks[v]) {
            continue;
        }
        let start = tracer.point(v);
        for dir in Direction::ALL {
            if tracer.has_unused(v, dir) {
                fragments.push(Fragment::open(tracer.trace(start, dir)));
            }
        }
    }
    let open = fragments.len();

    for v in 0..tracer.masks.len() {
        let start = tracer.point(v);
        for dir in Direction::ALL {
            if tracer.has_unused(v, dir) {
                let mut points = tracer.trace(start, dir);
                remove_collinear(&mut points);
                fragments.push(Fragment::closed(points));
            }
        }
    }

    debug!(open, closed = fragments.len() - open, "traced boundary fragments");
    fragments
}

#[inline]
fn is_junction(mask: u8) -> bool {
    mask.count_ones() == 2
}

/// Outgoing boundary edges of every grid corner, as direction bit masks.
struct EdgeTracer {
    stride: usize,
    masks: Vec<u8>,
    used: Vec<u8>,
}

impl EdgeTracer {
    fn new(grid: &VoxelGrid) -> Self {
        let stride = grid.width() + 1;
        let rows = grid.height() + 1;
        let mut masks = vec![0u8; stride * rows];
        for y in 0..rows {
            for x in 0..stride {
                masks[y * stride + x] = outgoing(grid, x as i64, y as i64);
            }
        }
        EdgeTracer { stride, used: vec![0u8; masks.len()], masks }
    }

    #[inline]
    fn point(&self, v: usize) -> Point {
        Point::new((v % self.stride) as i32, (v / self.stride) as i32)
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        p.y as usize * self.stride + p.x as usize
    }

    #[inline]
    fn has_unused(&self, v: usize, dir: Direction) -> bool {
        self.masks[v] & dir.bit() != 0 && self.used[v] & dir.bit() == 0
    }

    /// Follow edges from `start` leaving along `first` until a junction is
    /// reached or the walk returns to `start`.
    fn trace(&mut self, start: Point, first: Direction) -> Vec<Point> {
        let mut points = vec![start];
        let mut cur = start;
        let mut dir = first;
        loop {
            let v = self.index(cur);
            self.used[v] |= dir.bit();
            let next = cur.step(dir);
            let mask = self.masks[self.index(next)];
            if is_junction(mask) {
                points.push(next);
                return points;
            }
            if next == start {
                return points;
            }
            let Some(turn) = Direction::ALL.into_iter().find(|d| mask & d.bit() != 0) else {
                // Unreachable on a consistent edge set; the assembler reports
                // the open end.
                points.push(next);
                return points;
            };
            if turn != dir {
                points.push(next);
            }
            cur = next;
            dir = turn;
        }
    }
}

/// Outgoing boundary edges at corner `(x, y)`, keeping the occupied cell on
/// the left of each edge.
fn outgoing(grid: &VoxelGrid, x: i64, y: i64) -> u8 {
    let sw = grid.get(x - 1, y - 1);
    let se = grid.get(x, y - 1);
    let nw = grid.get(x - 1, y);
    let ne = grid.get(x, y);
    let mut mask = 0;
    if ne && !se {
        mask |= Direction::East.bit();
    }
    if nw && !ne {
        mask |= Direction::North.bit();
    }
    if sw && !nw {
        mask |= Direction::West.bit();
    }
    if se && !sw {
        mask |= Direction::South.bit();
    }
    mask
}
