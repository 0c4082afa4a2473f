// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Polygon assembler: boundary fragments in, polygons with holes out.
//
// Open fragments are stitched end to start. Each fragment is registered in a
// PointRegistry under its leading edge, and every group of stitched fragments
// owns one partial point list. Linking two groups splices their lists at the
// shared pivot with `merge_interp` and merges their ids; a link that joins a
// group to itself closes a ring.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::AssemblyError;
use crate::geom::{remove_collinear, Direction, Point};
use crate::polygon::{Polygon, Ring};
use crate::registry::PointRegistry;
use crate::vectorize::Fragment;

/// Splice `b` into `a` at `pivot`.
///
/// With `i` the last position of `pivot` in `a` and `j` its first position in
/// `b`, the result is `a[..=i] ++ b[j+1..] ++ b[..j] ++ a[i+1..]`: `a` up to
/// the pivot, then `b` read cyclically from just past the pivot, then the
/// rest of `a`. When `a` ends and `b` starts at the pivot this is plain
/// concatenation without the duplicate pivot.
///
/// If one list is empty the pivot is appended to the other (unless already
/// present); if both are empty the result is just the pivot.
pub fn merge_interp(a: &[Point], b: &[Point], pivot: Point) -> Result<Vec<Point>, AssemblyError> {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ok(vec![pivot]),
        (false, true) => return Ok(with_pivot(a, pivot)),
        (true, false) => return Ok(with_pivot(b, pivot)),
        (false, false) => {}
    }
    let i = a.iter().rposition(|&p| p == pivot).ok_or(AssemblyError::MissingPivot { pivot })?;
    let j = b.iter().position(|&p| p == pivot).ok_or(AssemblyError::MissingPivot { pivot })?;

    let mut out = Vec::with_capacity(a.len() + b.len() - 1);
    out.extend_from_slice(&a[..=i]);
    out.extend_from_slice(&b[j + 1..]);
    out.extend_from_slice(&b[..j]);
    out.extend_from_slice(&a[i + 1..]);
    Ok(out)
}

fn with_pivot(list: &[Point], pivot: Point) -> Vec<Point> {
    let mut out = list.to_vec();
    if !out.contains(&pivot) {
        out.push(pivot);
    }
    out
}

/// Output of the assembler: well-formed polygons, plus the structural errors
/// of rings that had to be skipped.
#[derive(Clone, Debug, Default)]
pub struct Assembly {
    pub polygons: Vec<Polygon>,
    pub errors: Vec<AssemblyError>,
}

/// Collects fragments piecewise, then builds polygons in [`finish`].
///
/// One assembler serves one boundary set; it is not meant to be shared
/// between concurrent producers.
///
/// [`finish`]: PolygonAssembler::finish
#[derive(Default)]
pub struct PolygonAssembler {
    fragments: Vec<Fragment>,
    errors: Vec<AssemblyError>,
}

/// An open fragment accepted for stitching.
struct Chain<'a> {
    points: &'a [Point],
    first: Direction,
    last: Direction,
    id: usize,
}

impl Chain<'_> {
    fn start(&self) -> Point {
        self.points[0]
    }

    fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

impl PolygonAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fragments accepted so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Queue one fragment. Fragments with diagonal or zero-length steps, or
    /// too few points, are rejected and reported by [`finish`](Self::finish).
    pub fn add_fragment(&mut self, fragment: Fragment) {
        let n = fragment.points.len();
        let min = if fragment.closed { 3 } else { 2 };
        if n < min {
            self.errors.push(AssemblyError::DegenerateRing { len: n });
            return;
        }
        let steps = if fragment.closed { n } else { n - 1 };
        for i in 0..steps {
            let a = fragment.points[i];
            let b = fragment.points[(i + 1) % n];
            if Direction::between(a, b).is_none() {
                self.errors.push(AssemblyError::NotRectilinear { at: a });
                return;
            }
        }
        self.fragments.push(fragment);
    }

    /// Stitch, split, classify and validate.
    pub fn finish(self) -> Assembly {
        let mut errors = self.errors;
        let mut walks = Vec::new();
        let mut open = Vec::new();
        for fragment in &self.fragments {
            if fragment.closed {
                walks.push(fragment.points.clone());
            } else {
                open.push(fragment);
            }
        }
        walks.extend(stitch(&open, &mut errors));
        let walk_count = walks.len();

        let mut outers: Vec<Ring> = Vec::new();
        let mut holes: Vec<Ring> = Vec::new();
        for walk in walks {
            for mut points in split_pinched(walk) {
                remove_collinear(&mut points);
                let ring = Ring::new(points);
                match ring.signed_area2() {
                    a if a > 0 => outers.push(ring),
                    a if a < 0 => holes.push(ring),
                    _ => errors.push(AssemblyError::DegenerateRing { len: ring.len() }),
                }
            }
        }

        let mut groups: Vec<Vec<Ring>> = vec![Vec::new(); outers.len()];
        for hole in holes {
            match enclosing_outer(&outers, &hole) {
                Some(k) => groups[k].push(hole.canonicalized()),
                None => errors.push(AssemblyError::HoleOutsideOuter {
                    start: hole.points.first().copied().unwrap_or_default(),
                }),
            }
        }

        let mut polygons = Vec::with_capacity(outers.len());
        for (outer, mut hole_set) in outers.into_iter().zip(groups) {
            hole_set.sort_by_key(|h| h.points[0].sweep_key());
            match Self::validate(Polygon::new(outer.canonicalized(), hole_set)) {
                Ok(poly) => polygons.push(poly),
                Err(e) => errors.push(e),
            }
        }
        polygons.sort_by_key(|p| p.outer.points[0].sweep_key());

        debug!(
            fragments = self.fragments.len(),
            walks = walk_count,
            polygons = polygons.len(),
            "assembled polygons"
        );
        if !errors.is_empty() {
            warn!(errors = errors.len(), "boundary assembly skipped rings");
        }
        Assembly { polygons, errors }
    }

    /// Check a polygon for use by the meshers.
    ///
    /// Every ring needs at least 3 points and no point twice. The outer ring
    /// is made counter-clockwise and holes clockwise, reversing as needed.
    /// Each hole must lie inside the outer ring, tested at a point strictly
    /// inside the hole (the centroid of one of its ears), so the answer does
    /// not depend on where the hole ring starts.
    pub fn validate(polygon: Polygon) -> Result<Polygon, AssemblyError> {
        let Polygon { outer, holes } = polygon;
        let outer = oriented(outer, true)?;
        let mut fixed = Vec::with_capacity(holes.len());
        for hole in holes {
            let hole = oriented(hole, false)?;
            if !hole_inside(&outer, &hole) {
                return Err(AssemblyError::HoleOutsideOuter { start: hole.points[0] });
            }
            fixed.push(hole);
        }
        Ok(Polygon::new(outer, fixed))
    }
}

fn oriented(ring: Ring, ccw: bool) -> Result<Ring, AssemblyError> {
    if ring.len() < 3 {
        return Err(AssemblyError::DegenerateRing { len: ring.len() });
    }
    let mut seen = HashSet::with_capacity(ring.len());
    for &p in &ring.points {
        if !seen.insert(p) {
            return Err(AssemblyError::RepeatedPoint { point: p });
        }
    }
    let area = ring.signed_area2();
    if area == 0 {
        return Err(AssemblyError::DegenerateRing { len: ring.len() });
    }
    Ok(if (area > 0) == ccw { ring } else { ring.reversed() })
}

fn hole_inside(outer: &Ring, hole: &Ring) -> bool {
    if let Some((x3, y3)) = hole.interior_point_tripled() {
        return outer.contains_tripled(x3, y3);
    }
    // Self-touching rings may have no clean ear.
    left_cell_centre(hole).is_some_and(|(x2, y2)| outer.contains(x2, y2))
}

/// Doubled coordinates of the point half a unit along the first axis-aligned
/// edge and half a unit to its left. For a boundary ring this is the centre
/// of the occupied cell bordering that edge.
fn left_cell_centre(ring: &Ring) -> Option<(i64, i64)> {
    ring.edges().find_map(|(a, b)| {
        let dir = Direction::between(a, b)?;
        let (dx, dy) = dir.delta();
        let (nx, ny) = dir.left().delta();
        Some((2 * i64::from(a.x) + i64::from(dx + nx), 2 * i64::from(a.y) + i64::from(dy + ny)))
    })
}

/// Index of the smallest outer ring containing the occupied cell next to the
/// hole.
fn enclosing_outer(outers: &[Ring], hole: &Ring) -> Option<usize> {
    let (x2, y2) = left_cell_centre(hole)?;
    outers
        .iter()
        .enumerate()
        .filter(|(_, outer)| outer.contains(x2, y2))
        .min_by_key(|(_, outer)| outer.signed_area2())
        .map(|(k, _)| k)
}

/// Link open fragments into closed walks. A walk may pass through the same
/// junction more than once.
fn stitch(fragments: &[&Fragment], errors: &mut Vec<AssemblyError>) -> Vec<Vec<Point>> {
    let mut registry: PointRegistry<(Point, Direction)> = PointRegistry::new();
    let mut chains: Vec<Chain> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let (Some(first), Some(last)) = (fragment.first_direction(), fragment.last_direction()) else {
            continue;
        };
        let key = (fragment.points[0], first);
        if registry.raw_id(&key).is_some() {
            debug!(start = ?key.0, "dropping duplicate boundary fragment");
            continue;
        }
        let id = registry.lookup_or_create(key);
        chains.push(Chain { points: &fragment.points, first, last, id });
    }

    let mut starts: HashMap<Point, Vec<usize>> = HashMap::new();
    let mut partial: HashMap<usize, Vec<Point>> = HashMap::with_capacity(chains.len());
    for (k, chain) in chains.iter().enumerate() {
        starts.entry(chain.start()).or_default().push(k);
        partial.insert(chain.id, chain.points.to_vec());
    }

    let mut has_pred = vec![false; chains.len()];
    let mut poisoned: HashSet<usize> = HashSet::new();
    let mut walks = Vec::new();

    for c in 0..chains.len() {
        let pivot = chains[c].end();
        let incoming = chains[c].last;
        let succ = [incoming.left(), incoming, incoming.right()].into_iter().find_map(|want| {
            starts
                .get(&pivot)?
                .iter()
                .copied()
                .find(|&s| !has_pred[s] && chains[s].first == want)
        });
        let rc = registry.find(chains[c].id);
        let Some(s) = succ else {
            errors.push(AssemblyError::DanglingFragment { end: pivot });
            poisoned.insert(rc);
            continue;
        };
        has_pred[s] = true;
        let rs = registry.find(chains[s].id);

        if rc == rs {
            let Some(mut walk) = partial.remove(&rc) else {
                continue;
            };
            if poisoned.contains(&rc) {
                continue;
            }
            if walk.len() > 1 && walk.first() == walk.last() {
                walk.pop();
            }
            walks.push(walk);
            continue;
        }

        let a = partial.remove(&rc).unwrap_or_default();
        let b = partial.remove(&rs).unwrap_or_default();
        let bad = poisoned.contains(&rc) || poisoned.contains(&rs);
        let keep = registry.merge(rc, rs);
        match merge_interp(&a, &b, pivot) {
            Ok(merged) => {
                partial.insert(keep, merged);
                if bad {
                    poisoned.insert(keep);
                }
            }
            Err(e) => {
                errors.push(e);
                poisoned.insert(keep);
            }
        }
    }

    for (root, list) in partial {
        if !poisoned.contains(&root) {
            errors.push(AssemblyError::DanglingFragment { end: list.last().copied().unwrap_or_default() });
        }
    }
    walks
}

/// Split a closed walk at repeated points into simple loops.
fn split_pinched(walk: Vec<Point>) -> Vec<Vec<Point>> {
    let mut loops = Vec::new();
    let mut stack: Vec<Point> = Vec::with_capacity(walk.len());
    let mut position: HashMap<Point, usize> = HashMap::new();
    for p in walk {
        if let Some(&k) = position.get(&p) {
            let lobe: Vec<Point> = stack.drain(k + 1..).collect();
            for q in &lobe {
                position.remove(q);
            }
            let mut ring = Vec::with_capacity(lobe.len() + 1);
            ring.push(p);
            ring.extend(lobe);
            loops.push(ring);
        } else {
            position.insert(p, stack.len());
            stack.push(p);
        }
    }
    if !stack.is_empty() {
        loops.push(stack);
    }
    loops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    #[test]
    fn merge_concatenates_at_shared_endpoint() {
        let a = pts(&[(0, 0), (2, 0), (2, 2)]);
        let b = pts(&[(2, 2), (0, 2), (0, 1)]);
        let merged = merge_interp(&a, &b, p(2, 2)).unwrap();
        assert_eq!(merged, pts(&[(0, 0), (2, 0), (2, 2), (0, 2), (0, 1)]));
        assert_eq!(merged.len(), a.len() + b.len() - 1);
    }

    #[test]
    fn merge_interpolates_in_the_middle() {
        let a = pts(&[(0, 0), (5, 0), (5, 5), (0, 5)]);
        let b = pts(&[(7, 1), (5, 0), (7, 0)]);
        let merged = merge_interp(&a, &b, p(5, 0)).unwrap();
        assert_eq!(merged, pts(&[(0, 0), (5, 0), (7, 0), (7, 1), (5, 5), (0, 5)]));
    }

    #[test]
    fn merge_with_empty_side_appends_pivot() {
        let a = pts(&[(0, 0), (1, 0)]);
        assert_eq!(merge_interp(&a, &[], p(1, 1)).unwrap(), pts(&[(0, 0), (1, 0), (1, 1)]));
        assert_eq!(merge_interp(&[], &a, p(1, 0)).unwrap(), a);
        assert_eq!(merge_interp(&[], &[], p(3, 3)).unwrap(), vec![p(3, 3)]);
    }

    #[test]
    fn merge_without_pivot_is_an_error() {
        let a = pts(&[(0, 0), (1, 0)]);
        let b = pts(&[(4, 4), (5, 4)]);
        assert_eq!(merge_interp(&a, &b, p(1, 0)), Err(AssemblyError::MissingPivot { pivot: p(1, 0) }));
    }

    #[test]
    fn pinched_walk_splits_into_loops() {
        let walk = pts(&[(1, 1), (2, 1), (2, 2), (1, 2), (1, 1), (0, 1), (0, 0), (1, 0)]);
        let loops = split_pinched(walk);
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0], pts(&[(1, 1), (2, 1), (2, 2), (1, 2)]));
        assert_eq!(loops[1], pts(&[(1, 1), (0, 1), (0, 0), (1, 0)]));
    }

    #[test]
    fn stitches_junction_chains_into_two_squares() {
        let mut asm = PolygonAssembler::new();
        asm.add_fragment(Fragment::open(pts(&[(1, 1), (2, 1), (2, 2), (1, 2), (1, 1)])));
        asm.add_fragment(Fragment::open(pts(&[(1, 1), (0, 1), (0, 0), (1, 0), (1, 1)])));
        assert_eq!(asm.fragment_count(), 2);
        let out = asm.finish();
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(out.polygons.len(), 2);
        assert_eq!(out.polygons[0].outer.points, pts(&[(0, 0), (1, 0), (1, 1), (0, 1)]));
    }

    #[test]
    fn stitches_chains_spanning_two_junctions() {
        // An L-shaped boundary supplied as two halves meeting at (2, 0) and (0, 2).
        let mut asm = PolygonAssembler::new();
        asm.add_fragment(Fragment::open(pts(&[(0, 2), (0, 0), (2, 0)])));
        asm.add_fragment(Fragment::open(pts(&[(2, 0), (2, 1), (1, 1), (1, 2), (0, 2)])));
        let out = asm.finish();
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(out.polygons.len(), 1);
        assert_eq!(out.polygons[0].area(), 3.0);
    }

    #[test]
    fn hole_attaches_to_enclosing_outer() {
        let mut asm = PolygonAssembler::new();
        asm.add_fragment(Fragment::closed(pts(&[(1, 1), (1, 2), (2, 2), (2, 1)])));
        asm.add_fragment(Fragment::closed(pts(&[(0, 0), (3, 0), (3, 3), (0, 3)])));
        asm.add_fragment(Fragment::closed(pts(&[(5, 0), (6, 0), (6, 1), (5, 1)])));
        let out = asm.finish();
        assert!(out.errors.is_empty());
        assert_eq!(out.polygons.len(), 2);
        assert_eq!(out.polygons[0].holes.len(), 1);
        assert_eq!(out.polygons[0].area(), 8.0);
        assert!(out.polygons[1].holes.is_empty());
    }

    #[test]
    fn dangling_fragment_is_reported() {
        let mut asm = PolygonAssembler::new();
        asm.add_fragment(Fragment::open(pts(&[(0, 0), (3, 0), (3, 3)])));
        let out = asm.finish();
        assert!(out.polygons.is_empty());
        assert_eq!(out.errors, vec![AssemblyError::DanglingFragment { end: p(3, 3) }]);
    }

    #[test]
    fn diagonal_step_is_rejected() {
        let mut asm = PolygonAssembler::new();
        asm.add_fragment(Fragment::closed(pts(&[(0, 0), (2, 0), (1, 1)])));
        let out = asm.finish();
        assert_eq!(out.errors, vec![AssemblyError::NotRectilinear { at: p(2, 0) }]);
    }

    #[test]
    fn validate_fixes_winding() {
        let outer = Ring::new(pts(&[(0, 0), (0, 4), (4, 4), (4, 0)]));
        let hole = Ring::new(pts(&[(1, 1), (2, 1), (2, 2), (1, 2)]));
        let poly = PolygonAssembler::validate(Polygon::new(outer, vec![hole])).unwrap();
        assert!(poly.outer.is_ccw());
        assert!(!poly.holes[0].is_ccw());
        assert_eq!(poly.area(), 15.0);
    }

    #[test]
    fn validate_rejects_bad_rings() {
        let tiny = Ring::new(pts(&[(0, 0), (1, 0)]));
        assert_eq!(
            PolygonAssembler::validate(Polygon::new(tiny, vec![])),
            Err(AssemblyError::DegenerateRing { len: 2 })
        );

        let repeated = Ring::new(pts(&[(0, 0), (2, 0), (2, 2), (0, 0), (0, 2)]));
        assert_eq!(
            PolygonAssembler::validate(Polygon::new(repeated, vec![])),
            Err(AssemblyError::RepeatedPoint { point: p(0, 0) })
        );

        let outer = Ring::new(pts(&[(0, 0), (2, 0), (2, 2), (0, 2)]));
        let far = Ring::new(pts(&[(5, 5), (5, 6), (6, 6), (6, 5)]));
        assert_eq!(
            PolygonAssembler::validate(Polygon::new(outer, vec![far])),
            Err(AssemblyError::HoleOutsideOuter { start: p(5, 5) })
        );
    }

    #[test]
    fn hole_check_ignores_ring_start() {
        let outer = || Ring::new(pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]));
        // Same triangle, first edge diagonal in one and axis-aligned in the other.
        for hole in [&[(2, 2), (6, 6), (6, 2)], &[(6, 2), (2, 2), (6, 6)]] {
            let poly = PolygonAssembler::validate(Polygon::new(outer(), vec![Ring::new(pts(hole))]))
                .unwrap_or_else(|e| panic!("hole {hole:?}: {e}"));
            assert_eq!(poly.area(), 92.0);
        }

        let far = Ring::new(pts(&[(12, 12), (16, 16), (16, 12)]));
        assert_eq!(
            PolygonAssembler::validate(Polygon::new(outer(), vec![far])),
            Err(AssemblyError::HoleOutsideOuter { start: p(12, 12) })
        );
    }
}
