// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Monotone mesher.
//
// Rows are split into maximal runs of occupied cells. Sweeping upward, a run
// joins the polygon of the run below it when the two overlap each other and
// nothing else; any split or merge starts new polygons. The result is a set
// of y-monotone staircase polygons. Each polygon is cut into slabs (stacks of
// identical runs), and each slab rectangle is triangulated by zipping the
// vertices on its bottom edge against those on its top edge.
//
// Slab corners are the only vertices. With T-junction elimination every slab
// corner lying on a slab's bottom or top edge is inserted into that edge, so
// neighbouring slabs share all their boundary vertices. Corners can never
// land inside a vertical slab edge because runs are maximal.

use std::collections::HashMap;

use tracing::debug;

use super::Mesher;
use crate::geom::Point;
use crate::grid::VoxelGrid;
use crate::mesh::Mesh;

#[derive(Copy, Clone, Debug)]
pub struct MonotoneMesher {
    pub eliminate_t_junctions: bool,
}

impl Default for MonotoneMesher {
    fn default() -> Self {
        MonotoneMesher { eliminate_t_junctions: true }
    }
}

/// Rectangle `[x0, x1] x [y0, y1]` of identical stacked runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Slab {
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
    pub polygon: usize,
}

/// Split the occupied cells into monotone polygons, returned as slabs tagged
/// with their polygon. Slabs come out in the order they are opened.
pub(crate) fn decompose(grid: &VoxelGrid) -> Vec<Slab> {
    let mut slabs: Vec<Slab> = Vec::new();
    let mut polygons = 0usize;
    let mut prev_runs: Vec<(i32, i32)> = Vec::new();
    let mut prev_slab: Vec<usize> = Vec::new();

    for y in 0..grid.height() {
        let runs = grid.row_runs(y);
        let links = overlaps(&prev_runs, &runs);
        let mut below = vec![0u32; prev_runs.len()];
        let mut above = vec![0u32; runs.len()];
        let mut partner = vec![usize::MAX; runs.len()];
        for &(i, j) in &links {
            below[i] += 1;
            above[j] += 1;
            partner[j] = i;
        }

        let yi = y as i32;
        let mut cur_slab = Vec::with_capacity(runs.len());
        for (j, &(x0, x1)) in runs.iter().enumerate() {
            let continues = above[j] == 1 && below[partner[j]] == 1;
            if continues && prev_runs[partner[j]] == (x0, x1) {
                let s = prev_slab[partner[j]];
                slabs[s].y1 = yi + 1;
                cur_slab.push(s);
                continue;
            }
            let polygon = if continues {
                slabs[prev_slab[partner[j]]].polygon
            } else {
                polygons += 1;
                polygons - 1
            };
            slabs.push(Slab { x0, x1, y0: yi, y1: yi + 1, polygon });
            cur_slab.push(slabs.len() - 1);
        }

        prev_runs = runs;
        prev_slab = cur_slab;
    }
    slabs
}

/// Pairs `(i, j)` of runs in consecutive rows sharing at least one column.
fn overlaps(prev: &[(i32, i32)], cur: &[(i32, i32)]) -> Vec<(usize, usize)> {
    let mut links = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < prev.len() && j < cur.len() {
        if prev[i].0 < cur[j].1 && cur[j].0 < prev[i].1 {
            links.push((i, j));
        }
        if prev[i].1 < cur[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }
    links
}

/// Zip a bottom and a top vertex row into a triangle strip. Both rows are
/// sorted by x and share their end columns. On a tie the bottom advances.
fn zip_slab(mesh: &mut Mesh, bottom: &[Point], top: &[Point]) {
    let (mut i, mut j) = (0, 0);
    while i + 1 < bottom.len() || j + 1 < top.len() {
        let advance_bottom = i + 1 < bottom.len() && (j + 1 == top.len() || bottom[i + 1].x <= top[j + 1].x);
        if advance_bottom {
            mesh.push(bottom[i], bottom[i + 1], top[j]);
            i += 1;
        } else {
            mesh.push(bottom[i], top[j + 1], top[j]);
            j += 1;
        }
    }
}

/// Sorted columns of the vertices on row `y` of one scope.
type LineIndex = HashMap<(usize, i32), Vec<i32>>;

fn edge_points(lines: &LineIndex, scope: usize, y: i32, x0: i32, x1: i32) -> Vec<Point> {
    let Some(xs) = lines.get(&(scope, y)) else {
        return vec![Point::new(x0, y), Point::new(x1, y)];
    };
    let lo = xs.partition_point(|&x| x < x0);
    let hi = xs.partition_point(|&x| x <= x1);
    xs[lo..hi].iter().map(|&x| Point::new(x, y)).collect()
}

impl Mesher for MonotoneMesher {
    fn triangulate(&self, grid: &VoxelGrid) -> Mesh {
        let slabs = decompose(grid);
        let scope = |s: &Slab| if self.eliminate_t_junctions { 0 } else { s.polygon };

        let mut lines: LineIndex = HashMap::new();
        for s in &slabs {
            for y in [s.y0, s.y1] {
                let xs = lines.entry((scope(s), y)).or_default();
                xs.push(s.x0);
                xs.push(s.x1);
            }
        }
        for xs in lines.values_mut() {
            xs.sort_unstable();
            xs.dedup();
        }

        let mut mesh = Mesh::new();
        for s in &slabs {
            let bottom = edge_points(&lines, scope(s), s.y0, s.x0, s.x1);
            let top = edge_points(&lines, scope(s), s.y1, s.x0, s.x1);
            zip_slab(&mut mesh, &bottom, &top);
        }
        debug!(
            slabs = slabs.len(),
            polygons = slabs.iter().map(|s| s.polygon + 1).max().unwrap_or(0),
            triangles = mesh.len(),
            eliminate_t_junctions = self.eliminate_t_junctions,
            "monotone mesh"
        );
        mesh
    }
}
