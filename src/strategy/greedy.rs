// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Greedy rectangle mesher.

use tracing::debug;

use super::Mesher;
use crate::geom::Point;
use crate::grid::VoxelGrid;
use crate::mesh::Mesh;

/// Scans cells row by row; each occupied cell not yet covered starts a
/// rectangle that grows along +x as far as it can, then along +y while the
/// whole span stays free. No backtracking, so neighbouring rectangles may
/// meet in T-junctions.
#[derive(Copy, Clone, Debug, Default)]
pub struct GreedyMesher;

impl Mesher for GreedyMesher {
    fn triangulate(&self, grid: &VoxelGrid) -> Mesh {
        let (w, h) = (grid.width(), grid.height());
        let mut mesh = Mesh::new();
        let mut consumed = vec![false; w * h];
        let free = |consumed: &[bool], x: usize, y: usize| grid.is_occupied(x, y) && !consumed[y * w + x];
        let mut rects = 0usize;

        for y in 0..h {
            for x in 0..w {
                if !free(&consumed, x, y) {
                    continue;
                }
                let mut x1 = x + 1;
                while x1 < w && free(&consumed, x1, y) {
                    x1 += 1;
                }
                let mut y1 = y + 1;
                while y1 < h && (x..x1).all(|cx| free(&consumed, cx, y1)) {
                    y1 += 1;
                }
                for cy in y..y1 {
                    consumed[cy * w + x..cy * w + x1].fill(true);
                }

                let (px0, py0, px1, py1) = (x as i32, y as i32, x1 as i32, y1 as i32);
                mesh.push(Point::new(px0, py0), Point::new(px1, py0), Point::new(px1, py1));
                mesh.push(Point::new(px0, py0), Point::new(px1, py1), Point::new(px0, py1));
                rects += 1;
            }
        }
        debug!(rects, triangles = mesh.len(), "greedy mesh");
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_block_is_one_rectangle() {
        let grid = VoxelGrid::from_fn(4, 3, |_, _| true);
        let mesh = GreedyMesher.triangulate(&grid);
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.area(), 12.0);
    }

    #[test]
    fn grows_width_before_height() {
        // The first rectangle takes the whole bottom row, so the single
        // cell above becomes its own rectangle.
        let grid = VoxelGrid::from_ascii("###\n#..").unwrap();
        let mesh = GreedyMesher.triangulate(&grid);
        assert_eq!(mesh.len(), 4);
        assert_eq!(mesh.triangles()[0].points[2], Point::new(3, 1));
        assert_eq!(mesh.area(), 4.0);
    }

    #[test]
    fn single_cell() {
        let grid = VoxelGrid::from_ascii("#..\n...").unwrap();
        let mesh = GreedyMesher.triangulate(&grid);
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.area(), 1.0);
        assert_eq!(mesh.dropped_triangles(), 0);
    }
}
