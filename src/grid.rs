// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// The occupancy grid: one 2D slice of a voxel volume.

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Row-major `width x height` boolean occupancy matrix.
///
/// Reads outside the grid are unoccupied, which lets boundary tracing treat
/// the border like any other empty neighbour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

// Deserialized form, checked through `from_cells`.
#[derive(Deserialize)]
struct GridRepr {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl TryFrom<GridRepr> for VoxelGrid {
    type Error = GridError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        VoxelGrid::from_cells(repr.width, repr.height, repr.cells)
    }
}

impl VoxelGrid {
    /// An all-empty grid. Zero dimensions are allowed and mesh to nothing.
    pub fn new(width: usize, height: usize) -> Self {
        VoxelGrid { width, height, cells: vec![false; width * height] }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        VoxelGrid { width, height, cells }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self, GridError> {
        if cells.len() != width * height {
            return Err(GridError::CellCountMismatch { expected: width * height, actual: cells.len() });
        }
        Ok(VoxelGrid { width, height, cells })
    }

    /// Parse a text picture. `#`, `X` and `1` are occupied; `.`, `0` and
    /// space are empty. Line `i` becomes row `y == i`; short lines are padded
    /// with empty cells.
    pub fn from_ascii(text: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = text.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = VoxelGrid::new(width, rows.len());
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let occupied = match ch {
                    '#' | 'X' | '1' => true,
                    '.' | '0' | ' ' => false,
                    _ => return Err(GridError::UnknownCell { ch, row, col }),
                };
                grid.set(col, row, occupied);
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupancy at signed coordinates; anything out of range is empty.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, occupied: bool) {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) outside {}x{} grid", self.width, self.height);
        self.cells[y * self.width + x] = occupied;
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Maximal runs `[x0, x1)` of occupied cells in row `y`, left to right.
    pub fn row_runs(&self, y: usize) -> Vec<(i32, i32)> {
        let mut runs = Vec::new();
        if y >= self.height {
            return runs;
        }
        let row = &self.cells[y * self.width..(y + 1) * self.width];
        let mut x = 0;
        while x < self.width {
            if !row[x] {
                x += 1;
                continue;
            }
            let start = x;
            while x < self.width && row[x] {
                x += 1;
            }
            runs.push((start as i32, x as i32));
        }
        runs
    }
}
