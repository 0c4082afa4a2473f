// Copyright 2025 Lars Brubaker
// WASM bindings for grid2tri

use grid2tri::{GridTriangulator, Mesh, MeshOption, Strategy, VoxelGrid};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// A grid plus a configured triangulator. The editor paints cells, then asks
/// for a mesh; the last mesh is kept for the getters.
#[wasm_bindgen]
pub struct GridMesherJs {
    grid: VoxelGrid,
    inner: GridTriangulator,
    mesh: Mesh,
}

#[wasm_bindgen]
impl GridMesherJs {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> GridMesherJs {
        GridMesherJs {
            grid: VoxelGrid::new(width as usize, height as usize),
            inner: GridTriangulator::new(),
            mesh: Mesh::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.grid.height() as u32
    }

    /// Set one cell. Out-of-range cells are ignored.
    pub fn set_cell(&mut self, x: u32, y: u32, occupied: bool) {
        let (x, y) = (x as usize, y as usize);
        if x < self.grid.width() && y < self.grid.height() {
            self.grid.set(x, y, occupied);
        }
    }

    /// Replace all cells from a row-major byte array (non-zero = occupied).
    /// Returns false if the length does not match the grid.
    pub fn set_cells(&mut self, cells: &[u8]) -> bool {
        let cells = cells.iter().map(|&c| c != 0).collect();
        match VoxelGrid::from_cells(self.grid.width(), self.grid.height(), cells) {
            Ok(grid) => {
                self.grid = grid;
                true
            }
            Err(_) => false,
        }
    }

    /// 0 = Monotone, 1 = Greedy, 2 = ConstrainedDelaunay.
    pub fn set_strategy(&mut self, strategy: u32) {
        self.inner.set_strategy(strategy_from(strategy));
    }

    /// Set an option (0 = EliminateTJunctions).
    pub fn set_option(&mut self, option: u32, value: bool) {
        let opt = match option {
            0 => MeshOption::EliminateTJunctions,
            _ => return,
        };
        self.inner.set_option(opt, value);
    }

    /// Mesh the current grid; returns the triangle count.
    pub fn triangulate(&mut self) -> u32 {
        self.mesh = self.inner.triangulate(&self.grid);
        self.mesh.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.mesh.len() as u32
    }

    pub fn dropped_count(&self) -> u32 {
        self.mesh.dropped_triangles() as u32
    }

    pub fn skipped_count(&self) -> u32 {
        self.mesh.skipped_regions().len() as u32
    }

    pub fn area(&self) -> f64 {
        self.mesh.area()
    }

    /// Flat triangle corners [x0,y0, x1,y1, x2,y2, ...], three per triangle.
    pub fn get_vertices(&self) -> Vec<f32> {
        self.mesh.flat_vertices()
    }

    /// Shared vertex positions [x0,y0, ...] for use with `get_elements`.
    pub fn get_indexed_vertices(&self) -> Vec<f32> {
        let (verts, _) = self.mesh.indexed();
        verts.iter().flat_map(|p| [p.x as f32, p.y as f32]).collect()
    }

    /// Flat triangle vertex-index triples [i0,i1,i2, ...].
    pub fn get_elements(&self) -> Vec<u32> {
        let (_, elements) = self.mesh.indexed();
        elements.into_iter().flatten().collect()
    }

    /// Debug picture of the last mesh over the grid.
    pub fn render_svg(&self, cell_size: f64) -> String {
        let params = grid2tri::SvgParams::default().with_cell_size(cell_size);
        grid2tri::render_svg(&self.grid, &self.mesh, &params)
    }
}

fn strategy_from(strategy: u32) -> Strategy {
    match strategy {
        1 => Strategy::Greedy,
        2 => Strategy::ConstrainedDelaunay,
        _ => Strategy::Monotone,
    }
}

/// Convenience: mesh a row-major byte grid in one call.
/// Returns flat [x0,y0, x1,y1, x2,y2, ...] triangle corners, or an empty
/// array if the cell count does not match.
#[wasm_bindgen]
pub fn triangulate_grid(width: u32, height: u32, cells: &[u8], strategy: u32) -> Vec<f32> {
    let mut m = GridMesherJs::new(width, height);
    if !m.set_cells(cells) {
        return Vec::new();
    }
    m.set_strategy(strategy);
    m.triangulate();
    m.get_vertices()
}
