// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Meshing strategies and the front-door triangulator object.
//
// Every strategy turns a whole grid into a fresh Mesh; nothing is carried
// between calls except the configuration held by GridTriangulator.

mod delaunay;
mod greedy;
mod monotone;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::VoxelGrid;
use crate::mesh::Mesh;

pub use delaunay::DelaunayMesher;
pub use greedy::GreedyMesher;
pub use monotone::MonotoneMesher;

// ─────────────────────────────── Public types ──────────────────────────────────

/// Grid in, triangles out. Meshers hold no per-call state and can be shared
/// across threads.
pub trait Mesher: Send + Sync {
    fn triangulate(&self, grid: &VoxelGrid) -> Mesh;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Row runs stacked into y-monotone polygons, each cut into slabs and
    /// zipped into triangles.
    #[default]
    Monotone,
    /// Maximal rectangles grown cell by cell, two triangles each.
    Greedy,
    /// Vectorized polygons triangulated with a constrained Delaunay kernel.
    ConstrainedDelaunay,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Monotone, Strategy::Greedy, Strategy::ConstrainedDelaunay];

    pub fn mesher(self, config: &MeshConfig) -> Box<dyn Mesher> {
        match self {
            Strategy::Monotone => Box::new(MonotoneMesher { eliminate_t_junctions: config.eliminate_t_junctions }),
            Strategy::Greedy => Box::new(GreedyMesher),
            Strategy::ConstrainedDelaunay => Box::new(DelaunayMesher),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Monotone => "monotone",
            Strategy::Greedy => "greedy",
            Strategy::ConstrainedDelaunay => "constrained_delaunay",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshOption {
    /// Insert every neighbouring slab corner into slab edges so no vertex
    /// lands inside another triangle's edge. Only the monotone strategy
    /// looks at this; the others are either free of T-junctions already or
    /// make no such promise.
    EliminateTJunctions,
}

/// Persisted meshing preferences.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub strategy: Strategy,
    pub eliminate_t_junctions: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        MeshConfig { strategy: Strategy::Monotone, eliminate_t_junctions: true }
    }
}

// ─────────────────────────── Triangulator ─────────────────────────────────────

/// Configurable front door over the strategies.
#[derive(Clone, Debug, Default)]
pub struct GridTriangulator {
    config: MeshConfig,
}

impl GridTriangulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MeshConfig) -> Self {
        GridTriangulator { config }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.config.strategy = strategy;
    }

    pub fn set_option(&mut self, option: MeshOption, value: bool) {
        match option {
            MeshOption::EliminateTJunctions => self.config.eliminate_t_junctions = value,
        }
    }

    /// Mesh the whole grid with the configured strategy.
    pub fn triangulate(&self, grid: &VoxelGrid) -> Mesh {
        let mesh = self.config.strategy.mesher(&self.config).triangulate(grid);
        debug!(
            strategy = self.config.strategy.name(),
            cells = grid.occupied_count(),
            triangles = mesh.len(),
            dropped = mesh.dropped_triangles(),
            skipped = mesh.skipped_regions().len(),
            "triangulated grid"
        );
        mesh
    }
}
