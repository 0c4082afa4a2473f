// grid2tri: voxel-slice occupancy grids to triangle meshes
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod assemble;
pub mod cdt;
pub mod error;
pub mod geom;
pub mod grid;
pub mod mesh;
pub mod polygon;
pub mod registry;
pub mod strategy;
pub mod svg;
pub mod vectorize;

pub use assemble::{merge_interp, Assembly, PolygonAssembler};
pub use error::{AssemblyError, GridError, MeshError};
pub use geom::{Direction, Point};
pub use grid::VoxelGrid;
pub use mesh::{Mesh, TJunction, Triangle};
pub use polygon::{Polygon, Ring};
pub use registry::PointRegistry;
pub use strategy::{
    DelaunayMesher, GreedyMesher, GridTriangulator, MeshConfig, MeshOption, Mesher, MonotoneMesher, Strategy,
};
pub use svg::{render_svg, SvgParams};
pub use vectorize::{trace_fragments, vectorize, Fragment, Vectorization};
