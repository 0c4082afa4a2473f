// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Constrained Delaunay mesher: vectorize, assemble, then triangulate each
// polygon with the CDT kernel.

use tracing::debug;

use super::Mesher;
use crate::assemble::PolygonAssembler;
use crate::cdt::{Cdt, VertIdx};
use crate::error::MeshResult;
use crate::geom::Point;
use crate::grid::VoxelGrid;
use crate::mesh::Mesh;
use crate::polygon::Polygon;
use crate::registry::PointRegistry;
use crate::vectorize::vectorize;

#[derive(Copy, Clone, Debug, Default)]
pub struct DelaunayMesher;

impl DelaunayMesher {
    /// Triangulate the interior of one polygon with holes. Ring edges are
    /// kept as constraints; no Steiner points are added.
    pub fn triangulate_polygon(&self, polygon: &Polygon) -> MeshResult<Mesh> {
        let polygon = PolygonAssembler::validate(polygon.clone())?;

        let mut min = polygon.outer.points[0];
        let mut max = min;
        for p in &polygon.outer.points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        let mut cdt = Cdt::with_bounds(min, max)?;

        // Rings may share vertices (a hole pinched against its outer ring);
        // each distinct point is inserted once.
        let mut registry = PointRegistry::new();
        let mut verts: Vec<VertIdx> = Vec::with_capacity(polygon.vertex_count());
        for ring in polygon.rings() {
            for &p in &ring.points {
                let fresh = registry.len();
                if registry.lookup_or_create(p) == fresh {
                    verts.push(cdt.insert_point(p)?);
                }
            }
        }
        for ring in polygon.rings() {
            for (a, b) in ring.edges() {
                let va = verts[registry.lookup_or_create(a)];
                let vb = verts[registry.lookup_or_create(b)];
                cdt.insert_constraint(va, vb)?;
            }
        }

        let mut mesh = Mesh::new();
        for [a, b, c] in cdt.interior_triangles() {
            mesh.push(a, b, c);
        }
        debug!(
            vertices = cdt.vertex_count(),
            holes = polygon.holes.len(),
            triangles = mesh.len(),
            "constrained delaunay polygon"
        );
        Ok(mesh)
    }
}

impl Mesher for DelaunayMesher {
    fn triangulate(&self, grid: &VoxelGrid) -> Mesh {
        let vectorized = vectorize(grid);
        let mut mesh = Mesh::new();
        for err in vectorized.errors {
            mesh.record_skipped(err);
        }
        for polygon in &vectorized.polygons {
            match self.triangulate_polygon(polygon) {
                Ok(part) => mesh.append(part),
                Err(err) => mesh.record_skipped(err),
            }
        }
        mesh
    }
}
