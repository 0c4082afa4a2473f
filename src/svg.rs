// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Debug rendering of a triangulation over its grid.
//
// Occupied cells are filled, triangle outlines drawn on top, each triangle
// numbered at its centroid in mesh order, and every vertex marked. Grid y
// grows upward, so rows are flipped into SVG space.

use std::collections::HashSet;
use std::fmt::Write;

use crate::geom::Point;
use crate::grid::VoxelGrid;
use crate::mesh::Mesh;

#[derive(Debug, Clone)]
pub struct SvgParams {
    /// Pixels per grid cell.
    pub cell_size: f64,
    pub padding: f64,
    pub background_color: String,
    pub cell_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub label_color: String,
    pub vertex_color: String,
    pub show_labels: bool,
    pub show_vertices: bool,
}

impl Default for SvgParams {
    fn default() -> Self {
        Self {
            cell_size: 24.0,
            padding: 12.0,
            background_color: "#ffffff".to_string(),
            cell_color: "#d6e4f0".to_string(),
            stroke_color: "#2d5986".to_string(),
            stroke_width: 1.0,
            label_color: "#b03030".to_string(),
            vertex_color: "#202020".to_string(),
            show_labels: true,
            show_vertices: true,
        }
    }
}

impl SvgParams {
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub fn without_labels(mut self) -> Self {
        self.show_labels = false;
        self
    }
}

/// Render `mesh` over `grid` as a standalone SVG document.
#[must_use]
pub fn render_svg(grid: &VoxelGrid, mesh: &Mesh, params: &SvgParams) -> String {
    let cell = params.cell_size;
    let pad = params.padding;
    let width = 2.0f64.mul_add(pad, grid.width() as f64 * cell);
    let height = 2.0f64.mul_add(pad, grid.height() as f64 * cell);
    let rows = grid.height() as f64;
    let px = |x: f64| x.mul_add(cell, pad);
    let py = |y: f64| (rows - y).mul_add(cell, pad);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">
  <rect width="100%" height="100%" fill="{}"/>
"#,
        params.background_color
    );

    let _ = writeln!(svg, r#"  <g fill="{}" stroke="none">"#, params.cell_color);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.is_occupied(x, y) {
                let _ = writeln!(
                    svg,
                    r#"    <rect x="{:.2}" y="{:.2}" width="{cell:.2}" height="{cell:.2}"/>"#,
                    px(x as f64),
                    py(y as f64 + 1.0),
                );
            }
        }
    }
    svg.push_str("  </g>\n");

    let _ = writeln!(
        svg,
        r#"  <g fill="none" stroke="{}" stroke-width="{:.2}" stroke-linejoin="round">"#,
        params.stroke_color, params.stroke_width
    );
    for tri in mesh {
        let [a, b, c] = tri.points.map(Point::as_f64);
        let _ = writeln!(
            svg,
            r#"    <path d="M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} Z"/>"#,
            px(a.0),
            py(a.1),
            px(b.0),
            py(b.1),
            px(c.0),
            py(c.1)
        );
    }
    svg.push_str("  </g>\n");

    if params.show_vertices {
        let mut seen = HashSet::new();
        let _ = writeln!(svg, r#"  <g fill="{}">"#, params.vertex_color);
        for p in mesh.iter().flat_map(|t| t.points) {
            if seen.insert(p) {
                let (x, y) = p.as_f64();
                let _ = writeln!(
                    svg,
                    r#"    <circle cx="{:.2}" cy="{:.2}" r="{:.2}"/>"#,
                    px(x),
                    py(y),
                    (cell * 0.08).max(1.0)
                );
            }
        }
        svg.push_str("  </g>\n");
    }

    if params.show_labels {
        let font = (cell * 0.4).max(6.0);
        let _ = writeln!(
            svg,
            r#"  <g fill="{}" font-family="monospace" font-size="{font:.1}" text-anchor="middle" dominant-baseline="central">"#,
            params.label_color
        );
        for (i, tri) in mesh.iter().enumerate() {
            let (cx, cy) = tri.centroid();
            let _ = writeln!(svg, r#"    <text x="{:.2}" y="{:.2}">{i}</text>"#, px(cx), py(cy));
        }
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}
