// Copyright 2025 Lars Brubaker
// Shared test utilities for grid2tri tests.

#![allow(dead_code)]

use grid2tri::{Mesh, Point, Polygon, Ring, Strategy, Triangle, VoxelGrid};

/// Smallest area a triangle of an integer grid mesh may have.
pub const MIN_TRIANGLE_AREA: f64 = 0.25;

/// Parse a grid drawn with `#` for occupied and `.` for empty cells.
/// The first line is row `y == 0`.
pub fn grid(text: &str) -> VoxelGrid {
    VoxelGrid::from_ascii(text).expect("test grid should parse")
}

/// Deterministic pseudo-random grid (xorshift), `fill` in percent.
pub fn random_grid(width: usize, height: usize, fill: u32, seed: u64) -> VoxelGrid {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    VoxelGrid::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 100) < u64::from(fill)
    })
}

pub fn triangulate(grid: &VoxelGrid, strategy: Strategy) -> Mesh {
    let mut tri = grid2tri::GridTriangulator::new();
    tri.set_strategy(strategy);
    tri.triangulate(grid)
}

/// Sum of triangle areas, accumulated exactly.
pub fn area_sum(mesh: &Mesh) -> f64 {
    mesh.iter().map(Triangle::doubled_area).sum::<i64>() as f64 / 2.0
}

pub fn assert_area_conserved(grid: &VoxelGrid, mesh: &Mesh, label: &str) {
    let expected = grid.occupied_count() as f64;
    let actual = area_sum(mesh);
    assert!(
        (actual - expected).abs() < 1e-9,
        "{label}: triangle area {actual} != occupied cells {expected}"
    );
}

pub fn assert_non_degenerate(mesh: &Mesh, label: &str) {
    for (i, tri) in mesh.iter().enumerate() {
        assert!(
            tri.area() > MIN_TRIANGLE_AREA,
            "{label}: triangle {i} {:?} has area {}",
            tri.points,
            tri.area()
        );
        assert!(tri.doubled_area() > 0, "{label}: triangle {i} is not counter-clockwise");
    }
}

pub fn assert_no_t_junctions(mesh: &Mesh, label: &str) {
    let found = mesh.t_junctions();
    assert!(found.is_empty(), "{label}: {} T-junctions, first {:?}", found.len(), found.first());
}

/// Interiors of a triangle and the open unit square of cell `(cx, cy)`
/// intersect. Separating axis test over the square's axes and the triangle's
/// edge normals, exact in integers.
pub fn triangle_overlaps_cell(tri: &Triangle, cx: i64, cy: i64) -> bool {
    let pts: Vec<[i64; 2]> = tri.points.iter().map(|p| [i64::from(p.x), i64::from(p.y)]).collect();
    let cell = [[cx, cy], [cx + 1, cy], [cx + 1, cy + 1], [cx, cy + 1]];

    let mut axes = vec![[1i64, 0i64], [0, 1]];
    for i in 0..3 {
        let a = pts[i];
        let b = pts[(i + 1) % 3];
        axes.push([a[1] - b[1], b[0] - a[0]]);
    }
    for axis in axes {
        let project = |ps: &[[i64; 2]]| {
            let dots = ps.iter().map(|p| p[0] * axis[0] + p[1] * axis[1]);
            (dots.clone().min().unwrap_or(0), dots.max().unwrap_or(0))
        };
        let (tmin, tmax) = project(&pts);
        let (cmin, cmax) = project(&cell);
        if tmax <= cmin || cmax <= tmin {
            return false;
        }
    }
    true
}

/// Every triangle covers occupied cells only.
pub fn assert_inside_grid(grid: &VoxelGrid, mesh: &Mesh, label: &str) {
    for (i, tri) in mesh.iter().enumerate() {
        let xs = tri.points.map(|p| i64::from(p.x));
        let ys = tri.points.map(|p| i64::from(p.y));
        for cy in ys.iter().min().copied().unwrap_or(0)..ys.iter().max().copied().unwrap_or(0) {
            for cx in xs.iter().min().copied().unwrap_or(0)..xs.iter().max().copied().unwrap_or(0) {
                if !grid.get(cx, cy) && triangle_overlaps_cell(tri, cx, cy) {
                    panic!("{label}: triangle {i} {:?} covers empty cell ({cx}, {cy})", tri.points);
                }
            }
        }
    }
}

/// Copy of `polygon` with every coordinate multiplied by `k`.
pub fn scaled(polygon: &Polygon, k: i32) -> Polygon {
    let scale = |r: &Ring| Ring::new(r.points.iter().map(|p| Point::new(p.x * k, p.y * k)).collect());
    Polygon::new(scale(&polygon.outer), polygon.holes.iter().map(scale).collect())
}

/// Every triangle centroid lies inside one of `polygons`.
///
/// Scaling by three makes the centroid a lattice point; the doubled
/// containment query then takes `2 * (a + b + c)`.
pub fn assert_centroids_inside(polygons: &[Polygon], mesh: &Mesh, label: &str) {
    let scaled: Vec<Polygon> = polygons.iter().map(|p| scaled(p, 3)).collect();
    for (i, tri) in mesh.iter().enumerate() {
        let sx: i64 = tri.points.iter().map(|p| i64::from(p.x)).sum();
        let sy: i64 = tri.points.iter().map(|p| i64::from(p.y)).sum();
        assert!(
            scaled.iter().any(|poly| poly.contains_point(2 * sx, 2 * sy)),
            "{label}: centroid of triangle {i} {:?} is outside every polygon",
            tri.points
        );
    }
}

/// Run every structural check that `strategy` promises.
pub fn check_mesh(grid: &VoxelGrid, strategy: Strategy, label: &str) -> Mesh {
    let mesh = triangulate(grid, strategy);
    let label = format!("{label} [{}]", strategy.name());
    assert!(mesh.skipped_regions().is_empty(), "{label}: skipped {:?}", mesh.skipped_regions());
    assert_eq!(mesh.dropped_triangles(), 0, "{label}: dropped degenerate triangles");
    assert_area_conserved(grid, &mesh, &label);
    assert_non_degenerate(&mesh, &label);
    assert_inside_grid(grid, &mesh, &label);
    if strategy != Strategy::Greedy {
        assert_no_t_junctions(&mesh, &label);
    }
    mesh
}

pub fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

pub fn ring(coords: &[(i32, i32)]) -> Ring {
    Ring::new(coords.iter().map(|&c| Point::from(c)).collect())
}
