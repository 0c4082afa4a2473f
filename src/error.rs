// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Error types. Region-level failures are collected by the meshers rather than
// aborting a whole grid; misuse of the internal registry panics instead.

use thiserror::Error;

use crate::geom::Point;

/// Errors building a [`VoxelGrid`](crate::grid::VoxelGrid) from caller data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("expected {expected} cells for the grid, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("unrecognised cell {ch:?} at row {row}, column {col}")]
    UnknownCell { ch: char, row: usize, col: usize },
}

/// Structural inconsistencies found while turning boundary fragments into
/// rings and polygons.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("pivot {pivot:?} is not shared by both fragments")]
    MissingPivot { pivot: Point },

    #[error("fragment ending at {end:?} has no continuation")]
    DanglingFragment { end: Point },

    #[error("fragment step at {at:?} is not axis-aligned")]
    NotRectilinear { at: Point },

    #[error("ring has {len} points, at least 3 are required")]
    DegenerateRing { len: usize },

    #[error("ring visits {point:?} more than once")]
    RepeatedPoint { point: Point },

    #[error("hole starting at {start:?} is not inside its outer ring")]
    HoleOutsideOuter { start: Point },
}

/// Failures of the constrained Delaunay backend on one polygon.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("boundary edge {from:?} -> {to:?} passes through vertex {through:?}")]
    ConstraintThroughVertex { from: Point, to: Point, through: Point },

    #[error("boundary edge {from:?} -> {to:?} crosses another boundary edge")]
    CrossingConstraints { from: Point, to: Point },

    #[error("coordinates exceed the supported range of {limit}")]
    CoordinateOverflow { limit: i32 },

    #[error("point {point:?} lies outside the triangulation bounds")]
    PointOutsideBounds { point: Point },
}

pub type MeshResult<T> = std::result::Result<T, MeshError>;
