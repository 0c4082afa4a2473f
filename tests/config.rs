// Copyright 2025 Lars Brubaker
// Persisted configuration and mesh export through serde.

mod helpers;

use grid2tri::{GridTriangulator, Mesh, MeshConfig, MeshOption, Strategy, VoxelGrid};
use helpers::grid;

#[test]
fn config_round_trips_through_json() {
    for strategy in Strategy::ALL {
        for eliminate_t_junctions in [true, false] {
            let config = MeshConfig { strategy, eliminate_t_junctions };
            let json = serde_json::to_string(&config).unwrap();
            let back: MeshConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(back, config);
        }
    }
}

#[test]
fn missing_fields_take_defaults() {
    let config: MeshConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, MeshConfig::default());
    let config: MeshConfig = serde_json::from_str(r#"{"strategy":"greedy"}"#).unwrap();
    assert_eq!(config.strategy, Strategy::Greedy);
    assert!(config.eliminate_t_junctions);
}

#[test]
fn unknown_strategy_is_rejected() {
    assert!(serde_json::from_str::<MeshConfig>(r#"{"strategy":"marching"}"#).is_err());
}

#[test]
fn loaded_config_drives_the_triangulator() {
    let config: MeshConfig =
        serde_json::from_str(r#"{"strategy":"monotone","eliminate_t_junctions":false}"#).unwrap();
    let g = grid("#####\n##.##");
    let loaded = GridTriangulator::with_config(config).triangulate(&g);

    let mut manual = GridTriangulator::new();
    manual.set_option(MeshOption::EliminateTJunctions, false);
    assert_eq!(loaded.triangles(), manual.triangulate(&g).triangles());
    assert!(!loaded.t_junctions().is_empty());
}

#[test]
fn grid_and_mesh_export() {
    let g = grid("##\n#.");
    let json = serde_json::to_string(&g).unwrap();
    let back: VoxelGrid = serde_json::from_str(&json).unwrap();
    assert_eq!(back, g);

    let mesh = GridTriangulator::new().triangulate(&g);
    let json = serde_json::to_value(&mesh).unwrap();
    assert_eq!(json["triangles"].as_array().map(Vec::len), Some(mesh.len()));
    let back: Mesh = serde_json::from_value(json).unwrap();
    assert_eq!(back.triangles(), mesh.triangles());
}

#[test]
fn malformed_grid_is_rejected() {
    let err = serde_json::from_str::<VoxelGrid>(r#"{"width":2,"height":2,"cells":[true,false,true]}"#);
    assert!(err.is_err());
}
