// Copyright 2025 Lars Brubaker
// Region extraction: outer rings, holes and their areas.

mod helpers;

use grid2tri::{trace_fragments, vectorize, PolygonAssembler};
use helpers::{grid, p, random_grid};

#[test]
fn ring_of_eight_cells_has_one_hole() {
    let regions = vectorize(&grid("###\n#.#\n###"));
    assert!(regions.errors.is_empty());
    assert_eq!(regions.polygons.len(), 1);
    let poly = &regions.polygons[0];
    assert_eq!(poly.outer.points, vec![p(0, 0), p(3, 0), p(3, 3), p(0, 3)]);
    assert_eq!(poly.holes.len(), 1);
    assert_eq!(poly.holes[0].points, vec![p(1, 1), p(1, 2), p(2, 2), p(2, 1)]);
    assert_eq!(poly.outer.area(), 9.0);
    assert_eq!(poly.holes[0].area(), 1.0);
    assert_eq!(poly.area(), 8.0);
}

#[test]
fn windings_follow_ring_roles() {
    let regions = vectorize(&grid("#######\n#.##..#\n#.##..#\n#######"));
    assert_eq!(regions.polygons.len(), 1);
    let poly = &regions.polygons[0];
    assert!(poly.outer.is_ccw());
    assert_eq!(poly.holes.len(), 2);
    assert!(poly.holes.iter().all(|h| !h.is_ccw()));
    assert_eq!(poly.area(), 28.0 - 2.0 - 4.0);
}

#[test]
fn island_inside_hole_is_its_own_region() {
    let regions = vectorize(&grid("#####\n#...#\n#.#.#\n#...#\n#####"));
    assert!(regions.errors.is_empty());
    assert_eq!(regions.polygons.len(), 2);
    let frame = &regions.polygons[0];
    let island = &regions.polygons[1];
    assert_eq!(frame.holes.len(), 1);
    assert_eq!(frame.area(), 16.0);
    assert!(island.holes.is_empty());
    assert_eq!(island.outer.points, vec![p(2, 2), p(3, 2), p(3, 3), p(2, 3)]);
}

#[test]
fn diagonal_neighbours_are_separate_regions() {
    let regions = vectorize(&grid("#.#.\n.#.#\n#.#."));
    assert!(regions.errors.is_empty(), "{:?}", regions.errors);
    assert_eq!(regions.polygons.len(), 6);
    assert!(regions.polygons.iter().all(|poly| poly.area() == 1.0 && poly.holes.is_empty()));
}

#[test]
fn hole_pinched_at_a_junction() {
    // The two empty cells touch diagonally, giving two holes sharing (2, 2).
    let regions = vectorize(&grid("####\n#.##\n##.#\n####"));
    assert!(regions.errors.is_empty(), "{:?}", regions.errors);
    assert_eq!(regions.polygons.len(), 1);
    let poly = &regions.polygons[0];
    assert_eq!(poly.holes.len(), 2);
    assert_eq!(poly.area(), 14.0);
    assert!(poly.holes.iter().all(|h| h.points.contains(&p(2, 2))));
}

#[test]
fn collinear_steps_are_merged() {
    let regions = vectorize(&grid("######\n######"));
    assert_eq!(regions.polygons[0].outer.len(), 4);
}

#[test]
fn region_areas_add_up_to_occupied_cells() {
    for seed in 0..12u64 {
        let g = random_grid(17, 13, 55, seed);
        let regions = vectorize(&g);
        assert!(regions.errors.is_empty(), "seed {seed}: {:?}", regions.errors);
        let doubled: i64 = regions.polygons.iter().map(|poly| poly.doubled_area()).sum();
        assert_eq!(doubled, 2 * g.occupied_count() as i64, "seed {seed}");
        for poly in &regions.polygons {
            assert!(poly.outer.is_ccw());
            for hole in &poly.holes {
                assert!(!hole.is_ccw());
                let start = hole.points[0];
                assert!(poly.outer.contains(2 * i64::from(start.x) + 1, 2 * i64::from(start.y) + 1));
            }
        }
    }
}

#[test]
fn fragment_order_does_not_change_the_result() {
    for text in ["#.\n.#", "#.#\n.#.\n#.#", "####\n#.##\n##.#\n####", "##.\n#.#\n.##"] {
        let g = grid(text);
        let expected = vectorize(&g);

        let mut asm = PolygonAssembler::new();
        for fragment in trace_fragments(&g).into_iter().rev() {
            asm.add_fragment(fragment);
        }
        let reversed = asm.finish();
        assert_eq!(reversed.polygons, expected.polygons, "{text}");
        assert_eq!(reversed.errors, expected.errors, "{text}");
    }
}

#[test]
fn open_fragments_run_between_junctions() {
    let fragments = trace_fragments(&grid("#.\n.#"));
    assert_eq!(fragments.len(), 2);
    for fragment in &fragments {
        assert!(!fragment.closed);
        assert_eq!(fragment.start(), Some(p(1, 1)));
        assert_eq!(fragment.end(), Some(p(1, 1)));
    }
}
