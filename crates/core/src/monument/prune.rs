//! Randomized opening removal that provably preserves reachability.

use crate::rng::{RandomSource, shuffle};
use crate::types::Direction;

use super::graph::RoomGraph;

/// Random-direction probes attempted per visited cell. Empirical tuning
/// value; bounded retries, never backtracking.
pub const PROBE_ATTEMPTS_PER_CELL: u32 = 5;
/// A cell stops probing once this many of its openings have been closed.
pub const CLOSURE_TARGET_PER_CELL: u32 = 2;

pub fn prune_openings<R: RandomSource + ?Sized>(graph: &mut RoomGraph, rng: &mut R) {
    prune_openings_with_budget(graph, rng, PROBE_ATTEMPTS_PER_CELL, CLOSURE_TARGET_PER_CELL);
}

/// Visit every non-special cell in a random order and speculatively close
/// openings. A closure is kept only if both endpoints of the closed edge can
/// still reach the source; otherwise both sides are restored immediately.
pub fn prune_openings_with_budget<R: RandomSource + ?Sized>(
    graph: &mut RoomGraph,
    rng: &mut R,
    probe_attempts: u32,
    closure_target: u32,
) {
    let mut order = graph.unclaimed_cells();
    shuffle(&mut order, rng);

    for slot in order {
        let mut closed = 0_u32;
        for _ in 0..probe_attempts {
            if closed >= closure_target {
                break;
            }
            let direction = Direction::ALL[rng.next_int(6) as usize];
            if !graph.cells[slot].open_toward(direction) {
                // No open edge that way; the probe simply fails. A cell with
                // no open edges at all is skipped this way, which is expected.
                continue;
            }
            let neighbor = graph.cells[slot].connections[direction.index()]
                .expect("an opening always has a recorded connection");

            graph.set_edge_open(slot, direction, false);
            if graph.reaches_source(slot) && graph.reaches_source(neighbor) {
                closed += 1;
            } else {
                graph.set_edge_open(slot, direction, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monument::graph::RoomGraph;
    use crate::rng::ChaChaRandom;

    fn openings(graph: &RoomGraph) -> Vec<[bool; 6]> {
        graph.cells.iter().map(|cell| cell.has_opening).collect()
    }

    #[test]
    fn pruning_preserves_reachability_for_every_cell() {
        for seed in [1_u64, 2, 42, 777, 901_234] {
            let mut rng = ChaChaRandom::from_seed(seed);
            let mut graph = RoomGraph::build(&mut rng);
            prune_openings(&mut graph, &mut rng);
            for slot in 0..graph.cells.len() {
                assert!(
                    graph.reaches_source(slot),
                    "seed {seed}: cell {slot} disconnected from source"
                );
            }
        }
    }

    #[test]
    fn pruning_removes_openings_in_symmetric_pairs() {
        let mut rng = ChaChaRandom::from_seed(31);
        let mut graph = RoomGraph::build(&mut rng);
        prune_openings(&mut graph, &mut rng);
        for (slot, cell) in graph.cells.iter().enumerate() {
            for direction in Direction::ALL {
                if let Some(neighbor) = cell.connections[direction.index()] {
                    assert_eq!(
                        cell.has_opening[direction.index()],
                        graph.cells[neighbor].has_opening[direction.opposite().index()],
                        "asymmetric opening at cell {slot}"
                    );
                }
            }
        }
    }

    #[test]
    fn zero_probe_budget_leaves_the_builder_output_untouched() {
        let mut build_rng = ChaChaRandom::from_seed(12);
        let reference = RoomGraph::build(&mut build_rng);

        let mut rng = ChaChaRandom::from_seed(12);
        let mut graph = RoomGraph::build(&mut rng);
        prune_openings_with_budget(&mut graph, &mut rng, 0, CLOSURE_TARGET_PER_CELL);

        assert_eq!(openings(&graph), openings(&reference));
    }

    #[test]
    fn pruning_actually_closes_some_openings() {
        let mut rng = ChaChaRandom::from_seed(2026);
        let mut graph = RoomGraph::build(&mut rng);
        let before: usize =
            openings(&graph).iter().map(|o| o.iter().filter(|&&b| b).count()).sum();
        prune_openings(&mut graph, &mut rng);
        let after: usize = openings(&graph).iter().map(|o| o.iter().filter(|&&b| b).count()).sum();
        assert!(after < before, "expected at least one accepted closure");
    }
}
