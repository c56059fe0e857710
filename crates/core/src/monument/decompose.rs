//! Greedy shape fitting over the pruned room graph.

use serde::{Deserialize, Serialize};

use crate::rng::{RandomSource, shuffle};
use crate::types::Direction;

use super::graph::RoomGraph;

/// Composite room shapes, one per fitter. Order in `FITTER_PRIORITY` is the
/// tie-break contract: the first satisfied fitter wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Two cells along X, two stories tall.
    DoubleXy,
    /// Two cells along Z, two stories tall.
    DoubleZy,
    /// One cell footprint, two stories tall.
    DoubleY,
    /// Two cells along X, single story.
    DoubleX,
    /// Two cells along Z, single story.
    DoubleZ,
    /// Fully enclosed single room (no side or upward opening).
    SimpleTop,
    /// Plain single room; always fits.
    Simple,
}

pub const FITTER_PRIORITY: [ShapeKind; 7] = [
    ShapeKind::DoubleXy,
    ShapeKind::DoubleZy,
    ShapeKind::DoubleY,
    ShapeKind::DoubleX,
    ShapeKind::DoubleZ,
    ShapeKind::SimpleTop,
    ShapeKind::Simple,
];

/// What placement needs to know about a consumed cell once the graph is gone:
/// its lattice coordinates and the final opening flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub index: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub open: [bool; 6],
}

impl CellSnapshot {
    pub fn of(graph: &RoomGraph, slot: usize) -> Self {
        let cell = &graph.cells[slot];
        let (x, y, z) = cell.coords();
        Self { index: cell.index, x, y, z, open: cell.has_opening }
    }

    pub fn open_toward(&self, direction: Direction) -> bool {
        self.open[direction.index()]
    }
}

/// Output of one successful fit: the shape, the consumed cells (anchor
/// first), and a facing used to orient decoration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomPiece {
    pub kind: ShapeKind,
    pub cells: Vec<CellSnapshot>,
    pub facing: Direction,
}

/// Shuffle the unclaimed cells and fit each one with the first matching
/// fitter. Terminates in one pass because `Simple` always matches; afterwards
/// every ordinary cell is claimed by exactly one piece.
pub fn decompose<R: RandomSource + ?Sized>(graph: &mut RoomGraph, rng: &mut R) -> Vec<RoomPiece> {
    let mut order = graph.unclaimed_cells();
    shuffle(&mut order, rng);

    let mut pieces = Vec::new();
    for slot in order {
        if graph.cells[slot].claimed {
            continue;
        }
        for kind in FITTER_PRIORITY {
            if fits(graph, slot, kind) {
                pieces.push(claim(graph, slot, kind));
                break;
            }
        }
    }
    pieces
}

fn fits(graph: &RoomGraph, slot: usize, kind: ShapeKind) -> bool {
    match kind {
        ShapeKind::Simple => true,
        ShapeKind::SimpleTop => {
            let cell = &graph.cells[slot];
            [Direction::West, Direction::East, Direction::North, Direction::South, Direction::Up]
                .iter()
                .all(|d| !cell.has_opening[d.index()])
        }
        ShapeKind::DoubleY => open_unclaimed(graph, slot, Direction::Up).is_some(),
        ShapeKind::DoubleX => open_unclaimed(graph, slot, Direction::East).is_some(),
        ShapeKind::DoubleZ => open_unclaimed(graph, slot, Direction::South).is_some(),
        ShapeKind::DoubleXy => tall_pair_fits(graph, slot, Direction::East),
        ShapeKind::DoubleZy => tall_pair_fits(graph, slot, Direction::South),
    }
}

/// The neighbor toward `direction`, provided the edge is open and the
/// neighbor is still unclaimed.
fn open_unclaimed(graph: &RoomGraph, slot: usize, direction: Direction) -> Option<usize> {
    let cell = &graph.cells[slot];
    if !cell.has_opening[direction.index()] {
        return None;
    }
    let neighbor = cell.connections[direction.index()]?;
    if graph.cells[neighbor].claimed { None } else { Some(neighbor) }
}

/// A 2x2 slice: anchor, its `side` neighbor, and both cells above, joined by
/// open edges with the diagonal shared consistently.
fn tall_pair_fits(graph: &RoomGraph, slot: usize, side: Direction) -> bool {
    let Some(side_slot) = open_unclaimed(graph, slot, side) else {
        return false;
    };
    let Some(above) = open_unclaimed(graph, slot, Direction::Up) else {
        return false;
    };
    let Some(diagonal) = open_unclaimed(graph, side_slot, Direction::Up) else {
        return false;
    };
    graph.cells[above].connections[side.index()] == Some(diagonal)
}

fn claim(graph: &mut RoomGraph, slot: usize, kind: ShapeKind) -> RoomPiece {
    let consumed: Vec<usize> = match kind {
        ShapeKind::Simple | ShapeKind::SimpleTop => vec![slot],
        ShapeKind::DoubleY => vec![slot, partner(graph, slot, Direction::Up)],
        ShapeKind::DoubleX => vec![slot, partner(graph, slot, Direction::East)],
        ShapeKind::DoubleZ => vec![slot, partner(graph, slot, Direction::South)],
        ShapeKind::DoubleXy => quad(graph, slot, Direction::East),
        ShapeKind::DoubleZy => quad(graph, slot, Direction::South),
    };

    let mut cells = Vec::with_capacity(consumed.len());
    for member in consumed {
        debug_assert!(!graph.cells[member].claimed, "fitter consumed a claimed cell");
        graph.cells[member].claimed = true;
        cells.push(CellSnapshot::of(graph, member));
    }

    RoomPiece { kind, facing: facing_of(&cells[0]), cells }
}

fn partner(graph: &RoomGraph, slot: usize, direction: Direction) -> usize {
    graph.cells[slot].connections[direction.index()]
        .expect("fitter matched without the required neighbor")
}

fn quad(graph: &RoomGraph, slot: usize, side: Direction) -> Vec<usize> {
    let side_slot = partner(graph, slot, side);
    let above = partner(graph, slot, Direction::Up);
    let diagonal = partner(graph, side_slot, Direction::Up);
    vec![slot, side_slot, above, diagonal]
}

/// Decoration faces the first open horizontal side of the anchor cell.
fn facing_of(anchor: &CellSnapshot) -> Direction {
    Direction::HORIZONTAL
        .into_iter()
        .find(|d| anchor.open[d.index()])
        .unwrap_or(Direction::North)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::monument::graph::RoomGraph;
    use crate::monument::prune::prune_openings;
    use crate::rng::ChaChaRandom;

    fn decomposed(seed: u64) -> (RoomGraph, Vec<RoomPiece>) {
        let mut rng = ChaChaRandom::from_seed(seed);
        let mut graph = RoomGraph::build(&mut rng);
        prune_openings(&mut graph, &mut rng);
        let pieces = decompose(&mut graph, &mut rng);
        (graph, pieces)
    }

    #[test]
    fn every_ordinary_cell_is_claimed_exactly_once() {
        for seed in [3_u64, 17, 404, 123_456] {
            let (graph, pieces) = decomposed(seed);

            assert!(graph.unclaimed_cells().is_empty(), "seed {seed}: unclaimed cells remain");

            let mut seen = BTreeSet::new();
            for piece in &pieces {
                for cell in &piece.cells {
                    assert!(
                        seen.insert(cell.index),
                        "seed {seed}: cell {} claimed twice",
                        cell.index
                    );
                }
            }

            let special = 4 + graph.core_cells.len();
            assert_eq!(seen.len(), 61 - special, "seed {seed}: partition incomplete");
        }
    }

    #[test]
    fn decomposition_without_pruning_still_partitions_all_cells() {
        let mut rng = ChaChaRandom::from_seed(8);
        let mut graph = RoomGraph::build(&mut rng);
        // Skip pruning entirely; the fully-open graph must still decompose.
        let pieces = decompose(&mut graph, &mut rng);

        assert!(graph.unclaimed_cells().is_empty());
        let claimed: usize = pieces.iter().map(|piece| piece.cells.len()).sum();
        assert_eq!(claimed, 61 - 4 - graph.core_cells.len());
    }

    #[test]
    fn composite_pieces_consume_the_advertised_cell_count() {
        let (_, pieces) = decomposed(555);
        for piece in &pieces {
            let expected = match piece.kind {
                ShapeKind::Simple | ShapeKind::SimpleTop => 1,
                ShapeKind::DoubleY | ShapeKind::DoubleX | ShapeKind::DoubleZ => 2,
                ShapeKind::DoubleXy | ShapeKind::DoubleZy => 4,
            };
            assert_eq!(piece.cells.len(), expected, "{:?}", piece.kind);
        }
    }

    #[test]
    fn composite_piece_cells_are_mutually_adjacent() {
        let (_, pieces) = decomposed(9_001);
        for piece in &pieces {
            let anchor = &piece.cells[0];
            for cell in &piece.cells[1..] {
                let distance = (cell.x - anchor.x).abs()
                    + (cell.y - anchor.y).abs()
                    + (cell.z - anchor.z).abs();
                assert!(distance <= 2, "{:?} spans non-adjacent cells", piece.kind);
            }
        }
    }

    #[test]
    fn simple_top_pieces_have_no_side_or_upward_openings() {
        for seed in 0..24_u64 {
            let (_, pieces) = decomposed(seed);
            for piece in pieces.iter().filter(|p| p.kind == ShapeKind::SimpleTop) {
                let cell = &piece.cells[0];
                for direction in
                    [Direction::West, Direction::East, Direction::North, Direction::South, Direction::Up]
                {
                    assert!(!cell.open_toward(direction));
                }
            }
        }
    }
}
