//! Room cell arena and lattice construction for the monument interior.

use crate::rng::RandomSource;
use crate::types::Direction;

pub const LATTICE_WIDTH: i32 = 5;
pub const LATTICE_DEPTH: i32 = 5;
pub const LATTICE_HEIGHT: i32 = 3;
/// The partial top floor spans `x 0..4, z 0..2`, biased toward the entry side.
pub const TOP_FLOOR_WIDTH: i32 = 4;
pub const TOP_FLOOR_DEPTH: i32 = 2;

/// Index codes for the three cells that live outside the lattice. Chosen well
/// clear of the lattice code range (`0..75`).
pub const ROOF_CELL_CODE: i32 = 1001;
pub const LEFT_WING_CELL_CODE: i32 = 1002;
pub const RIGHT_WING_CELL_CODE: i32 = 1003;

/// Lattice code packing; the cell index is its coordinates.
pub fn lattice_code(x: i32, y: i32, z: i32) -> i32 {
    y * 25 + z * 5 + x
}

/// Inverse of `lattice_code`, extended with the three out-of-lattice cells.
pub fn cell_coords(index: i32) -> (i32, i32, i32) {
    match index {
        ROOF_CELL_CODE => (2, 3, 0),
        LEFT_WING_CELL_CODE => (-1, 1, 0),
        RIGHT_WING_CELL_CODE => (5, 1, 0),
        _ => {
            debug_assert!((0..75).contains(&index), "not a lattice code: {index}");
            (index % 5, index / 25, index % 25 / 5)
        }
    }
}

/// One node of the room graph, addressed by its slot in the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomCell {
    /// Lattice code, or one of the out-of-lattice cell codes.
    pub index: i32,
    /// One optional arena slot per axis direction; symmetric by construction.
    pub connections: [Option<usize>; 6],
    /// True while a doorway may still be carved toward that neighbor.
    pub has_opening: [bool; 6],
    pub claimed: bool,
    pub is_source: bool,
    /// Visited marker for the current reachability query; compared against the
    /// graph's monotonically increasing token so no reset pass is needed.
    scan_token: u32,
}

impl RoomCell {
    fn new(index: i32) -> Self {
        Self {
            index,
            connections: [None; 6],
            has_opening: [false; 6],
            claimed: false,
            is_source: false,
            scan_token: 0,
        }
    }

    pub fn coords(&self) -> (i32, i32, i32) {
        cell_coords(self.index)
    }

    pub fn open_toward(&self, direction: Direction) -> bool {
        self.has_opening[direction.index()]
    }
}

/// Arena-backed room graph. Owned by a single generation run and discarded
/// once decomposition has snapshotted what placement needs.
pub struct RoomGraph {
    pub cells: Vec<RoomCell>,
    lattice: [Option<usize>; 75],
    pub source: usize,
    pub roof: usize,
    pub left_wing: usize,
    pub right_wing: usize,
    /// Lower-north-west lattice corner `(x, z)` of the 2x2x2 core block.
    pub core_origin: (i32, i32),
    /// Arena slots of the whole pre-claimed core region (core block plus its
    /// +X, +Z and +Y neighbor shell), in claim order.
    pub core_cells: Vec<usize>,
    next_scan_token: u32,
}

fn populated(x: i32, y: i32, z: i32) -> bool {
    match y {
        0 | 1 => (0..LATTICE_WIDTH).contains(&x) && (0..LATTICE_DEPTH).contains(&z),
        2 => (0..TOP_FLOOR_WIDTH).contains(&x) && (0..TOP_FLOOR_DEPTH).contains(&z),
        _ => false,
    }
}

impl RoomGraph {
    /// Build the fully-linked, partially pre-claimed graph. Total over the
    /// fixed lattice size; consumes exactly two RNG draws (core position).
    pub fn build<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut graph = Self {
            cells: Vec::with_capacity(61),
            lattice: [None; 75],
            source: 0,
            roof: 0,
            left_wing: 0,
            right_wing: 0,
            core_origin: (0, 0),
            core_cells: Vec::new(),
            next_scan_token: 0,
        };

        for y in 0..LATTICE_HEIGHT {
            for z in 0..LATTICE_DEPTH {
                for x in 0..LATTICE_WIDTH {
                    if populated(x, y, z) {
                        let slot = graph.add_cell(lattice_code(x, y, z));
                        graph.lattice[lattice_code(x, y, z) as usize] = Some(slot);
                    }
                }
            }
        }

        graph.link_lattice();

        // Out-of-lattice cells, each attached by one dual-recorded edge.
        graph.roof = graph.add_cell(ROOF_CELL_CODE);
        let roof_connector = graph.lattice_cell(2, 2, 0).expect("top connector is populated");
        graph.connect(roof_connector, Direction::Up, graph.roof);

        graph.left_wing = graph.add_cell(LEFT_WING_CELL_CODE);
        let left_connector = graph.lattice_cell(0, 1, 0).expect("left connector is populated");
        graph.connect(left_connector, Direction::West, graph.left_wing);

        graph.right_wing = graph.add_cell(RIGHT_WING_CELL_CODE);
        let right_connector = graph.lattice_cell(4, 1, 0).expect("right connector is populated");
        graph.connect(right_connector, Direction::East, graph.right_wing);

        graph.source = graph.lattice_cell(2, 0, 0).expect("source cell is populated");
        graph.cells[graph.source].is_source = true;

        graph.claim_specials(rng);
        graph
    }

    fn add_cell(&mut self, index: i32) -> usize {
        self.cells.push(RoomCell::new(index));
        self.cells.len() - 1
    }

    fn link_lattice(&mut self) {
        // Walking only the positive directions installs every edge exactly once.
        for y in 0..LATTICE_HEIGHT {
            for z in 0..LATTICE_DEPTH {
                for x in 0..LATTICE_WIDTH {
                    let Some(slot) = self.lattice_cell(x, y, z) else { continue };
                    for direction in [Direction::East, Direction::Up, Direction::South] {
                        let (dx, dy, dz) = direction.step();
                        if let Some(neighbor) = self.lattice_cell(x + dx, y + dy, z + dz) {
                            self.connect(slot, direction, neighbor);
                        }
                    }
                }
            }
        }
    }

    /// Install the edge on both endpoints atomically and open it.
    fn connect(&mut self, a: usize, direction: Direction, b: usize) {
        self.cells[a].connections[direction.index()] = Some(b);
        self.cells[a].has_opening[direction.index()] = true;
        self.cells[b].connections[direction.opposite().index()] = Some(a);
        self.cells[b].has_opening[direction.opposite().index()] = true;
    }

    fn claim_specials<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.cells[self.source].claimed = true;
        self.cells[self.roof].claimed = true;
        self.cells[self.left_wing].claimed = true;
        self.cells[self.right_wing].claimed = true;

        // Core block corner: one of the four interior positions.
        let core_x = 1 + rng.next_int(2) as i32;
        let core_z = 1 + rng.next_int(2) as i32;
        self.core_origin = (core_x, core_z);

        for y in 0..=1 {
            for z in core_z..=core_z + 1 {
                for x in core_x..=core_x + 1 {
                    self.claim_core_cell(x, y, z);
                }
            }
        }
        // Neighbor shell in +X, +Z and +Y; the reserved region is shaped by a
        // dedicated piece rather than the generic decomposer.
        for y in 0..=1 {
            for z in core_z..=core_z + 1 {
                self.claim_core_cell(core_x + 2, y, z);
            }
            for x in core_x..=core_x + 1 {
                self.claim_core_cell(x, y, core_z + 2);
            }
        }
        for z in core_z..=core_z + 1 {
            for x in core_x..=core_x + 1 {
                self.claim_core_cell(x, 2, z);
            }
        }
    }

    fn claim_core_cell(&mut self, x: i32, y: i32, z: i32) {
        if let Some(slot) = self.lattice_cell(x, y, z) {
            debug_assert!(!self.cells[slot].claimed, "core region cell claimed twice");
            self.cells[slot].claimed = true;
            self.core_cells.push(slot);
        }
    }

    pub fn lattice_cell(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !populated(x, y, z) {
            return None;
        }
        self.lattice[lattice_code(x, y, z) as usize]
    }

    /// Arena slots of all currently unclaimed (ordinary) cells, in arena order.
    pub fn unclaimed_cells(&self) -> Vec<usize> {
        (0..self.cells.len()).filter(|&slot| !self.cells[slot].claimed).collect()
    }

    /// Open or close the symmetric edge leaving `slot` toward `direction`.
    pub fn set_edge_open(&mut self, slot: usize, direction: Direction, open: bool) {
        let neighbor = self.cells[slot].connections[direction.index()]
            .expect("an opening always has a recorded connection");
        self.cells[slot].has_opening[direction.index()] = open;
        self.cells[neighbor].has_opening[direction.opposite().index()] = open;
    }

    /// Depth-first reachability from `start` to the source cell, following
    /// only edges open on the traversed cell's side. Each call takes a fresh
    /// scan token, so prior queries leave no state to clear.
    pub fn reaches_source(&mut self, start: usize) -> bool {
        self.next_scan_token += 1;
        let token = self.next_scan_token;
        let mut stack = vec![start];
        self.cells[start].scan_token = token;

        while let Some(slot) = stack.pop() {
            if self.cells[slot].is_source {
                return true;
            }
            for direction in Direction::ALL {
                if !self.cells[slot].has_opening[direction.index()] {
                    continue;
                }
                let Some(neighbor) = self.cells[slot].connections[direction.index()] else {
                    continue;
                };
                if self.cells[neighbor].scan_token != token {
                    self.cells[neighbor].scan_token = token;
                    stack.push(neighbor);
                }
            }
        }
        false
    }
}
