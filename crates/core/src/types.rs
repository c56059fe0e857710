//! Shared spatial primitives: positions, directions, orientation, blocks, boxes.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, direction: Direction) -> Self {
        self.offset_by(direction, 1)
    }

    pub fn offset_by(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy, dz) = direction.step();
        Self { x: self.x + dx * distance, y: self.y + dy * distance, z: self.z + dz * distance }
    }

    pub fn plus(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, z: self.z + dz }
    }
}

/// Six axis directions. `North` is -Z, `South` is +Z, `West` is -X, `East` is +X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    West,
    East,
    Down,
    Up,
    North,
    South,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::West,
        Direction::East,
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
    ];

    /// The four horizontal directions in clockwise rotation order.
    pub const HORIZONTAL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub const fn index(self) -> usize {
        match self {
            Direction::West => 0,
            Direction::East => 1,
            Direction::Down => 2,
            Direction::Up => 3,
            Direction::North => 4,
            Direction::South => 5,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }

    pub const fn step(self) -> (i32, i32, i32) {
        match self {
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
        }
    }

    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Direction::Up | Direction::Down)
    }

    /// Rotate a horizontal direction by the structure orientation.
    /// Vertical directions are unaffected by rotation and pass through.
    pub fn rotated(self, orientation: Orientation) -> Direction {
        if !self.is_horizontal() {
            return self;
        }
        let position = Direction::HORIZONTAL
            .iter()
            .position(|&d| d == self)
            .expect("horizontal direction is in the rotation ring");
        Direction::HORIZONTAL[(position + orientation.quarter_turns()) % 4]
    }

    pub fn mirrored(self, mirror: Mirror) -> Direction {
        match (mirror, self) {
            (Mirror::LeftRight, Direction::West) => Direction::East,
            (Mirror::LeftRight, Direction::East) => Direction::West,
            _ => self,
        }
    }
}

/// Structure facing; one of the four cardinal directions. `North` is the
/// identity placement, each step rotates the local frame a quarter turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] =
        [Orientation::North, Orientation::East, Orientation::South, Orientation::West];

    pub const fn quarter_turns(self) -> usize {
        match self {
            Orientation::North => 0,
            Orientation::East => 1,
            Orientation::South => 2,
            Orientation::West => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mirror {
    None,
    LeftRight,
}

/// The block palette the generator reads and writes. `Water` doubles as the
/// sacrificial filler material that conditional fills are allowed to replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Block {
    Air,
    Water,
    Seafloor,
    Ashlar,
    CarvedAshlar,
    DarkAshlar,
    Lantern,
}

impl Block {
    pub const fn code(self) -> u8 {
        match self {
            Block::Air => 0,
            Block::Water => 1,
            Block::Seafloor => 2,
            Block::Ashlar => 3,
            Block::CarvedAshlar => 4,
            Block::DarkAshlar => 5,
            Block::Lantern => 6,
        }
    }
}

/// Inclusive axis-aligned box in world or local voxel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BoundingBox {
    /// Build a box from two arbitrary corners, normalizing min/max per axis.
    pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Grow the box to cover `other` as well.
    pub fn encompass(&mut self, other: &BoundingBox) {
        self.min = BlockPos::new(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.min.z.min(other.min.z),
        );
        self.max = BlockPos::new(
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
            self.max.z.max(other.max.z),
        );
    }

    pub fn expanded(&self, margin: i32) -> Self {
        Self {
            min: self.min.plus(-margin, -margin, -margin),
            max: self.max.plus(margin, margin, margin),
        }
    }

    pub fn center(&self) -> BlockPos {
        BlockPos::new(
            (self.min.x + self.max.x) / 2,
            (self.min.y + self.max.y) / 2,
            (self.min.z + self.max.z) / 2,
        )
    }
}
