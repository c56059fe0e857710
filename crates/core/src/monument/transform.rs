//! Lattice-to-world coordinate mapping under orientation and mirror.

use serde::{Deserialize, Serialize};

use crate::types::{BlockPos, BoundingBox, Direction, Mirror, Orientation};

/// Voxels per lattice cell along X and Z.
pub const CELL_SIZE: i32 = 8;
/// Voxels per lattice level along Y.
pub const LEVEL_HEIGHT: i32 = 4;

/// Local voxel origin of a lattice cell (its west/down/north corner).
pub fn cell_local_origin(x: i32, y: i32, z: i32) -> BlockPos {
    BlockPos::new(x * CELL_SIZE, y * LEVEL_HEIGHT, z * CELL_SIZE)
}

/// Placement frame of one structure instance: mirror first, then one of the
/// four quarter-turn rotations, then translation to the world anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub anchor: BlockPos,
    pub orientation: Orientation,
    pub mirror: Mirror,
}

impl Frame {
    pub fn new(anchor: BlockPos, orientation: Orientation, mirror: Mirror) -> Self {
        Self { anchor, orientation, mirror }
    }

    pub fn world_pos(&self, local: BlockPos) -> BlockPos {
        let x = match self.mirror {
            Mirror::None => local.x,
            Mirror::LeftRight => -local.x,
        };
        let (wx, wz) = match self.orientation {
            Orientation::North => (x, local.z),
            Orientation::East => (-local.z, x),
            Orientation::South => (-x, -local.z),
            Orientation::West => (local.z, -x),
        };
        BlockPos::new(self.anchor.x + wx, self.anchor.y + local.y, self.anchor.z + wz)
    }

    /// World-space box covering the local box `a..=b`, normalized after the
    /// rotation possibly swaps corners.
    pub fn world_box(&self, a: BlockPos, b: BlockPos) -> BoundingBox {
        BoundingBox::from_corners(self.world_pos(a), self.world_pos(b))
    }

    pub fn world_direction(&self, direction: Direction) -> Direction {
        direction.mirrored(self.mirror).rotated(self.orientation)
    }
}
