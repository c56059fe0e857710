//! Placed-structure record: the serialized piece list, re-entrant painting,
//! and the collision surface used by the region-realization driver.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{BlockPos, BoundingBox, Direction, Mirror, Orientation};
use crate::world::{Biome, HeightmapKind, VoxelStore};

use super::decompose::CellSnapshot;
use super::pieces::{PaintContext, PieceKind, cells_extent, paint_piece};
use super::transform::Frame;

/// One placed piece: everything painting needs, snapshotted so the room graph
/// can be discarded, plus the world-space box collision queries run against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub kind: PieceKind,
    pub cells: Vec<CellSnapshot>,
    pub facing: Direction,
    /// Decoration variant drawn from the run RNG at generation time, so
    /// painting itself stays a pure function of this record.
    pub decor: u8,
    pub bounds: BoundingBox,
}

impl PlacedPiece {
    pub fn new(frame: &Frame, kind: PieceKind, cells: Vec<CellSnapshot>, facing: Direction) -> Self {
        let (local_min, local_max) = cells_extent(&cells);
        let bounds = frame.world_box(local_min, local_max);
        Self { kind, cells, facing, decor: 0, bounds }
    }
}

/// Persisted placement record of one monument instance. Round-trips through
/// serde; reloading yields an object that paints identically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedMonument {
    pub anchor: BlockPos,
    pub orientation: Orientation,
    pub mirror: Mirror,
    pub pieces: Vec<PlacedPiece>,
    /// Set the first time the core treasure hall is painted; the spawn of the
    /// hall's guardian happens at most once per structure.
    pub sentinel_spawned: bool,
}

impl PlacedMonument {
    pub fn frame(&self) -> Frame {
        Frame::new(self.anchor, self.orientation, self.mirror)
    }

    /// Union of all piece boxes.
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = self.pieces[0].bounds;
        for piece in &self.pieces[1..] {
            bounds.encompass(&piece.bounds);
        }
        bounds
    }

    /// Whether any placed piece intersects the candidate box.
    pub fn collides_with(&self, candidate: &BoundingBox) -> bool {
        self.pieces.iter().any(|piece| piece.bounds.intersects(candidate))
    }

    /// Paint every piece that intersects `region`, clipping each write to the
    /// region. Pieces wholly outside are skipped and replayed when a later
    /// call covers them; repainting an already-painted region is a no-op.
    pub fn paint_region<W: VoxelStore + ?Sized>(&mut self, world: &mut W, region: BoundingBox) {
        let frame = self.frame();
        for piece in &self.pieces {
            // Tolerate the one-voxel shared-wall overhang when clipping.
            if !piece.bounds.expanded(1).intersects(&region) {
                continue;
            }
            let mut ctx = PaintContext::new(world, frame, region);
            paint_piece(&mut ctx, piece.kind, &piece.cells, piece.facing, piece.decor);

            if piece.kind == PieceKind::Core
                && !self.sentinel_spawned
                && region.contains(piece.bounds.center())
            {
                self.sentinel_spawned = true;
            }
        }
    }

    /// Stable byte encoding of everything that defines this structure.
    /// Fingerprints of two runs agree iff the runs generated identically.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for v in [self.anchor.x, self.anchor.y, self.anchor.z] {
            bytes.extend(v.to_le_bytes());
        }
        bytes.push(self.orientation.quarter_turns() as u8);
        bytes.push(matches!(self.mirror, Mirror::LeftRight) as u8);
        bytes.push(self.sentinel_spawned as u8);

        bytes.extend((self.pieces.len() as u32).to_le_bytes());
        for piece in &self.pieces {
            bytes.extend(kind_code(piece.kind).to_le_bytes());
            bytes.push(piece.facing.index() as u8);
            bytes.push(piece.decor);
            for corner in [piece.bounds.min, piece.bounds.max] {
                for v in [corner.x, corner.y, corner.z] {
                    bytes.extend(v.to_le_bytes());
                }
            }
            bytes.extend((piece.cells.len() as u32).to_le_bytes());
            for cell in &piece.cells {
                bytes.extend(cell.index.to_le_bytes());
                for open in cell.open {
                    bytes.push(open as u8);
                }
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn save_to_file(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn load_from_file(path: &Path) -> io::Result<PlacedMonument> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(io::Error::other)
    }
}

fn kind_code(kind: PieceKind) -> u16 {
    use super::decompose::ShapeKind;
    match kind {
        PieceKind::Entry => 0,
        PieceKind::Core => 1,
        PieceKind::Roof => 2,
        PieceKind::LeftWing => 3,
        PieceKind::RightWing => 4,
        PieceKind::Room(ShapeKind::DoubleXy) => 10,
        PieceKind::Room(ShapeKind::DoubleZy) => 11,
        PieceKind::Room(ShapeKind::DoubleY) => 12,
        PieceKind::Room(ShapeKind::DoubleX) => 13,
        PieceKind::Room(ShapeKind::DoubleZ) => 14,
        PieceKind::Room(ShapeKind::SimpleTop) => 15,
        PieceKind::Room(ShapeKind::Simple) => 16,
    }
}

/// Environment pre-check the placement driver runs before committing an
/// anchor: deep ocean, with the anchor resting on the ocean floor.
pub fn fits_environment<W: VoxelStore + ?Sized>(world: &W, anchor: BlockPos) -> bool {
    world.get_biome(anchor) == Biome::DeepOcean
        && anchor.y >= world.surface_height(anchor.x, anchor.z, HeightmapKind::OceanFloor)
        && anchor.y < world.surface_height(anchor.x, anchor.z, HeightmapKind::WorldSurface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monument::generate_monument;
    use crate::world::MemoryWorld;

    #[test]
    fn each_piece_paints_only_inside_its_own_box() {
        let huge = BoundingBox::from_corners(
            BlockPos::new(-10_000, -10_000, -10_000),
            BlockPos::new(10_000, 10_000, 10_000),
        );
        for (seed, orientation) in [(4_040_u64, Orientation::North), (77, Orientation::East)] {
            let monument =
                generate_monument(seed, BlockPos::new(0, 40, 0), orientation, Mirror::None);
            let frame = monument.frame();

            for piece in &monument.pieces {
                let mut world = MemoryWorld::deep_ocean(90, 10);
                let mut ctx = PaintContext::new(&mut world, frame, huge);
                paint_piece(&mut ctx, piece.kind, &piece.cells, piece.facing, piece.decor);

                let allowed = piece.bounds.expanded(1);
                for pos in world.written_blocks().keys() {
                    assert!(
                        allowed.contains(*pos),
                        "seed {seed}: {:?} wrote at {pos:?} outside {allowed:?}",
                        piece.kind
                    );
                }
            }
        }
    }

    #[test]
    fn environment_check_wants_a_deep_ocean_floor_anchor() {
        let deep = MemoryWorld::deep_ocean(60, 20);
        assert!(fits_environment(&deep, BlockPos::new(0, 21, 0)));
        assert!(!fits_environment(&deep, BlockPos::new(0, 10, 0)));
        assert!(!fits_environment(&deep, BlockPos::new(0, 61, 0)));

        let shallow = MemoryWorld::deep_ocean(30, 20);
        assert!(!fits_environment(&shallow, BlockPos::new(0, 21, 0)));
    }
}
