//! Region-clipped voxel painting for every piece shape.
//!
//! All routines work in structure-local coordinates; `PaintContext` applies
//! the placement frame and drops writes outside the realizable region, which
//! is what makes deferred region-by-region replay possible.

use serde::{Deserialize, Serialize};

use crate::types::{Block, BlockPos, BoundingBox, Direction};
use crate::world::{BLOCK_UPDATE_FLAGS, VoxelStore};

use super::decompose::{CellSnapshot, ShapeKind};
use super::transform::{CELL_SIZE, Frame, LEVEL_HEIGHT, cell_local_origin};

/// Every piece the placement phase knows how to paint: the generic decomposed
/// room shapes plus the dedicated pieces for the pre-claimed special cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Entry,
    Core,
    Roof,
    LeftWing,
    RightWing,
    Room(ShapeKind),
}

/// Writer that maps local coordinates through the frame and clips to the
/// caller-supplied realizable region. Positions outside the region are
/// silently skipped; the same piece is replayed later for other regions.
pub struct PaintContext<'a, W: VoxelStore + ?Sized> {
    world: &'a mut W,
    frame: Frame,
    region: BoundingBox,
}

impl<'a, W: VoxelStore + ?Sized> PaintContext<'a, W> {
    pub fn new(world: &'a mut W, frame: Frame, region: BoundingBox) -> Self {
        Self { world, frame, region }
    }

    fn place(&mut self, local: BlockPos, block: Block) {
        let pos = self.frame.world_pos(local);
        if self.region.contains(pos) {
            self.world.set_block(pos, block, BLOCK_UPDATE_FLAGS);
        }
    }

    /// Conditional write: only replaces the sacrificial filler `only`,
    /// leaving anything else (terrain, earlier structure) untouched.
    fn place_if(&mut self, local: BlockPos, block: Block, only: Block) {
        let pos = self.frame.world_pos(local);
        if self.region.contains(pos) && self.world.get_block(pos) == only {
            self.world.set_block(pos, block, BLOCK_UPDATE_FLAGS);
        }
    }

    pub fn fill_box(&mut self, a: BlockPos, b: BlockPos, block: Block) {
        let bb = BoundingBox::from_corners(a, b);
        for y in bb.min.y..=bb.max.y {
            for z in bb.min.z..=bb.max.z {
                for x in bb.min.x..=bb.max.x {
                    self.place(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    pub fn fill_box_if(&mut self, a: BlockPos, b: BlockPos, block: Block, only: Block) {
        let bb = BoundingBox::from_corners(a, b);
        for y in bb.min.y..=bb.max.y {
            for z in bb.min.z..=bb.max.z {
                for x in bb.min.x..=bb.max.x {
                    self.place_if(BlockPos::new(x, y, z), block, only);
                }
            }
        }
    }
}

/// Paint one piece. Fixed write order per kind keeps repeated painting
/// byte-identical and therefore idempotent.
pub fn paint_piece<W: VoxelStore + ?Sized>(
    ctx: &mut PaintContext<'_, W>,
    kind: PieceKind,
    cells: &[CellSnapshot],
    facing: Direction,
    decor: u8,
) {
    match kind {
        PieceKind::Room(shape) => paint_room(ctx, shape, cells, facing, decor),
        PieceKind::Entry => paint_entry(ctx, &cells[0]),
        PieceKind::Core => paint_core(ctx, cells),
        PieceKind::Roof => paint_roof(ctx, &cells[0]),
        PieceKind::LeftWing => paint_wing(ctx, &cells[0]),
        PieceKind::RightWing => paint_wing(ctx, &cells[0]),
    }
}

fn contains_cell(cells: &[CellSnapshot], x: i32, y: i32, z: i32) -> bool {
    cells.iter().any(|cell| (cell.x, cell.y, cell.z) == (x, y, z))
}

/// A face is internal when the neighboring cell in that direction belongs to
/// the same piece; internal faces become open passages instead of walls.
fn internal_face(cells: &[CellSnapshot], cell: &CellSnapshot, direction: Direction) -> bool {
    let (dx, dy, dz) = direction.step();
    contains_cell(cells, cell.x + dx, cell.y + dy, cell.z + dz)
}

fn wall_plane(origin: BlockPos, direction: Direction) -> (BlockPos, BlockPos) {
    let top = origin.plus(CELL_SIZE - 1, LEVEL_HEIGHT - 1, CELL_SIZE - 1);
    match direction {
        Direction::West => (origin, BlockPos::new(origin.x, top.y, top.z)),
        Direction::East => (BlockPos::new(top.x, origin.y, origin.z), top),
        Direction::North => (origin, BlockPos::new(top.x, top.y, origin.z)),
        Direction::South => (BlockPos::new(origin.x, origin.y, top.z), top),
        Direction::Down | Direction::Up => panic!("wall planes are horizontal faces only"),
    }
}

/// The 2-voxel-wide doorway slot centered on a wall face.
fn door_slot(origin: BlockPos, direction: Direction) -> (BlockPos, BlockPos) {
    let (min, _) = wall_plane(origin, direction);
    match direction {
        Direction::West | Direction::East => {
            (min.plus(0, 1, 3), min.plus(0, 2, 4))
        }
        Direction::North | Direction::South => {
            (min.plus(3, 1, 0), min.plus(4, 2, 0))
        }
        Direction::Down | Direction::Up => panic!("door slots are horizontal faces only"),
    }
}

/// Shell of a single 8x8x4 cell: interior flood, floor, ceiling, four walls,
/// with doorways carved or decorated walls painted from the opening flags.
fn paint_cell_shell<W: VoxelStore + ?Sized>(
    ctx: &mut PaintContext<'_, W>,
    piece_cells: &[CellSnapshot],
    cell: &CellSnapshot,
    material: Block,
) {
    let o = cell_local_origin(cell.x, cell.y, cell.z);
    let top = o.plus(CELL_SIZE - 1, LEVEL_HEIGHT - 1, CELL_SIZE - 1);

    ctx.fill_box(o.plus(1, 1, 1), top.plus(-1, -1, -1), Block::Water);

    // Floor and ceiling; internal horizontal partitions of a two-story piece
    // collapse to a ring beam, vertical openings get a 2x2 hatch.
    for (vertical, plane_y) in [(Direction::Down, o.y), (Direction::Up, top.y)] {
        let plane_min = BlockPos::new(o.x, plane_y, o.z);
        let plane_max = BlockPos::new(top.x, plane_y, top.z);
        ctx.fill_box(plane_min, plane_max, material);
        if internal_face(piece_cells, cell, vertical) {
            ctx.fill_box(plane_min.plus(1, 0, 1), plane_max.plus(-1, 0, -1), Block::Water);
        } else if cell.open_toward(vertical) {
            ctx.fill_box(
                BlockPos::new(o.x + 3, plane_y, o.z + 3),
                BlockPos::new(o.x + 4, plane_y, o.z + 4),
                Block::Water,
            );
        }
    }

    for direction in Direction::HORIZONTAL {
        let (wall_min, wall_max) = wall_plane(o, direction);
        ctx.fill_box(wall_min, wall_max, material);

        if internal_face(piece_cells, cell, direction) {
            // Shared plane inside a composite room: open passage framed by
            // the floor row, the ceiling row, and the corner columns.
            ctx.fill_box(
                passage_min(wall_min, direction),
                passage_max(wall_max, direction),
                Block::Water,
            );
        } else if cell.open_toward(direction) {
            let (slot_min, slot_max) = door_slot(o, direction);
            ctx.fill_box(slot_min, slot_max, Block::Water);
        } else {
            // Solid wall: decorated panel where the doorway would have been.
            let (slot_min, slot_max) = door_slot(o, direction);
            ctx.fill_box(slot_min, slot_max, Block::CarvedAshlar);
        }
    }
}

fn passage_min(wall_min: BlockPos, direction: Direction) -> BlockPos {
    match direction {
        Direction::West | Direction::East => wall_min.plus(0, 1, 1),
        _ => wall_min.plus(1, 1, 0),
    }
}

fn passage_max(wall_max: BlockPos, direction: Direction) -> BlockPos {
    match direction {
        Direction::West | Direction::East => wall_max.plus(0, -1, -1),
        _ => wall_max.plus(-1, -1, 0),
    }
}

/// Local bounding corners of a run of cells (painting tolerance excluded).
pub fn cells_extent(cells: &[CellSnapshot]) -> (BlockPos, BlockPos) {
    let mut min = cell_local_origin(cells[0].x, cells[0].y, cells[0].z);
    let mut max = min.plus(CELL_SIZE - 1, LEVEL_HEIGHT - 1, CELL_SIZE - 1);
    for cell in &cells[1..] {
        let o = cell_local_origin(cell.x, cell.y, cell.z);
        let t = o.plus(CELL_SIZE - 1, LEVEL_HEIGHT - 1, CELL_SIZE - 1);
        min = BlockPos::new(min.x.min(o.x), min.y.min(o.y), min.z.min(o.z));
        max = BlockPos::new(max.x.max(t.x), max.y.max(t.y), max.z.max(t.z));
    }
    (min, max)
}

fn paint_room<W: VoxelStore + ?Sized>(
    ctx: &mut PaintContext<'_, W>,
    shape: ShapeKind,
    cells: &[CellSnapshot],
    facing: Direction,
    decor: u8,
) {
    for cell in cells {
        paint_cell_shell(ctx, cells, cell, Block::Ashlar);
    }

    let (min, max) = cells_extent(cells);
    let center = BlockPos::new((min.x + max.x) / 2, 0, (min.z + max.z) / 2);

    match shape {
        ShapeKind::Simple => match decor {
            0 => ctx.fill_box(
                BlockPos::new(center.x, max.y, center.z),
                BlockPos::new(center.x + 1, max.y, center.z + 1),
                Block::Lantern,
            ),
            1 => ctx.fill_box(
                BlockPos::new(center.x, min.y, center.z),
                BlockPos::new(center.x + 1, min.y, center.z + 1),
                Block::CarvedAshlar,
            ),
            2 => {
                // Carved band just inside the facing wall.
                let anchor = &cells[0];
                let o = cell_local_origin(anchor.x, anchor.y, anchor.z);
                let (slot_min, slot_max) = door_slot(o, facing);
                let (dx, _, dz) = facing.opposite().step();
                ctx.fill_box(
                    slot_min.plus(dx, 1, dz),
                    slot_max.plus(dx, 1, dz),
                    Block::CarvedAshlar,
                );
            }
            _ => {}
        },
        ShapeKind::SimpleTop => {
            ctx.fill_box(
                BlockPos::new(center.x, max.y, center.z),
                BlockPos::new(center.x + 1, max.y, center.z + 1),
                Block::Lantern,
            );
        }
        ShapeKind::DoubleY | ShapeKind::DoubleXy | ShapeKind::DoubleZy => {
            // Full-height central pillar anchoring the tall interior.
            ctx.fill_box(
                BlockPos::new(center.x, min.y + 1, center.z),
                BlockPos::new(center.x + 1, max.y - 1, center.z + 1),
                Block::CarvedAshlar,
            );
        }
        ShapeKind::DoubleX | ShapeKind::DoubleZ => {
            if decor == 0 {
                ctx.fill_box(
                    BlockPos::new(center.x, max.y, center.z),
                    BlockPos::new(center.x + 1, max.y, center.z + 1),
                    Block::Lantern,
                );
            }
        }
    }
}

/// Entry hall at the source cell: ordinary shell plus a widened gate on the
/// north face that is always open, with a cleared approach one voxel out.
fn paint_entry<W: VoxelStore + ?Sized>(ctx: &mut PaintContext<'_, W>, cell: &CellSnapshot) {
    let single = std::slice::from_ref(cell);
    paint_cell_shell(ctx, single, cell, Block::Ashlar);

    let o = cell_local_origin(cell.x, cell.y, cell.z);
    ctx.fill_box(o.plus(2, 1, 0), o.plus(5, 3, 0), Block::Water);
    ctx.fill_box(o.plus(1, 1, 0), o.plus(1, 3, 0), Block::CarvedAshlar);
    ctx.fill_box(o.plus(6, 1, 0), o.plus(6, 3, 0), Block::CarvedAshlar);
    // Clear sediment in front of the gate without touching solid terrain.
    ctx.fill_box_if(o.plus(2, 1, -1), o.plus(5, 3, -1), Block::Water, Block::Seafloor);
}

/// Treasure hall covering the whole reserved core region, painted in the
/// dark palette with a lantern pillar at its heart.
fn paint_core<W: VoxelStore + ?Sized>(ctx: &mut PaintContext<'_, W>, cells: &[CellSnapshot]) {
    for cell in cells {
        paint_cell_shell(ctx, cells, cell, Block::DarkAshlar);
    }

    let (min, max) = cells_extent(cells);
    let center = BlockPos::new((min.x + max.x) / 2, 0, (min.z + max.z) / 2);
    ctx.fill_box(
        BlockPos::new(center.x, min.y + 1, center.z),
        BlockPos::new(center.x + 1, max.y - 1, center.z + 1),
        Block::Lantern,
    );
}

/// Solid cap over the top connector with a small hollow and a hatch down.
fn paint_roof<W: VoxelStore + ?Sized>(ctx: &mut PaintContext<'_, W>, cell: &CellSnapshot) {
    let o = cell_local_origin(cell.x, cell.y, cell.z);
    let top = o.plus(CELL_SIZE - 1, LEVEL_HEIGHT - 1, CELL_SIZE - 1);

    ctx.fill_box(o, top, Block::Ashlar);
    ctx.fill_box(o.plus(2, 0, 2), top.plus(-2, -1, -2), Block::Water);
    if cell.open_toward(Direction::Down) {
        ctx.fill_box(o.plus(3, 0, 3), BlockPos::new(o.x + 4, o.y, o.z + 4), Block::Water);
    }
    ctx.fill_box(
        BlockPos::new(o.x + 3, top.y, o.z + 3),
        BlockPos::new(o.x + 4, top.y, o.z + 4),
        Block::CarvedAshlar,
    );
}

/// Open pavilion outside the lattice: platform, corner columns, roof slab.
/// The doorway into the building proper is carved by the connector cell's
/// own wall, driven by its opening flag.
fn paint_wing<W: VoxelStore + ?Sized>(ctx: &mut PaintContext<'_, W>, cell: &CellSnapshot) {
    let o = cell_local_origin(cell.x, cell.y, cell.z);
    let top = o.plus(CELL_SIZE - 1, LEVEL_HEIGHT - 1, CELL_SIZE - 1);

    ctx.fill_box(o, BlockPos::new(top.x, o.y, top.z), Block::Ashlar);
    ctx.fill_box_if(o.plus(0, 1, 0), top, Block::Water, Block::Seafloor);
    for (cx, cz) in [(o.x, o.z), (o.x, top.z), (top.x, o.z), (top.x, top.z)] {
        ctx.fill_box(
            BlockPos::new(cx, o.y + 1, cz),
            BlockPos::new(cx, top.y - 1, cz),
            Block::Ashlar,
        );
    }
    ctx.fill_box(BlockPos::new(o.x, top.y, o.z), top, Block::Ashlar);
    ctx.fill_box(
        BlockPos::new(o.x + 3, top.y, o.z + 3),
        BlockPos::new(o.x + 4, top.y, o.z + 4),
        Block::Lantern,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mirror, Orientation};
    use crate::world::MemoryWorld;

    fn huge_region() -> BoundingBox {
        BoundingBox::from_corners(
            BlockPos::new(-1000, -1000, -1000),
            BlockPos::new(1000, 1000, 1000),
        )
    }

    fn snapshot(x: i32, y: i32, z: i32, open: [bool; 6]) -> CellSnapshot {
        CellSnapshot { index: y * 25 + z * 5 + x, x, y, z, open }
    }

    #[test]
    fn closed_cell_shell_has_no_water_gap_in_its_walls() {
        let mut world = MemoryWorld::deep_ocean(100, -10);
        let frame = Frame::new(BlockPos::new(0, 0, 0), Orientation::North, Mirror::None);
        let cell = snapshot(0, 0, 0, [false; 6]);
        let mut ctx = PaintContext::new(&mut world, frame, huge_region());
        paint_cell_shell(&mut ctx, std::slice::from_ref(&cell), &cell, Block::Ashlar);

        // West wall plane: everything solid (wall or carved panel).
        for y in 0..4 {
            for z in 0..8 {
                let block = world.get_block(BlockPos::new(0, y, z));
                assert!(
                    block == Block::Ashlar || block == Block::CarvedAshlar,
                    "unexpected {block:?} at z={z} y={y}"
                );
            }
        }
    }

    #[test]
    fn open_face_carves_a_two_voxel_doorway() {
        let mut world = MemoryWorld::deep_ocean(100, -10);
        let frame = Frame::new(BlockPos::new(0, 0, 0), Orientation::North, Mirror::None);
        let mut open = [false; 6];
        open[Direction::East.index()] = true;
        let cell = snapshot(0, 0, 0, open);
        let mut ctx = PaintContext::new(&mut world, frame, huge_region());
        paint_cell_shell(&mut ctx, std::slice::from_ref(&cell), &cell, Block::Ashlar);

        for (y, z) in [(1, 3), (1, 4), (2, 3), (2, 4)] {
            assert_eq!(world.get_block(BlockPos::new(7, y, z)), Block::Water);
        }
        assert_eq!(world.get_block(BlockPos::new(7, 1, 2)), Block::Ashlar);
    }

    #[test]
    fn region_clipping_drops_out_of_range_writes() {
        let mut world = MemoryWorld::deep_ocean(100, -10);
        let frame = Frame::new(BlockPos::new(0, 0, 0), Orientation::North, Mirror::None);
        let region =
            BoundingBox::from_corners(BlockPos::new(0, 0, 0), BlockPos::new(3, 3, 3));
        let cell = snapshot(0, 0, 0, [false; 6]);
        let mut ctx = PaintContext::new(&mut world, frame, region);
        paint_cell_shell(&mut ctx, std::slice::from_ref(&cell), &cell, Block::Ashlar);

        for (&pos, _) in world.written_blocks() {
            assert!(region.contains(pos), "write escaped the realizable region: {pos:?}");
        }
        assert!(!world.written_blocks().is_empty());
    }

    #[test]
    fn conditional_fill_replaces_only_the_filler() {
        let mut world = MemoryWorld::deep_ocean(100, -10);
        world.set_block(BlockPos::new(0, 0, 0), Block::Seafloor, BLOCK_UPDATE_FLAGS);
        world.set_block(BlockPos::new(1, 0, 0), Block::Ashlar, BLOCK_UPDATE_FLAGS);
        let frame = Frame::new(BlockPos::new(0, 0, 0), Orientation::North, Mirror::None);
        let mut ctx = PaintContext::new(&mut world, frame, huge_region());
        ctx.fill_box_if(
            BlockPos::new(0, 0, 0),
            BlockPos::new(1, 0, 0),
            Block::Water,
            Block::Seafloor,
        );

        assert_eq!(world.get_block(BlockPos::new(0, 0, 0)), Block::Water);
        assert_eq!(world.get_block(BlockPos::new(1, 0, 0)), Block::Ashlar);
    }
}
