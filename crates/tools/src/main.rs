use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use monument_core::{
    BlockPos, MemoryWorld, Mirror, Orientation, PieceKind, PlacedMonument, ShapeKind,
    fits_environment, generate_monument,
};

/// Generate one monument, paint it into a flat test ocean, and report what
/// came out. Optionally persist the placement record and verify the reload.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Anchor corner, world coordinates
    #[arg(long, default_value_t = 0)]
    x: i32,
    #[arg(long, default_value_t = 40)]
    y: i32,
    #[arg(long, default_value_t = 0)]
    z: i32,
    /// Facing: north, east, south or west
    #[arg(short, long, default_value = "north")]
    orientation: String,
    #[arg(short, long)]
    mirror: bool,
    /// Sea level of the test ocean
    #[arg(long, default_value_t = 90)]
    sea_level: i32,
    /// Seafloor level of the test ocean
    #[arg(long, default_value_t = 10)]
    floor_level: i32,
    /// Write the placement record here as JSON and verify it reloads
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_orientation(value: &str) -> Result<Orientation> {
    Ok(match value.to_ascii_lowercase().as_str() {
        "north" => Orientation::North,
        "east" => Orientation::East,
        "south" => Orientation::South,
        "west" => Orientation::West,
        other => bail!("unknown orientation {other:?}, expected north/east/south/west"),
    })
}

fn plan_glyph(kind: PieceKind) -> char {
    match kind {
        PieceKind::Entry => 'E',
        PieceKind::Core => 'C',
        PieceKind::Roof => 'R',
        PieceKind::LeftWing | PieceKind::RightWing => 'W',
        PieceKind::Room(ShapeKind::DoubleXy) => 'X',
        PieceKind::Room(ShapeKind::DoubleZy) => 'Z',
        PieceKind::Room(ShapeKind::DoubleY) => 'Y',
        PieceKind::Room(ShapeKind::DoubleX) => 'x',
        PieceKind::Room(ShapeKind::DoubleZ) => 'z',
        PieceKind::Room(ShapeKind::SimpleTop) => 'T',
        PieceKind::Room(ShapeKind::Simple) => '.',
    }
}

/// One character per lattice cell, one grid per level, north at the top.
fn print_level_plans(monument: &PlacedMonument) {
    let mut occupied: BTreeMap<(i32, i32, i32), char> = BTreeMap::new();
    for piece in &monument.pieces {
        for cell in &piece.cells {
            occupied.insert((cell.x, cell.y, cell.z), plan_glyph(piece.kind));
        }
    }

    for y in (0..=3).rev() {
        println!("Level {y}:");
        for z in 0..5 {
            let row: String =
                (-1..=5).map(|x| occupied.get(&(x, y, z)).copied().unwrap_or(' ')).collect();
            println!("  {row}");
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let orientation = parse_orientation(&args.orientation)?;
    let mirror = if args.mirror { Mirror::LeftRight } else { Mirror::None };
    let anchor = BlockPos::new(args.x, args.y, args.z);

    let mut world = MemoryWorld::deep_ocean(args.sea_level, args.floor_level);
    if !fits_environment(&world, anchor) {
        bail!(
            "anchor {anchor:?} does not sit on a deep ocean floor (sea {}, floor {})",
            args.sea_level,
            args.floor_level
        );
    }

    let mut monument = generate_monument(args.seed, anchor, orientation, mirror);

    let region = monument.bounds().expanded(2);
    monument.paint_region(&mut world, region);

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for piece in &monument.pieces {
        *counts.entry(format!("{:?}", piece.kind)).or_default() += 1;
    }

    println!("Seed: {}", args.seed);
    println!("Pieces: {}", monument.pieces.len());
    for (kind, count) in &counts {
        println!("  {kind}: {count}");
    }
    print_level_plans(&monument);
    let bounds = monument.bounds();
    println!("Bounds: {:?} .. {:?}", bounds.min, bounds.max);
    println!("Blocks written: {}", world.written_blocks().len());
    println!("Sentinel spawned: {}", monument.sentinel_spawned);
    println!("Fingerprint: {:016x}", monument.fingerprint());

    if let Some(path) = &args.out {
        monument.save_to_file(path).with_context(|| format!("writing {}", path.display()))?;
        let reloaded = PlacedMonument::load_from_file(path)
            .with_context(|| format!("reloading {}", path.display()))?;
        if reloaded.fingerprint() != monument.fingerprint() {
            bail!("reloaded record does not match the generated one");
        }
        println!("Saved and verified: {}", path.display());
    }

    Ok(())
}
