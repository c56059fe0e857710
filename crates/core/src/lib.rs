pub mod monument;
pub mod rng;
pub mod types;
pub mod world;

pub use monument::{
    MonumentGenerator, PieceKind, PlacedMonument, PlacedPiece, ShapeKind, fits_environment,
    generate_monument,
};
pub use rng::{ChaChaRandom, RandomSource};
pub use types::*;
pub use world::{Biome, HeightmapKind, MemoryWorld, VoxelStore};
