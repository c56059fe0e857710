//! Procedural monument generation domain split into coherent submodules.

pub mod placement;

mod decompose;
mod generator;
mod graph;
mod pieces;
mod prune;
mod transform;

pub use decompose::{CellSnapshot, ShapeKind};
pub use generator::MonumentGenerator;
pub use pieces::PieceKind;
pub use placement::{PlacedMonument, PlacedPiece, fits_environment};
pub use transform::Frame;

use crate::types::{BlockPos, Mirror, Orientation};

pub fn generate_monument(
    seed: u64,
    anchor: BlockPos,
    orientation: Orientation,
    mirror: Mirror,
) -> PlacedMonument {
    MonumentGenerator::new(seed, anchor, orientation, mirror).generate()
}

#[cfg(test)]
mod tests {
    use super::{MonumentGenerator, generate_monument};
    use crate::types::{BlockPos, Mirror, Orientation};

    #[test]
    fn generate_monument_matches_monument_generator_output() {
        let seed = 123_u64;
        let anchor = BlockPos::new(-160, 39, 448);
        let orientation = Orientation::West;

        let from_helper = generate_monument(seed, anchor, orientation, Mirror::None);
        let from_generator =
            MonumentGenerator::new(seed, anchor, orientation, Mirror::None).generate();

        assert_eq!(from_helper, from_generator);
    }
}
