pub mod dungeon;
pub mod graph;
pub mod grid;
pub mod noise;
pub mod partition;
pub mod sampling;
pub mod seed;
pub mod terrain;

pub use crate::dungeon::{DungeonGenerator, DungeonParameters, TilePalette};
pub use crate::grid::{HeightGrid, Tile, TileGrid};
pub use crate::terrain::{NoiseParameters, TerrainGenerator};

use rand::Rng;

/// A point in grid space. Partition cells track their centre and bottom-left
/// corner in absolute (not cell-local) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

/// Implemented by the level generation algorithms. Generation reads the
/// current (already clamped) parameters and returns a fresh grid; it never
/// mutates generator state, so re-running is always safe.
pub trait LevelGenerator {
    type Grid;

    /// Run the full generation pipeline and return the populated grid.
    fn generate_level(&self, rng: &mut impl Rng) -> Self::Grid;

    /// Restore every user-tunable parameter to its documented default.
    fn reset_parameters(&mut self);
}

/// Clamp a parameter into `[min, max]`. Out-of-range values are silently
/// pulled to the nearest bound; callers never observe invalid state.
pub fn clamp_parameter(value: f32, min: f32, max: f32) -> f32 {
    clamp_at_most(clamp_at_least(value, min), max)
}

pub fn clamp_at_least(value: f32, min: f32) -> f32 {
    if value < min {
        min
    } else {
        value
    }
}

pub fn clamp_at_most(value: f32, max: f32) -> f32 {
    if value > max {
        max
    } else {
        value
    }
}

/// The two generation algorithms, selected by a tagged variant rather than
/// runtime subclassing.
pub enum LevelAlgorithm {
    Terrain(TerrainGenerator),
    Dungeon(DungeonGenerator),
}

/// Output of a generation run: a heightmap or a classified tile grid,
/// depending on the algorithm.
pub enum LevelGrid {
    Heights(HeightGrid),
    Tiles(TileGrid),
}

impl LevelAlgorithm {
    /// Select an algorithm by its index in the host's level-type list.
    /// Unknown indices are logged and ignored.
    pub fn from_index(index: usize) -> Option<LevelAlgorithm> {
        match index {
            0 => Some(LevelAlgorithm::Terrain(TerrainGenerator::new())),
            1 => Some(LevelAlgorithm::Dungeon(DungeonGenerator::new())),
            _ => {
                log::error!("Unknown level type index {}", index);
                None
            }
        }
    }

    pub fn generate_level(&self, rng: &mut impl Rng) -> LevelGrid {
        match self {
            LevelAlgorithm::Terrain(gen) => LevelGrid::Heights(gen.generate_level(rng)),
            LevelAlgorithm::Dungeon(gen) => LevelGrid::Tiles(gen.generate_level(rng)),
        }
    }

    pub fn reset_parameters(&mut self) {
        match self {
            LevelAlgorithm::Terrain(gen) => gen.reset_parameters(),
            LevelAlgorithm::Dungeon(gen) => gen.reset_parameters(),
        }
    }

    /// Re-encode the current parameters into the generator's seed string.
    pub fn update_seed(&mut self) -> &str {
        match self {
            LevelAlgorithm::Terrain(gen) => gen.update_seed(),
            LevelAlgorithm::Dungeon(gen) => gen.update_seed(),
        }
    }

    /// Apply a seed string to the generator's parameters. Returns whether
    /// the seed was accepted; malformed seeds are rejected without mutating
    /// anything.
    pub fn apply_seed(&mut self, seed: &str) -> bool {
        match self {
            LevelAlgorithm::Terrain(gen) => gen.apply_seed(seed),
            LevelAlgorithm::Dungeon(gen) => gen.apply_seed(seed),
        }
    }
}
