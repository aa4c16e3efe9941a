//! BSP dungeon generation: clamped user parameters, the four-phase pipeline
//! (cells, rooms, corridors, walls) over a fresh classification grid, and
//! the tile-asset validation surface the external renderer checks before
//! spawning anything.

use crate::grid::{Tile, TileGrid};
use crate::partition::PartitionTree;
use crate::seed::{GeneratorSeed, SeedVariables};
use crate::{clamp_parameter, LevelGenerator};

use rand::Rng;
use serde::{Deserialize, Serialize};

// Defaults.
const DEFAULT_DUNGEON_SIZE_XZ: f32 = 20.0;
const DEFAULT_DUNGEON_SIZE_Y: f32 = 5.0;
const DEFAULT_SPLIT_AMOUNT: i32 = 3;
const DEFAULT_MIN_CELL_SIZE: i32 = 3;
const DEFAULT_MIN_ROOM_SIZE: i32 = 3;

// Clamp bounds.
const MIN_DUNGEON_SIZE: f32 = 0.0;
const MAX_DUNGEON_SIZE: f32 = 100.0;
const MIN_SPLIT_AMOUNT: i32 = 0;
const MAX_SPLIT_AMOUNT: i32 = 100;
const MINIMUM_CELL_SIZE: i32 = 2;

// The grid is the dungeon footprint plus a one-cell ring on every side so
// wall inference never writes out of bounds; the root cell starts at (1, 1).
const WALL_BORDER: usize = 2;

/// Everything the user can tune for the dungeon algorithm. Setters clamp,
/// so the struct never holds out-of-range state; the minimum cell size
/// additionally respects a dynamic upper bound derived from the current
/// footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "DungeonParametersRaw")]
pub struct DungeonParameters {
    size_x: f32,
    size_y: f32,
    size_z: f32,
    split_amount: i32,
    minimum_cell_size: i32,
    minimum_room_size: i32,
}

impl Default for DungeonParameters {
    fn default() -> Self {
        DungeonParameters {
            size_x: DEFAULT_DUNGEON_SIZE_XZ,
            size_y: DEFAULT_DUNGEON_SIZE_Y,
            size_z: DEFAULT_DUNGEON_SIZE_XZ,
            split_amount: DEFAULT_SPLIT_AMOUNT,
            minimum_cell_size: DEFAULT_MIN_CELL_SIZE,
            minimum_room_size: DEFAULT_MIN_ROOM_SIZE,
        }
    }
}

impl DungeonParameters {
    pub fn size(&self) -> (f32, f32, f32) {
        (self.size_x, self.size_y, self.size_z)
    }

    pub fn set_size_x(&mut self, value: f32) {
        self.size_x = clamp_parameter(value, MIN_DUNGEON_SIZE, MAX_DUNGEON_SIZE);
    }

    /// Y is the roof height, only meaningful to the renderer.
    pub fn set_size_y(&mut self, value: f32) {
        self.size_y = clamp_parameter(value, MIN_DUNGEON_SIZE, MAX_DUNGEON_SIZE);
    }

    pub fn set_size_z(&mut self, value: f32) {
        self.size_z = clamp_parameter(value, MIN_DUNGEON_SIZE, MAX_DUNGEON_SIZE);
    }

    pub fn split_amount(&self) -> i32 {
        self.split_amount
    }

    pub fn set_split_amount(&mut self, value: i32) {
        self.split_amount =
            clamp_parameter(value as f32, MIN_SPLIT_AMOUNT as f32, MAX_SPLIT_AMOUNT as f32) as i32;
    }

    pub fn minimum_cell_size(&self) -> i32 {
        self.minimum_cell_size
    }

    /// Below 2 a split can no longer leave room for both halves, and above
    /// half the smaller footprint axis the first split could never succeed,
    /// so the value is pinned between the two. The upper bound wins when
    /// they conflict.
    pub fn set_minimum_cell_size(&mut self, value: i32) {
        let mut value = value.max(MINIMUM_CELL_SIZE);

        let lowest_size = self.size_x.min(self.size_z);
        let dynamic_max = lowest_size / 2.0 - 1.0;
        if value as f32 > dynamic_max {
            value = dynamic_max as i32;
        }

        self.minimum_cell_size = value;

        // Shrinking the cell size can strand a larger room size, so the
        // room bound is re-applied here.
        if self.minimum_room_size > self.minimum_cell_size {
            self.set_minimum_room_size(self.minimum_room_size);
        }
    }

    pub fn minimum_room_size(&self) -> i32 {
        self.minimum_room_size
    }

    /// Rooms must fit their cells: the minimum room size cannot exceed the
    /// minimum cell size.
    pub fn set_minimum_room_size(&mut self, value: i32) {
        self.minimum_room_size = value.max(0).min(self.minimum_cell_size);
    }
}

/// Deserialization mirror routing through the clamping setters; sizes are
/// applied first so the dynamic cell-size bound sees them.
#[derive(Deserialize)]
#[serde(default)]
struct DungeonParametersRaw {
    size_x: f32,
    size_y: f32,
    size_z: f32,
    split_amount: i32,
    minimum_cell_size: i32,
    minimum_room_size: i32,
}

impl Default for DungeonParametersRaw {
    fn default() -> Self {
        let defaults = DungeonParameters::default();
        DungeonParametersRaw {
            size_x: defaults.size_x,
            size_y: defaults.size_y,
            size_z: defaults.size_z,
            split_amount: defaults.split_amount,
            minimum_cell_size: defaults.minimum_cell_size,
            minimum_room_size: defaults.minimum_room_size,
        }
    }
}

impl From<DungeonParametersRaw> for DungeonParameters {
    fn from(raw: DungeonParametersRaw) -> Self {
        let mut params = DungeonParameters::default();
        params.set_size_x(raw.size_x);
        params.set_size_y(raw.size_y);
        params.set_size_z(raw.size_z);
        params.set_split_amount(raw.split_amount);
        params.set_minimum_cell_size(raw.minimum_cell_size);
        params.set_minimum_room_size(raw.minimum_room_size);
        params
    }
}

impl SeedVariables for DungeonParameters {
    fn seed_variable_count(&self) -> usize {
        6
    }

    fn seed_variable(&self, index: usize) -> f32 {
        match index {
            0 => self.size_x,
            1 => self.size_y,
            2 => self.size_z,
            3 => self.split_amount as f32,
            4 => self.minimum_cell_size as f32,
            5 => self.minimum_room_size as f32,
            _ => {
                log::error!("Incorrect index {} when getting user variable", index);
                0.0
            }
        }
    }

    fn set_seed_variable(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_size_x(value),
            1 => self.set_size_y(value),
            2 => self.set_size_z(value),
            3 => self.set_split_amount(value as i32),
            4 => self.set_minimum_cell_size(value as i32),
            5 => self.set_minimum_room_size(value as i32),
            _ => log::error!("Incorrect index {} when setting user variable", index),
        }
    }
}

/// Runs the four carving phases over a fresh grid and partition tree. The
/// tree only lives for the duration of one call; regeneration always starts
/// from scratch.
pub struct DungeonGenerator {
    params: DungeonParameters,
    seed: GeneratorSeed,
}

impl Default for DungeonGenerator {
    fn default() -> Self {
        DungeonGenerator::new()
    }
}

impl DungeonGenerator {
    pub fn new() -> Self {
        let params = DungeonParameters::default();
        let mut seed = GeneratorSeed::new();
        seed.update(&params);
        DungeonGenerator { params, seed }
    }

    pub fn params(&self) -> &DungeonParameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut DungeonParameters {
        &mut self.params
    }

    pub fn seed(&self) -> &str {
        self.seed.seed()
    }

    pub fn update_seed(&mut self) -> &str {
        self.seed.update(&self.params)
    }

    pub fn apply_seed(&mut self, seed: &str) -> bool {
        self.seed.apply(seed, &mut self.params)
    }

    /// The classification grid for the current footprint, all empty.
    pub fn empty_grid(&self) -> TileGrid {
        TileGrid::new(
            self.params.size_x as usize + WALL_BORDER,
            self.params.size_z as usize + WALL_BORDER,
        )
    }
}

impl LevelGenerator for DungeonGenerator {
    type Grid = TileGrid;

    fn generate_level(&self, rng: &mut impl Rng) -> TileGrid {
        log::debug!("Generating dungeon layout");

        let mut grid = self.empty_grid();
        let mut tree = PartitionTree::new(self.params.size_x as i32, self.params.size_z as i32);

        tree.create_cells(self.params.split_amount, self.params.minimum_cell_size, rng);
        log::debug!(
            "{} cells after {} split iterations",
            tree.node_count(),
            self.params.split_amount
        );

        tree.create_rooms(self.params.minimum_room_size, &mut grid, rng);
        log::debug!("{} room cells carved", grid.count(Tile::Room));

        tree.create_corridors(&mut grid);
        log::debug!("{} corridor cells carved", grid.count(Tile::Corridor));

        create_walls(&mut grid);
        log::debug!("{} wall cells inferred", grid.count(Tile::Wall));

        grid
    }

    fn reset_parameters(&mut self) {
        self.params = DungeonParameters::default();
    }
}

/// Surround the carved layout with walls: every empty 4-neighbour of a room
/// or corridor cell becomes a wall. Must run after both carving phases,
/// since it depends on the final occupancy.
pub fn create_walls(grid: &mut TileGrid) {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            if !grid.tile(x, y).is_carved() {
                continue;
            }

            for &(dx, dy) in &[(1, 0), (-1, 0), (0, 1), (0, -1)] {
                grid.set_if(x + dx, y + dy, Tile::Empty, Tile::Wall);
            }
        }
    }
}

/// The tile assets the renderer needs to spawn a generated dungeon. The
/// core never touches the assets themselves; it only offers the renderer a
/// way to check completeness before it starts instantiating.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TilePalette<T> {
    pub floor: Option<T>,
    pub corridor: Option<T>,
    pub wall: Option<T>,
    pub roof: Option<T>,
}

impl<T> Default for TilePalette<T> {
    fn default() -> Self {
        TilePalette {
            floor: None,
            corridor: None,
            wall: None,
            roof: None,
        }
    }
}

impl<T> TilePalette<T> {
    /// Whether every tile required for output is present. Floor, corridor
    /// and wall are always needed; the roof only when roof spawning is
    /// requested. Missing tiles are logged so the host can surface them.
    pub fn has_required_tiles(&self, spawn_roof: bool) -> bool {
        let mut missing = Vec::new();
        if self.floor.is_none() {
            missing.push("floor");
        }
        if self.corridor.is_none() {
            missing.push("corridor");
        }
        if self.wall.is_none() {
            missing.push("wall");
        }
        if spawn_roof && self.roof.is_none() {
            missing.push("roof");
        }

        if missing.is_empty() {
            true
        } else {
            log::warn!(
                "Missing tiles: {}. Input the desired tiles in the tile fields.",
                missing.join(", ")
            );
            false
        }
    }
}
