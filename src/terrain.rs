//! Noise-terrain generation: user parameters with always-valid clamped
//! setters, and the generator that drives the noise field over a heightmap.

use crate::grid::HeightGrid;
use crate::noise::{FadeCurve, NoiseField};
use crate::seed::{GeneratorSeed, SeedVariables};
use crate::{clamp_at_least, clamp_parameter, LevelGenerator};

use rand::Rng;
use serde::{Deserialize, Serialize};

// Defaults.
const DEFAULT_TERRAIN_X_SIZE: f32 = 50.0;
const DEFAULT_TERRAIN_Y_SIZE: f32 = 10.0;
const DEFAULT_TERRAIN_Z_SIZE: f32 = 50.0;
const DEFAULT_OFFSET: f32 = 0.0;
const DEFAULT_HEIGHTMAP_RES: i32 = 128;
const DEFAULT_OCTAVES: f32 = 1.0;
const DEFAULT_FREQUENCY: f32 = 6.0;
const DEFAULT_AMPLITUDE: f32 = 1.0;
const DEFAULT_AMPLITUDE_GAIN: f32 = 1.0;
const DEFAULT_LACUNARITY: f32 = 2.0;

// Clamp bounds.
const MIN_VALUE: f32 = 0.0;
const MAX_TERRAIN_SIZE: f32 = 100_000.0;
const MIN_TERRAIN_Y_SIZE: f32 = -100_000.0;
const MAX_OCTAVES: f32 = 10.0;
const HEIGHTMAP_RES_LOWER_BOUND: i32 = 0;
const HEIGHTMAP_RES_HIGHER_BOUND: i32 = 256;

/// Everything the user can tune for the terrain algorithm. Every setter
/// clamps to its documented bounds before storing, so the struct is always
/// in a valid state regardless of where the value came from (GUI field,
/// seed decode, or deserialized spec file).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "NoiseParametersRaw")]
pub struct NoiseParameters {
    terrain_size_x: f32,
    terrain_size_y: f32,
    terrain_size_z: f32,
    pos_offset_x: f32,
    pos_offset_y: f32,
    heightmap_resolution: i32,
    multiply_fade: i32,
    minus_fade: i32,
    addition_fade: i32,
    octaves: f32,
    frequency: f32,
    amplitude: f32,
    amplitude_gain: f32,
    lacunarity: f32,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        let fade = FadeCurve::default();
        NoiseParameters {
            terrain_size_x: DEFAULT_TERRAIN_X_SIZE,
            terrain_size_y: DEFAULT_TERRAIN_Y_SIZE,
            terrain_size_z: DEFAULT_TERRAIN_Z_SIZE,
            pos_offset_x: DEFAULT_OFFSET,
            pos_offset_y: DEFAULT_OFFSET,
            heightmap_resolution: DEFAULT_HEIGHTMAP_RES,
            multiply_fade: fade.multiply,
            minus_fade: fade.minus,
            addition_fade: fade.addition,
            octaves: DEFAULT_OCTAVES,
            frequency: DEFAULT_FREQUENCY,
            amplitude: DEFAULT_AMPLITUDE,
            amplitude_gain: DEFAULT_AMPLITUDE_GAIN,
            lacunarity: DEFAULT_LACUNARITY,
        }
    }
}

impl NoiseParameters {
    pub fn terrain_size(&self) -> (f32, f32, f32) {
        (self.terrain_size_x, self.terrain_size_y, self.terrain_size_z)
    }

    /// X size below 0 turns the terrain inside out, so it is floored at 0.
    pub fn set_terrain_size_x(&mut self, value: f32) {
        self.terrain_size_x = clamp_parameter(value, MIN_VALUE, MAX_TERRAIN_SIZE);
    }

    /// Height scale may be negative, down to the symmetric bound.
    pub fn set_terrain_size_y(&mut self, value: f32) {
        self.terrain_size_y = clamp_parameter(value, MIN_TERRAIN_Y_SIZE, MAX_TERRAIN_SIZE);
    }

    pub fn set_terrain_size_z(&mut self, value: f32) {
        self.terrain_size_z = clamp_parameter(value, MIN_VALUE, MAX_TERRAIN_SIZE);
    }

    pub fn pos_offset(&self) -> (f32, f32) {
        (self.pos_offset_x, self.pos_offset_y)
    }

    pub fn set_pos_offset_x(&mut self, value: f32) {
        self.pos_offset_x = clamp_at_least(value, MIN_VALUE);
    }

    pub fn set_pos_offset_y(&mut self, value: f32) {
        self.pos_offset_y = clamp_at_least(value, MIN_VALUE);
    }

    pub fn heightmap_resolution(&self) -> i32 {
        self.heightmap_resolution
    }

    pub fn set_heightmap_resolution(&mut self, value: i32) {
        self.heightmap_resolution = clamp_parameter(
            value as f32,
            HEIGHTMAP_RES_LOWER_BOUND as f32,
            HEIGHTMAP_RES_HIGHER_BOUND as f32,
        ) as i32;
    }

    pub fn fade_curve(&self) -> FadeCurve {
        FadeCurve {
            multiply: self.multiply_fade,
            minus: self.minus_fade,
            addition: self.addition_fade,
        }
    }

    pub fn set_multiply_fade(&mut self, value: i32) {
        self.multiply_fade = value;
    }

    pub fn set_minus_fade(&mut self, value: i32) {
        self.minus_fade = value;
    }

    pub fn set_addition_fade(&mut self, value: i32) {
        self.addition_fade = value;
    }

    pub fn octaves(&self) -> f32 {
        self.octaves
    }

    pub fn set_octaves(&mut self, value: f32) {
        self.octaves = clamp_parameter(value, MIN_VALUE, MAX_OCTAVES);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, value: f32) {
        self.frequency = clamp_at_least(value, MIN_VALUE);
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn set_amplitude(&mut self, value: f32) {
        self.amplitude = clamp_at_least(value, MIN_VALUE);
    }

    pub fn amplitude_gain(&self) -> f32 {
        self.amplitude_gain
    }

    pub fn set_amplitude_gain(&mut self, value: f32) {
        self.amplitude_gain = clamp_at_least(value, MIN_VALUE);
    }

    pub fn lacunarity(&self) -> f32 {
        self.lacunarity
    }

    pub fn set_lacunarity(&mut self, value: f32) {
        self.lacunarity = clamp_at_least(value, MIN_VALUE);
    }
}

/// Deserialization mirror; values route through the clamping setters so a
/// hand-edited spec file cannot smuggle in out-of-range state.
#[derive(Deserialize)]
#[serde(default)]
struct NoiseParametersRaw {
    terrain_size_x: f32,
    terrain_size_y: f32,
    terrain_size_z: f32,
    pos_offset_x: f32,
    pos_offset_y: f32,
    heightmap_resolution: i32,
    multiply_fade: i32,
    minus_fade: i32,
    addition_fade: i32,
    octaves: f32,
    frequency: f32,
    amplitude: f32,
    amplitude_gain: f32,
    lacunarity: f32,
}

impl Default for NoiseParametersRaw {
    fn default() -> Self {
        let defaults = NoiseParameters::default();
        NoiseParametersRaw {
            terrain_size_x: defaults.terrain_size_x,
            terrain_size_y: defaults.terrain_size_y,
            terrain_size_z: defaults.terrain_size_z,
            pos_offset_x: defaults.pos_offset_x,
            pos_offset_y: defaults.pos_offset_y,
            heightmap_resolution: defaults.heightmap_resolution,
            multiply_fade: defaults.multiply_fade,
            minus_fade: defaults.minus_fade,
            addition_fade: defaults.addition_fade,
            octaves: defaults.octaves,
            frequency: defaults.frequency,
            amplitude: defaults.amplitude,
            amplitude_gain: defaults.amplitude_gain,
            lacunarity: defaults.lacunarity,
        }
    }
}

impl From<NoiseParametersRaw> for NoiseParameters {
    fn from(raw: NoiseParametersRaw) -> Self {
        let mut params = NoiseParameters::default();
        params.set_terrain_size_x(raw.terrain_size_x);
        params.set_terrain_size_y(raw.terrain_size_y);
        params.set_terrain_size_z(raw.terrain_size_z);
        params.set_pos_offset_x(raw.pos_offset_x);
        params.set_pos_offset_y(raw.pos_offset_y);
        params.set_heightmap_resolution(raw.heightmap_resolution);
        params.set_multiply_fade(raw.multiply_fade);
        params.set_minus_fade(raw.minus_fade);
        params.set_addition_fade(raw.addition_fade);
        params.set_octaves(raw.octaves);
        params.set_frequency(raw.frequency);
        params.set_amplitude(raw.amplitude);
        params.set_amplitude_gain(raw.amplitude_gain);
        params.set_lacunarity(raw.lacunarity);
        params
    }
}

impl SeedVariables for NoiseParameters {
    fn seed_variable_count(&self) -> usize {
        14
    }

    fn seed_variable(&self, index: usize) -> f32 {
        match index {
            0 => self.terrain_size_x,
            1 => self.terrain_size_y,
            2 => self.terrain_size_z,
            3 => self.pos_offset_x,
            4 => self.pos_offset_y,
            5 => self.heightmap_resolution as f32,
            6 => self.multiply_fade as f32,
            7 => self.minus_fade as f32,
            8 => self.addition_fade as f32,
            9 => self.octaves,
            10 => self.frequency,
            11 => self.amplitude,
            12 => self.amplitude_gain,
            13 => self.lacunarity,
            _ => {
                log::error!("Incorrect index {} when getting user variable", index);
                0.0
            }
        }
    }

    fn set_seed_variable(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_terrain_size_x(value),
            1 => self.set_terrain_size_y(value),
            2 => self.set_terrain_size_z(value),
            3 => self.set_pos_offset_x(value),
            4 => self.set_pos_offset_y(value),
            5 => self.set_heightmap_resolution(value as i32),
            6 => self.set_multiply_fade(value as i32),
            7 => self.set_minus_fade(value as i32),
            8 => self.set_addition_fade(value as i32),
            9 => self.set_octaves(value),
            10 => self.set_frequency(value),
            11 => self.set_amplitude(value),
            12 => self.set_amplitude_gain(value),
            13 => self.set_lacunarity(value),
            _ => log::error!("Incorrect index {} when setting user variable", index),
        }
    }
}

/// Builds a heightmap by fractal-sampling the noise field at every grid
/// point. Parameter changes only influence the next `generate_level` call;
/// nothing regenerates mid-edit.
pub struct TerrainGenerator {
    params: NoiseParameters,
    seed: GeneratorSeed,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        TerrainGenerator::new()
    }
}

impl TerrainGenerator {
    pub fn new() -> Self {
        let params = NoiseParameters::default();
        let mut seed = GeneratorSeed::new();
        seed.update(&params);
        TerrainGenerator { params, seed }
    }

    pub fn params(&self) -> &NoiseParameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut NoiseParameters {
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
}

impl LevelGenerator for TerrainGenerator {
    type Grid = HeightGrid;

    /// Noise terrain is fully determined by the parameters; the injected
    /// RNG is unused.
    fn generate_level(&self, _rng: &mut impl Rng) -> HeightGrid {
        let resolution = self.params.heightmap_resolution.max(0) as usize;
        let dim = resolution + 1;

        let field = NoiseField::new(
            self.params.fade_curve(),
            self.params.octaves,
            self.params.frequency,
            self.params.amplitude,
            self.params.amplitude_gain,
            self.params.lacunarity,
            dim,
        );

        let mut grid = HeightGrid::new(dim);
        // Dividing by the resolution spreads several samples across each
        // noise cell, which is what smooths the terrain.
        let denominator = resolution.max(1) as f32;
        let (offset_x, offset_y) = self.params.pos_offset();

        for x in 0..dim {
            for y in 0..dim {
                let sample_x = x as f32 / denominator + offset_x;
                let sample_y = y as f32 / denominator + offset_y;

                let height = field.fractal(sample_x, sample_y);
                grid.set_height(x, y, height.max(0.0).min(1.0));
            }
        }

        log::debug!("Generated {0}x{0} heightmap", dim);

        grid
    }

    fn reset_parameters(&mut self) {
        self.params = NoiseParameters::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::small_rng;
    use crate::seed::SeedVariables;

    #[test]
    fn setters_clamp_to_documented_bounds() {
        let mut params = NoiseParameters::default();

        params.set_terrain_size_x(-10.0);
        params.set_terrain_size_y(-200_000.0);
        params.set_terrain_size_z(200_000.0);
        assert_eq!(params.terrain_size(), (0.0, -100_000.0, 100_000.0));

        params.set_pos_offset_x(-1.0);
        params.set_pos_offset_y(3.5);
        assert_eq!(params.pos_offset(), (0.0, 3.5));

        params.set_heightmap_resolution(1024);
        assert_eq!(params.heightmap_resolution(), 256);
        params.set_heightmap_resolution(-5);
        assert_eq!(params.heightmap_resolution(), 0);

        params.set_octaves(11.5);
        assert_eq!(params.octaves(), 10.0);
        params.set_octaves(-1.0);
        assert_eq!(params.octaves(), 0.0);

        params.set_frequency(-2.0);
        params.set_amplitude(-2.0);
        params.set_amplitude_gain(-2.0);
        params.set_lacunarity(-2.0);
        assert_eq!(params.frequency(), 0.0);
        assert_eq!(params.amplitude(), 0.0);
        assert_eq!(params.amplitude_gain(), 0.0);
        assert_eq!(params.lacunarity(), 0.0);
    }

    #[test]
    fn generate_fills_the_whole_grid_with_unit_heights() {
        let mut gen = TerrainGenerator::new();
        gen.params_mut().set_heightmap_resolution(32);
        // Aggressive amplitude exercises the [0, 1] clamp on store.
        gen.params_mut().set_amplitude(5.0);

        let mut rng = small_rng([0, 0, 0, 1]);
        let grid = gen.generate_level(&mut rng);

        assert_eq!(grid.dim(), 33);
        assert_eq!(grid.values().len(), 33 * 33);
        for &h in grid.values() {
            assert!((0.0..=1.0).contains(&h), "height {} out of range", h);
        }
    }

    #[test]
    fn generation_is_deterministic_for_fixed_parameters() {
        let mut gen = TerrainGenerator::new();
        gen.params_mut().set_heightmap_resolution(16);
        gen.params_mut().set_octaves(3.0);

        let mut rng = small_rng([1, 2, 3, 4]);
        let first = gen.generate_level(&mut rng);
        let second = gen.generate_level(&mut rng);
        assert_eq!(first.values(), second.values());
    }

    #[test]
    fn zero_resolution_produces_a_single_cell_without_nan() {
        let mut gen = TerrainGenerator::new();
        gen.params_mut().set_heightmap_resolution(0);

        let mut rng = small_rng([0, 0, 0, 2]);
        let grid = gen.generate_level(&mut rng);
        assert_eq!(grid.dim(), 1);
        assert!(grid.height(0, 0).is_finite());
    }

    #[test]
    fn seed_round_trips_the_full_parameter_vector() {
        let mut source = TerrainGenerator::new();
        source.params_mut().set_terrain_size_x(75.0);
        source.params_mut().set_pos_offset_x(2.5);
        source.params_mut().set_octaves(4.0);
        source.params_mut().set_lacunarity(3.5);
        let encoded = source.update_seed().to_string();

        let mut target = TerrainGenerator::new();
        assert!(target.apply_seed(&encoded));
        assert_eq!(target.params(), source.params());
        assert_eq!(target.seed(), encoded);
    }

    #[test]
    fn malformed_seed_leaves_parameters_untouched() {
        let mut gen = TerrainGenerator::new();
        let before = gen.params().clone();
        assert!(!gen.apply_seed("not-a-seed"));
        assert_eq!(*gen.params(), before);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut gen = TerrainGenerator::new();
        gen.params_mut().set_terrain_size_x(99.0);
        gen.params_mut().set_octaves(8.0);
        gen.reset_parameters();
        assert_eq!(*gen.params(), NoiseParameters::default());
    }

    #[test]
    fn unknown_seed_variable_index_reads_zero() {
        let mut params = NoiseParameters::default();
        assert_eq!(params.seed_variable(14), 0.0);
        params.set_seed_variable(14, 42.0);
        assert_eq!(params, NoiseParameters::default());
    }

    #[test]
    fn ron_spec_values_arrive_clamped() {
        let params: NoiseParameters = ron::de::from_str(
            "(terrain_size_x: 500000, heightmap_resolution: 999, octaves: 25, frequency: -4)",
        )
        .unwrap();
        assert_eq!(params.terrain_size().0, 100_000.0);
        assert_eq!(params.heightmap_resolution(), 256);
        assert_eq!(params.octaves(), 10.0);
        assert_eq!(params.frequency(), 0.0);
    }
}
