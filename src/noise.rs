//! Deterministic 2D gradient noise. A classic Perlin corner-gradient scheme
//! with a configurable fade polynomial, plus the fractal layering loop the
//! terrain generator drives.

/// 256-entry permutation table, duplicated to 512 entries so the `+1` corner
/// lookups never wrap. Fixed; not user-configurable.
const HASH: [usize; 512] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209,
    76, 132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198,
    173, 186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44,
    154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79,
    113, 224, 232, 178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12,
    191, 179, 162, 241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29,
    24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180, 151, 160, 137, 91, 90, 15, 131, 13,
    201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190,
    6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32, 57, 177, 33,
    88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175, 74, 165, 71, 134, 139, 48, 27,
    166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245,
    40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169,
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64, 52, 217, 226, 250,
    124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206, 59, 227, 47, 16, 58, 17, 182,
    189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167,
    43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104, 218,
    246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241, 81, 51, 145, 235, 249,
    14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204, 176, 115, 121, 50, 45, 127,
    4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61,
    156, 180,
];

/// The 8 unit/diagonal gradients a cell corner can take.
const GRADIENTS: [[f32; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
];

// Masks keep the table lookups in bounds: corner hashes stay under 256 so
// the summed index never exceeds 511, and gradient selection stays under 8.
const HASH_MASK: i32 = 255;
const GRADIENT_MASK: usize = 7;

const NORMALISE_MIN: f32 = -1.0;
const NORMALISE_MAX: f32 = 1.0;

/// The smoothing polynomial `t³(t(t·multiply − minus) + addition)` used to
/// blend corner contributions. The defaults (6, 15, 10) reproduce the
/// canonical `6t⁵ − 15t⁴ + 10t³`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeCurve {
    pub multiply: i32,
    pub minus: i32,
    pub addition: i32,
}

impl Default for FadeCurve {
    fn default() -> Self {
        FadeCurve {
            multiply: 6,
            minus: 15,
            addition: 10,
        }
    }
}

impl FadeCurve {
    pub fn eval(&self, t: f32) -> f32 {
        t * t * t * (t * (t * self.multiply as f32 - self.minus as f32) + self.addition as f32)
    }
}

/// Stateless gradient-noise evaluator. Same input, same fade curve, same
/// output; the fractal layering additionally wraps coordinates to the
/// heightmap dimension so octave-scaled positions stay bounded.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    fade: FadeCurve,
    octaves: f32,
    frequency: f32,
    amplitude: f32,
    amplitude_gain: f32,
    lacunarity: f32,
    grid_dim: usize,
}

impl NoiseField {
    pub fn new(
        fade: FadeCurve,
        octaves: f32,
        frequency: f32,
        amplitude: f32,
        amplitude_gain: f32,
        lacunarity: f32,
        grid_dim: usize,
    ) -> Self {
        NoiseField {
            fade,
            octaves,
            frequency,
            amplitude,
            amplitude_gain,
            lacunarity,
            grid_dim,
        }
    }

    /// Height of the noise at a continuous position, normalised into [0, 1].
    ///
    /// The unit square containing the point supplies four corner gradients;
    /// each corner contributes the dot of its gradient with the corner-to-
    /// point offset, and the contributions are fade-blended along x then y.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let floor_x = x.floor() as i32;
        let floor_y = y.floor() as i32;

        // Corner hashes. The x axis goes through the table first because it
        // is summed with the y index for the final lookup.
        let hash_left_index = (floor_x & HASH_MASK) as usize;
        let hash_right = HASH[hash_left_index + 1];
        let hash_left = HASH[hash_left_index];
        let hash_bot = (floor_y & HASH_MASK) as usize;
        let hash_top = hash_bot + 1;

        // Cell-local position and offsets to each corner.
        let pos_x = x - floor_x as f32;
        let pos_y = y - floor_y as f32;
        let dist_bot_left = [pos_x, pos_y];
        let dist_bot_right = [pos_x - 1.0, pos_y];
        let dist_top_left = [pos_x, pos_y - 1.0];
        let dist_top_right = [pos_x - 1.0, pos_y - 1.0];

        let grad_bot_left = GRADIENTS[HASH[hash_left + hash_bot] & GRADIENT_MASK];
        let grad_bot_right = GRADIENTS[HASH[hash_right + hash_bot] & GRADIENT_MASK];
        let grad_top_left = GRADIENTS[HASH[hash_left + hash_top] & GRADIENT_MASK];
        let grad_top_right = GRADIENTS[HASH[hash_right + hash_top] & GRADIENT_MASK];

        let dot_bot_left = dot(grad_bot_left, dist_bot_left);
        let dot_bot_right = dot(grad_bot_right, dist_bot_right);
        let dot_top_left = dot(grad_top_left, dist_top_left);
        let dot_top_right = dot(grad_top_right, dist_top_right);

        let fade_x = self.fade.eval(pos_x);
        let fade_y = self.fade.eval(pos_y);

        let bot_side = lerp(dot_bot_left, dot_bot_right, fade_x);
        let top_side = lerp(dot_top_left, dot_top_right, fade_x);
        let total = lerp(bot_side, top_side, fade_y);

        normalise(NORMALISE_MIN, NORMALISE_MAX, total)
    }

    /// Layered sampling at octave-scaled frequency and amplitude. Each
    /// octave overwrites the previous height rather than accumulating; the
    /// last octave wins. Zero octaves yields a flat 0.
    pub fn fractal(&self, x: f32, y: f32) -> f32 {
        let mut height = 0.0;
        let mut frequency = self.frequency;
        let mut amplitude = self.amplitude;
        let mut x = x;
        let mut y = y;

        for _ in 0..self.octaves as i32 {
            x = self.loop_pos(x * frequency);
            y = self.loop_pos(y * frequency);

            height = self.sample(x, y) * amplitude;

            frequency *= self.lacunarity;
            amplitude *= self.amplitude_gain;
        }

        height
    }

    /// Wrap a position back into the heightmap so octave scaling cannot run
    /// off the grid. The wrap modulus is the grid dimension minus one.
    fn loop_pos(&self, value: f32) -> f32 {
        let max = self.grid_dim as f32 - 1.0;
        if max <= 0.0 {
            return value;
        }

        if value >= max {
            value % max
        } else {
            value
        }
    }
}

fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

/// Interpolate with the blend weight clamped to [0, 1], so an aggressive
/// user fade curve cannot extrapolate past the corner values.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.max(0.0).min(1.0);
    a + (b - a) * t
}

fn normalise(min: f32, max: f32, value: f32) -> f32 {
    (value - min) / (max - min)
}
