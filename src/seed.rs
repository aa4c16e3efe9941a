//! Reversible string seeds. A generator's user-tunable parameters form a
//! flat indexed vector; the seed string is, for each variable left to right,
//! the value's display form followed by that form's character count. Decoding
//! scans from the end, one length digit at a time.
//!
//! Known format limitation: the length prefix is a single digit, so the
//! encoding stops being invertible once any value's display form reaches 10
//! characters. The documented parameter clamps keep values well under that.

/// Indexed access to the parameter vector a seed covers. Implementations
/// route `set_seed_variable` through their clamping setters, so a decoded
/// seed can never install out-of-range state.
pub trait SeedVariables {
    fn seed_variable_count(&self) -> usize;

    /// Value of the variable at `index`; unknown indices log an error and
    /// read as 0.
    fn seed_variable(&self, index: usize) -> f32;

    /// Assign the variable at `index`; unknown indices log an error and are
    /// ignored.
    fn set_seed_variable(&mut self, index: usize, value: f32);
}

/// The seed string owned by one generator, kept in sync with its parameters.
#[derive(Clone, Debug)]
pub struct GeneratorSeed {
    seed: String,
}

impl Default for GeneratorSeed {
    fn default() -> Self {
        GeneratorSeed {
            seed: "0".to_string(),
        }
    }
}

impl GeneratorSeed {
    pub fn new() -> Self {
        GeneratorSeed::default()
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Re-encode the current variable values into the seed string.
    pub fn update(&mut self, vars: &impl SeedVariables) -> &str {
        let mut seed = String::new();

        for index in 0..vars.seed_variable_count() {
            let value = format!("{}", vars.seed_variable(index));
            seed.push_str(&value);
            seed.push_str(&value.len().to_string());
        }

        self.seed = seed;
        &self.seed
    }

    /// Decode `new_seed` and assign every variable it carries. Returns
    /// whether the seed was accepted.
    ///
    /// Applying the current seed is a no-op. A seed containing anything but
    /// digits, `-` and `.`, or one whose length structure does not yield
    /// exactly the expected variable count, is rejected without touching any
    /// variable. Variables are applied highest index first, matching the
    /// right-to-left scan.
    pub fn apply(&mut self, new_seed: &str, vars: &mut impl SeedVariables) -> bool {
        if self.seed == new_seed {
            return true;
        }

        if !new_seed
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'-' || b == b'.')
        {
            log::warn!("Rejecting seed with invalid characters: {:?}", new_seed);
            return false;
        }

        // Parse everything up front so a structurally broken seed cannot
        // leave the variables half-assigned.
        let values = match parse_seed(new_seed, vars.seed_variable_count()) {
            Some(values) => values,
            None => {
                log::warn!("Rejecting structurally malformed seed: {:?}", new_seed);
                return false;
            }
        };

        for (index, value) in values {
            vars.set_seed_variable(index, value);
        }

        self.seed = new_seed.to_string();
        true
    }
}

/// Scan the seed back to front, reading one length digit and then that many
/// characters of value per variable. Returns the `(index, value)` pairs in
/// application order (highest index first), or `None` if the structure does
/// not work out.
fn parse_seed(seed: &str, variable_count: usize) -> Option<Vec<(usize, f32)>> {
    let bytes = seed.as_bytes();
    let mut values = Vec::with_capacity(variable_count);
    let mut cursor = bytes.len() as isize - 1;

    for index in (0..variable_count).rev() {
        if cursor < 0 {
            return None;
        }

        let length_byte = bytes[cursor as usize];
        if !length_byte.is_ascii_digit() {
            return None;
        }

        let length = (length_byte - b'0') as isize;
        let start = cursor - length;
        if start < 0 || length == 0 {
            return None;
        }

        let value: f32 = seed[start as usize..cursor as usize].parse().ok()?;
        values.push((index, value));

        cursor = start - 1;
    }

    Some(values)
}
