use crate::Generator;
use rand::Rng;
use stubby_core::ShortCode;
use typed_builder::TypedBuilder;

/// Base-36 digits, lowercase.
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const DEFAULT_LENGTH: usize = 6;

/// Draws fixed-length codes uniformly from the base-36 alphabet.
///
/// With the default length of 6 the keyspace is 36^6 (about 2.2 billion),
/// so collisions are rare but still possible.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = DEFAULT_LENGTH)]
    length: usize,
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
