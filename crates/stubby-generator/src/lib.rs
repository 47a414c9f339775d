//! Candidate short code generators.

pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use stubby_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// A generated code is only a candidate: the registry checks it against
/// the store and draws again on collision.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Produces the next candidate code.
    fn generate(&self) -> Self::Output;
}
