use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Tunables for [`RegistryService`](crate::RegistryService).
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RegistrySettings {
    /// How many generated candidates to try before giving up with
    /// `GenerationExhausted`.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
