use std::sync::Arc;

use stubby_core::Registry;

#[derive(Clone)]
pub struct AppState {
    registry: Arc<dyn Registry>,
    base_url: String,
}

impl AppState {
    pub fn new(registry: Arc<dyn Registry>, public_base_url: impl Into<String>) -> Self {
        Self {
            registry,
            base_url: public_base_url.into(),
        }
    }

    pub fn registry(&self) -> &dyn Registry {
        self.registry.as_ref()
    }

    /// Base URL short links are rendered against, e.g. `https://stub.by`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
