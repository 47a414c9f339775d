use crate::error::{CreateError, LookupError, StorageError};
use crate::record::LinkRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters for creating a link.
///
/// Inputs are kept raw so that every validation failure surfaces as a
/// typed [`CreateError`] from [`Registry::create`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParams {
    /// The URL to shorten.
    pub original_url: String,
    /// Optional caller-chosen code.
    pub custom_code: Option<String>,
    /// Minutes the link stays resolvable.
    pub validity_minutes: i64,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub original_url: String,
    /// Click count including this resolution.
    pub clicks: u64,
}

#[async_trait]
pub trait Registry: Send + Sync + 'static {
    /// Creates a link and returns the stored record.
    async fn create(&self, params: CreateParams) -> Result<LinkRecord, CreateError>;

    /// Resolves a short code, counting the click.
    async fn resolve(&self, code: &ShortCode) -> Result<Resolution, LookupError>;

    /// Deletes a link whether or not it has expired.
    async fn delete(&self, code: &ShortCode) -> Result<(), LookupError>;

    /// Lists every record, most recently created first.
    async fn list(&self) -> Result<Vec<LinkRecord>, StorageError>;

    /// Whether `record` has expired according to the registry's clock.
    fn is_expired(&self, record: &LinkRecord) -> bool;
}
