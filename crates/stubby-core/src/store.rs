use crate::error::StorageError;
use crate::record::LinkRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Read half of the storage port.
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Retrieves the record for a given short code, expired or not.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Returns every stored record in no particular order.
    async fn list_all(&self) -> Result<Vec<LinkRecord>>;
}

/// The storage port the registry persists through.
///
/// Implementations are plain keyed stores: they do not enforce uniqueness
/// or expiry. The registry serializes check-then-write sequences itself.
#[async_trait]
pub trait LinkStore: ReadStore {
    /// Inserts the record, replacing any record under the same code.
    async fn put(&self, record: LinkRecord) -> Result<()>;

    /// Deletes the record for a given short code.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;
}
