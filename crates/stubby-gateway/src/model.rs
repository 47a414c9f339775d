use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use stubby_core::LinkRecord;

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub url: String,
    #[serde(default)]
    pub custom_code: Option<String>,
    /// Defaults to 30 minutes when absent.
    #[serde(default)]
    pub validity_minutes: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: Timestamp,
    pub validity_minutes: u32,
    pub expires_at: Timestamp,
    pub clicks: u64,
    pub expired: bool,
}

impl LinkResponse {
    pub fn new(record: LinkRecord, base_url: &str, expired: bool) -> Self {
        Self {
            short_url: record.code.to_url(base_url),
            code: record.code.to_string(),
            original_url: record.original_url,
            created_at: record.created_at,
            validity_minutes: record.validity_minutes,
            expires_at: record.expires_at,
            clicks: record.clicks,
            expired,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}
