use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub const MIN_VALIDITY_MINUTES: u32 = 1;
pub const MAX_VALIDITY_MINUTES: u32 = 1440;
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

/// A stored link: the short code, where it points, and its validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The code the link is reachable under.
    pub code: ShortCode,
    /// The destination URL, validated at creation time.
    pub original_url: String,
    pub created_at: Timestamp,
    pub validity_minutes: u32,
    /// Always `created_at + validity_minutes`; never changes after creation.
    pub expires_at: Timestamp,
    /// Number of successful resolutions.
    pub clicks: u64,
}

impl LinkRecord {
    /// Whether the record is past its validity window at `now`.
    ///
    /// A record is still active at exactly `expires_at`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}
