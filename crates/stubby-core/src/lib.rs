//! Core types and traits for the Stubby link registry.
//!
//! This crate provides the types shared by the registry service, the
//! storage backends and the HTTP gateway: short codes, link records,
//! the storage port, the error taxonomy and the [`Registry`] contract.

pub mod clock;
pub mod error;
pub mod record;
pub mod registry;
pub mod shortcode;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CreateError, LookupError, StorageError};
pub use record::{
    LinkRecord, DEFAULT_VALIDITY_MINUTES, MAX_VALIDITY_MINUTES, MIN_VALIDITY_MINUTES,
};
pub use registry::{CreateParams, Registry, Resolution};
pub use shortcode::ShortCode;
pub use store::{LinkStore, ReadStore};
