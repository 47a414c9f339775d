//! HTTP front end for the link registry.
//!
//! Maps the [`stubby_core::Registry`] operations onto a small JSON API plus
//! a redirect endpoint. The gateway owns no link state of its own.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
