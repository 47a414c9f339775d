//! The link registry service.
//!
//! [`RegistryService`] implements the [`stubby_core::Registry`] contract on
//! top of any [`stubby_core::LinkStore`] and [`stubby_generator::Generator`].

pub mod service;
pub mod settings;

pub use service::RegistryService;
pub use settings::RegistrySettings;
