//! Storage backends for the link registry.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
pub use stubby_core::store::{LinkStore, ReadStore, Result};
pub use stubby_core::StorageError;

/// Schema for the MySQL backend.
pub const MYSQL_SCHEMA: &str = include_str!("../ddl/mysql/links.sql");
