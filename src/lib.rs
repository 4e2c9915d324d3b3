pub mod config;
pub mod core;

pub use crate::config::RemoteConfig;
pub use crate::core::db::{GroupDb, RemoteConnector, StoreMode};
pub use crate::core::error::{StoreError, ValidationError};
