//! Core configuration, errors, and shared types for the Simplex server.
//!
//! This crate holds the small foundation shared by the HTTP layer and the
//! server binary: environment-driven configuration, the common error type,
//! and the method vocabulary used by the routing layer.

mod config;
mod error;
mod types;

pub use config::ServerConfig;
pub use error::{SimplexError, SimplexResult};
pub use types::Method;
