//! This crate implements a record registry for a beekeeping crowdfunding platform.
//! It keeps beekeeper and investor profiles, hives, honey batches, carbon credits and
//! investments consistent with each other, and serves them over a JSON-RPC API.

pub mod types; // Record, status and payload types shared across the crate.
pub mod error; // The closed error taxonomy returned by every operation.
pub mod validation; // Shape and range checks on incoming payloads.
pub mod state; // The six record collections and the stores that persist them.
pub mod registry; // Create/list/query operations and their cross-record rules.
pub mod api; // JSON-RPC server exposing the registry.
pub mod config; // Defines and loads service configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use error::RegistryError;
pub use registry::Registry;
