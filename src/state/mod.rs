//! Record State Module
//!
//! This module holds the six record collections and the stores that persist them.
//! - `Collections`: ordered id → record maps, one per entity kind
//! - `Store`: commit seam shared by the in-memory and SQLite backends

mod collections;
mod database;
mod store;

#[cfg(test)]
mod tests;

pub use collections::{Collections, Write, WriteSet};
pub use database::SqliteStore;
pub use store::{MemoryStore, Store};
