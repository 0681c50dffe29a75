//! Record Registry Module
//!
//! This module exposes the registry: the create/list/query operations over the
//! six record collections, and the consistency rules that tie them together.

mod registry;


pub use registry::Registry;
