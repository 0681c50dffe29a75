//! API Module
//!
//! This module handles the JSON-RPC API through which clients call registry
//! operations.

mod server;


pub use server::{CALLER_HEADER, Server};
