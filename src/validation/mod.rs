//! Payload Validation Module
//!
//! This module checks request payloads before the registry touches any collection.
//! Performs name/email shape checks and numeric range checks.

mod validator;

#[cfg(test)]
mod tests;

pub use validator::Validator;
