use super::collections::{Collections, WriteSet};
use crate::error::Result;
use std::future::Future;

/// Backing store for the registry's collections
///
/// Reads go straight to `collections()`. Writes arrive as a complete `WriteSet`
/// after validation has passed; a store either applies the whole set or returns
/// an error having applied none of it.
pub trait Store {
    fn collections(&self) -> &Collections;

    fn commit(&mut self, writes: WriteSet) -> impl Future<Output = Result<()>> + Send;
}

/// Purely in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Collections,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn collections(&self) -> &Collections {
        &self.collections
    }

    async fn commit(&mut self, writes: WriteSet) -> Result<()> {
        for write in writes {
            self.collections.apply(write);
        }
        Ok(())
    }
}
