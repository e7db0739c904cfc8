//! Agent storage port and adapters.
//!
//! The registry only sees [`AgentStore`]; a persistent backend slots in
//! without touching registry logic. The in-memory adapter is the default
//! and the test implementation.

pub mod memory;

use crate::agent::model::Agent;
use crate::error::StorageError;

/// Storage port: keyed records plus a full scan for listing.
pub trait AgentStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Agent>, StorageError>;
    fn put(&self, agent: Agent) -> Result<(), StorageError>;
    /// Returns whether a record was removed.
    fn delete(&self, id: &str) -> Result<bool, StorageError>;
    /// All records in stable key order.
    fn scan(&self) -> Result<Vec<Agent>, StorageError>;
    fn len(&self) -> Result<usize, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

pub use memory::MemoryAgentStore;
