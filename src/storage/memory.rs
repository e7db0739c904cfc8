//! In-memory agent store.
//!
//! Process-wide state, initialized empty, never persisted; a restart loses
//! all agents. A `BTreeMap` keeps scan order stable across calls (agent ids
//! are time-prefixed, so key order is creation order).

use crate::agent::model::Agent;
use crate::error::StorageError;
use crate::storage::AgentStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryAgentStore {
    agents: RwLock<BTreeMap<String, Agent>>,
}

impl MemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgentStore for MemoryAgentStore {
    fn get(&self, id: &str) -> Result<Option<Agent>, StorageError> {
        Ok(self.agents.read().get(id).cloned())
    }

    fn put(&self, agent: Agent) -> Result<(), StorageError> {
        self.agents.write().insert(agent.id.clone(), agent);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.agents.write().remove(id).is_some())
    }

    fn scan(&self) -> Result<Vec<Agent>, StorageError> {
        Ok(self.agents.read().values().cloned().collect())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.agents.read().len())
    }
}
