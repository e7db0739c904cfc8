//! Agent Registry
//!
//! The one stateful component: every operation on agent records goes
//! through here. Reads hit the store directly; mutations are serialized
//! behind a single async lock so each read-modify-write is atomic even
//! when the deploy path awaits the chain client in the middle.

use crate::agent::model::{
    Agent, AgentStatus, Capability, CreateAgentInput, DeploymentConfig, DeploymentResult,
    Statistics, UpdateAgentInput,
};
use crate::agent::query::{AgentFilters, AgentPage};
use crate::agent::reputation::{self, ReputationSample};
use crate::agent::status::{self, StatusEvent};
use crate::agent::validation;
use crate::chain::{ChainClient, SimulatedChain};
use crate::error::RegistryError;
use crate::error_context;
use crate::ids;
use crate::storage::{AgentStore, MemoryAgentStore};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub struct AgentRegistry {
    store: Arc<dyn AgentStore>,
    chain: Arc<dyn ChainClient>,
    /// Serializes all mutating operations; reads go straight to the store.
    write_lock: Mutex<()>,
}

impl AgentRegistry {
    /// Registry over the in-memory store and the simulated chain.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(MemoryAgentStore::new()), Arc::new(SimulatedChain))
    }

    pub fn with_parts(store: Arc<dyn AgentStore>, chain: Arc<dyn ChainClient>) -> Self {
        Self {
            store,
            chain,
            write_lock: Mutex::new(()),
        }
    }

    /// Register a new agent. Status starts at `pending`; reputation and
    /// statistics start zeroed.
    pub async fn create(
        &self,
        input: CreateAgentInput,
        owner_id: &str,
        owner_wallet: &str,
    ) -> Result<Agent, RegistryError> {
        info!(
            owner_id = %owner_id,
            agent_name = %input.name,
            agent_type = %input.agent_type,
            "creating agent"
        );

        validation::validate_create_input(&input)?;

        let _guard = self.write_lock.lock().await;

        let duplicate = self
            .store
            .scan()?
            .into_iter()
            .any(|a| a.name == input.name && a.owner_id == owner_id);
        if duplicate {
            return Err(RegistryError::conflict(format!(
                "Agent with name '{}' already exists",
                input.name
            ))
            .with_context(error_context! {
                "agentName" => input.name,
                "ownerId" => owner_id,
            }));
        }

        let now = Utc::now();
        let agent = Agent {
            id: ids::agent_id(),
            name: input.name,
            description: input.description,
            agent_type: input.agent_type,
            status: AgentStatus::Pending,
            owner_id: owner_id.to_string(),
            owner_wallet: owner_wallet.to_string(),
            network: input.network,
            contract_address: None,
            program_id: None,
            capabilities: input
                .capabilities
                .into_iter()
                .map(|spec| Capability {
                    id: ids::capability_id(),
                    name: spec.name,
                    description: spec.description,
                    version: spec.version,
                    parameters: spec.parameters,
                })
                .collect(),
            configuration: input.configuration,
            reputation: crate::agent::model::Reputation::initial(now),
            statistics: Statistics::initial(now),
            version: "1.0.0".to_string(),
            tags: input.tags.unwrap_or_default(),
            is_public: input.is_public.unwrap_or(false),
            created_at: now,
            updated_at: now,
            deployed_at: None,
            last_active_at: None,
        };

        self.store.put(agent.clone())?;

        info!(agent_id = %agent.id, owner_id = %owner_id, "agent created");
        Ok(agent)
    }

    /// Fetch an agent the requester is allowed to see. A private agent is
    /// reported as not found to anyone but its owner.
    pub async fn get(
        &self,
        agent_id: &str,
        requester: Option<&str>,
    ) -> Result<Agent, RegistryError> {
        let agent = self
            .store
            .get(agent_id)?
            .ok_or_else(|| not_found(agent_id))?;

        if !agent.is_public && requester != Some(agent.owner_id.as_str()) {
            return Err(not_found(agent_id));
        }

        Ok(agent)
    }

    /// Owner-only partial update. Name, description, and the merged
    /// configuration are re-validated; nothing is applied on failure.
    pub async fn update(
        &self,
        agent_id: &str,
        input: UpdateAgentInput,
        requester: &str,
    ) -> Result<Agent, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut agent = self.owned(agent_id, requester)?;

        info!(
            agent_id = %agent_id,
            owner_id = %requester,
            updates = ?input.changed_fields(),
            "updating agent"
        );

        if let Some(name) = &input.name {
            if !validation::validate_name(name) {
                return Err(RegistryError::validation("Invalid agent name format"));
            }
            if *name != agent.name {
                let taken = self
                    .store
                    .scan()?
                    .into_iter()
                    .any(|a| a.id != agent.id && a.name == *name && a.owner_id == agent.owner_id);
                if taken {
                    return Err(RegistryError::conflict(format!(
                        "Agent with name '{name}' already exists"
                    ))
                    .with_context(error_context! {
                        "agentName" => name,
                        "ownerId" => requester,
                    }));
                }
            }
        }

        if let Some(description) = &input.description {
            if !validation::validate_description(description) {
                return Err(RegistryError::validation("Invalid agent description"));
            }
        }

        let merged_configuration = match &input.configuration {
            Some(patch) => {
                let merged = patch.merged(&agent.configuration);
                let errors = validation::validate_configuration(&merged);
                if !errors.is_empty() {
                    return Err(RegistryError::validation(format!(
                        "Configuration errors: {}",
                        errors.join(", ")
                    )));
                }
                Some(merged)
            }
            None => None,
        };

        if let Some(name) = input.name {
            agent.name = name;
        }
        if let Some(description) = input.description {
            agent.description = description;
        }
        if let Some(configuration) = merged_configuration {
            agent.configuration = configuration;
        }
        if let Some(tags) = input.tags {
            agent.tags = tags;
        }
        if let Some(is_public) = input.is_public {
            agent.is_public = is_public;
        }
        agent.updated_at = Utc::now();

        self.store.put(agent.clone())?;

        info!(agent_id = %agent_id, owner_id = %requester, "agent updated");
        Ok(agent)
    }

    /// Owner-only permanent removal. Active agents must be paused first.
    pub async fn delete(&self, agent_id: &str, requester: &str) -> Result<(), RegistryError> {
        let _guard = self.write_lock.lock().await;
        let agent = self.owned(agent_id, requester)?;

        if !status::deletable(agent.status) {
            return Err(RegistryError::agent(
                "Cannot delete active agent. Please pause it first.",
            )
            .with_context(error_context! {
                "agentId" => agent_id,
                "status" => agent.status.as_str(),
            }));
        }

        self.store.delete(agent_id)?;

        info!(agent_id = %agent_id, owner_id = %requester, "agent deleted");
        Ok(())
    }

    /// Filtered, sorted, paginated listing. `total` counts all matches
    /// before the pagination window.
    pub async fn list(&self, filters: &AgentFilters) -> Result<AgentPage, RegistryError> {
        let mut agents: Vec<Agent> = self
            .store
            .scan()?
            .into_iter()
            .filter(|a| filters.matches(a))
            .collect();

        let total = agents.len();
        filters.sort(&mut agents);

        let agents = agents
            .into_iter()
            .skip(filters.offset())
            .take(filters.limit())
            .collect();

        Ok(AgentPage { agents, total })
    }

    /// Owner-only deployment, valid only from `pending`. A chain failure
    /// forces the agent into `error` status before the failure propagates.
    pub async fn deploy(
        &self,
        agent_id: &str,
        config: DeploymentConfig,
        requester: &str,
    ) -> Result<DeploymentResult, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut agent = self.owned(agent_id, requester)?;

        if agent.status != AgentStatus::Pending {
            return Err(RegistryError::agent(format!(
                "Agent must be in pending status to deploy. Current status: {}",
                agent.status
            ))
            .with_context(error_context! {
                "agentId" => agent_id,
                "currentStatus" => agent.status.as_str(),
            }));
        }

        info!(
            agent_id = %agent_id,
            owner_id = %requester,
            network = %config.network,
            wallet = %config.wallet,
            "deploying agent"
        );

        match self.chain.deploy(&agent, &config).await {
            Ok(deployment) => {
                agent.status = status::transition(agent.status, StatusEvent::Deploy)
                    .map_err(|e| RegistryError::agent(e.to_string()))?;
                agent.contract_address = Some(deployment.contract_address.clone());
                agent.deployed_at = Some(deployment.deployed_at);
                agent.updated_at = Utc::now();
                self.store.put(agent)?;

                info!(
                    agent_id = %agent_id,
                    owner_id = %requester,
                    contract_address = %deployment.contract_address,
                    transaction_id = %deployment.transaction_id,
                    "agent deployed"
                );

                Ok(DeploymentResult {
                    success: true,
                    contract_address: Some(deployment.contract_address),
                    transaction_id: Some(deployment.transaction_id),
                    error: None,
                    deployed_at: deployment.deployed_at,
                })
            }
            Err(cause) => {
                error!(
                    agent_id = %agent_id,
                    owner_id = %requester,
                    error = %cause,
                    "agent deployment failed"
                );

                agent.status = status::transition(agent.status, StatusEvent::DeployFailed)
                    .map_err(|e| RegistryError::agent(e.to_string()))?;
                agent.updated_at = Utc::now();
                self.store.put(agent)?;

                Err(RegistryError::agent("Agent deployment failed").with_context(
                    error_context! {
                        "agentId" => agent_id,
                        "error" => cause.to_string(),
                    },
                ))
            }
        }
    }

    /// Owner-only `active -> paused`.
    pub async fn pause(&self, agent_id: &str, requester: &str) -> Result<Agent, RegistryError> {
        self.apply_transition(agent_id, StatusEvent::Pause, requester)
            .await
    }

    /// Owner-only `paused -> active`.
    pub async fn resume(&self, agent_id: &str, requester: &str) -> Result<Agent, RegistryError> {
        self.apply_transition(agent_id, StatusEvent::Resume, requester)
            .await
    }

    /// Administrative suspension: valid from any status, bypasses the
    /// owner check. The reason is recorded in the operation log only.
    pub async fn suspend(&self, agent_id: &str, reason: &str) -> Result<Agent, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut agent = self
            .store
            .get(agent_id)?
            .ok_or_else(|| not_found(agent_id))?;

        let previous = agent.status;
        agent.status = status::transition(agent.status, StatusEvent::Suspend)
            .map_err(|e| RegistryError::agent(e.to_string()))?;
        agent.updated_at = Utc::now();
        self.store.put(agent.clone())?;

        info!(
            agent_id = %agent_id,
            reason = %reason,
            previous_status = %previous,
            "agent suspended"
        );
        Ok(agent)
    }

    /// Visibility-checked read of the statistics block.
    pub async fn statistics(
        &self,
        agent_id: &str,
        requester: Option<&str>,
    ) -> Result<Statistics, RegistryError> {
        Ok(self.get(agent_id, requester).await?.statistics)
    }

    /// Evaluator capability: recompute the reputation score from fresh
    /// metrics. Not owner-gated.
    pub async fn update_reputation(
        &self,
        agent_id: &str,
        sample: ReputationSample,
    ) -> Result<Agent, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut agent = self
            .store
            .get(agent_id)?
            .ok_or_else(|| not_found(agent_id))?;

        let new_score = reputation::score(&sample);
        let now = Utc::now();

        agent.reputation.score = new_score;
        agent.reputation.average_response_time = sample.response_time;
        agent.reputation.uptime = sample.uptime;
        agent.reputation.last_updated = now;
        agent.last_active_at = Some(now);
        agent.updated_at = now;
        self.store.put(agent.clone())?;

        info!(
            agent_id = %agent_id,
            new_score = new_score,
            success_rate = sample.success_rate,
            response_time = sample.response_time,
            uptime = sample.uptime,
            transaction_count = sample.transaction_count,
            "reputation updated"
        );
        Ok(agent)
    }

    /// Shared owner-relationship guard. Non-owners get the same not-found
    /// signal as a missing agent so private existence is never leaked.
    fn owned(&self, agent_id: &str, requester: &str) -> Result<Agent, RegistryError> {
        let agent = self
            .store
            .get(agent_id)?
            .ok_or_else(|| not_found(agent_id))?;

        if agent.owner_id != requester {
            return Err(not_found(agent_id));
        }

        Ok(agent)
    }

    async fn apply_transition(
        &self,
        agent_id: &str,
        event: StatusEvent,
        requester: &str,
    ) -> Result<Agent, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut agent = self.owned(agent_id, requester)?;

        let previous = agent.status;
        agent.status = status::transition(agent.status, event).map_err(|e| {
            RegistryError::agent(e.to_string()).with_context(error_context! {
                "agentId" => agent_id,
                "currentStatus" => previous.as_str(),
            })
        })?;
        agent.updated_at = Utc::now();
        self.store.put(agent.clone())?;

        info!(
            agent_id = %agent_id,
            owner_id = %requester,
            operation = %event,
            previous_status = %previous,
            new_status = %agent.status,
            "agent status changed"
        );
        Ok(agent)
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(agent_id: &str) -> RegistryError {
    RegistryError::not_found("Agent").with_context(error_context! { "agentId" => agent_id })
}
