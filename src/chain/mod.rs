//! Chain deployment port.
//!
//! Deployment is an integration seam: the registry drives a [`ChainClient`]
//! and records the outcome. The simulated adapter is the default — it
//! fabricates contract and transaction identifiers without touching any
//! network, which is all the registry needs outside production.

use crate::agent::model::{Agent, DeploymentConfig};
use crate::error::RegistryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

/// Outcome of publishing an agent's contract.
#[derive(Debug, Clone)]
pub struct ChainDeployment {
    pub contract_address: String,
    pub transaction_id: String,
    pub deployed_at: DateTime<Utc>,
}

/// Port for contract publication. A real implementation would submit the
/// program to the configured network; failures surface as
/// [`RegistryError::Blockchain`].
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn deploy(
        &self,
        agent: &Agent,
        config: &DeploymentConfig,
    ) -> Result<ChainDeployment, RegistryError>;
}

/// Simulated chain: synthetic identifiers, no I/O, never fails.
#[derive(Debug, Default)]
pub struct SimulatedChain;

impl SimulatedChain {
    pub fn new() -> Self {
        Self
    }

    fn synthetic_contract_address() -> String {
        let hex = Uuid::now_v7().simple().to_string();
        format!("{}...{}", &hex[..9], &hex[hex.len() - 9..])
    }
}

#[async_trait]
impl ChainClient for SimulatedChain {
    async fn deploy(
        &self,
        agent: &Agent,
        config: &DeploymentConfig,
    ) -> Result<ChainDeployment, RegistryError> {
        let deployment = ChainDeployment {
            contract_address: Self::synthetic_contract_address(),
            transaction_id: crate::ids::transaction_id(),
            deployed_at: Utc::now(),
        };

        info!(
            agent_id = %agent.id,
            network = %config.network,
            contract_address = %deployment.contract_address,
            "simulated contract deployment"
        );

        Ok(deployment)
    }
}
