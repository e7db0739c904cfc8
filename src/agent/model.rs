//! Agent entity and its value objects.
//!
//! Wire format is camelCase JSON, matching the public API of the registry.

use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Free-form JSON parameters carried on capabilities and configuration.
pub type Parameters = Map<String, Value>;

/// Agent categories supported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Trading,
    DataAnalysis,
    ServiceProvider,
    Marketplace,
    Oracle,
    Custom,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trading => "trading",
            Self::DataAnalysis => "data_analysis",
            Self::ServiceProvider => "service_provider",
            Self::Marketplace => "marketplace",
            Self::Oracle => "oracle",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for AgentType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trading" => Ok(Self::Trading),
            "data_analysis" => Ok(Self::DataAnalysis),
            "service_provider" => Ok(Self::ServiceProvider),
            "marketplace" => Ok(Self::Marketplace),
            "oracle" => Ok(Self::Oracle),
            "custom" => Ok(Self::Custom),
            other => Err(RegistryError::validation(format!(
                "unknown agent type: {other}"
            ))),
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an agent. Transitions are owned by
/// [`crate::agent::status`]; nothing else writes this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Pending,
    Active,
    Paused,
    Suspended,
    /// Declared for wire compatibility; no operation produces it.
    Terminated,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Suspended => "suspended",
            Self::Terminated => "terminated",
            Self::Error => "error",
        }
    }
}

impl FromStr for AgentStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "suspended" => Ok(Self::Suspended),
            "terminated" => Ok(Self::Terminated),
            "error" => Ok(Self::Error),
            other => Err(RegistryError::validation(format!(
                "unknown agent status: {other}"
            ))),
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target network for deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Devnet,
    Testnet,
    MainnetBeta,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::MainnetBeta => "mainnet-beta",
        }
    }
}

impl FromStr for Network {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Self::Devnet),
            "testnet" => Ok(Self::Testnet),
            "mainnet-beta" => Ok(Self::MainnetBeta),
            other => Err(RegistryError::validation(format!(
                "unknown network: {other}"
            ))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, versioned function the agent claims to perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

/// Capability as supplied at creation time; the registry assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CapabilitySpec {
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

/// Daily operating window, times in `HH:mm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OperatingHours {
    pub start: String,
    pub end: String,
    pub timezone: String,
}

/// Notification endpoints, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Notifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
}

/// Operating limits and risk settings. Invariants are enforced by
/// [`crate::agent::validation::validate_configuration`] at every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Configuration {
    pub max_transaction_amount: f64,
    pub daily_transaction_limit: f64,
    pub allowed_tokens: Vec<String>,
    pub risk_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_parameters: Option<Parameters>,
}

/// Partial configuration supplied on update; merged over the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigurationPatch {
    #[serde(default)]
    pub max_transaction_amount: Option<f64>,
    #[serde(default)]
    pub daily_transaction_limit: Option<f64>,
    #[serde(default)]
    pub allowed_tokens: Option<Vec<String>>,
    #[serde(default)]
    pub risk_threshold: Option<f64>,
    #[serde(default)]
    pub operating_hours: Option<OperatingHours>,
    #[serde(default)]
    pub notifications: Option<Notifications>,
    #[serde(default)]
    pub custom_parameters: Option<Parameters>,
}

impl ConfigurationPatch {
    /// Nested merge: provided fields replace the stored ones, everything
    /// else is kept.
    pub fn merged(&self, base: &Configuration) -> Configuration {
        Configuration {
            max_transaction_amount: self
                .max_transaction_amount
                .unwrap_or(base.max_transaction_amount),
            daily_transaction_limit: self
                .daily_transaction_limit
                .unwrap_or(base.daily_transaction_limit),
            allowed_tokens: self
                .allowed_tokens
                .clone()
                .unwrap_or_else(|| base.allowed_tokens.clone()),
            risk_threshold: self.risk_threshold.unwrap_or(base.risk_threshold),
            operating_hours: self
                .operating_hours
                .clone()
                .or_else(|| base.operating_hours.clone()),
            notifications: self
                .notifications
                .clone()
                .unwrap_or_else(|| base.notifications.clone()),
            custom_parameters: self
                .custom_parameters
                .clone()
                .or_else(|| base.custom_parameters.clone()),
        }
    }
}

/// A rating left by a counterparty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub reviewer_id: String,
    /// 1-5
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Derived performance metrics, recomputed by the reputation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reputation {
    /// 0-100
    pub score: u32,
    pub total_transactions: u64,
    pub successful_transactions: u64,
    /// Milliseconds
    pub average_response_time: f64,
    /// Percentage
    pub uptime: f64,
    pub last_updated: DateTime<Utc>,
    pub reviews: Vec<Review>,
}

impl Reputation {
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            score: 0,
            total_transactions: 0,
            successful_transactions: 0,
            average_response_time: 0.0,
            uptime: 0.0,
            last_updated: now,
            reviews: Vec::new(),
        }
    }
}

/// Commerce statistics accumulated over the agent's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_earnings: f64,
    pub transactions_count: u64,
    pub average_transaction_value: f64,
    pub active_contracts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Statistics {
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            total_earnings: 0.0,
            transactions_count: 0,
            average_transaction_value: 0.0,
            active_contracts: 0,
            last_activity_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The registry's sole entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub status: AgentStatus,

    pub owner_id: String,
    pub owner_wallet: String,

    pub network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,

    pub capabilities: Vec<Capability>,
    pub configuration: Configuration,

    pub reputation: Reputation,
    pub statistics: Statistics,

    pub version: String,
    pub tags: Vec<String>,
    pub is_public: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Input for the create operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAgentInput {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub network: Network,
    pub capabilities: Vec<CapabilitySpec>,
    pub configuration: Configuration,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// Input for the update operation. Status is deliberately absent: all
/// status changes go through the transition operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAgentInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub configuration: Option<ConfigurationPatch>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl UpdateAgentInput {
    /// Names of the fields present, for operation logging.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.configuration.is_some() {
            fields.push("configuration");
        }
        if self.tags.is_some() {
            fields.push("tags");
        }
        if self.is_public.is_some() {
            fields.push("isPublic");
        }
        fields
    }
}

/// Parameters for the deploy operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeploymentConfig {
    pub network: Network,
    pub wallet: String,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub initial_funding: Option<f64>,
    #[serde(default)]
    pub compute_units: Option<u64>,
    #[serde(default)]
    pub priority_fee: Option<f64>,
}

/// Outcome of a deploy operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub deployed_at: DateTime<Utc>,
}
