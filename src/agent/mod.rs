//! Agent Domain Model
//!
//! The agent entity and everything owned by it: value objects, input types,
//! validation rules, the status state machine, the reputation formula, and
//! the listing query types.

pub mod model;
pub mod query;
pub mod reputation;
pub mod status;
pub mod validation;

pub use model::{
    Agent, AgentStatus, AgentType, Capability, CapabilitySpec, Configuration, ConfigurationPatch,
    CreateAgentInput, DeploymentConfig, DeploymentResult, Network, Notifications, OperatingHours,
    Reputation, Review, Statistics, UpdateAgentInput,
};
pub use query::{AgentFilters, AgentPage, SortBy, SortOrder};
pub use reputation::ReputationSample;
pub use status::{StatusEvent, TransitionError};
