//! Status state machine.
//!
//! All status changes flow through [`transition`]; a (status, event) pair
//! absent from the table is an error carrying both sides. `Terminated` is
//! declared on the enum for wire compatibility but no event produces it.

use crate::agent::model::AgentStatus;
use std::fmt;
use thiserror::Error;

/// Events that may change an agent's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    Deploy,
    DeployFailed,
    Pause,
    Resume,
    Suspend,
}

impl StatusEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::DeployFailed => "deploy_failed",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Suspend => "suspend",
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (status, event) pair with no edge in the table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot {event} an agent in {from} status")]
pub struct TransitionError {
    pub from: AgentStatus,
    pub event: StatusEvent,
}

/// The transition table. Suspension is allowed from every status; nothing
/// transitions into `Terminated`.
pub fn transition(
    current: AgentStatus,
    event: StatusEvent,
) -> Result<AgentStatus, TransitionError> {
    match (current, event) {
        (AgentStatus::Pending, StatusEvent::Deploy) => Ok(AgentStatus::Active),
        (AgentStatus::Pending, StatusEvent::DeployFailed) => Ok(AgentStatus::Error),
        (AgentStatus::Active, StatusEvent::Pause) => Ok(AgentStatus::Paused),
        (AgentStatus::Paused, StatusEvent::Resume) => Ok(AgentStatus::Active),
        (_, StatusEvent::Suspend) => Ok(AgentStatus::Suspended),
        (from, event) => Err(TransitionError { from, event }),
    }
}

/// Deletion guard: anything but `active` may be deleted.
pub fn deletable(status: AgentStatus) -> bool {
    status != AgentStatus::Active
}
