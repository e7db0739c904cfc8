//! Error taxonomy for the registry and its HTTP surface.
//!
//! Each variant is a distinct signal with a stable error code and an HTTP
//! status; operations attach structured context that is carried through to
//! the response envelope.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Structured context attached to an error (agent id, owner id, ...).
pub type ErrorContext = Map<String, Value>;

/// Registry error taxonomy.
///
/// `NotFound` deliberately covers both missing resources and access denied
/// on private resources, so existence is never leaked to non-owners.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{message}")]
    Validation {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    Authentication {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    Authorization {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{resource} not found")]
    NotFound {
        resource: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    Conflict {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    RateLimit {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    Blockchain {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    Agent {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    Transaction {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("{message}")]
    Internal {
        message: String,
        context: Option<ErrorContext>,
    },
}

impl RegistryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            context: None,
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            context: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            context: None,
        }
    }

    pub fn agent(message: impl Into<String>) -> Self {
        Self::Agent {
            message: message.into(),
            context: None,
        }
    }

    pub fn blockchain(message: impl Into<String>) -> Self {
        Self::Blockchain {
            message: message.into(),
            context: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Attach structured context, replacing any existing context.
    pub fn with_context(mut self, ctx: ErrorContext) -> Self {
        match &mut self {
            Self::Validation { context, .. }
            | Self::Authentication { context, .. }
            | Self::Authorization { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::RateLimit { context, .. }
            | Self::Blockchain { context, .. }
            | Self::Agent { context, .. }
            | Self::Transaction { context, .. }
            | Self::Internal { context, .. } => *context = Some(ctx),
        }
        self
    }

    /// Stable error code used in the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Authorization { .. } => "AUTHORIZATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND_ERROR",
            Self::Conflict { .. } => "CONFLICT_ERROR",
            Self::RateLimit { .. } => "RATE_LIMIT_ERROR",
            Self::Blockchain { .. } => "BLOCKCHAIN_ERROR",
            Self::Agent { .. } => "AGENT_ERROR",
            Self::Transaction { .. } => "TRANSACTION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Authentication { .. } => 401,
            Self::Authorization { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::RateLimit { .. } => 429,
            Self::Blockchain { .. } => 502,
            Self::Agent { .. } | Self::Transaction { .. } => 422,
            Self::Internal { .. } => 500,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Validation { context, .. }
            | Self::Authentication { context, .. }
            | Self::Authorization { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::RateLimit { context, .. }
            | Self::Blockchain { context, .. }
            | Self::Agent { context, .. }
            | Self::Transaction { context, .. }
            | Self::Internal { context, .. } => context.as_ref(),
        }
    }

    /// Build the uniform error envelope for HTTP responses.
    pub fn envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
                status_code: self.status_code(),
                timestamp: Utc::now().to_rfc3339(),
                request_id: request_id.map(str::to_string),
                context: self.context().cloned(),
            },
        }
    }
}

/// Storage port failure, distinct from domain errors so adapters can report
/// backend problems without choosing an HTTP status themselves.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for RegistryError {
    fn from(err: StorageError) -> Self {
        RegistryError::internal(err.to_string())
    }
}

/// Uniform error response shape: `{success: false, error: {...}}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub status_code: u16,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

/// Shorthand for building an [`ErrorContext`] from key/value pairs.
#[macro_export]
macro_rules! error_context {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut ctx = $crate::error::ErrorContext::new();
        $(ctx.insert($key.to_string(), ::serde_json::json!($value));)*
        ctx
    }};
}
