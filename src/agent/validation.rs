//! Validation rules owned by the agent domain.
//!
//! Name, description, and wallet checks are boolean predicates; the
//! configuration check collects every violation so callers can report them
//! all at once.

use crate::agent::model::{Configuration, CreateAgentInput};
use crate::error::RegistryError;

/// 3-50 chars of `[a-zA-Z0-9_-]`.
pub fn validate_name(name: &str) -> bool {
    (3..=50).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// 10-500 chars.
pub fn validate_description(description: &str) -> bool {
    (10..=500).contains(&description.chars().count())
}

/// Base58 address, 32-44 chars (no `0`, `O`, `I`, `l`).
pub fn validate_wallet_address(address: &str) -> bool {
    (32..=44).contains(&address.len())
        && address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l'))
}

/// `HH:mm`, hours 0-23 with optional leading zero, minutes 00-59.
pub fn validate_clock_time(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return false;
    }
    let (Ok(h), Ok(m)) = (hours.parse::<u8>(), minutes.parse::<u8>()) else {
        return false;
    };
    h <= 23 && m <= 59
}

/// Collect every configuration violation. Empty result means valid.
pub fn validate_configuration(config: &Configuration) -> Vec<String> {
    let mut errors = Vec::new();

    if config.max_transaction_amount <= 0.0 {
        errors.push("Max transaction amount must be positive".to_string());
    }

    if config.daily_transaction_limit <= 0.0 {
        errors.push("Daily transaction limit must be positive".to_string());
    }

    if !(0.0..=100.0).contains(&config.risk_threshold) {
        errors.push("Risk threshold must be between 0 and 100".to_string());
    }

    if config.allowed_tokens.is_empty() {
        errors.push("At least one allowed token must be specified".to_string());
    }

    if let Some(hours) = &config.operating_hours {
        if !validate_clock_time(&hours.start) || !validate_clock_time(&hours.end) {
            errors.push("Operating hours must be in HH:mm format".to_string());
        }
        if hours.timezone.trim().is_empty() {
            errors.push("Operating hours timezone is required".to_string());
        }
    }

    if let Some(email) = &config.notifications.email {
        if !email.contains('@') {
            errors.push("Notification email is not a valid address".to_string());
        }
    }

    if let Some(webhook) = &config.notifications.webhook {
        if !webhook.starts_with("http://") && !webhook.starts_with("https://") {
            errors.push("Notification webhook must be an http(s) URL".to_string());
        }
    }

    errors
}

/// Full validation of a create request.
pub fn validate_create_input(input: &CreateAgentInput) -> Result<(), RegistryError> {
    if !validate_name(&input.name) {
        return Err(RegistryError::validation("Invalid agent name format"));
    }

    if !validate_description(&input.description) {
        return Err(RegistryError::validation("Invalid agent description"));
    }

    let config_errors = validate_configuration(&input.configuration);
    if !config_errors.is_empty() {
        return Err(RegistryError::validation(format!(
            "Configuration errors: {}",
            config_errors.join(", ")
        )));
    }

    if input.capabilities.is_empty() {
        return Err(RegistryError::validation(
            "Agent must have at least one capability",
        ));
    }

    for capability in &input.capabilities {
        if capability.name.trim().is_empty()
            || capability.description.trim().is_empty()
            || capability.version.trim().is_empty()
        {
            return Err(RegistryError::validation(
                "Capability name, description and version are required",
            ));
        }
    }

    Ok(())
}
