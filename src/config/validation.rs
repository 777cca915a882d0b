//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Pure function over the
//! deserialized config; returns every violation, not just the first.

use std::fmt;

use crate::config::schema::LogwareConfig;

/// One semantic violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn violation(field: &'static str, message: &str) -> ValidationError {
    ValidationError {
        field,
        message: message.to_string(),
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &LogwareConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.notifier.enabled {
        if config.notifier.bot_token.trim().is_empty() {
            errors.push(violation(
                "notifier.bot_token",
                "required when the notifier is enabled",
            ));
        }
        if config.notifier.chat_id == 0 {
            errors.push(violation(
                "notifier.chat_id",
                "required when the notifier is enabled",
            ));
        }
        if config.notifier.api_url.trim().is_empty() {
            errors.push(violation("notifier.api_url", "must not be empty"));
        }
    }
    if config.notifier.timeout_secs == 0 {
        errors.push(violation(
            "notifier.timeout_secs",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
