use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single diagnostic produced while validating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Attribute the violation applies to; `None` for record-level constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub summary: String,
    pub detail: String,
}

impl Violation {
    pub fn attribute(
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            attribute: Some(attribute.into()),
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn record(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            attribute: None,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attr) => write!(f, "{attr}: {}: {}", self.summary, self.detail),
            None => write!(f, "{}: {}", self.summary, self.detail),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors surfaced by entity controllers and the provider registry.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid {entity_type} configuration: {}", join_violations(.violations))]
    Validation {
        entity_type: String,
        violations: Vec<Violation>,
    },

    #[error("Unable to {operation} {entity_type}, got error: {message}")]
    Remote {
        entity_type: String,
        operation: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Remote object not found: {entity_type}/{id}")]
    NotFound { entity_type: String, id: String },

    #[error("Changing {} on {entity_type} requires replacement", .attributes.join(", "))]
    RequiresReplacement {
        entity_type: String,
        attributes: Vec<String>,
    },

    #[error("Unknown entity type: {name}")]
    UnknownEntityType { name: String },

    #[error("Provider misconfigured: {message}")]
    MisconfiguredProvider { message: String },
}

impl ProviderError {
    /// Create a new Validation error carrying every collected violation
    pub fn validation(entity_type: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self::Validation {
            entity_type: entity_type.into(),
            violations,
        }
    }

    /// Create a new Remote error
    pub fn remote(
        entity_type: impl Into<String>,
        operation: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            entity_type: entity_type.into(),
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a new NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a new RequiresReplacement signal
    pub fn requires_replacement(entity_type: impl Into<String>, attributes: Vec<String>) -> Self {
        Self::RequiresReplacement {
            entity_type: entity_type.into(),
            attributes,
        }
    }

    /// Create a new UnknownEntityType error
    pub fn unknown_entity_type(name: impl Into<String>) -> Self {
        Self::UnknownEntityType { name: name.into() }
    }

    /// Create a new MisconfiguredProvider error
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::MisconfiguredProvider {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_requires_replacement(&self) -> bool {
        matches!(self, Self::RequiresReplacement { .. })
    }

    /// Violations carried by a Validation error; empty for other kinds.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Whether the error halts the whole session rather than one entity operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntityType { .. } | Self::MisconfiguredProvider { .. }
        )
    }

    /// Short human-readable heading for diagnostics
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Invalid Configuration",
            Self::Remote { .. } => "Client Error",
            Self::NotFound { .. } => "Remote Object Not Found",
            Self::RequiresReplacement { .. } => "Resource Requires Replacement",
            Self::UnknownEntityType { .. } => "Unknown Entity Type",
            Self::MisconfiguredProvider { .. } => "Provider Configuration Error",
        }
    }

    /// Get error category for logging and user-facing output
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Remote { .. } => ErrorCategory::Remote,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::RequiresReplacement { .. } => ErrorCategory::Replacement,
            Self::UnknownEntityType { .. } => ErrorCategory::UnknownEntityType,
            Self::MisconfiguredProvider { .. } => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Remote,
    NotFound,
    Replacement,
    UnknownEntityType,
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Remote => write!(f, "remote"),
            Self::NotFound => write!(f, "not_found"),
            Self::Replacement => write!(f, "requires_replacement"),
            Self::UnknownEntityType => write!(f, "unknown_entity_type"),
            Self::Configuration => write!(f, "misconfigured_provider"),
        }
    }
}

/// Convenience result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_every_violation() {
        let err = ProviderError::validation(
            "podio_space",
            vec![
                Violation::attribute("privacy", "Invalid attribute value", "must be one of: open, closed"),
                Violation::attribute("name", "Missing required attribute", "`name` is required"),
            ],
        );

        let text = err.to_string();
        assert!(text.starts_with("Invalid podio_space configuration"));
        assert!(text.contains("privacy"));
        assert!(text.contains("name"));
        assert_eq!(err.violations().len(), 2);
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_remote_error_display() {
        let err = ProviderError::remote("podio_space", "create", Some(403), "forbidden");
        assert_eq!(
            err.to_string(),
            "Unable to create podio_space, got error: forbidden"
        );
        assert_eq!(err.category().to_string(), "remote");
        assert!(err.violations().is_empty());
    }

    #[test]
    fn test_requires_replacement_display() {
        let err = ProviderError::requires_replacement("podio_space", vec!["org_id".into()]);
        assert_eq!(
            err.to_string(),
            "Changing org_id on podio_space requires replacement"
        );
        assert!(err.is_requires_replacement());
        assert_eq!(err.category().to_string(), "requires_replacement");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ProviderError::unknown_entity_type("podio_widget").is_fatal());
        assert!(ProviderError::misconfigured("missing client_id").is_fatal());
        assert!(!ProviderError::not_found("podio_app", "1").is_fatal());
        assert!(!ProviderError::validation("podio_app", vec![]).is_fatal());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(ErrorCategory::UnknownEntityType.to_string(), "unknown_entity_type");
        assert_eq!(ErrorCategory::Configuration.to_string(), "misconfigured_provider");
    }

    #[test]
    fn test_record_level_violation_display() {
        let v = Violation::record("Ambiguous search pattern", "Only set one of `url_label` or `org_id`, not both.");
        assert_eq!(
            v.to_string(),
            "Ambiguous search pattern: Only set one of `url_label` or `org_id`, not both."
        );
    }
}
