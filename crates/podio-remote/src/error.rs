//! Error types for remote API calls.

use podio_core::ProviderError;

/// Errors that can occur while calling the remote API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The requested object does not exist (or no longer exists).
    #[error("Object not found: {entity}/{id}")]
    NotFound {
        /// The kind of object that was requested.
        entity: String,
        /// The identifier that did not resolve.
        id: String,
    },

    /// The API rejected the request.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error description reported by the API.
        message: String,
    },

    /// The request never produced a response.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The credentials were rejected.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Description of the authentication failure.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },
}

impl RemoteError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Api` error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `Authentication` error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Converts this error into the provider-level error for an entity operation.
    ///
    /// `NotFound` stays a `NotFound` keyed by the caller's identifier so the host
    /// can drop local tracking; everything else becomes a `Remote` error.
    #[must_use]
    pub fn into_provider_error(
        self,
        entity_type: &str,
        operation: &str,
        id: &str,
    ) -> ProviderError {
        match self {
            Self::NotFound { .. } => ProviderError::not_found(entity_type, id),
            other => {
                let status = other.status();
                ProviderError::remote(entity_type, operation, status, other.to_string())
            }
        }
    }
}
