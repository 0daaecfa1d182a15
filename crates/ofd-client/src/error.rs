//! # Client Error Types
//!
//! Error types for remote calls and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Decode                 │ │
//! │  │  ConfigLoad     │  │  Timeout        │  │  Normalize (core)       │ │
//! │  │                 │  │  HttpStatus     │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │ Authentication  │                                                   │
//! │  │                 │                                                   │
//! │  │  AuthFailed     │                                                   │
//! │  │  NotAuthed      │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ofd_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type OfdResult<T> = Result<T, OfdError>;

/// Error type covering every failure of a remote call or client setup.
#[derive(Debug, Error)]
pub enum OfdError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid OFD configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Network failure: DNS, connect, TLS, broken body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not finish within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { status: u16, url: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Response body was not the expected JSON.
    #[error("Malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// A ticket field could not be interpreted.
    #[error("Document {document}: {source}")]
    Normalize {
        document: String,
        #[source]
        source: CoreError,
    },

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    /// The login call failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A request needed a token but none has been obtained yet.
    #[error("Not authenticated. Call authenticate() first.")]
    NotAuthenticated,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for OfdError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            return OfdError::Timeout { url };
        }
        if let Some(status) = err.status() {
            return OfdError::HttpStatus {
                status: status.as_u16(),
                url,
            };
        }
        if err.is_decode() {
            return OfdError::Decode {
                url,
                reason: err.to_string(),
            };
        }
        if err.is_builder() {
            return OfdError::InvalidConfig(format!("Invalid request URL {url}: {err}"));
        }
        OfdError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for OfdError {
    fn from(err: std::io::Error) -> Self {
        OfdError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for OfdError {
    fn from(err: toml::de::Error) -> Self {
        OfdError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl OfdError {
    /// Returns true if the failure happened on the wire rather than in the payload.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            OfdError::Transport(_) | OfdError::Timeout { .. } | OfdError::HttpStatus { .. }
        )
    }

    /// Returns true if the service rejected our credentials or token.
    pub fn is_auth_error(&self) -> bool {
        match self {
            OfdError::AuthenticationFailed(_) | OfdError::NotAuthenticated => true,
            OfdError::HttpStatus { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(self, OfdError::InvalidConfig(_) | OfdError::ConfigLoadFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(OfdError::Transport("connection refused".into()).is_transport_error());
        assert!(OfdError::Timeout { url: "u".into() }.is_transport_error());
        assert!(!OfdError::NotAuthenticated.is_transport_error());

        let forbidden = OfdError::HttpStatus {
            status: 403,
            url: "https://org.1-ofd.ru/api/retail-places/kkms".into(),
        };
        assert!(forbidden.is_transport_error());
        assert!(forbidden.is_auth_error());
        assert!(!OfdError::HttpStatus { status: 500, url: String::new() }.is_auth_error());

        assert!(OfdError::InvalidConfig("timeout_secs".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = OfdError::HttpStatus {
            status: 502,
            url: "https://org.1-ofd.ru/api/ticket/doc1".into(),
        };
        assert_eq!(err.to_string(), "https://org.1-ofd.ru/api/ticket/doc1 returned HTTP 502");

        let err = OfdError::Normalize {
            document: "doc1".into(),
            source: CoreError::InvalidQuantity {
                item: "Milk".into(),
                value: "two".into(),
            },
        };
        assert_eq!(err.to_string(), "Document doc1: Invalid quantity 'two' for item 'Milk'");
    }
}
