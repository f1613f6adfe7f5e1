/* src/error.rs */

use thiserror::Error;

/// Result type alias for operations that may fail with `GeoIpError`.
pub type Result<T> = std::result::Result<T, GeoIpError>;

/// Errors that can occur while resolving, validating or looking up an address.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoIpError {
    /// Input is not a well-formed dotted-quad IPv4 address.
    #[error("Invalid IP address format")]
    MalformedAddress(String),

    /// The query interface was invoked without an `ip` parameter.
    #[error("IP address is required")]
    MissingParameter,

    /// One or more octet cells were empty at submit time.
    #[error("Please enter a complete IP address")]
    IncompleteEntry,

    /// The lookup provider reported a failure or could not be reached.
    #[error("{context}: {reason}")]
    ProviderFailure { context: String, reason: String },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GeoIpError {
    /// Provider failure while resolving a specific address.
    pub fn lookup_failed(ip: &str, reason: impl Into<String>) -> Self {
        Self::ProviderFailure {
            context: format!("Failed to get location for IP {ip}"),
            reason: reason.into(),
        }
    }

    /// Provider failure while resolving the server's own egress address.
    pub fn current_lookup_failed(reason: impl Into<String>) -> Self {
        Self::ProviderFailure {
            context: "Failed to get current IP location".to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}
