//! Failure kinds of provider-facing calls.
//!
//! Every outbound request (metadata providers, the watch-link source, the
//! secondary lookup) reports failure through [`ProviderError`]. Callers match
//! on it and turn it into a "not found" outcome; it is never shown to users.

/// Why a call to an external provider did not produce a usable result.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider could not be reached or did not answer in time.
    #[error("{provider} unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: u16,
    },

    /// The response body or markup had an unexpected shape.
    #[error("{provider} response could not be parsed: {reason}")]
    Parse {
        provider: &'static str,
        reason: String,
    },

    /// The provider has no credentials configured.
    #[error("{provider} is not configured")]
    NotConfigured { provider: &'static str },
}

impl ProviderError {
    /// Classify a transport-level `reqwest` failure.
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                provider,
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::Parse {
                provider,
                reason: err.to_string(),
            };
        }
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        Self::Unavailable { provider, reason }
    }

    /// Name of the provider that failed.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Unavailable { provider, .. }
            | Self::Status { provider, .. }
            | Self::Parse { provider, .. }
            | Self::NotConfigured { provider } => provider,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A command was invoked without something it needs. Detected before any
/// outbound call and answered with a corrective prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("/{command} needs an argument")]
    MissingArgument { command: &'static str },
}
