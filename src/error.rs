use thiserror::Error;

use crate::fault::FaultKind;

/// Maximum characters of a response body to include in log output.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when using the Marketo SDK.
#[derive(Debug, Error)]
pub enum MktError {
    /// HTTP/network layer error from reqwest.
    #[error("HTTP request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Marketo returned a fault, or a body that could not be parsed.
    ///
    /// `kind` is [`FaultKind::Generic`] unless the embedded error code maps
    /// to a known condition. The message is exactly what the provider sent.
    #[error("{message}")]
    Fault { kind: FaultKind, message: String },

    /// Failure while rendering request XML.
    #[error("XML write error: {0}")]
    Xml(String),

    /// Signature computation error.
    #[error("signature error: {0}")]
    Signature(String),

    /// Client configuration error.
    #[error("config error: {0}")]
    Config(String),
}

impl MktError {
    pub(crate) fn fault(kind: FaultKind, message: impl Into<String>) -> Self {
        MktError::Fault {
            kind,
            message: message.into(),
        }
    }

    /// Base fault for a body that is not well-formed XML.
    pub(crate) fn parsing(text: &str) -> Self {
        Self::fault(FaultKind::Generic, format!("parsing error: {}", text))
    }

    /// Returns the fault kind if this error came from the provider.
    pub fn kind(&self) -> Option<FaultKind> {
        match self {
            MktError::Fault { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the provider message if this is a fault.
    pub fn message(&self) -> Option<&str> {
        match self {
            MktError::Fault { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Returns `true` if the provider reported that the lead does not exist.
    pub fn is_lead_not_found(&self) -> bool {
        self.kind() == Some(FaultKind::LeadNotFound)
    }

    /// Returns `true` if the error is potentially recoverable by retrying.
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            MktError::HttpClient(e) => e.is_timeout() || e.is_connect(),
            MktError::Fault { kind, .. } => matches!(
                kind,
                FaultKind::RequestLimitExceeded | FaultKind::RequestExpired
            ),
            MktError::Xml(_) | MktError::Signature(_) | MktError::Config(_) => false,
        }
    }
}

/// A specialized Result type for Marketo operations.
pub type Result<T> = std::result::Result<T, MktError>;

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
