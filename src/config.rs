use std::time::Duration;

/// Configuration for the Marketo client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// SOAP endpoint URL, e.g. `https://123-ABC-456.mktoapi.com/soap/mktows/2_0`.
    pub endpoint: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Request content type (always SOAP 1.1 XML).
    pub(crate) content_type: &'static str,
}

impl ClientConfig {
    /// Creates a configuration for the given SOAP endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            content_type: "text/xml;charset=UTF-8",
        }
    }

    /// Replaces the SOAP endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
