//! Synchronous (blocking) client for the Marketo SOAP API.
//!
//! This module is only available when the `blocking` feature is enabled
//! (it is on by default). It mirrors the async [`crate::client::Client`] API
//! using `reqwest::blocking`: each operation is one request/response round
//! trip on the calling thread.
//!
//! # Example
//!
//! ```no_run
//! use rs_marketo::blocking::Client;
//! use rs_marketo::{Credential, LeadKey};
//!
//! fn main() -> rs_marketo::Result<()> {
//!     let client = Client::new(
//!         "https://123-ABC-456.mktoapi.com/soap/mktows/2_0",
//!         Credential::new("bigcorp1_461839624B16E06BA2D663", "secret"),
//!     )?;
//!
//!     let lead = client.get_lead(&LeadKey::Email("john@do.com".into()))?;
//!     println!("Lead id: {:?}", lead.id);
//!     Ok(())
//! }
//! ```

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{MktError, Result};
use crate::exec::{handle_response, wrap};
use crate::request::{self, LeadKey, SyncLeadRequest};
use crate::response::{
    ActivityRecord, LeadRecord, unwrap_lead_activity, unwrap_lead_record, unwrap_request_campaign,
};
use crate::sign::{Clock, SystemClock};

/// Synchronous client for the Marketo SOAP API.
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    credential: Credential,
    clock: Box<dyn Clock>,
}

impl Client {
    /// Creates a new blocking client for `endpoint` with default settings.
    pub fn new(endpoint: impl Into<String>, credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::new(endpoint))
    }

    /// Creates a new blocking client with custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MktError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            credential,
            clock: Box::new(SystemClock),
        })
    }

    /// Replaces the time source used for request signatures.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Wraps an operation body into a signed SOAP envelope.
    pub fn wrap(&self, body: &str) -> Result<String> {
        wrap(&self.credential, self.clock.as_ref(), body)
    }

    /// Looks up a single lead.
    pub fn get_lead(&self, key: &LeadKey) -> Result<LeadRecord> {
        let text = self.call("getLead", &request::get_lead(key)?)?;
        unwrap_lead_record(&text)
    }

    /// Fetches the activity log of a lead.
    pub fn get_lead_activity(&self, key: &LeadKey) -> Result<Vec<ActivityRecord>> {
        let text = self.call("getLeadActivity", &request::get_lead_activity(key)?)?;
        unwrap_lead_activity(&text)
    }

    /// Creates or updates a lead and returns it as stored by Marketo.
    pub fn sync_lead(&self, lead: &SyncLeadRequest) -> Result<LeadRecord> {
        let text = self.call("syncLead", &request::sync_lead(lead)?)?;
        unwrap_lead_record(&text)
    }

    /// Adds a lead to a campaign. Returns the provider's success flag.
    pub fn request_campaign(&self, campaign_id: i64, lead_id: i64) -> Result<bool> {
        let text = self.call(
            "requestCampaign",
            &request::request_campaign(campaign_id, lead_id)?,
        )?;
        unwrap_request_campaign(&text)
    }

    /// Sends one operation body and returns the raw response text.
    pub fn call(&self, operation: &str, body: &str) -> Result<String> {
        let envelope = self.wrap(body)?;
        tracing::debug!(operation, endpoint = %self.config.endpoint, "sending SOAP request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("Content-Type", self.config.content_type)
            .body(envelope)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        handle_response(operation, status, text)
    }
}
