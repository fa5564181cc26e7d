use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{MktError, Result};
use crate::exec::{handle_response, wrap};
use crate::request::{self, LeadKey, SyncLeadRequest};
use crate::response::{
    ActivityRecord, LeadRecord, unwrap_lead_activity, unwrap_lead_record, unwrap_request_campaign,
};
use crate::sign::{Clock, SystemClock};

/// Async client for the Marketo SOAP API.
///
/// Holds only configuration, so one instance can serve concurrent calls.
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    credential: Credential,
    clock: Box<dyn Clock>,
}

impl Client {
    /// Creates a new client for `endpoint` with default settings.
    pub fn new(endpoint: impl Into<String>, credential: Credential) -> Result<Self> {
        Self::with_config(credential, ClientConfig::new(endpoint))
    }

    /// Creates a new client with an explicit credential and custom configuration.
    pub fn with_config(credential: Credential, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
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
    pub async fn get_lead(&self, key: &LeadKey) -> Result<LeadRecord> {
        let text = self.call("getLead", &request::get_lead(key)?).await?;
        unwrap_lead_record(&text)
    }

    /// Fetches the activity log of a lead.
    pub async fn get_lead_activity(&self, key: &LeadKey) -> Result<Vec<ActivityRecord>> {
        let text = self
            .call("getLeadActivity", &request::get_lead_activity(key)?)
            .await?;
        unwrap_lead_activity(&text)
    }

    /// Creates or updates a lead and returns it as stored by Marketo.
    pub async fn sync_lead(&self, lead: &SyncLeadRequest) -> Result<LeadRecord> {
        let text = self.call("syncLead", &request::sync_lead(lead)?).await?;
        unwrap_lead_record(&text)
    }

    /// Adds a lead to a campaign. Returns the provider's success flag.
    pub async fn request_campaign(&self, campaign_id: i64, lead_id: i64) -> Result<bool> {
        let text = self
            .call(
                "requestCampaign",
                &request::request_campaign(campaign_id, lead_id)?,
            )
            .await?;
        unwrap_request_campaign(&text)
    }

    /// Sends one operation body and returns the raw response text.
    pub async fn call(&self, operation: &str, body: &str) -> Result<String> {
        let envelope = self.wrap(body)?;
        tracing::debug!(operation, endpoint = %self.config.endpoint, "sending SOAP request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("Content-Type", self.config.content_type)
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        handle_response(operation, status, text)
    }
}
