//! Request body wrappers, one per Marketo operation.
//!
//! Each wrapper renders the operation element placed inside `<env:Body>`.
//! Element order is fixed here and never follows input iteration order.

use std::borrow::Cow;

use crate::attribute::Attribute;
use crate::error::Result;
use crate::xml::XmlWriter;

/// Identifies a single lead for lookup operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadKey {
    Email(String),
    Cookie(String),
    IdNum(i64),
}

impl LeadKey {
    /// Wire value of `<keyType>`.
    pub fn key_type(&self) -> &'static str {
        match self {
            LeadKey::Email(_) => "EMAIL",
            LeadKey::Cookie(_) => "COOKIE",
            LeadKey::IdNum(_) => "IDNUM",
        }
    }

    /// Unescaped value of `<keyValue>`.
    pub fn key_value(&self) -> Cow<'_, str> {
        match self {
            LeadKey::Email(v) | LeadKey::Cookie(v) => Cow::Borrowed(v),
            LeadKey::IdNum(id) => Cow::Owned(id.to_string()),
        }
    }

    fn write(&self, w: &mut XmlWriter) -> Result<()> {
        w.element("leadKey", |w| {
            w.text_element("keyType", self.key_type())?;
            w.text_element("keyValue", &self.key_value())?;
            Ok(())
        })?;
        Ok(())
    }
}

/// Parameters for the syncLead operation.
///
/// Identifier fields that are `None` or empty are left out of the request.
#[derive(Debug, Clone, Default)]
pub struct SyncLeadRequest {
    /// Marketo lead id.
    pub marketo_id: Option<i64>,
    pub email: Option<String>,
    /// Munchkin tracking cookie to associate with the lead.
    pub marketo_cookie: Option<String>,
    /// Identifier of the lead in a custom foreign system.
    pub foreign_id: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl SyncLeadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marketo_id(mut self, id: i64) -> Self {
        self.marketo_id = Some(id);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_marketo_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.marketo_cookie = Some(cookie.into());
        self
    }

    pub fn with_foreign_id(mut self, foreign_id: impl Into<String>) -> Self {
        self.foreign_id = Some(foreign_id.into());
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Renders `<ns1:paramsGetLead>`.
pub fn get_lead(key: &LeadKey) -> Result<String> {
    let mut w = XmlWriter::new();
    w.element("ns1:paramsGetLead", |w| key.write(w))?;
    w.finish()
}

/// Renders `<ns1:paramsGetLeadActivity>`.
pub fn get_lead_activity(key: &LeadKey) -> Result<String> {
    let mut w = XmlWriter::new();
    w.element("ns1:paramsGetLeadActivity", |w| key.write(w))?;
    w.finish()
}

/// Renders `<mkt:paramsSyncLead>`.
///
/// `<marketoCookie>` is a sibling of `<leadRecord>`, not a child of it.
pub fn sync_lead(request: &SyncLeadRequest) -> Result<String> {
    let mut w = XmlWriter::new();
    w.element("mkt:paramsSyncLead", |w| {
        w.element("leadRecord", |w| {
            if let Some(id) = request.marketo_id {
                w.text_element("Id", &id.to_string())?;
            }
            if let Some(email) = present(&request.email) {
                w.text_element("Email", email)?;
            }
            if let Some(foreign_id) = present(&request.foreign_id) {
                w.text_element("ForeignSysPersonId", foreign_id)?;
                w.text_element("ForeignSysType", "CUSTOM")?;
            }
            Attribute::write_list(w, "leadAttributeList", &request.attributes)
        })?;
        w.text_element("returnLead", "true")?;
        if let Some(cookie) = present(&request.marketo_cookie) {
            w.text_element("marketoCookie", cookie)?;
        }
        Ok(())
    })?;
    w.finish()
}

/// Renders `<mkt:paramsRequestCampaign>` for a single lead addressed by id.
pub fn request_campaign(campaign_id: i64, lead_id: i64) -> Result<String> {
    let mut w = XmlWriter::new();
    w.element("mkt:paramsRequestCampaign", |w| {
        w.text_element("source", "MKTOWS")?;
        w.text_element("campaignId", &campaign_id.to_string())?;
        w.element("leadList", |w| LeadKey::IdNum(lead_id).write(w))?;
        Ok(())
    })?;
    w.finish()
}
