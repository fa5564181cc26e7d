use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::attribute::decode_list;
use crate::error::{MktError, Result};
use crate::xml::{Element, parse};

/// A lead as returned by getLead or syncLead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadRecord {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl LeadRecord {
    /// Decodes a `<leadRecord>` node. Missing children decode as absent.
    pub fn from_element(record: &Element) -> Result<Self> {
        Ok(Self {
            id: parse_id(record)?,
            email: record.child_text("Email").map(str::to_string),
            attributes: record
                .child("leadAttributeList")
                .map(decode_list)
                .unwrap_or_default(),
        })
    }

    /// Returns the value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// One entry of a lead's activity log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: Option<i64>,
    pub activity_date_time: Option<String>,
    pub activity_type: Option<String>,
    pub mktg_asset_name: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl ActivityRecord {
    /// Decodes an `<activityRecord>` node.
    pub fn from_element(record: &Element) -> Result<Self> {
        let text = |name| record.child_text(name).map(str::to_string);
        Ok(Self {
            id: parse_id(record)?,
            activity_date_time: text("activityDateTime"),
            activity_type: text("activityType"),
            mktg_asset_name: text("mktgAssetName"),
            attributes: record
                .child("activityAttributes")
                .map(decode_list)
                .unwrap_or_default(),
        })
    }

    /// Parses `activity_date_time` as RFC 3339.
    ///
    /// Returns `None` if the timestamp is absent or not parseable.
    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.activity_date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }
}

/// `<Id>` on lead records, `<id>` on activity records.
fn parse_id(record: &Element) -> Result<Option<i64>> {
    let raw = record
        .child_text("Id")
        .or_else(|| record.child_text("id"))
        .filter(|raw| !raw.trim().is_empty());
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| MktError::parsing(raw)),
        None => Ok(None),
    }
}

/// Decodes the first `<leadRecord>` anywhere in a getLead or syncLead response.
///
/// A response without a lead record yields an empty [`LeadRecord`].
pub fn unwrap_lead_record(body: &str) -> Result<LeadRecord> {
    let root = parse(body)?;
    match root.find("leadRecord") {
        Some(record) => LeadRecord::from_element(record),
        None => Ok(LeadRecord::default()),
    }
}

/// Decodes every `<activityRecord>` of a getLeadActivity response, in order.
pub fn unwrap_lead_activity(body: &str) -> Result<Vec<ActivityRecord>> {
    let root = parse(body)?;
    let Some(list) = root.find("activityRecordList") else {
        return Ok(Vec::new());
    };
    list.children_named("activityRecord")
        .map(ActivityRecord::from_element)
        .collect()
}

/// Reads `<success>` from a requestCampaign response.
pub fn unwrap_request_campaign(body: &str) -> Result<bool> {
    let root = parse(body)?;
    Ok(root
        .find("success")
        .is_some_and(|s| s.text.trim().eq_ignore_ascii_case("true")))
}
