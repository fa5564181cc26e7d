//! Classification of SOAP faults into [`MktError`] values.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::MktError;
use crate::xml::parse;

/// Provider error conditions the SDK distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Any fault without a more specific mapping.
    Generic,
    AuthenticationFailed,
    RequestLimitExceeded,
    RequestExpired,
    LeadNotFound,
    CampaignNotFound,
}

/// Marketo service exception codes with a dedicated kind.
const FAULT_CODES: &[(u32, FaultKind)] = &[
    (20014, FaultKind::AuthenticationFailed),
    (20015, FaultKind::RequestLimitExceeded),
    (20016, FaultKind::RequestExpired),
    (20103, FaultKind::LeadNotFound),
    (20109, FaultKind::CampaignNotFound),
];

impl FaultKind {
    /// Maps a provider error code; unknown codes are [`FaultKind::Generic`].
    pub fn from_code(code: u32) -> Self {
        FAULT_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
            .unwrap_or(FaultKind::Generic)
    }

    /// The provider code for this kind, if it has one.
    pub fn code(self) -> Option<u32> {
        FAULT_CODES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(c, _)| *c)
    }
}

/// Trailing parenthesized code, as in `No lead found with EMAIL = x (20103)`.
static FAULT_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn fault_code_regex() -> &'static Regex {
    FAULT_CODE_REGEX
        .get_or_init(|| Regex::new(r"\((\d+)\)\s*$").expect("Invalid FAULT_CODE_REGEX pattern"))
}

fn trailing_code(message: &str) -> Option<u32> {
    fault_code_regex()
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
}

/// Turns a fault body, or any unexpected response, into an error.
///
/// The resulting message is the provider's text unchanged, except for bodies
/// that are not XML, which become `parsing error: <text>`.
pub fn classify(text: &str) -> MktError {
    let root = match parse(text) {
        Ok(root) => root,
        Err(err) => return err,
    };

    let fault_string = root.find("faultstring").map(|e| e.text.trim());

    if let Some(detail) = root.find("detail") {
        let message = detail
            .find("message")
            .map(|e| e.text.trim())
            .or(fault_string)
            .unwrap_or_default();
        let code = trailing_code(message).or_else(|| {
            detail
                .find("code")
                .and_then(|e| e.text.trim().parse().ok())
        });
        let kind = code.map(FaultKind::from_code).unwrap_or(FaultKind::Generic);
        return MktError::fault(kind, message);
    }

    match fault_string {
        Some(fault_string) => MktError::fault(FaultKind::Generic, fault_string),
        None => MktError::fault(FaultKind::Generic, text.trim()),
    }
}

/// Returns `true` if `text` is XML containing a SOAP `Fault` element.
pub fn is_fault(text: &str) -> bool {
    parse(text).is_ok_and(|root| root.find("Fault").is_some())
}
