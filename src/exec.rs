//! Envelope composition and response routing shared by async and blocking clients.

use crate::credential::Credential;
use crate::error::{MAX_ERROR_BODY_CHARS, Result, truncate_str};
use crate::fault::{classify, is_fault};
use crate::sign::{Clock, header};

/// Opening `<env:Envelope>` tag with every namespace the operations use.
const ENVELOPE_PROLOGUE: &str = concat!(
    r#"<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
    r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
    r#"xmlns:wsdl="http://www.marketo.com/mktows/" "#,
    r#"xmlns:env="http://schemas.xmlsoap.org/soap/envelope/" "#,
    r#"xmlns:ins0="http://www.marketo.com/mktows/" "#,
    r#"xmlns:ns1="http://www.marketo.com/mktows/" "#,
    r#"xmlns:mkt="http://www.marketo.com/mktows/">"#,
);

/// Places pre-rendered header and body fragments into the SOAP envelope.
pub(crate) fn envelope(header: &str, body: &str) -> String {
    format!(
        "{}{}<env:Body>{}</env:Body></env:Envelope>",
        ENVELOPE_PROLOGUE, header, body
    )
}

/// Builds the full envelope for `body` with a freshly signed header.
pub(crate) fn wrap(credential: &Credential, clock: &dyn Clock, body: &str) -> Result<String> {
    Ok(envelope(&header(credential, clock)?, body))
}

/// Returns the body of a successful response, or the classified fault.
///
/// A non-2xx status and a 2xx body carrying a SOAP `Fault` both count as failure.
pub(crate) fn handle_response(
    operation: &str,
    status: reqwest::StatusCode,
    text: String,
) -> Result<String> {
    if status.is_success() && !is_fault(&text) {
        tracing::debug!(operation, %status, "SOAP call succeeded");
        return Ok(text);
    }

    let err = classify(&text);
    tracing::warn!(
        operation,
        %status,
        kind = ?err.kind(),
        body = truncate_str(&text, MAX_ERROR_BODY_CHARS),
        "SOAP call failed"
    );
    Err(err)
}
