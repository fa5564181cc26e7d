//! Request authentication: the `AuthenticationHeader` carried by every call.
//!
//! Marketo verifies `requestSignature = hex(HMAC-SHA1(encryption_key, timestamp + user_id))`
//! and rejects stale timestamps, so a header is built fresh for each request.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::credential::Credential;
use crate::error::{MktError, Result};
use crate::xml::XmlWriter;

type HmacSha1 = Hmac<Sha1>;

/// Source of the request timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant, for reproducible signatures.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Formats the current time as RFC 3339 with second precision and a numeric
/// offset, e.g. `2013-07-22T10:15:30+02:00`.
pub(crate) fn timestamp(clock: &dyn Clock) -> String {
    clock.now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Computes the lowercase hex HMAC-SHA1 of `timestamp + user_id`.
pub(crate) fn sign(user_id: &str, encryption_key: &str, timestamp: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(encryption_key.as_bytes())
        .map_err(|e| MktError::Signature(format!("HMAC key error: {}", e)))?;
    mac.update(timestamp.as_bytes());
    mac.update(user_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Values of one `AuthenticationHeader`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub user_id: String,
    pub timestamp: String,
    pub signature: String,
}

impl AuthHeader {
    /// Signs the current time of `clock` with the credential's key.
    pub fn new(credential: &Credential, clock: &dyn Clock) -> Result<Self> {
        let timestamp = timestamp(clock);
        let signature = sign(
            &credential.user_id,
            &credential.encryption_key,
            &timestamp,
        )?;
        Ok(Self {
            user_id: credential.user_id.clone(),
            timestamp,
            signature,
        })
    }

    /// Renders the `<env:Header>` fragment.
    pub fn render(&self) -> Result<String> {
        let mut w = XmlWriter::new();
        w.element("env:Header", |w| {
            w.element("ns1:AuthenticationHeader", |w| {
                w.text_element("mktowsUserId", &self.user_id)?;
                w.text_element("requestSignature", &self.signature)?;
                w.text_element("requestTimestamp", &self.timestamp)?;
                Ok(())
            })?;
            Ok(())
        })?;
        w.finish()
    }
}

/// Builds and renders a fresh header in one step.
pub fn header(credential: &Credential, clock: &dyn Clock) -> Result<String> {
    AuthHeader::new(credential, clock)?.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> FixedClock {
        let offset = FixedOffset::east_opt(3600).unwrap();
        FixedClock(offset.with_ymd_and_hms(2013, 7, 22, 10, 15, 30).unwrap())
    }

    #[test]
    fn timestamp_has_second_precision_and_offset() {
        assert_eq!(timestamp(&fixed()), "2013-07-22T10:15:30+01:00");
    }

    #[test]
    fn timestamp_utc_uses_numeric_offset() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let clock = FixedClock(utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(timestamp(&clock), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn sign_matches_rfc2202_vector() {
        // RFC 2202 test case 2, split across timestamp and user id.
        let sig = sign("for nothing?", "Jefe", "what do ya want ").unwrap();
        assert_eq!(sig, "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
    }

    #[test]
    fn sign_depends_on_key() {
        let a = sign("user", "key-1", "2013-07-22T10:15:30+01:00").unwrap();
        let b = sign("user", "key-2", "2013-07-22T10:15:30+01:00").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn header_layout() {
        let credential = Credential::new("_user_id_", "_encryption_key_");
        let auth = AuthHeader::new(&credential, &fixed()).unwrap();
        assert_eq!(auth.timestamp, "2013-07-22T10:15:30+01:00");
        assert_eq!(
            auth.signature,
            sign("_user_id_", "_encryption_key_", "2013-07-22T10:15:30+01:00").unwrap()
        );

        assert_eq!(
            header(&credential, &fixed()).unwrap(),
            format!(
                "<env:Header>\
                 <ns1:AuthenticationHeader>\
                 <mktowsUserId>_user_id_</mktowsUserId>\
                 <requestSignature>{}</requestSignature>\
                 <requestTimestamp>2013-07-22T10:15:30+01:00</requestTimestamp>\
                 </ns1:AuthenticationHeader>\
                 </env:Header>",
                auth.signature
            )
        );
    }

    #[test]
    fn render_escapes_user_id() {
        let auth = AuthHeader {
            user_id: "a<b".into(),
            timestamp: "t".into(),
            signature: "s".into(),
        };
        assert!(
            auth.render()
                .unwrap()
                .contains("<mktowsUserId>a&lt;b</mktowsUserId>")
        );
    }
}
