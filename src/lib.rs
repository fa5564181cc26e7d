//! Marketo SOAP API SDK for Rust.
//!
//! This crate provides both async and sync (blocking) clients for the
//! Marketo lead-management SOAP API, covering 4 operations:
//!
//! - [`Client::get_lead`] — Look up a lead by email, cookie or id
//! - [`Client::get_lead_activity`] — Fetch a lead's activity log
//! - [`Client::sync_lead`] — Create or update a lead with attributes
//! - [`Client::request_campaign`] — Add a lead to a campaign
//!
//! Every request carries an `AuthenticationHeader` signed with HMAC-SHA1
//! over a fresh timestamp. SOAP faults are mapped to [`MktError::Fault`]
//! with a [`FaultKind`] derived from the provider's error code.
//!
//! # Quick Start (async)
//!
//! ```no_run
//! use rs_marketo::{Attribute, Client, Credential, LeadKey, SyncLeadRequest};
//!
//! # async fn example() -> rs_marketo::Result<()> {
//! let client = Client::new(
//!     "https://123-ABC-456.mktoapi.com/soap/mktows/2_0",
//!     Credential::new("bigcorp1_461839624B16E06BA2D663", "your-encryption-key"),
//! )?;
//!
//! let lead = client
//!     .sync_lead(
//!         &SyncLeadRequest::new()
//!             .with_email("john@do.com")
//!             .with_attribute(Attribute::new("FirstName", "string", "John")),
//!     )
//!     .await?;
//!
//! match client.get_lead(&LeadKey::Email("jane@do.com".into())).await {
//!     Ok(lead) => println!("Lead id: {:?}", lead.id),
//!     Err(e) if e.is_lead_not_found() => println!("no such lead"),
//!     Err(e) => return Err(e),
//! }
//! # let _ = lead;
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod fault;
pub mod request;
pub mod response;
pub mod sign;
pub mod xml;

#[cfg(feature = "blocking")]
pub mod blocking;

mod exec;

pub use attribute::{Attribute, AttributeType};
pub use client::Client;
pub use config::ClientConfig;
pub use credential::Credential;
pub use error::{MktError, Result};
pub use fault::FaultKind;
pub use request::{LeadKey, SyncLeadRequest};
pub use response::{ActivityRecord, LeadRecord};
pub use sign::{AuthHeader, Clock, FixedClock, SystemClock};

// Compile-time assertions: key types must be Send + Sync for use across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Client>;
    let _ = assert_send_sync::<MktError>;
    let _ = assert_send_sync::<Credential>;
    #[cfg(feature = "blocking")]
    let _ = assert_send_sync::<blocking::Client>;
};
