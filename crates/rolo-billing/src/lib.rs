//! Payment-provider protocol layer.
//!
//! Covers the three things the rest of the workspace needs from the
//! provider: verifying signed webhook payloads, decoding event envelopes
//! into [`event::BillingEvent`], and creating hosted checkout sessions.
//! Nothing here talks to the database directly; account mutations go
//! through [`rolo_core::store::AccountStore`].

pub mod checkout;
pub mod error;
pub mod event;
pub mod signature;

pub use checkout::{CheckoutClient, CheckoutConfig, CheckoutSession};
pub use error::{Error, Result};
pub use event::{BillingEvent, apply_event, decode_event};
pub use signature::verify_signature;
