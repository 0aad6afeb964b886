//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256, HMAC-SHA1)
//! - Event parsing into typed `ping` and `issues` events

pub mod events;
pub mod parser;
pub mod signature;

pub use events::{IssueAction, IssuesEvent, PingEvent, SUPPORTED_EVENTS, WebhookEvent};
pub use parser::{ParseError, parse_webhook};
pub use signature::{
    SignatureAlgorithm, compute_signature, format_signature_header, parse_signature_header,
    verify_signature,
};
