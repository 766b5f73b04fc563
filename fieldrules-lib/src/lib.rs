//! Client-side form validation engine
//!
//! Fetches a form's declarative rule set from a backend, evaluates per-field
//! rule chains against user input, resolves cross-field `matches` rules
//! against live sibling values, and produces localized error messages.
//!
//! The result is advisory: it improves the editing experience and never
//! replaces validation on the server.

pub mod binding;
pub mod cache;
pub mod error;
pub mod messages;
pub mod model;
pub mod rules;
pub mod session;
pub mod source;

mod client;

pub use client::*;
pub use session::Session;
pub use session::SessionStatus;
