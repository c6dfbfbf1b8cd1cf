//! # Client Module
//! The relying-party driver: request creation, response mode detection,
//! response validation and user retrieval.

#[allow(clippy::module_inception)]
mod client;
mod user;

pub use client::{RelyingParty, RequestedMode};
pub use user::OpenIdUser;

#[cfg(test)]
#[path = "../tests/client_tests.rs"]
mod client_tests;
