#![warn(missing_docs)]
//! # OpenID RP
//!
//! An OpenID 1.1 / 2.0 Relying Party core: identifier normalization,
//! cascading provider discovery (XRDS, Yadis, HTML), protocol extension
//! composition and persistence contracts for associations and session
//! state.
//!
//! ## Relying Party
//!
//! ### New instance
//! - [client::RelyingParty::new]
//! - [client::RelyingParty::from_response]
//! - [client::RelyingParty::with_state]
//!
//! ### Instance methods
//! - [client::RelyingParty::is_valid_identity]
//! - [client::RelyingParty::create_request]
//! - [client::RelyingParty::requested_mode]
//! - [client::RelyingParty::validate_response]
//! - [client::RelyingParty::retrieve_user]
//!
//! ## Discovery
//! - [discovery::normalize]
//! - [discovery::resolve_endpoint]
//! - [discovery::XrdsDiscovery]
//! - [discovery::YadisDiscovery]
//! - [discovery::HtmlDiscovery]
//!
//! ## Extensions
//! - [extensions::IdentityAuthentication]
//! - [extensions::OAuthHybrid]
//!
//! ## Persistence
//! - [persistence::InMemoryAssociationManager]
//! - [persistence::InMemorySessionManager]

pub mod client;
pub mod discovery;
pub mod extensions;
mod helpers;
pub mod http;
#[cfg(feature = "http_client")]
mod http_client;
pub mod persistence;
pub mod state;
pub mod types;

#[cfg(feature = "http_client")]
pub use http_client::DefaultHttpFetcher;

/// Re exports from the crate
pub mod re_exports {
    pub use url;
}
