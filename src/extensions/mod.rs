//! # Extensions Module
//! Pluggable protocol extensions that contribute parameters to the
//! outgoing authentication request and consume parameters from the
//! provider's response.

mod identity;
mod oauth;

pub use identity::IdentityAuthentication;
pub use oauth::{OAuthHybrid, RequestToken};

use std::collections::HashMap;

use crate::client::OpenIdUser;
use crate::discovery::DiscoveryResult;
use crate::types::Parameters;

/// A protocol extension registered for one authentication transaction.
///
/// Extensions compose without knowing about each other: each one
/// contributes its request parameters under its own namespace alias and
/// only sees response data when the provider declared that namespace.
pub trait Extension {
    /// Human-readable extension name.
    fn name(&self) -> &'static str;

    /// Namespace URI this extension implements.
    fn namespace_uri(&self) -> &str;

    /// Parameters to merge into the outgoing authentication request.
    /// Must include the `openid.ns.<alias>` declaration of the
    /// extension's namespace where the extension carries one.
    fn build_authorization_data(&self, discovered: &DiscoveryResult) -> Parameters;

    /// Extension-specific response check, run after the response has been
    /// received. Extensions without additional constraints accept.
    fn validate(&self, _response: &Parameters) -> bool {
        true
    }

    /// Writes data extracted from the response into the caller-supplied
    /// user object. Extensions carrying no response data do nothing.
    fn populate_user(&self, _user: &mut OpenIdUser, _response: &Parameters) {}

    /// Capability query: extensions that inspect raw XRDS documents
    /// return their [`XrdsConsumer`] view here.
    fn as_xrds_consumer(&mut self) -> Option<&mut dyn XrdsConsumer> {
        None
    }
}

/// Capability for extensions that want the raw XRDS document handed to
/// them during discovery, before and regardless of standard parsing.
pub trait XrdsConsumer {
    /// Inspects the raw XRDS document text.
    fn process_xrds(&mut self, document: &str);
}

/// Maps each namespace URI declared in `arguments` through an
/// `openid.ns.*` entry to the alias the provider chose for it.
pub fn namespace_aliases(arguments: &Parameters) -> HashMap<String, String> {
    const NS_PREFIX: &str = "openid.ns.";
    let mut aliases = HashMap::new();
    for (key, value) in arguments.iter() {
        // Keys come from the provider and may hold multibyte characters;
        // the byte comparison never slices one in half.
        if key.len() > NS_PREFIX.len()
            && key.as_bytes()[..NS_PREFIX.len()].eq_ignore_ascii_case(NS_PREFIX.as_bytes())
        {
            aliases.insert(value.to_string(), key[NS_PREFIX.len()..].to_string());
        }
    }
    aliases
}

#[cfg(test)]
#[path = "../tests/extension_tests.rs"]
mod extension_tests;
