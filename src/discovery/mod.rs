//! # Discovery Module
//! Identifier normalization and the cascading endpoint discovery engine.
//!
//! Three strategies ship with the crate: [`XrdsDiscovery`] (XRI identifiers
//! and XRDS service documents), [`YadisDiscovery`] (XRDS location
//! indirection via HTTP header or meta tag) and [`HtmlDiscovery`] (plain
//! URLs and `<link>` tags). Strategies are tried in registration order;
//! the first one producing results wins.

mod html;
mod xrds;
mod yadis;

pub use html::HtmlDiscovery;
pub use xrds::XrdsDiscovery;
pub use yadis::YadisDiscovery;

use tracing::debug;
use url::Url;

use crate::extensions::Extension;
use crate::http::HttpFetcher;
use crate::types::ProtocolVersion;

/// The three usable forms of a user-supplied identifier, produced by
/// exactly one strategy during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationEntry {
    /// Display form, without scheme prefix or trailing slash.
    pub friendly_id: String,
    /// Canonical form per the OpenID specification.
    pub normalized_id: String,
    /// URL the discovery engine should fetch.
    pub discovery_url: Url,
}

/// Candidate Identity Provider endpoint produced during discovery.
///
/// A result is usable only when `server_url` is set and `auth_version`
/// is not [`ProtocolVersion::Invalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryResult {
    /// Discovered OpenID Provider endpoint.
    pub server_url: Option<Url>,
    /// Provider-local identifier, when delegation is in use.
    pub local_id: Option<String>,
    /// The identifier the user claims ownership of.
    pub claimed_id: Option<String>,
    /// Preference rank; lower is more preferred.
    pub priority: u32,
    /// Protocol version supported by the endpoint.
    pub auth_version: ProtocolVersion,
}

impl Default for DiscoveryResult {
    fn default() -> Self {
        Self {
            server_url: None,
            local_id: None,
            claimed_id: None,
            priority: 0,
            auth_version: ProtocolVersion::V1Dot1,
        }
    }
}

/// Collaborators a strategy may need while processing a document: the
/// registered extensions (for the XRDS side channel) and the fetch
/// collaborator (for the Yadis secondary fetch). Passed at call time so
/// strategies never hold a back-reference to the registry.
pub struct DiscoveryContext<'a> {
    /// Extensions registered for the current transaction, in order.
    pub extensions: &'a mut [Box<dyn Extension>],
    /// HTTP fetch collaborator.
    pub fetcher: &'a dyn HttpFetcher,
}

/// A pluggable discovery strategy.
///
/// `normalize_identifier` and `discover` must never fail loudly: an
/// identifier grammar or document a strategy does not handle yields
/// `None` so the cascade can try the next strategy.
pub trait DiscoveryService {
    /// Human-readable strategy name.
    fn name(&self) -> &'static str;

    /// Attempts to normalize a raw identifier into its canonical forms.
    /// Returns `None` when this strategy does not handle the identifier's
    /// grammar, or when the result would be malformed.
    fn normalize_identifier(&self, identifier: &str) -> Option<NormalizationEntry>;

    /// Scans fetched document content for provider endpoints. Returns
    /// `None` when the document yields no usable endpoint; malformed
    /// input is logged, never raised.
    fn discover(
        &mut self,
        content: &str,
        ctx: &mut DiscoveryContext<'_>,
    ) -> Option<Vec<DiscoveryResult>>;

    /// Protocol version negotiated by the most recent `discover` run.
    fn version(&self) -> ProtocolVersion;
}

/// Normalization using the standard grammars only: XRI first, URL second.
/// Used where no strategy registry is at hand.
pub(crate) fn normalize_default(identifier: &str) -> Option<NormalizationEntry> {
    xrds::normalize_xri_identifier(identifier).or_else(|| html::normalize_url_identifier(identifier))
}

/// Runs the normalization cascade: each strategy is tried in registration
/// order and the first one returning an entry wins.
pub fn normalize(
    identifier: &str,
    strategies: &[Box<dyn DiscoveryService>],
) -> Option<NormalizationEntry> {
    strategies
        .iter()
        .find_map(|s| s.normalize_identifier(identifier))
}

/// Full endpoint resolution pipeline: normalize the identifier, fetch its
/// discovery URL, hand the document to each strategy in order, and compose
/// the best endpoint the winning strategy produced.
///
/// Returns `None` when no strategy can normalize the identifier, the fetch
/// fails, or no strategy discovers a usable endpoint.
pub fn resolve_endpoint(
    identifier: &str,
    strategies: &mut [Box<dyn DiscoveryService>],
    extensions: &mut [Box<dyn Extension>],
    fetcher: &dyn HttpFetcher,
) -> Option<DiscoveryResult> {
    let entry = normalize(identifier, &*strategies)?;

    let document = match fetcher.fetch(&entry.discovery_url) {
        Ok(document) => document,
        Err(e) => {
            debug!("discovery fetch for {} failed: {}", entry.discovery_url, e);
            return None;
        }
    };

    if document.body.is_empty() {
        return None;
    }

    // The effective URL after redirects becomes the claimed identifier.
    let claimed_id = normalize(&document.final_url, &*strategies).map(|ne| ne.normalized_id);

    let mut winner: Option<(Vec<DiscoveryResult>, ProtocolVersion)> = None;
    for strategy in strategies.iter_mut() {
        debug!("trying discovery strategy {}", strategy.name());
        let mut ctx = DiscoveryContext {
            extensions: &mut *extensions,
            fetcher,
        };
        if let Some(results) = strategy.discover(&document.body, &mut ctx) {
            debug!("strategy {} discovered an endpoint", strategy.name());
            winner = Some((results, strategy.version()));
            break;
        }
    }

    let (results, auth_version) = winner?;
    let best = results.into_iter().next()?;

    Some(DiscoveryResult {
        server_url: best.server_url,
        local_id: best.local_id.or_else(|| Some(document.final_url.clone())),
        claimed_id,
        priority: best.priority,
        auth_version,
    })
}

#[cfg(test)]
#[path = "../tests/discovery_tests.rs"]
mod discovery_tests;
