//! Yadis discovery: locates an XRDS document through an HTTP header or
//! meta-tag indirection and delegates to [`XrdsDiscovery`].

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::discovery::{
    DiscoveryContext, DiscoveryResult, DiscoveryService, NormalizationEntry, XrdsDiscovery,
};
use crate::helpers::remove_html_comments;
use crate::types::ProtocolVersion;

lazy_static! {
    static ref META_EQUIV_CONTENT: Regex =
        Regex::new(r#"<meta[^>]*http-equiv="X-XRDS-Location"[^>]*content="([^"]+)"[^>]*"#).unwrap();
    static ref META_CONTENT_EQUIV: Regex =
        Regex::new(r#"<meta[^>]*content="([^"]+)"[^>]*http-equiv="X-XRDS-Location"[^>]*"#).unwrap();
}

/// Discovery strategy that follows the Yadis XRDS location indirection.
///
/// Normalization is not applicable to this strategy; it only consumes
/// fetched response content.
#[derive(Debug, Default)]
pub struct YadisDiscovery {
    version: ProtocolVersion,
}

impl YadisDiscovery {
    /// Creates a new Yadis discovery strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

fn xrds_location(content: &str) -> Option<String> {
    // A literal header line takes precedence over the meta tag.
    for line in content.split('\n') {
        let prefix = line.get(..16).unwrap_or("");
        if prefix.eq_ignore_ascii_case("X-XRDS-Location:") {
            return Some(line[16..].trim().to_string());
        }
    }

    let content = remove_html_comments(content);
    if let Some(caps) = META_EQUIV_CONTENT.captures(&content) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = META_CONTENT_EQUIV.captures(&content) {
        return Some(caps[1].to_string());
    }
    None
}

impl DiscoveryService for YadisDiscovery {
    fn name(&self) -> &'static str {
        "Yadis Discovery Plugin"
    }

    fn normalize_identifier(&self, _identifier: &str) -> Option<NormalizationEntry> {
        None
    }

    fn discover(
        &mut self,
        content: &str,
        ctx: &mut DiscoveryContext<'_>,
    ) -> Option<Vec<DiscoveryResult>> {
        let location = xrds_location(content)?;

        let url = match Url::parse(&location) {
            Ok(url) => url,
            Err(e) => {
                debug!("malformed X-XRDS-Location {:?}: {}", location, e);
                return None;
            }
        };

        let document = match ctx.fetcher.fetch(&url) {
            Ok(document) => document,
            Err(e) => {
                debug!("XRDS location fetch failed: {}", e);
                return None;
            }
        };

        let mut xrds = XrdsDiscovery::new();
        let results = xrds.discover(&document.body, ctx);
        self.version = xrds.version();
        results
    }

    fn version(&self) -> ProtocolVersion {
        self.version
    }
}

#[cfg(test)]
#[path = "../tests/yadis_tests.rs"]
mod yadis_tests;
