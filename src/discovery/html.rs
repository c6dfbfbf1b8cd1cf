//! HTML `<link>` tag discovery and plain-URL identifier normalization.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::discovery::{DiscoveryContext, DiscoveryResult, DiscoveryService, NormalizationEntry};
use crate::helpers::remove_html_comments;
use crate::types::ProtocolVersion;

lazy_static! {
    static ref LINK_REL_HREF: Regex =
        Regex::new(r#"<link[^>]*rel=["']([^"']+)["'][^>]*href=["']([^"']+)["'][^>]*"#).unwrap();
    static ref LINK_HREF_REL: Regex =
        Regex::new(r#"<link[^>]*href=["']([^"']+)["'][^>]*rel=["']([^"']+)["'][^>]*"#).unwrap();
}

const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Discovery strategy for plain-URL identifiers and HTML documents that
/// advertise their provider through `<link>` tags.
#[derive(Debug, Default)]
pub struct HtmlDiscovery {
    version: ProtocolVersion,
}

impl HtmlDiscovery {
    /// Creates a new HTML discovery strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

// Prefixes are ASCII; comparing bytes keeps identifiers starting with a
// multibyte character from being sliced mid-character.
fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Normalizes a URL-grammar identifier.
///
/// Identifiers routed through the XRI proxy resolver are rejected so the
/// XRI strategy can claim them. Identifiers without a recognized scheme
/// default to `http://`. A result that cannot be parsed as a URL is not
/// an error; the identifier is simply not applicable.
pub(crate) fn normalize_url_identifier(identifier: &str) -> Option<NormalizationEntry> {
    if starts_with_ignore_case(identifier, "https://xri.net/")
        || starts_with_ignore_case(identifier, "http://xri.net/")
    {
        return None;
    }

    for prefix in URL_PREFIXES {
        if starts_with_ignore_case(identifier, prefix) {
            let discovery_url = Url::parse(identifier).ok()?;
            return Some(NormalizationEntry {
                friendly_id: identifier[prefix.len()..].trim_matches('/').to_string(),
                normalized_id: discovery_url.to_string(),
                discovery_url,
            });
        }
    }

    let discovery_url = Url::parse(&format!("http://{}", identifier)).ok()?;
    Some(NormalizationEntry {
        friendly_id: identifier.trim_matches('/').to_string(),
        normalized_id: discovery_url.to_string(),
        discovery_url,
    })
}

impl DiscoveryService for HtmlDiscovery {
    fn name(&self) -> &'static str {
        "HTML Discovery Plugin"
    }

    fn normalize_identifier(&self, identifier: &str) -> Option<NormalizationEntry> {
        normalize_url_identifier(identifier)
    }

    fn discover(
        &mut self,
        content: &str,
        _ctx: &mut DiscoveryContext<'_>,
    ) -> Option<Vec<DiscoveryResult>> {
        let content = remove_html_comments(content);

        let mut links: Vec<(String, String)> = Vec::new();
        for caps in LINK_REL_HREF.captures_iter(&content) {
            links.push((caps[1].to_string(), caps[2].to_string()));
        }
        for caps in LINK_HREF_REL.captures_iter(&content) {
            links.push((caps[2].to_string(), caps[1].to_string()));
        }

        let mut v1 = DiscoveryResult {
            auth_version: ProtocolVersion::V1Dot1,
            ..Default::default()
        };
        let mut v2 = DiscoveryResult {
            auth_version: ProtocolVersion::V2Dot0,
            ..Default::default()
        };
        let mut saw_2_0 = false;
        let mut saw_1_x = false;

        // Later tags overwrite earlier ones: only the last occurrence of
        // each relation counts.
        for (rel, href) in &links {
            if rel.contains("openid2.provider") {
                if let Ok(url) = Url::parse(href) {
                    v2.server_url = Some(url);
                    saw_2_0 = true;
                }
            } else if rel.contains("openid.server") {
                if let Ok(url) = Url::parse(href) {
                    v1.server_url = Some(url);
                    saw_1_x = true;
                }
            } else if rel.contains("openid2.local_id") {
                v2.local_id = Some(href.clone());
                saw_2_0 = true;
            } else if rel.contains("openid.delegate") {
                v1.local_id = Some(href.clone());
                saw_1_x = true;
            }
        }

        if saw_2_0 {
            self.version = ProtocolVersion::V2Dot0;
        } else if saw_1_x {
            self.version = ProtocolVersion::V1Dot1;
        }

        let mut results = Vec::new();
        if v2.server_url.is_some() {
            results.push(v2);
        }
        if v1.server_url.is_some() {
            results.push(v1);
        }

        if results.is_empty() {
            return None;
        }
        Some(results)
    }

    fn version(&self) -> ProtocolVersion {
        self.version
    }
}

#[cfg(test)]
#[path = "../tests/html_tests.rs"]
mod html_tests;
