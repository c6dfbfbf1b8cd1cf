//! XRDS service-document discovery and XRI identifier normalization.

use tracing::debug;
use url::Url;

use crate::discovery::{DiscoveryContext, DiscoveryResult, DiscoveryService, NormalizationEntry};
use crate::types::{
    ProtocolVersion, AUTH_2_0_TYPE, OPENID_XMLNS, SIGNON_1_X_TYPE, XRDS_NAMESPACE, XRD_NAMESPACE,
    XRI_RESOLVER,
};

/// Global context symbols and the scheme prefix recognized as XRI grammar.
const XRI_PREFIXES: [&str; 6] = ["=", "@", "+", "$", "!", "xri://"];

/// Entries without an explicit `priority` attribute sort after every entry
/// that carries one.
const UNSET_PRIORITY: u32 = u32::MAX;

/// Discovery strategy for XRI identifiers and XRDS service documents.
#[derive(Debug)]
pub struct XrdsDiscovery {
    version: ProtocolVersion,
}

impl Default for XrdsDiscovery {
    fn default() -> Self {
        Self {
            version: ProtocolVersion::Invalid,
        }
    }
}

impl XrdsDiscovery {
    /// Creates a new XRDS discovery strategy.
    pub fn new() -> Self {
        Self::default()
    }
}

// Prefixes are ASCII; comparing bytes keeps identifiers starting with a
// multibyte character from being sliced mid-character.
fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

/// Normalizes an XRI-grammar identifier.
///
/// A leading `http(s)://xri.net/` indirection is stripped first. A
/// single-character global context symbol is preserved in the canonical
/// forms; the `xri://` scheme prefix is stripped entirely. The discovery
/// URL always routes through the public XRI proxy resolver.
pub(crate) fn normalize_xri_identifier(identifier: &str) -> Option<NormalizationEntry> {
    let mut identifier = identifier;
    if let Some(rest) = strip_prefix_ignore_case(identifier, "http://xri.net/") {
        identifier = rest;
    }
    if let Some(rest) = strip_prefix_ignore_case(identifier, "https://xri.net/") {
        identifier = rest;
    }

    for prefix in XRI_PREFIXES {
        if strip_prefix_ignore_case(identifier, prefix).is_some() {
            let canonical = if prefix.len() == 1 {
                identifier
            } else {
                &identifier[prefix.len()..]
            };
            let discovery_url = Url::parse(&format!("{}{}", XRI_RESOLVER, canonical)).ok()?;
            return Some(NormalizationEntry {
                friendly_id: canonical.to_string(),
                normalized_id: canonical.to_string(),
                discovery_url,
            });
        }
    }
    None
}

impl DiscoveryService for XrdsDiscovery {
    fn name(&self) -> &'static str {
        "XRDS Discovery Plugin"
    }

    fn normalize_identifier(&self, identifier: &str) -> Option<NormalizationEntry> {
        normalize_xri_identifier(identifier)
    }

    fn discover(
        &mut self,
        content: &str,
        ctx: &mut DiscoveryContext<'_>,
    ) -> Option<Vec<DiscoveryResult>> {
        // Yadis responses may carry an HTTP preamble before the document.
        let xml_begin = content.find("<?xml")?;
        let document = &content[xml_begin..];

        // XRDS consumers get the raw document even if parsing fails below.
        for extension in ctx.extensions.iter_mut() {
            if let Some(consumer) = extension.as_xrds_consumer() {
                consumer.process_xrds(document);
            }
        }

        let parsed = match roxmltree::Document::parse(document) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("XML decode failed: {}", e);
                return None;
            }
        };

        let root = parsed.root_element();
        if root.tag_name().name() != "XRDS" || root.tag_name().namespace() != Some(XRDS_NAMESPACE) {
            return None;
        }

        let mut entries = Vec::new();

        let xrds = root
            .children()
            .filter(|n| n.has_tag_name((XRD_NAMESPACE, "XRD")));
        for xrd in xrds {
            let services = xrd
                .children()
                .filter(|n| n.has_tag_name((XRD_NAMESPACE, "Service")));
            for service in services {
                let mut entry = DiscoveryResult {
                    auth_version: ProtocolVersion::Invalid,
                    priority: UNSET_PRIORITY,
                    ..Default::default()
                };

                if let Some(priority) = service.attribute("priority") {
                    match priority.parse::<u32>() {
                        Ok(priority) => entry.priority = priority,
                        Err(_) => debug!("ignoring unparseable service priority {:?}", priority),
                    }
                }

                for child in service.children().filter(|n| n.is_element()) {
                    let Some(value) = child.text() else { continue };

                    if child.has_tag_name((XRD_NAMESPACE, "Type")) {
                        if value.contains(AUTH_2_0_TYPE) {
                            entry.auth_version = ProtocolVersion::V2Dot0;
                        } else if value.contains(SIGNON_1_X_TYPE)
                            && entry.auth_version != ProtocolVersion::V2Dot0
                        {
                            entry.auth_version = ProtocolVersion::V1Dot1;
                        }
                    } else if child.has_tag_name((XRD_NAMESPACE, "URI")) {
                        match Url::parse(value) {
                            Ok(url) => entry.server_url = Some(url),
                            Err(e) => debug!("ignoring malformed service URI: {}", e),
                        }
                    } else if child.has_tag_name((XRD_NAMESPACE, "LocalID"))
                        || child.has_tag_name((OPENID_XMLNS, "Delegate"))
                    {
                        entry.local_id = Some(value.to_string());
                    }
                }

                if entry.server_url.is_some() && entry.auth_version.is_valid() {
                    entries.push(entry);
                }
            }
        }

        if entries.is_empty() {
            return None;
        }

        // Stable sort: ties keep document order.
        entries.sort_by_key(|e| e.priority);
        self.version = entries[0].auth_version;
        Some(entries)
    }

    fn version(&self) -> ProtocolVersion {
        self.version
    }
}

#[cfg(test)]
#[path = "../tests/xrds_tests.rs"]
mod xrds_tests;
