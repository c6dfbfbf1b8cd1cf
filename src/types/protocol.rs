//! Protocol versions and the well-known OpenID namespace URIs.

use serde::{Deserialize, Serialize};

/// Version of the OpenID Authentication specification spoken by a
/// discovered Identity Provider endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// An unsupported or not-yet-negotiated version.
    #[default]
    Invalid,
    /// OpenID Authentication 1.1.
    V1Dot1,
    /// OpenID Authentication 2.0.
    V2Dot0,
}

impl ProtocolVersion {
    /// Whether this version is usable for an authentication request.
    pub fn is_valid(&self) -> bool {
        !matches!(self, ProtocolVersion::Invalid)
    }
}

/// OpenID 2.0 namespace, sent as `openid.ns` on 2.0 requests.
pub const OPENID_2_0: &str = "http://specs.openid.net/auth/2.0";

/// Identifier used for directed-identity requests.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

/// Namespace of the OpenID+OAuth hybrid extension.
pub const OAUTH_1_0: &str = "http://specs.openid.net/extensions/oauth/1.0";

/// XRDS service `Type` values containing this mark a 2.0 endpoint.
pub(crate) const AUTH_2_0_TYPE: &str = "http://specs.openid.net/auth/2.";

/// XRDS service `Type` values containing this mark a 1.x signon endpoint.
pub(crate) const SIGNON_1_X_TYPE: &str = "http://openid.net/signon/1.";

/// Base URL of the public XRI proxy resolver.
pub(crate) const XRI_RESOLVER: &str = "https://xri.net/";

/// XML namespace of the XRDS document root.
pub(crate) const XRDS_NAMESPACE: &str = "xri://$xrds";

/// XML namespace of `XRD`, `Service`, `Type`, `URI` and `LocalID` elements.
pub(crate) const XRD_NAMESPACE: &str = "xri://$xrd*($v*2.0)";

/// XML namespace of the legacy `openid:Delegate` element.
pub(crate) const OPENID_XMLNS: &str = "http://openid.net/xmlns/1.0";
