//! Identity assertion extension: the optional `openid.identity` and
//! `openid.claimed_id` request fields.

use crate::client::OpenIdUser;
use crate::discovery::{normalize_default, DiscoveryResult};
use crate::extensions::Extension;
use crate::types::{Parameters, ProtocolVersion, OPENID_2_0};

/// Contributes the identity assertion fields to the authentication
/// request and resolves the user's display identity from the response.
///
/// Required for OpenID 1.1 providers; optional for 2.0 providers when
/// another extension performs an identity-free exchange.
#[derive(Debug, Default)]
pub struct IdentityAuthentication;

impl IdentityAuthentication {
    /// Creates the identity assertion extension.
    pub fn new() -> Self {
        Self
    }
}

impl Extension for IdentityAuthentication {
    fn name(&self) -> &'static str {
        "OpenID Authentication"
    }

    fn namespace_uri(&self) -> &str {
        OPENID_2_0
    }

    fn build_authorization_data(&self, discovered: &DiscoveryResult) -> Parameters {
        let mut params = Parameters::new();

        if let Some(local_id) = &discovered.local_id {
            params.set("openid.identity", local_id);
        }

        if let Some(claimed_id) = &discovered.claimed_id {
            if discovered.auth_version == ProtocolVersion::V2Dot0 {
                params.set("openid.claimed_id", claimed_id);
            } else {
                // 1.x providers echo the claimed id back on the return URL.
                params.set(
                    "esoid.ReturnUrl",
                    format!("esoid.claimed_id={}", urlencoding::encode(claimed_id)),
                );
            }
        }
        params
    }

    fn populate_user(&self, user: &mut OpenIdUser, response: &Parameters) {
        let base_identity = response.get("openid.identity").map(str::to_string);

        let (claimed_id, local_id) = match &user.last_discovery_result {
            Some(result) => (result.claimed_id.clone(), result.local_id.clone()),
            None => (None, None),
        };

        user.base_identity = base_identity.clone();

        if claimed_id.is_some() {
            user.identity = claimed_id.clone();
        }

        // Delegated identities display the claimed form; otherwise the
        // provider-validated identifier is shown.
        let display_source = if claimed_id == local_id {
            base_identity
        } else {
            claimed_id
        };
        if let Some(source) = display_source {
            if let Some(entry) = normalize_default(&source) {
                user.identity = Some(entry.friendly_id);
            }
        }
    }
}
