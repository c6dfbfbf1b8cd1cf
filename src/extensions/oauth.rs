//! OpenID+OAuth hybrid extension 1.0.

use crate::discovery::DiscoveryResult;
use crate::extensions::{namespace_aliases, Extension};
use crate::types::{Parameters, OAUTH_1_0};

const PREFIX: &str = "openid.oauth.";

/// An approved OAuth request token returned with an authentication
/// response. Exchanging it for an access token is the job of the host's
/// OAuth consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    /// The request token value.
    pub token: String,
    /// Scope granted by the user, when the provider reports one.
    pub scope: Option<String>,
}

/// OpenID+OAuth hybrid extension: asks the provider to approve an OAuth
/// request token alongside the authentication response.
#[derive(Debug)]
pub struct OAuthHybrid {
    /// OAuth consumer key registered with the provider.
    pub consumer: String,
    /// Requested scope, specific to the service provider.
    pub scope: Option<String>,
}

impl OAuthHybrid {
    /// Creates the hybrid extension for the given consumer key.
    pub fn new(consumer: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            scope: None,
        }
    }

    /// Sets the requested scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Extracts the approved request token from a response.
    ///
    /// Returns `None` when the response does not declare this extension's
    /// namespace under any alias, or carries no token; never an error.
    pub fn request_token(&self, response: &Parameters) -> Option<RequestToken> {
        let aliases = namespace_aliases(response);
        let alias = aliases.get(OAUTH_1_0)?;
        let prefix = format!("openid.{}.", alias);

        let token = response.get(&format!("{}request_token", prefix))?;
        let scope = response
            .get(&format!("{}scope", prefix))
            .map(str::to_string);

        Some(RequestToken {
            token: token.to_string(),
            scope,
        })
    }
}

impl Extension for OAuthHybrid {
    fn name(&self) -> &'static str {
        "OpenID OAuth Extension 1.0"
    }

    fn namespace_uri(&self) -> &str {
        OAUTH_1_0
    }

    fn build_authorization_data(&self, _discovered: &DiscoveryResult) -> Parameters {
        let mut params = Parameters::new();
        params.set("openid.ns.oauth", OAUTH_1_0);
        params.set(format!("{}consumer", PREFIX), &self.consumer);
        if let Some(scope) = &self.scope {
            params.set(format!("{}scope", PREFIX), scope);
        }
        params
    }
}
