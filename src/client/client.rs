use std::time::SystemTime;

use rand::Rng;
use tracing::debug;
use url::Url;

use crate::client::OpenIdUser;
use crate::discovery::{
    resolve_endpoint, DiscoveryResult, HtmlDiscovery, XrdsDiscovery, YadisDiscovery,
};
use crate::extensions::IdentityAuthentication;
use crate::helpers::make_get_url;
use crate::http::HttpFetcher;
use crate::state::{AuthenticationMode, ErrorCondition, StateContainer};
use crate::types::{Parameters, ProtocolVersion, IDENTIFIER_SELECT, OPENID_2_0};

/// Operational mode requested by a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedMode {
    /// The arguments carry no recognizable response.
    None,
    /// An authentication assertion that should be validated.
    IdResolution,
    /// The user canceled authentication at the provider.
    CanceledByUser,
    /// An immediate-mode request could not complete without user
    /// interaction; a standard request should be issued.
    SetupNeeded,
    /// The provider reported an error.
    Error,
}

/// OpenID Relying Party compatible with the 1.1 and 2.0 protocol
/// versions.
///
/// Drives one authentication transaction end to end: set the user's
/// identifier, call [`create_request`](Self::create_request) to obtain the
/// redirect URL, then construct a new instance from the provider's
/// response arguments and call
/// [`validate_response`](Self::validate_response) followed by
/// [`retrieve_user`](Self::retrieve_user).
pub struct RelyingParty {
    state: StateContainer,
    identity: Option<String>,
    provider_url: Option<Url>,
    use_directed_identity: bool,
    last_discovery_result: Option<DiscoveryResult>,
}

impl Default for RelyingParty {
    fn default() -> Self {
        Self::new()
    }
}

impl RelyingParty {
    /// Creates a relying party with the default plugin set: XRDS, Yadis
    /// and HTML discovery in that order, plus the identity assertion
    /// extension. Stateless mode is enabled by default.
    pub fn new() -> Self {
        Self::from_response(Parameters::new())
    }

    /// Creates a relying party holding the arguments received with a
    /// provider response. The identity is seeded from the claimed
    /// identifier echoed in the response, when present.
    pub fn from_response(arguments: Parameters) -> Self {
        let mut state = StateContainer::new();
        state.register_discovery(Box::new(XrdsDiscovery::new()));
        state.register_discovery(Box::new(YadisDiscovery::new()));
        state.register_discovery(Box::new(HtmlDiscovery::new()));
        state.register_extension(Box::new(IdentityAuthentication::new()));
        state.request_arguments = arguments;

        let mut client = Self {
            state,
            identity: None,
            provider_url: None,
            use_directed_identity: false,
            last_discovery_result: None,
        };
        client.seed_identity_from_response();
        client
    }

    /// Creates a relying party over a caller-prepared state container,
    /// leaving its plugin registrations untouched.
    pub fn with_state(state: StateContainer) -> Self {
        let mut client = Self {
            state,
            identity: None,
            provider_url: None,
            use_directed_identity: false,
            last_discovery_result: None,
        };
        client.seed_identity_from_response();
        client
    }

    fn seed_identity_from_response(&mut self) {
        let arguments = &self.state.request_arguments;
        self.identity = match arguments.get("esoid.claimed_id") {
            Some(claimed) if !claimed.is_empty() => Some(claimed.to_string()),
            _ => arguments
                .get("openid.claimed_id")
                .filter(|claimed| !claimed.is_empty())
                // Providers may append a fragment to the claimed id.
                .and_then(|claimed| claimed.split('#').next())
                .map(str::to_string),
        };
    }

    /// The user-supplied identifier.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Sets the identifier to authenticate.
    pub fn set_identity(&mut self, identity: impl Into<String>) {
        self.identity = Some(identity.into());
    }

    /// The provider endpoint located by discovery, or set manually.
    pub fn provider_url(&self) -> Option<&Url> {
        self.provider_url.as_ref()
    }

    /// Sets the provider endpoint, skipping discovery in
    /// [`create_request`](Self::create_request).
    pub fn set_provider_url(&mut self, url: Url) {
        self.provider_url = Some(url);
    }

    /// Enables directed identity: the provider chooses the identifier.
    /// The provider endpoint must be set manually, as discovery does not
    /// run in this mode.
    pub fn set_use_directed_identity(&mut self, enabled: bool) {
        self.use_directed_identity = enabled;
    }

    /// The result of the most recent discovery run.
    pub fn last_discovery_result(&self) -> Option<&DiscoveryResult> {
        self.last_discovery_result.as_ref()
    }

    /// Transaction state: plugin registrations, persistence managers,
    /// trust root and error condition.
    pub fn state(&self) -> &StateContainer {
        &self.state
    }

    /// Mutable transaction state, for registration and configuration.
    pub fn state_mut(&mut self) -> &mut StateContainer {
        &mut self.state
    }

    /// Operational mode requested by the received response arguments.
    pub fn requested_mode(&self) -> RequestedMode {
        let arguments = &self.state.request_arguments;
        match arguments.get("openid.mode") {
            Some("id_res") => {
                if arguments
                    .get("openid.user_setup_url")
                    .is_some_and(|url| !url.is_empty())
                {
                    RequestedMode::SetupNeeded
                } else {
                    RequestedMode::IdResolution
                }
            }
            Some("cancel") => RequestedMode::CanceledByUser,
            Some("setup_needed") => RequestedMode::SetupNeeded,
            Some("error") => {
                debug!(
                    "provider reported error: {}",
                    arguments.get("openid.error").unwrap_or_default()
                );
                RequestedMode::Error
            }
            _ => RequestedMode::None,
        }
    }

    /// Performs discovery on the configured identifier and caches the
    /// provider endpoint, so a later
    /// [`create_request`](Self::create_request) skips discovery.
    pub fn is_valid_identity(&mut self, fetcher: &dyn HttpFetcher) -> bool {
        let identity = match self.identity.clone() {
            Some(identity) if !identity.is_empty() => identity,
            _ => return false,
        };
        self.last_discovery_result = resolve_endpoint(
            &identity,
            &mut self.state.discovery_plugins,
            &mut self.state.extension_plugins,
            fetcher,
        );
        if let Some(result) = &self.last_discovery_result {
            self.provider_url = result.server_url.clone();
        }
        self.provider_url.is_some()
    }

    /// Builds the redirect URL for the authentication request.
    ///
    /// Runs discovery first when no provider endpoint is cached. In
    /// stateful mode a currently valid association for the provider must
    /// already exist in the association store; otherwise the transaction
    /// falls back to stateless mode. Returns `None` and records an
    /// [`ErrorCondition`] when no identifier is set or discovery fails.
    pub fn create_request(&mut self, immediate: bool, fetcher: &dyn HttpFetcher) -> Option<Url> {
        if self.use_directed_identity {
            if let Some(provider) = self.provider_url.clone() {
                self.setup_directed_identity(provider);
            }
        }

        let identity = match self.identity.clone() {
            Some(identity) if !identity.is_empty() => identity,
            _ => {
                self.state.error_state = ErrorCondition::NoIdSpecified;
                debug!("no identifier specified, ending check");
                return None;
            }
        };

        if self.provider_url.is_none() && !self.use_directed_identity {
            match resolve_endpoint(
                &identity,
                &mut self.state.discovery_plugins,
                &mut self.state.extension_plugins,
                fetcher,
            ) {
                Some(result) => {
                    self.provider_url = result.server_url.clone();
                    self.last_discovery_result = Some(result);
                }
                None => {
                    debug!("discovery strategies could not locate a provider");
                    self.state.error_state = ErrorCondition::NoServersFound;
                    return None;
                }
            }
        }

        let provider = match &self.provider_url {
            Some(url) => url.clone(),
            None => {
                self.state.error_state = ErrorCondition::NoServersFound;
                return None;
            }
        };

        // A manually configured provider gets default discovery data.
        if self.last_discovery_result.is_none() {
            self.last_discovery_result = Some(DiscoveryResult {
                server_url: Some(provider.clone()),
                auth_version: ProtocolVersion::V2Dot0,
                ..DiscoveryResult::default()
            });
        }
        let discovered = self.last_discovery_result.clone()?;

        if self.state.auth_mode == AuthenticationMode::Stateful {
            let valid_association = self
                .state
                .association_manager()
                .and_then(|manager| manager.find_by_server(provider.as_str()))
                .map(|association| association.is_valid_at(SystemTime::now()))
                .unwrap_or(false);
            if !valid_association {
                debug!("no valid association for provider, falling back to stateless mode");
                self.state.auth_mode = AuthenticationMode::Stateless;
            }
        }

        self.redirect_url(&discovered, immediate)
    }

    // Discovery does not run in directed-identity mode, so the provider
    // gets standard 2.0 identifier-select discovery data.
    fn setup_directed_identity(&mut self, provider: Url) {
        self.identity = Some(IDENTIFIER_SELECT.to_string());
        self.last_discovery_result = Some(DiscoveryResult {
            server_url: Some(provider),
            local_id: Some(IDENTIFIER_SELECT.to_string()),
            claimed_id: Some(IDENTIFIER_SELECT.to_string()),
            auth_version: ProtocolVersion::V2Dot0,
            ..DiscoveryResult::default()
        });
    }

    fn redirect_url(&mut self, discovered: &DiscoveryResult, immediate: bool) -> Option<Url> {
        let server_url = discovered.server_url.clone()?;
        let mut return_to = self.state.return_to_url.as_ref()?.to_string();

        let mut params = Parameters::new();
        params.set(
            "openid.mode",
            if immediate {
                "checkid_immediate"
            } else {
                "checkid_setup"
            },
        );

        if self.state.auth_mode == AuthenticationMode::Stateful {
            let association = self
                .state
                .association_manager()
                .and_then(|manager| manager.find_by_server(server_url.as_str()))?;
            let nonce = rand::thread_rng().gen_range(0..i32::MAX);
            self.state.set_nonce(nonce);
            params.set("openid.assoc_handle", &association.handle);
        }

        if let Some(trust_root) = self.state.trust_root.clone() {
            match discovered.auth_version {
                ProtocolVersion::V2Dot0 => params.set("openid.realm", trust_root),
                _ => params.set("openid.trust_root", trust_root),
            }
        }
        if discovered.auth_version == ProtocolVersion::V2Dot0 {
            params.set("openid.ns", OPENID_2_0);
        }

        for extension in &self.state.extension_plugins {
            let data = extension.build_authorization_data(discovered);
            for (key, value) in data.iter() {
                if key == "esoid.ReturnUrl" {
                    // Extensions may ride state back on the return URL.
                    append_query(&mut return_to, value);
                } else {
                    params.set(key, value);
                }
            }
        }

        if self.state.auth_mode == AuthenticationMode::Stateful {
            append_query(&mut return_to, &format!("cnonce={}", self.state.nonce()));
        }
        params.set("openid.return_to", return_to);

        make_get_url(&server_url, &params)
    }

    /// Validates a received authentication assertion.
    ///
    /// Re-runs discovery for the claimed identifier and requires the
    /// response's `openid.identity` to match the discovered local
    /// identifier whenever delegation is in use. In stateful mode the
    /// session nonce is checked and consumed and the asserted association
    /// handle must name a live association for the discovered provider.
    /// Every registered extension's validation must pass. Verifying the
    /// response signature against the association secret is the host's
    /// responsibility.
    pub fn validate_response(&mut self, fetcher: &dyn HttpFetcher) -> bool {
        if let Some(identity) = self.identity.clone() {
            self.last_discovery_result = resolve_endpoint(
                &identity,
                &mut self.state.discovery_plugins,
                &mut self.state.extension_plugins,
                fetcher,
            );
        }

        if let Some(result) = &self.last_discovery_result {
            if result.local_id != result.claimed_id
                && result.local_id.as_deref() != self.state.request_arguments.get("openid.identity")
            {
                debug!("received identity does not match the discovered local identifier");
                return false;
            }
        }

        let server = match self
            .last_discovery_result
            .as_ref()
            .and_then(|result| result.server_url.clone())
        {
            Some(server) => server,
            None => return false,
        };

        if self.state.auth_mode == AuthenticationMode::Stateful
            && !self.validate_stateful(&server)
        {
            return false;
        }

        for extension in &self.state.extension_plugins {
            if !extension.validate(&self.state.request_arguments) {
                debug!("extension {} rejected the response", extension.name());
                self.state.error_state = ErrorCondition::RequestRefused;
                return false;
            }
        }
        true
    }

    fn validate_stateful(&mut self, server: &Url) -> bool {
        // The nonce is single-use; consume it before any check can fail.
        let nonce = self.state.nonce();
        self.state.set_nonce(-1);

        if nonce == -1 {
            debug!("session nonce is not set");
            self.state.error_state = ErrorCondition::SessionTimeout;
            return false;
        }
        if let Some(cnonce) = self.state.request_arguments.get("cnonce") {
            if cnonce.parse::<i32>().ok() != Some(nonce) {
                debug!("session nonce has expired");
                self.state.error_state = ErrorCondition::SessionTimeout;
                return false;
            }
        }

        let handle = match self.state.request_arguments.get("openid.assoc_handle") {
            Some(handle) => handle.to_string(),
            None => return false,
        };
        let association = match self
            .state
            .association_manager()
            .and_then(|manager| manager.find_by_handle(&handle))
        {
            Some(association) => association,
            None => {
                if self
                    .state
                    .request_arguments
                    .contains_key("openid.invalidate_handle")
                {
                    debug!("association handle has been invalidated");
                } else {
                    debug!("association handle not found in the store");
                }
                return false;
            }
        };

        if !association.is_valid_at(SystemTime::now()) {
            debug!("association has expired, removing it from the store");
            if let Some(manager) = self.state.association_manager() {
                manager.remove(&association);
            }
            return false;
        }

        // Rejects responses forged on behalf of another provider.
        if association.server != server.as_str() {
            debug!("association handle is not valid for this provider");
            return false;
        }
        true
    }

    /// Builds the user object for a validated response, letting every
    /// registered extension populate its share of the data.
    pub fn retrieve_user(&self) -> OpenIdUser {
        let mut user = OpenIdUser::new(self.last_discovery_result.clone());
        for extension in &self.state.extension_plugins {
            extension.populate_user(&mut user, &self.state.request_arguments);
        }
        user
    }
}

fn append_query(url: &mut String, pair: &str) {
    if url.contains('?') {
        url.push('&');
    } else {
        url.push('?');
    }
    url.push_str(pair);
}
