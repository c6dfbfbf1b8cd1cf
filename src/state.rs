//! Per-transaction state container and plugin registry.

use url::Url;

use crate::discovery::DiscoveryService;
use crate::extensions::Extension;
use crate::persistence::{AssociationPersistence, SessionPersistence};
use crate::types::Parameters;

/// How response validation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationMode {
    /// Responses are verified locally using a negotiated association.
    Stateful,
    /// Responses are verified with a direct check against the provider.
    Stateless,
}

/// Error recorded on the transaction while processing; nothing in this
/// crate is fatal, the worst outcome is an absent result plus one of
/// these conditions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCondition {
    /// No error recorded.
    #[default]
    NoErrors,
    /// Discovery could not locate a provider endpoint.
    NoServersFound,
    /// An HTTP request failed.
    HttpError,
    /// The session expired mid-transaction.
    SessionTimeout,
    /// The provider refused the request.
    RequestRefused,
    /// No identifier was supplied.
    NoIdSpecified,
    /// The user canceled authentication at the provider.
    RequestCanceled,
}

/// State for one authentication transaction: the ordered discovery
/// strategies and extensions registered for it, the persistence
/// collaborators, and the received response arguments.
///
/// The container is the sole owner of its plugin registrations. It is
/// used by a single logical flow end to end; registration must complete
/// before discovery or extension calls begin.
pub struct StateContainer {
    pub(crate) auth_mode: AuthenticationMode,
    pub(crate) trust_root: Option<String>,
    pub(crate) return_to_url: Option<Url>,
    pub(crate) discovery_plugins: Vec<Box<dyn DiscoveryService>>,
    pub(crate) extension_plugins: Vec<Box<dyn Extension>>,
    pub(crate) association_manager: Option<Box<dyn AssociationPersistence>>,
    pub(crate) session_manager: Option<Box<dyn SessionPersistence>>,
    pub(crate) request_arguments: Parameters,
    pub(crate) error_state: ErrorCondition,
}

impl Default for StateContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl StateContainer {
    /// Creates an empty stateless container with no plugins registered.
    pub fn new() -> Self {
        Self {
            auth_mode: AuthenticationMode::Stateless,
            trust_root: None,
            return_to_url: None,
            discovery_plugins: Vec::new(),
            extension_plugins: Vec::new(),
            association_manager: None,
            session_manager: None,
            request_arguments: Parameters::new(),
            error_state: ErrorCondition::NoErrors,
        }
    }

    /// Registers a discovery strategy. Registration order is preserved
    /// and significant; registering two instances of the same strategy
    /// type is legal.
    pub fn register_discovery(&mut self, plugin: Box<dyn DiscoveryService>) {
        self.discovery_plugins.push(plugin);
    }

    /// Registers an extension. Registration order is preserved and
    /// determines request-parameter build order.
    pub fn register_extension(&mut self, plugin: Box<dyn Extension>) {
        self.extension_plugins.push(plugin);
    }

    /// The registered discovery strategies, in registration order.
    pub fn discovery_plugins(&self) -> &[Box<dyn DiscoveryService>] {
        &self.discovery_plugins
    }

    /// The registered extensions, in registration order.
    pub fn extensions(&self) -> &[Box<dyn Extension>] {
        &self.extension_plugins
    }

    /// Looks up the first registered extension declaring `namespace_uri`.
    pub fn extension_by_namespace(&self, namespace_uri: &str) -> Option<&dyn Extension> {
        self.extension_plugins
            .iter()
            .find(|e| e.namespace_uri() == namespace_uri)
            .map(|e| e.as_ref())
    }

    /// Current authentication mode.
    pub fn auth_mode(&self) -> AuthenticationMode {
        self.auth_mode
    }

    /// Switches authentication mode. Forcing stateless mode drops both
    /// persistence managers.
    pub fn set_auth_mode(&mut self, mode: AuthenticationMode) {
        self.auth_mode = mode;
        if mode == AuthenticationMode::Stateless {
            self.association_manager = None;
            self.session_manager = None;
        }
    }

    /// Enables stateful mode with the supplied persistence managers and
    /// purges expired associations.
    pub fn enable_stateful_mode(
        &mut self,
        association_manager: Box<dyn AssociationPersistence>,
        session_manager: Box<dyn SessionPersistence>,
    ) {
        association_manager.cleanup();
        self.association_manager = Some(association_manager);
        self.session_manager = Some(session_manager);
        self.auth_mode = AuthenticationMode::Stateful;
    }

    /// The association store, when stateful mode is enabled.
    pub fn association_manager(&self) -> Option<&dyn AssociationPersistence> {
        self.association_manager.as_deref()
    }

    /// The session store, when stateful mode is enabled.
    pub fn session_manager(&self) -> Option<&dyn SessionPersistence> {
        self.session_manager.as_deref()
    }

    /// Current session nonce, `-1` when unset or no session store is
    /// configured.
    pub fn nonce(&self) -> i32 {
        match &self.session_manager {
            Some(manager) => manager.nonce(),
            None => -1,
        }
    }

    /// Persists the session nonce synchronously.
    pub fn set_nonce(&self, value: i32) {
        if let Some(manager) = &self.session_manager {
            manager.set_nonce(value);
        }
    }

    /// Root URL of the relying party's trust realm.
    pub fn trust_root(&self) -> Option<&str> {
        self.trust_root.as_deref()
    }

    /// Sets the trust realm root URL.
    pub fn set_trust_root(&mut self, trust_root: impl Into<String>) {
        self.trust_root = Some(trust_root.into());
    }

    /// URL the user agent is returned to after authentication.
    pub fn return_to_url(&self) -> Option<&Url> {
        self.return_to_url.as_ref()
    }

    /// Sets the return URL.
    pub fn set_return_to_url(&mut self, url: Url) {
        self.return_to_url = Some(url);
    }

    /// Arguments received with the provider's response.
    pub fn request_arguments(&self) -> &Parameters {
        &self.request_arguments
    }

    /// Replaces the received response arguments.
    pub fn set_request_arguments(&mut self, arguments: Parameters) {
        self.request_arguments = arguments;
    }

    /// Currently recorded error condition.
    pub fn error_state(&self) -> ErrorCondition {
        self.error_state
    }

    /// Records an error condition.
    pub fn set_error_state(&mut self, error: ErrorCondition) {
        self.error_state = error;
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;
