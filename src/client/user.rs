use crate::discovery::DiscoveryResult;
use crate::types::Parameters;

/// Everything known about an authenticated user: the discovery result
/// that located their provider, the resolved identifiers and the data
/// contributed by each registered extension.
#[derive(Debug, Clone, Default)]
pub struct OpenIdUser {
    /// Discovery result produced while resolving the user's identifier.
    pub last_discovery_result: Option<DiscoveryResult>,
    /// The claimed identifier, in display form once resolved.
    pub identity: Option<String>,
    /// The identifier validated by the Identity Provider.
    pub base_identity: Option<String>,
    /// Response data collected by the registered extensions.
    pub extension_data: Parameters,
}

impl OpenIdUser {
    /// Creates a user object seeded with the given discovery result.
    pub fn new(discovered: Option<DiscoveryResult>) -> Self {
        Self {
            last_discovery_result: discovered,
            ..Self::default()
        }
    }

    /// Looks up a value stored by an extension.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.extension_data.get(key)
    }
}
