//! # Types Module
//! Shared data model: protocol versions, namespace URIs and the ordered
//! parameter collection exchanged with Identity Providers.

mod params;
mod protocol;

pub use params::Parameters;
pub use protocol::{ProtocolVersion, IDENTIFIER_SELECT, OAUTH_1_0, OPENID_2_0};

pub(crate) use protocol::{
    AUTH_2_0_TYPE, OPENID_XMLNS, SIGNON_1_X_TYPE, XRDS_NAMESPACE, XRD_NAMESPACE, XRI_RESOLVER,
};

#[cfg(test)]
#[path = "../tests/params_tests.rs"]
mod params_tests;
