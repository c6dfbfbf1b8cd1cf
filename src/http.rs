//! Document fetch collaborator contract.

use thiserror::Error;
use url::Url;

/// A document retrieved during discovery.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Response body.
    pub body: String,
    /// Effective URL after all redirects were followed.
    pub final_url: String,
}

/// Failure reported by the fetch collaborator.
///
/// A fetch failure only fails discovery for the strategy that needed the
/// document; it is never fatal to the transaction.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request could not be completed at the transport level.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The server answered with a non-success status code.
    #[error("http status {0}")]
    Status(u16),
}

/// Interface to the HTTP layer used to retrieve discovery documents.
///
/// The engine does not dictate retry, redirect or TLS policy; it only
/// requires that redirects are followed transparently and the effective
/// final URL is reported back. A default implementation backed by
/// `reqwest` is available behind the `http_client` cargo feature.
pub trait HttpFetcher {
    /// Retrieves `url` and returns the body together with the final
    /// effective URL.
    fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError>;
}
