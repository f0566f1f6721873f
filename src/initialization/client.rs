//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::proxy::ProxyEndpoint;

/// Builds a quote client.
///
/// Creates a `reqwest::Client` configured with:
/// - Per-request timeout
/// - Cookie store, so the session cookies set by the site are replayed
/// - Gzip decoding
/// - Rustls TLS backend (no native TLS)
/// - All traffic routed through `proxy`, when given
///
/// The user agent is not set here; it is chosen per request.
pub fn init_quote_client(
    timeout: Duration,
    proxy: Option<&ProxyEndpoint>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .timeout(timeout)
        .cookie_store(true)
        .gzip(true);
    if let Some(endpoint) = proxy {
        builder = builder.proxy(endpoint.to_reqwest_proxy()?);
    } else {
        builder = builder.no_proxy();
    }
    builder.build()
}
