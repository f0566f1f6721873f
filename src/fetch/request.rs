//! Quote request headers.

use reqwest::header::{HeaderName, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};

/// Headers the calculator page's own XHR sends with a quote request.
pub(crate) struct QuoteHeaders<'a> {
    pub user_agent: &'a str,
    pub referer: &'a str,
    pub origin: &'a str,
}

impl QuoteHeaders<'_> {
    /// Returns headers as (name, value) tuples, for logging.
    pub(crate) fn as_vec(&self) -> Vec<(&'static str, String)> {
        vec![
            ("accept", "application/json, text/javascript, */*; q=0.01".to_string()),
            ("accept-language", "en-US,en;q=0.9".to_string()),
            ("origin", self.origin.to_string()),
            ("referer", self.referer.to_string()),
            ("user-agent", self.user_agent.to_string()),
            ("x-requested-with", "XMLHttpRequest".to_string()),
        ]
    }

    /// Applies the headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder
            .header(ACCEPT, "application/json, text/javascript, */*; q=0.01")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(ORIGIN, self.origin)
            .header(REFERER, self.referer)
            .header(USER_AGENT, self.user_agent)
            .header(HeaderName::from_static("x-requested-with"), "XMLHttpRequest")
    }
}

/// `scheme://host[:port]` of `url`, as sent in the `origin` header.
pub(crate) fn origin_of(url: &url::Url) -> String {
    url.origin().ascii_serialization()
}
