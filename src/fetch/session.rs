//! HTTP session for quote requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{Local, Utc};
use log::{debug, info, trace, warn};
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use tokio::sync::RwLock;
use url::Url;

use super::pacing::random_delay;
use super::request::{origin_of, QuoteHeaders};
use crate::config::{Config, ConfigError, SESSION_REFRESH_ATTEMPT, SESSION_WARMUP_TIMEOUT};
use crate::error_handling::{FetchError, InitializationError};
use crate::identity::{quote_form, random_user_agent, IdentityGenerator};
use crate::initialization::init_quote_client;
use crate::input::ZipCode;
use crate::models::PriceRecord;
use crate::parse::parse_price_response;
use crate::proxy::ProxyPool;

/// Endpoint, timing and politeness settings of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub endpoint: Url,
    /// Calculator page; sent as referer and fetched to warm up a new session.
    pub referer: String,
    pub request_timeout: Duration,
    /// Bounds of the random pause before each zip code.
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| ConfigError::InvalidUrl {
            field: "endpoint",
            value: config.endpoint.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            endpoint,
            referer: config.referer.clone(),
            request_timeout: config.request_timeout(),
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        })
    }
}

/// Clients, proxy rotation and identity generation for one run.
///
/// One `reqwest::Client` per proxy endpoint (or a single direct client).
/// The clients sit behind a lock only so a session refresh can replace them
/// and drop their cookies.
pub struct HttpSession {
    options: SessionOptions,
    origin: String,
    proxies: ProxyPool,
    clients: RwLock<Vec<reqwest::Client>>,
    identities: IdentityGenerator,
    refreshes: AtomicUsize,
}

impl HttpSession {
    pub fn new(options: SessionOptions, proxies: ProxyPool) -> Result<Self, InitializationError> {
        let clients = build_clients(&options, &proxies)?;
        Ok(Self {
            origin: origin_of(&options.endpoint),
            options,
            proxies,
            clients: RwLock::new(clients),
            identities: IdentityGenerator::new(),
            refreshes: AtomicUsize::new(0),
        })
    }

    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Number of session refreshes so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Sleeps a random duration within the configured politeness range.
    pub async fn politeness_delay(&self) -> Duration {
        let delay = random_delay(self.options.min_delay, self.options.max_delay);
        if !delay.is_zero() {
            debug!("Waiting {:.1}s before next request", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
        delay
    }

    /// One quote attempt for `zip_code`.
    ///
    /// Every attempt uses a fresh identity and the next proxy. A 403 on the
    /// second attempt refreshes the session before the error is returned.
    pub async fn fetch_quote(
        &self,
        zip_code: &ZipCode,
        attempt: u32,
    ) -> Result<PriceRecord, FetchError> {
        let identity = self.identities.generate();
        let form = quote_form(zip_code, &identity, Local::now().date_naive());
        let (client, route) = self.next_client().await;
        let headers = QuoteHeaders {
            user_agent: identity.user_agent,
            referer: &self.options.referer,
            origin: &self.origin,
        };

        debug!("Requesting quote for {zip_code} (attempt {attempt}, via {route})");
        trace!("Quote request headers: {:?}", headers.as_vec());
        let response = headers
            .apply_to_request_builder(client.post(self.options.endpoint.clone()))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            warn!("Zip {zip_code}: 403 Forbidden (attempt {attempt}, via {route})");
            if attempt == SESSION_REFRESH_ATTEMPT {
                self.refresh().await;
            }
            return Err(FetchError::Status(status));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let record = parse_price_response(zip_code, &body, Utc::now())?;
        Ok(record)
    }

    /// Replaces every client (dropping cookies and pooled connections), then
    /// fetches the calculator page to collect fresh cookies. A failed warm-up
    /// is only logged.
    pub async fn refresh(&self) {
        info!("Refreshing HTTP session");
        match build_clients(&self.options, &self.proxies) {
            Ok(clients) => *self.clients.write().await = clients,
            Err(e) => {
                warn!("Failed to rebuild HTTP clients, keeping the old ones: {e}");
                return;
            }
        }
        self.refreshes.fetch_add(1, Ordering::SeqCst);

        let (client, route) = self.next_client().await;
        let warmup = client
            .get(&self.options.referer)
            .header(USER_AGENT, random_user_agent())
            .timeout(SESSION_WARMUP_TIMEOUT)
            .send()
            .await;
        match warmup {
            Ok(response) => info!(
                "Session refreshed (warm-up status {}, via {route})",
                response.status()
            ),
            Err(e) => warn!("Session warm-up failed: {e}"),
        }
    }

    async fn next_client(&self) -> (reqwest::Client, String) {
        let clients = self.clients.read().await;
        match self.proxies.next_index() {
            Some(index) => (
                clients[index].clone(),
                self.proxies.endpoints()[index].to_string(),
            ),
            None => (clients[0].clone(), "direct".to_string()),
        }
    }
}

fn build_clients(
    options: &SessionOptions,
    proxies: &ProxyPool,
) -> Result<Vec<reqwest::Client>, reqwest::Error> {
    if proxies.is_empty() {
        return Ok(vec![init_quote_client(options.request_timeout, None)?]);
    }
    proxies
        .endpoints()
        .iter()
        .map(|endpoint| init_quote_client(options.request_timeout, Some(endpoint)))
        .collect()
}
