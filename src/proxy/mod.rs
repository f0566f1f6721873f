//! Proxy endpoints and rotation.
//!
//! The pool is an ordered list of endpoints plus a rotation cursor. Each
//! request asks the pool for the next endpoint; the HTTP session keeps one
//! client per endpoint so connection pools are reused.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::warn;
use rand::Rng;
use thiserror::Error;
use url::Url;

use crate::config::ProxyRotation;

const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Proxy loading failures.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("failed to read proxy file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid proxy '{line}': {reason}")]
    Invalid { line: String, reason: String },

    #[error("proxy file {0} contains no usable endpoints")]
    Empty(PathBuf),
}

/// One proxy endpoint, credentials included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    url: Url,
}

impl ProxyEndpoint {
    /// Parses `host:port`, `user:pass@host:port` or a full proxy URL.
    pub fn parse(line: &str) -> Result<Self, ProxyError> {
        let line = line.trim();
        let invalid = |reason: &str| ProxyError::Invalid {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let url = if line.contains("://") {
            Url::parse(line).map_err(|e| invalid(&e.to_string()))?
        } else {
            let host_port = line.rsplit_once('@').map_or(line, |(_, hp)| hp);
            let has_port = host_port
                .rsplit_once(':')
                .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
            if !has_port {
                return Err(invalid("expected host:port"));
            }
            Url::parse(&format!("http://{line}")).map_err(|e| invalid(&e.to_string()))?
        };

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(invalid(&format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        if url.port_or_known_default().is_none() {
            return Err(invalid("missing port"));
        }
        Ok(Self { url })
    }

    /// Full URL, credentials included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn has_credentials(&self) -> bool {
        !self.url.username().is_empty()
    }

    /// Builds the reqwest proxy routing all traffic through this endpoint.
    pub fn to_reqwest_proxy(&self) -> Result<reqwest::Proxy, reqwest::Error> {
        let proxy = reqwest::Proxy::all(self.url.as_str())?;
        if self.has_credentials() && self.url.scheme().starts_with("http") {
            let password = self.url.password().unwrap_or("");
            return Ok(proxy.basic_auth(self.url.username(), password));
        }
        Ok(proxy)
    }
}

/// Logs endpoints without credentials.
impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}",
            self.url.scheme(),
            self.url.host_str().unwrap_or("")
        )?;
        if let Some(port) = self.url.port_or_known_default() {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// Reads a proxy list file, skipping blank, `#` and invalid lines.
pub fn load_proxies(path: &Path) -> Result<Vec<ProxyEndpoint>, ProxyError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProxyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let endpoints = parse_proxy_list(&content);
    if endpoints.is_empty() {
        return Err(ProxyError::Empty(path.to_path_buf()));
    }
    log::info!("Loaded {} proxies from {}", endpoints.len(), path.display());
    Ok(endpoints)
}

/// Parses proxy list content, one endpoint per line.
pub fn parse_proxy_list(content: &str) -> Vec<ProxyEndpoint> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match ProxyEndpoint::parse(line) {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("Skipping proxy: {e}");
                None
            }
        })
        .collect()
}

/// Rotating set of proxy endpoints.
///
/// Only the cursor is mutable, and it is atomic, so the pool is shared by
/// reference.
#[derive(Debug)]
pub struct ProxyPool {
    endpoints: Vec<ProxyEndpoint>,
    rotation: ProxyRotation,
    cursor: AtomicUsize,
}

impl ProxyPool {
    pub fn new(endpoints: Vec<ProxyEndpoint>, rotation: ProxyRotation) -> Self {
        Self {
            endpoints,
            rotation,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn endpoints(&self) -> &[ProxyEndpoint] {
        &self.endpoints
    }

    /// Index of the endpoint to use for the next request, `None` if the pool
    /// is empty.
    pub fn next_index(&self) -> Option<usize> {
        if self.endpoints.is_empty() {
            return None;
        }
        let index = match self.rotation {
            ProxyRotation::RoundRobin => {
                self.cursor.fetch_add(1, Ordering::Relaxed) % self.endpoints.len()
            }
            ProxyRotation::Random => rand::rng().random_range(0..self.endpoints.len()),
        };
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_port() {
        let endpoint = ProxyEndpoint::parse("10.0.0.1:8080").unwrap();
        assert_eq!(endpoint.url().as_str(), "http://10.0.0.1:8080/");
        assert!(!endpoint.has_credentials());
        assert_eq!(endpoint.to_string(), "http://10.0.0.1:8080");
    }

    #[test]
    fn test_parse_credentials() {
        let endpoint = ProxyEndpoint::parse("alice:s3cret@proxy.example.com:3128").unwrap();
        assert!(endpoint.has_credentials());
        assert_eq!(endpoint.url().username(), "alice");
        assert_eq!(endpoint.url().password(), Some("s3cret"));
        // Display never leaks credentials
        assert_eq!(endpoint.to_string(), "http://proxy.example.com:3128");
    }

    #[test]
    fn test_parse_full_urls() {
        for line in [
            "http://proxy.example.com:3128",
            "https://proxy.example.com:443",
            "socks5://127.0.0.1:1080",
            "socks5h://user:pw@127.0.0.1:1080",
        ] {
            assert!(ProxyEndpoint::parse(line).is_ok(), "{line} should parse");
        }
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        for line in ["proxy.example.com", "ftp://proxy:21", "host:notaport", "http://:8080"] {
            assert!(ProxyEndpoint::parse(line).is_err(), "{line} should fail");
        }
    }

    #[test]
    fn test_to_reqwest_proxy() {
        let endpoint = ProxyEndpoint::parse("alice:pw@10.0.0.1:8080").unwrap();
        assert!(endpoint.to_reqwest_proxy().is_ok());
    }

    #[test]
    fn test_parse_proxy_list_skips_comments_and_invalid() {
        let content = "# proxies\n10.0.0.1:8080\n\nbogus\n  10.0.0.2:8080  \n";
        let endpoints = parse_proxy_list(content);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[1].to_string(), "http://10.0.0.2:8080");
    }

    #[test]
    fn test_load_proxies_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxies.txt");
        std::fs::write(&path, "# nothing here\n").unwrap();
        assert!(matches!(load_proxies(&path), Err(ProxyError::Empty(_))));
    }

    #[test]
    fn test_round_robin_cycles_in_order() {
        let endpoints = parse_proxy_list("10.0.0.1:1\n10.0.0.2:2\n10.0.0.3:3\n");
        let pool = ProxyPool::new(endpoints, ProxyRotation::RoundRobin);
        let picks: Vec<usize> = (0..7).filter_map(|_| pool.next_index()).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_random_rotation_stays_in_bounds() {
        let endpoints = parse_proxy_list("10.0.0.1:1\n10.0.0.2:2\n");
        let pool = ProxyPool::new(endpoints, ProxyRotation::Random);
        for _ in 0..50 {
            assert!(pool.next_index().unwrap() < 2);
        }
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let pool = ProxyPool::new(Vec::new(), ProxyRotation::RoundRobin);
        assert!(pool.is_empty());
        assert!(pool.next_index().is_none());
    }
}
