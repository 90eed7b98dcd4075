//! HTTP client abstraction.
//!
//! Checkers only see [`HttpClient`], so tests can swap in a canned client.
//! The live client probes metadata with a curl HEAD and streams GET bodies
//! through reqwest's blocking client, whose response is a plain `Read`.

use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use super::fetch_head::{self, HeadResult, ProbeTimeouts};
use crate::config::HttpConfig;
use crate::error::TransportError;

/// An open GET response; the body is read lazily.
pub struct HttpResponse {
    pub status: u32,
    pub body: Box<dyn Read + Send>,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// HTTP operations needed by the checkers. Implementations must follow redirects.
pub trait HttpClient: Send + Sync {
    /// Issues a HEAD request. Any status is a successful probe.
    fn head(&self, url: &str) -> Result<HeadResult, TransportError>;

    /// Issues a GET request with extra request headers. Non-2xx answers are errors.
    fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, TransportError>;
}

/// Production client: curl for HEAD, reqwest for streamed GET.
pub struct LiveHttpClient {
    client: reqwest::blocking::Client,
    probe_timeouts: ProbeTimeouts,
}

impl LiveHttpClient {
    pub fn new(cfg: &HttpConfig) -> Result<Self, TransportError> {
        let connect = Duration::from_secs(cfg.connect_timeout_secs);
        // Bodies may be very large; only the connect phase is bounded.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect)
            .timeout(None)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            probe_timeouts: ProbeTimeouts {
                connect,
                total: Duration::from_secs(cfg.head_timeout_secs),
            },
        })
    }
}

impl HttpClient for LiveHttpClient {
    fn head(&self, url: &str) -> Result<HeadResult, TransportError> {
        fetch_head::probe(url, self.probe_timeouts)
    }

    fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url);
        for (k, v) in headers {
            request = request.header(k.trim(), v.trim());
        }
        let response = request.send()?;

        let status = u32::from(response.status().as_u16());
        if !response.status().is_success() {
            return Err(TransportError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(HttpResponse {
            status,
            body: Box::new(response),
        })
    }
}
