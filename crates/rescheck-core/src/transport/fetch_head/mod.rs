//! HTTP HEAD / metadata probing.
//!
//! Uses the curl crate (libcurl) to fetch the response code together with
//! `Content-Length` and `Last-Modified`. Unlike a download probe, a non-2xx
//! answer is not an error here: the status itself is what callers check.

mod parse;

use std::str;
use std::time::Duration;

use crate::error::TransportError;

pub(crate) use parse::parse_headers;

/// Result of a HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResult {
    /// Status code of the final response after redirects.
    pub status: u32,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Last-Modified` value if present.
    pub last_modified: Option<String>,
    /// `Content-Type` value if present.
    pub content_type: Option<String>,
}

/// Timeouts applied to the probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeTimeouts {
    pub connect: Duration,
    pub total: Duration,
}

/// Performs a HEAD request and returns the status and parsed metadata.
///
/// Follows redirects; only the headers of the last response are kept.
/// Runs in the current thread.
pub fn probe(url: &str, timeouts: ProbeTimeouts) -> Result<HeadResult, TransportError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.total)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    tracing::debug!(url, status, "HEAD probe finished");
    Ok(parse_headers(status, &headers))
}
