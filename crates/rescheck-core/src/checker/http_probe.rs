//! HEAD/GET access shared by the HTTP based checkers.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use tracing::Span;

use crate::content::{scan_content, ContentScan, ContentStream};
use crate::error::TransportError;
use crate::transport::{HeadResult, HttpClient, HttpResponse};

/// Response code reported when the HEAD request itself failed.
pub const NO_RESPONSE_CODE: i32 = -1;

/// One URL's HTTP view. The HEAD probe is issued at most once.
pub(crate) struct HttpProbe {
    url: String,
    client: Arc<dyn HttpClient>,
    span: Span,
    head: OnceCell<Option<HeadResult>>,
}

impl HttpProbe {
    pub(crate) fn new(url: &str, client: Arc<dyn HttpClient>, span: Span) -> Self {
        Self {
            url: url.to_string(),
            client,
            span,
            head: OnceCell::new(),
        }
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    pub(crate) fn head(&self) -> Option<&HeadResult> {
        self.head
            .get_or_init(|| {
                let _enter = self.span.enter();
                match self.client.head(&self.url) {
                    Ok(head) => {
                        tracing::debug!(status = head.status, "HEAD answered");
                        Some(head)
                    }
                    Err(e) => {
                        tracing::warn!(url = %self.url, "HEAD request failed: {e}");
                        None
                    }
                }
            })
            .as_ref()
    }

    pub(crate) fn response_code(&self) -> i32 {
        self.head()
            .and_then(|h| i32::try_from(h.status).ok())
            .unwrap_or(NO_RESPONSE_CODE)
    }

    pub(crate) fn is_ok(&self) -> bool {
        self.response_code() == 200
    }

    pub(crate) fn content_length(&self) -> Option<u64> {
        self.head().and_then(|h| h.content_length)
    }

    pub(crate) fn last_modified(&self) -> Option<&str> {
        self.head().and_then(|h| h.last_modified.as_deref())
    }

    pub(crate) fn get(&self, headers: &HashMap<String, String>) -> Result<HttpResponse, TransportError> {
        self.client.get(&self.url, headers)
    }

    /// Streams the GET body through [`scan_content`]. A failed GET scans as an empty body.
    pub(crate) fn scan_body(&self, error_text: &str, expected_text: &str) -> ContentScan {
        let _enter = self.span.enter();
        let body: Box<dyn Read + Send> = match self.get(&HashMap::new()) {
            Ok(response) => response.body,
            Err(e) => {
                tracing::warn!(url = %self.url, "GET request failed: {e}");
                Box::new(std::io::empty())
            }
        };
        scan_content(ContentStream::new(body), error_text, expected_text)
    }
}
