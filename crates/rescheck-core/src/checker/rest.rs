//! REST endpoints.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::Span;

use super::http_probe::HttpProbe;
use super::ResourceChecker;
use crate::content::{ContentScan, ContentStream};
use crate::error::TransportError;
use crate::report::{CheckResult, ReportBuilder};
use crate::resource::Resource;
use crate::transport::HttpClient;

/// Representation requested from an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Json,
    Xml,
}

impl ContentFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            ContentFormat::Json => "application/json",
            ContentFormat::Xml => "application/xml",
        }
    }
}

pub struct RestEndpointChecker {
    resource: Resource,
    probe: HttpProbe,
    scan: OnceCell<ContentScan>,
}

impl RestEndpointChecker {
    pub fn new(resource: Resource, client: Arc<dyn HttpClient>, span: Span) -> Self {
        let probe = HttpProbe::new(resource.url().as_str(), client, span);
        Self {
            resource,
            probe,
            scan: OnceCell::new(),
        }
    }

    pub fn response_code(&self) -> i32 {
        self.probe.response_code()
    }

    pub fn content_scan(&self) -> ContentScan {
        *self.scan.get_or_init(|| {
            self.probe.scan_body(
                self.resource.error_response_text(),
                self.resource.expected_response_text(),
            )
        })
    }

    /// Fetches the whole body in the given representation.
    pub fn contents_as(&self, format: ContentFormat) -> Result<String, TransportError> {
        let _enter = self.probe.span().enter();
        let headers = HashMap::from([("Accept".to_string(), format.media_type().to_string())]);
        let response = self.probe.get(&headers)?;
        Ok(ContentStream::new(response.body).collect_all())
    }
}

impl ResourceChecker for RestEndpointChecker {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn exists(&self) -> bool {
        self.probe.is_ok()
    }

    fn passes_all_checks(&self) -> bool {
        self.exists() && self.content_scan().has_expected_content()
    }

    fn build_report(&self) -> CheckResult {
        ReportBuilder::response_text(self.passes_all_checks(), self.exists(), self.content_scan())
    }
}
