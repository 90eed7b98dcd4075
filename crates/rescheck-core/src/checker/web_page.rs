//! Web pages, read through a headless browser.

use std::cell::OnceCell;
use std::sync::Arc;
use std::time::Duration;

use tracing::Span;

use super::http_probe::HttpProbe;
use super::ResourceChecker;
use crate::content::{scan_content, ContentScan};
use crate::report::{CheckResult, ReportBuilder};
use crate::resource::Resource;
use crate::transport::{HttpClient, PageRenderer};

pub struct WebPageChecker {
    resource: Resource,
    probe: HttpProbe,
    renderer: Arc<dyn PageRenderer>,
    settle_delay: Duration,
    scan: OnceCell<ContentScan>,
}

impl WebPageChecker {
    pub fn new(
        resource: Resource,
        client: Arc<dyn HttpClient>,
        renderer: Arc<dyn PageRenderer>,
        settle_delay: Duration,
        span: Span,
    ) -> Self {
        let probe = HttpProbe::new(resource.url().as_str(), client, span);
        Self {
            resource,
            probe,
            renderer,
            settle_delay,
            scan: OnceCell::new(),
        }
    }

    pub fn response_code(&self) -> i32 {
        self.probe.response_code()
    }

    /// Rendered DOM of the page; empty if rendering failed.
    pub fn page_source(&self) -> String {
        let _enter = self.probe.span().enter();
        match self.renderer.render(self.resource.url().as_str(), self.settle_delay) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(url = %self.resource.url(), "unable to render page: {e}");
                String::new()
            }
        }
    }

    pub fn content_scan(&self) -> ContentScan {
        *self.scan.get_or_init(|| {
            scan_content(
                [self.page_source()],
                self.resource.error_response_text(),
                self.resource.expected_response_text(),
            )
        })
    }
}

impl ResourceChecker for WebPageChecker {
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
