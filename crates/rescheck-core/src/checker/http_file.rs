//! File resources served over HTTP(S).

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::Span;

use super::http_probe::HttpProbe;
use super::{remove_existing, FileChecker, ResourceChecker};
use crate::content::ContentScan;
use crate::error::TransportError;
use crate::report::{CheckResult, ReportBuilder};
use crate::resource::Resource;
use crate::transport::HttpClient;

pub struct HttpFileChecker {
    resource: Resource,
    probe: HttpProbe,
    acceptable_size_drop_percent: f64,
    scan: OnceCell<ContentScan>,
}

impl HttpFileChecker {
    pub fn new(
        resource: Resource,
        client: Arc<dyn HttpClient>,
        acceptable_size_drop_percent: f64,
        span: Span,
    ) -> Self {
        let probe = HttpProbe::new(resource.url().as_str(), client, span);
        Self {
            resource,
            probe,
            acceptable_size_drop_percent,
            scan: OnceCell::new(),
        }
    }

    /// Status of the HEAD request, or -1 if it could not be made.
    pub fn response_code(&self) -> i32 {
        self.probe.response_code()
    }

    /// `Last-Modified` header of the HEAD response, verbatim.
    pub fn last_modified(&self) -> Option<&str> {
        self.probe.last_modified()
    }

    pub fn content_scan(&self) -> ContentScan {
        *self.scan.get_or_init(|| {
            self.probe.scan_body(
                self.resource.error_response_text(),
                self.resource.expected_response_text(),
            )
        })
    }
}

impl ResourceChecker for HttpFileChecker {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn exists(&self) -> bool {
        self.probe.is_ok()
    }

    fn passes_all_checks(&self) -> bool {
        self.exists() && self.is_file_size_acceptable() && self.content_scan().has_expected_content()
    }

    fn build_report(&self) -> CheckResult {
        ReportBuilder::file_size(
            self.passes_all_checks(),
            self.exists(),
            self.file_size(),
            self.is_file_size_acceptable(),
        )
    }
}

impl FileChecker for HttpFileChecker {
    fn file_size(&self) -> Option<u64> {
        self.probe.content_length()
    }

    fn acceptable_size_drop_percent(&self) -> f64 {
        self.acceptable_size_drop_percent
    }

    fn save_file_contents(&self, dest: &Path) -> Result<u64, TransportError> {
        let _enter = self.probe.span().enter();
        remove_existing(dest)?;

        let mut response = self.probe.get(&HashMap::new())?;
        let mut out = BufWriter::new(File::create(dest)?);
        let written = io::copy(&mut response.body, &mut out)?;
        out.flush()?;

        tracing::info!(dest = %dest.display(), bytes = written, "saved file contents");
        Ok(written)
    }
}
