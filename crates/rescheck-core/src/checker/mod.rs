//! Availability checkers, one per kind of resource.
//!
//! A checker is built for one [`Resource`] by [`CheckerFactory::select`],
//! talks to the resource lazily on first use and caches what it learned, so
//! asking for the verdict and then the report costs a single round of
//! requests. Transport failures never escape a check; they turn into a
//! negative verdict and a log line.

mod factory;
mod ftp_file;
mod http_file;
mod http_probe;
mod rest;
mod rules;
mod web_page;

use std::io;
use std::path::Path;

use serde_json::Value;

use crate::error::TransportError;
use crate::report::{self, CheckResult};
use crate::resource::Resource;

pub use factory::CheckerFactory;
pub use ftp_file::FtpFileChecker;
pub use http_file::HttpFileChecker;
pub use http_probe::NO_RESPONSE_CODE;
pub use rest::{ContentFormat, RestEndpointChecker};
pub use rules::is_file_size_acceptable;
pub use web_page::WebPageChecker;

/// What every checker can answer about its resource.
pub trait ResourceChecker {
    fn resource(&self) -> &Resource;

    fn exists(&self) -> bool;

    fn passes_all_checks(&self) -> bool;

    fn build_report(&self) -> CheckResult;

    /// The resource's record with the report attached under `"Report"`.
    fn resource_with_report(&self) -> Value {
        report::resource_with_report(self.resource(), &self.build_report())
    }
}

/// Checkers for downloadable files.
pub trait FileChecker: ResourceChecker {
    /// Current size in bytes, `None` if it could not be determined.
    fn file_size(&self) -> Option<u64>;

    /// Largest tolerated shrink, in percent of the expected size.
    fn acceptable_size_drop_percent(&self) -> f64;

    fn is_file_size_acceptable(&self) -> bool {
        is_file_size_acceptable(
            self.file_size(),
            self.resource().expected_file_size(),
            self.acceptable_size_drop_percent(),
        )
    }

    /// Downloads the file to `dest`, replacing any file already there.
    fn save_file_contents(&self, dest: &Path) -> Result<u64, TransportError>;
}

/// A checker for any supported resource.
pub enum Checker {
    FtpFile(FtpFileChecker),
    HttpFile(HttpFileChecker),
    RestEndpoint(RestEndpointChecker),
    WebPage(WebPageChecker),
}

impl Checker {
    fn inner(&self) -> &dyn ResourceChecker {
        match self {
            Checker::FtpFile(c) => c,
            Checker::HttpFile(c) => c,
            Checker::RestEndpoint(c) => c,
            Checker::WebPage(c) => c,
        }
    }

    /// The file view of this checker, for file resources.
    pub fn as_file_checker(&self) -> Option<&dyn FileChecker> {
        match self {
            Checker::FtpFile(c) => Some(c),
            Checker::HttpFile(c) => Some(c),
            Checker::RestEndpoint(_) | Checker::WebPage(_) => None,
        }
    }

    /// Short protocol label, for summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Checker::FtpFile(_) => "ftp file",
            Checker::HttpFile(_) => "http file",
            Checker::RestEndpoint(_) => "rest endpoint",
            Checker::WebPage(_) => "web page",
        }
    }
}

impl ResourceChecker for Checker {
    fn resource(&self) -> &Resource {
        self.inner().resource()
    }

    fn exists(&self) -> bool {
        self.inner().exists()
    }

    fn passes_all_checks(&self) -> bool {
        self.inner().passes_all_checks()
    }

    fn build_report(&self) -> CheckResult {
        self.inner().build_report()
    }
}

fn remove_existing(dest: &Path) -> Result<(), TransportError> {
    match std::fs::remove_file(dest) {
        Ok(()) => {
            tracing::debug!(dest = %dest.display(), "removed existing file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
