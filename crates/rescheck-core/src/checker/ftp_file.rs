//! File resources on FTP servers.

use std::cell::OnceCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use tracing::Span;

use super::{remove_existing, FileChecker, ResourceChecker};
use crate::error::TransportError;
use crate::report::{CheckResult, ReportBuilder};
use crate::resource::Resource;
use crate::transport::{FtpConnector, FtpCredentials, FtpFile, FtpSession, FtpTarget};

const DEFAULT_FTP_PORT: u16 = 21;

pub struct FtpFileChecker {
    resource: Resource,
    connector: Arc<dyn FtpConnector>,
    credentials: FtpCredentials,
    acceptable_size_drop_percent: f64,
    span: Span,
    remote_file: OnceCell<FtpFile>,
}

impl FtpFileChecker {
    pub fn new(
        resource: Resource,
        connector: Arc<dyn FtpConnector>,
        credentials: FtpCredentials,
        acceptable_size_drop_percent: f64,
        span: Span,
    ) -> Self {
        Self {
            resource,
            connector,
            credentials,
            acceptable_size_drop_percent,
            span,
            remote_file: OnceCell::new(),
        }
    }

    pub fn server(&self) -> &str {
        self.resource.url().host_str().unwrap_or_default()
    }

    /// Path of the file on the server, percent-decoded.
    pub fn file_path(&self) -> String {
        percent_decode_str(self.resource.url().path())
            .decode_utf8_lossy()
            .into_owned()
    }

    pub fn user_name(&self) -> &str {
        &self.credentials.user
    }

    pub fn password(&self) -> &str {
        &self.credentials.password
    }

    fn target(&self) -> FtpTarget {
        FtpTarget {
            host: self.server().to_string(),
            port: self.resource.url().port().unwrap_or(DEFAULT_FTP_PORT),
        }
    }

    /// Runs `op` on a fresh session, then logs out whatever `op` returned.
    fn with_session<T>(
        &self,
        op: impl FnOnce(&mut dyn FtpSession) -> Result<T, TransportError>,
    ) -> Result<T, TransportError> {
        let mut session = self.connector.connect(&self.target(), &self.credentials)?;
        let result = op(session.as_mut());
        if let Err(e) = session.logout_and_disconnect() {
            tracing::warn!(server = self.server(), "unable to log out and disconnect: {e}");
        }
        result
    }

    /// The listing entry for the file, or the empty entry if there isn't exactly one.
    pub fn remote_file(&self) -> &FtpFile {
        self.remote_file.get_or_init(|| {
            let _enter = self.span.enter();
            let path = self.file_path();
            match self.with_session(|session| session.list_files(&path)) {
                Ok(mut files) if files.len() == 1 => files.remove(0),
                Ok(files) => {
                    tracing::warn!(
                        path = %path,
                        entries = files.len(),
                        "expected exactly one listing entry"
                    );
                    FtpFile::default()
                }
                Err(e) => {
                    tracing::warn!(server = self.server(), path = %path, "unable to list file: {e}");
                    FtpFile::default()
                }
            }
        })
    }
}

impl ResourceChecker for FtpFileChecker {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn exists(&self) -> bool {
        !self.remote_file().name.is_empty()
    }

    fn passes_all_checks(&self) -> bool {
        self.exists() && self.is_file_size_acceptable()
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

impl FileChecker for FtpFileChecker {
    /// Listed size; 0 when the file was not found.
    fn file_size(&self) -> Option<u64> {
        Some(self.remote_file().size)
    }

    fn acceptable_size_drop_percent(&self) -> f64 {
        self.acceptable_size_drop_percent
    }

    fn save_file_contents(&self, dest: &Path) -> Result<u64, TransportError> {
        let _enter = self.span.enter();
        remove_existing(dest)?;

        let path = self.file_path();
        // The destination is only created once a session is open.
        let result = self.with_session(|session| {
            let mut out = BufWriter::new(File::create(dest)?);
            let written = session.retrieve_file(&path, &mut out)?;
            out.flush()?;
            Ok(written)
        });
        let written = match result {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = remove_existing(dest) {
                    tracing::warn!(dest = %dest.display(), "unable to remove partial download: {cleanup}");
                }
                return Err(e);
            }
        };

        tracing::info!(dest = %dest.display(), bytes = written, "saved file contents");
        Ok(written)
    }
}
