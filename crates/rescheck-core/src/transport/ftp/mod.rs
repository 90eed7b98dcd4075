//! FTP access.
//!
//! [`FtpConnector`] opens an [`FtpSession`] for one check; the session lists
//! or retrieves files and must be closed with
//! [`FtpSession::logout_and_disconnect`]. Paths given to a session are plain
//! (not percent-encoded). The live implementation drives libcurl in passive
//! mode.

mod list;

use std::io::Write;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::TransportError;

pub use list::parse_list_output;

/// Server to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpTarget {
    pub host: String,
    pub port: u16,
}

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpCredentials {
    pub user: String,
    pub password: String,
}

/// One entry of a directory listing.
///
/// The default value is the "empty" entry used when a file could not be
/// found: no name and a size of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FtpFile {
    pub name: String,
    pub size: u64,
}

/// Opens FTP sessions.
pub trait FtpConnector: Send + Sync {
    fn connect(
        &self,
        target: &FtpTarget,
        credentials: &FtpCredentials,
    ) -> Result<Box<dyn FtpSession>, TransportError>;
}

/// A logged-in FTP session.
pub trait FtpSession {
    /// Lists the entries matching `path` (a single file path yields one entry).
    fn list_files(&mut self, path: &str) -> Result<Vec<FtpFile>, TransportError>;

    /// Copies the remote file at `path` into `out`, returning the byte count.
    fn retrieve_file(&mut self, path: &str, out: &mut dyn Write) -> Result<u64, TransportError>;

    fn logout_and_disconnect(self: Box<Self>) -> Result<(), TransportError>;
}

/// Characters escaped when a plain path is put back into an `ftp://` URL.
const URL_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn url_path(path: &str) -> String {
    utf8_percent_encode(path, URL_PATH).to_string()
}

/// Passive-mode FTP over libcurl.
#[derive(Debug, Clone)]
pub struct CurlFtpConnector {
    connect_timeout: Duration,
}

impl CurlFtpConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl FtpConnector for CurlFtpConnector {
    /// libcurl connects and logs in lazily, on the first command of the session.
    fn connect(
        &self,
        target: &FtpTarget,
        credentials: &FtpCredentials,
    ) -> Result<Box<dyn FtpSession>, TransportError> {
        tracing::debug!(host = %target.host, user = %credentials.user, "opening FTP session");
        Ok(Box::new(CurlFtpSession {
            base_url: format!("ftp://{}:{}", target.host, target.port),
            credentials: credentials.clone(),
            connect_timeout: self.connect_timeout,
            easy: curl::easy::Easy::new(),
        }))
    }
}

struct CurlFtpSession {
    base_url: String,
    credentials: FtpCredentials,
    connect_timeout: Duration,
    easy: curl::easy::Easy,
}

impl CurlFtpSession {
    /// Resets the handle for the next command; the cached control connection is kept.
    /// Passive mode (EPSV, then PASV) is libcurl's default.
    fn prepare(&mut self, path: &str) -> Result<(), TransportError> {
        self.easy.reset();
        self.easy.url(&format!("{}{}", self.base_url, url_path(path)))?;
        self.easy.username(&self.credentials.user)?;
        self.easy.password(&self.credentials.password)?;
        self.easy.connect_timeout(self.connect_timeout)?;
        Ok(())
    }
}

impl FtpSession for CurlFtpSession {
    fn list_files(&mut self, path: &str) -> Result<Vec<FtpFile>, TransportError> {
        self.prepare("/")?;
        // A custom request on a directory URL replaces the LIST command.
        self.easy.custom_request(&format!("LIST {path}"))?;

        let mut raw: Vec<u8> = Vec::new();
        {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                raw.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        Ok(parse_list_output(&String::from_utf8_lossy(&raw)))
    }

    fn retrieve_file(&mut self, path: &str, out: &mut dyn Write) -> Result<u64, TransportError> {
        self.prepare(path)?;

        let mut written = 0u64;
        let mut write_error: Option<std::io::Error> = None;
        let result = {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_error {
            return Err(TransportError::Io(e));
        }
        result?;
        Ok(written)
    }

    fn logout_and_disconnect(self: Box<Self>) -> Result<(), TransportError> {
        // Dropping the handle sends QUIT and closes the control connection.
        drop(self);
        Ok(())
    }
}
