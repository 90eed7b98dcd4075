//! Shared fixtures and transport fakes for unit tests.

use std::collections::HashMap;
use std::io::{self, Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};

use crate::error::TransportError;
use crate::resource::Resource;
use crate::transport::{
    FtpConnector, FtpCredentials, FtpFile, FtpSession, FtpTarget, HeadResult, HttpClient,
    HttpResponse, PageRenderer,
};

/// A catalog record with every mandatory field set.
pub fn resource_json(resource_type: &str, url: &str) -> Value {
    json!({
        "Release Step": "Orthoinference",
        "Main Program": "orthoinference.jar",
        "Dependency in Source Code": "Rhea.java",
        "Resource": "Rhea",
        "Resource Description": "Rhea to Reactome mapping",
        "Resource Type": resource_type,
        "Resource URL": url,
    })
}

pub fn resource(resource_type: &str, url: &str) -> Resource {
    Resource::from_json(resource_json(resource_type, url)).unwrap()
}

/// Descriptor with the optional fields filled in.
pub fn resource_with(
    resource_type: &str,
    url: &str,
    error_text: &str,
    expected_text: &str,
    expected_size: i64,
) -> Resource {
    let mut value = resource_json(resource_type, url);
    value["Error Response Text"] = json!(error_text);
    value["Expected Response Text"] = json!(expected_text);
    value["Expected File Size"] = json!(expected_size);
    Resource::from_json(value).unwrap()
}

/// HTTP fake answering every HEAD and GET with canned data; counts calls.
#[derive(Default)]
pub struct MockHttpClient {
    pub head: Option<HeadResult>,
    pub body: Option<String>,
    pub head_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub last_get_headers: Mutex<HashMap<String, String>>,
}

impl MockHttpClient {
    pub fn ok(body: &str) -> Self {
        Self::with_head(200, Some(body.len() as u64), Some(body))
    }

    pub fn with_head(status: u32, content_length: Option<u64>, body: Option<&str>) -> Self {
        Self {
            head: Some(HeadResult {
                status,
                content_length,
                last_modified: Some("Wed, 21 Oct 2015 07:28:00 GMT".to_string()),
                content_type: None,
            }),
            body: body.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }
}

impl HttpClient for MockHttpClient {
    fn head(&self, url: &str) -> Result<HeadResult, TransportError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        self.head.clone().ok_or_else(|| TransportError::Other(format!("connection refused: {url}")))
    }

    fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, TransportError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_get_headers.lock().unwrap() = headers.clone();
        match &self.body {
            Some(body) => Ok(HttpResponse {
                status: 200,
                body: Box::new(Cursor::new(body.clone().into_bytes())),
            }),
            None => Err(TransportError::Other(format!("connection refused: {url}"))),
        }
    }
}

/// What a fake FTP session returns from LIST.
#[derive(Clone)]
pub enum Listing {
    Files(Vec<FtpFile>),
    Fails,
}

/// FTP fake; records connects and disconnects so tests can check cleanup.
pub struct MockFtpConnector {
    pub listing: Listing,
    pub contents: Vec<u8>,
    pub fail_connect: bool,
    pub fail_disconnect: bool,
    pub fail_retrieve: bool,
    pub connects: Arc<AtomicUsize>,
    pub disconnects: Arc<AtomicUsize>,
    pub seen_credentials: Mutex<Option<FtpCredentials>>,
    /// Paths handed to LIST and RETR, in order.
    pub seen_paths: Arc<Mutex<Vec<String>>>,
}

impl MockFtpConnector {
    pub fn listing(files: Vec<FtpFile>) -> Self {
        Self {
            listing: Listing::Files(files),
            contents: Vec::new(),
            fail_connect: false,
            fail_disconnect: false,
            fail_retrieve: false,
            connects: Arc::new(AtomicUsize::new(0)),
            disconnects: Arc::new(AtomicUsize::new(0)),
            seen_credentials: Mutex::new(None),
            seen_paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_list() -> Self {
        Self {
            listing: Listing::Fails,
            ..Self::listing(Vec::new())
        }
    }
}

impl FtpConnector for MockFtpConnector {
    fn connect(
        &self,
        target: &FtpTarget,
        credentials: &FtpCredentials,
    ) -> Result<Box<dyn FtpSession>, TransportError> {
        if self.fail_connect {
            return Err(TransportError::Other(format!("cannot connect to {}", target.host)));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.seen_credentials.lock().unwrap() = Some(credentials.clone());
        Ok(Box::new(MockFtpSession {
            listing: self.listing.clone(),
            contents: self.contents.clone(),
            fail_disconnect: self.fail_disconnect,
            fail_retrieve: self.fail_retrieve,
            disconnects: Arc::clone(&self.disconnects),
            seen_paths: Arc::clone(&self.seen_paths),
        }))
    }
}

struct MockFtpSession {
    listing: Listing,
    contents: Vec<u8>,
    fail_disconnect: bool,
    fail_retrieve: bool,
    disconnects: Arc<AtomicUsize>,
    seen_paths: Arc<Mutex<Vec<String>>>,
}

impl FtpSession for MockFtpSession {
    fn list_files(&mut self, path: &str) -> Result<Vec<FtpFile>, TransportError> {
        self.seen_paths.lock().unwrap().push(path.to_string());
        match &self.listing {
            Listing::Files(files) => Ok(files.clone()),
            Listing::Fails => Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                format!("listing {path} interrupted"),
            ))),
        }
    }

    fn retrieve_file(&mut self, path: &str, out: &mut dyn Write) -> Result<u64, TransportError> {
        self.seen_paths.lock().unwrap().push(path.to_string());
        let mut reader: &[u8] = &self.contents;
        let copied = io::copy(&mut reader, out)?;
        if self.fail_retrieve {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                format!("transfer of {path} aborted"),
            )));
        }
        Ok(copied)
    }

    fn logout_and_disconnect(self: Box<Self>) -> Result<(), TransportError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect {
            return Err(TransportError::Other("QUIT timed out".to_string()));
        }
        Ok(())
    }
}

/// Renderer fake returning a fixed page, or failing when `page` is `None`.
pub struct MockRenderer {
    pub page: Option<String>,
    pub calls: AtomicUsize,
}

impl MockRenderer {
    pub fn page(page: &str) -> Self {
        Self {
            page: Some(page.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl PageRenderer for MockRenderer {
    fn render(&self, url: &str, _settle: Duration) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.page
            .clone()
            .ok_or_else(|| TransportError::Render(format!("browser crashed on {url}")))
    }
}
