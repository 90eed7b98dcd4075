//! Wire protocols spoken by the checkers: HTTP(S), FTP and page rendering.

pub mod fetch_head;
pub mod ftp;
pub mod http;
pub mod render;

pub use fetch_head::HeadResult;
pub use ftp::{CurlFtpConnector, FtpConnector, FtpCredentials, FtpFile, FtpSession, FtpTarget};
pub use http::{HttpClient, HttpResponse, LiveHttpClient};
pub use render::{HeadlessBrowser, PageRenderer};
