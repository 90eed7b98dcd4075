pub mod config;
pub mod logging;

pub mod byte_size;
pub mod catalog;
pub mod checker;
pub mod content;
pub mod error;
pub mod report;
pub mod resource;
pub mod transport;

#[cfg(test)]
pub mod test_support;

pub use byte_size::{human_readable, ByteSizeError, ByteUnit};
pub use checker::{
    Checker, CheckerFactory, ContentFormat, FileChecker, FtpFileChecker, HttpFileChecker,
    ResourceChecker, RestEndpointChecker, WebPageChecker,
};
pub use config::CheckerConfig;
pub use error::{ResourceError, SelectError, TransportError};
pub use report::CheckResult;
pub use resource::{Resource, ResourceType};
