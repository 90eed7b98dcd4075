//! Error types shared across the checking engine.
//!
//! Configuration problems (`ResourceError`, `SelectError`) fail loudly and
//! name the resource. `TransportError` is absorbed by the checkers and turned
//! into a negative verdict; it only reaches callers of explicit transfer
//! operations such as `save_file_contents`.

use thiserror::Error;

use crate::resource::ResourceType;

/// A descriptor could not be built from its record.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{field} is empty or does not exist for {record}")]
    MissingField { field: &'static str, record: String },

    #[error("unknown resource type '{value}' for {record}")]
    UnknownType { value: String, record: String },

    #[error("unable to create URL for '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid expected file size '{value}' for {record}")]
    InvalidFileSize { value: String, record: String },
}

/// No checker exists for a resource.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("the protocol {scheme} to check a file resource is not supported for {resource}")]
    UnsupportedProtocol { scheme: String, resource: String },

    #[error("the type {resource_type} is not recognized for {resource}")]
    UnrecognizedType {
        resource_type: ResourceType,
        resource: String,
    },
}

/// Network, file system or rendering failure while talking to a resource.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u32, url: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("login to {host} failed")]
    Login { host: String },

    #[error("{0}")]
    Other(String),
}
