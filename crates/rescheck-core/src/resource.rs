//! Resource descriptors: one catalog record describing an external resource.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ResourceError;

pub const RELEASE_STEP: &str = "Release Step";
pub const MAIN_PROGRAM: &str = "Main Program";
pub const SOURCE_CODE_DEPENDENCY: &str = "Dependency in Source Code";
pub const RESOURCE_NAME: &str = "Resource";
pub const RESOURCE_DESCRIPTION: &str = "Resource Description";
pub const RESOURCE_TYPE: &str = "Resource Type";
pub const RESOURCE_URL: &str = "Resource URL";
pub const ERROR_RESPONSE_TEXT: &str = "Error Response Text";
pub const EXPECTED_RESPONSE_TEXT: &str = "Expected Response Text";
pub const EXPECTED_FILE_SIZE: &str = "Expected File Size";

/// Kind of external resource, as written in the catalog (`"REST EndPoint"` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "File")]
    File,
    #[serde(rename = "REST EndPoint")]
    RestEndpoint,
    #[serde(rename = "Web Page")]
    WebPage,
    #[serde(rename = "Web Service")]
    WebService,
    #[serde(rename = "FTP Server")]
    FtpServer,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceType::File => "File",
            ResourceType::RestEndpoint => "REST EndPoint",
            ResourceType::WebPage => "Web Page",
            ResourceType::WebService => "Web Service",
            ResourceType::FtpServer => "FTP Server",
        };
        f.write_str(s)
    }
}

impl FromStr for ResourceType {
    type Err = String;

    /// Case-insensitive; spaces are treated as underscores (`"Web Page"` == `WEB_PAGE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(' ', "_").as_str() {
            "FILE" => Ok(ResourceType::File),
            "REST_ENDPOINT" => Ok(ResourceType::RestEndpoint),
            "WEB_PAGE" => Ok(ResourceType::WebPage),
            "WEB_SERVICE" => Ok(ResourceType::WebService),
            "FTP_SERVER" => Ok(ResourceType::FtpServer),
            _ => Err(s.to_string()),
        }
    }
}

/// Immutable descriptor of one external resource.
///
/// Built from a catalog record (a JSON object or a CSV row keyed by header).
/// The original record is kept so reports can echo it back unchanged.
#[derive(Debug, Clone)]
pub struct Resource {
    release_step: String,
    main_program: String,
    source_code_dependency: String,
    name: String,
    description: String,
    resource_type: ResourceType,
    url: Url,
    error_response_text: String,
    expected_response_text: String,
    expected_file_size: Option<u64>,
    record: Map<String, Value>,
}

impl Resource {
    /// Builds a descriptor, failing if any mandatory field is missing or malformed.
    pub fn from_record(record: Map<String, Value>) -> Result<Self, ResourceError> {
        let record_text = Value::Object(record.clone()).to_string();
        let mandatory = |field: &'static str| -> Result<String, ResourceError> {
            let value = string_field(&record, field);
            if value.is_empty() {
                return Err(ResourceError::MissingField {
                    field,
                    record: record_text.clone(),
                });
            }
            Ok(value)
        };

        let release_step = mandatory(RELEASE_STEP)?;
        let main_program = mandatory(MAIN_PROGRAM)?;
        let source_code_dependency = mandatory(SOURCE_CODE_DEPENDENCY)?;
        let name = mandatory(RESOURCE_NAME)?;
        let description = mandatory(RESOURCE_DESCRIPTION)?;
        let type_text = mandatory(RESOURCE_TYPE)?;
        let url_text = mandatory(RESOURCE_URL)?;

        let resource_type =
            type_text
                .parse::<ResourceType>()
                .map_err(|value| ResourceError::UnknownType {
                    value,
                    record: record_text.clone(),
                })?;
        let url = Url::parse(&url_text).map_err(|source| ResourceError::InvalidUrl {
            url: url_text.clone(),
            source,
        })?;
        let expected_file_size = expected_file_size(&record, &record_text)?;

        Ok(Self {
            release_step,
            main_program,
            source_code_dependency,
            name,
            description,
            resource_type,
            url,
            error_response_text: string_field(&record, ERROR_RESPONSE_TEXT),
            expected_response_text: string_field(&record, EXPECTED_RESPONSE_TEXT),
            expected_file_size,
            record,
        })
    }

    /// Builds a descriptor from a JSON value, which must be an object.
    pub fn from_json(value: Value) -> Result<Self, ResourceError> {
        match value {
            Value::Object(record) => Self::from_record(record),
            other => Err(ResourceError::MissingField {
                field: RESOURCE_NAME,
                record: other.to_string(),
            }),
        }
    }

    pub fn release_step(&self) -> &str {
        &self.release_step
    }

    pub fn main_program(&self) -> &str {
        &self.main_program
    }

    pub fn source_code_dependency(&self) -> &str {
        &self.source_code_dependency
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Text whose presence in a response marks it as an error page; empty if unset.
    pub fn error_response_text(&self) -> &str {
        &self.error_response_text
    }

    /// Text a healthy response must contain; empty if unset.
    pub fn expected_response_text(&self) -> &str {
        &self.expected_response_text
    }

    /// Last known acceptable size in bytes; `None` when not applicable.
    pub fn expected_file_size(&self) -> Option<u64> {
        self.expected_file_size
    }

    /// The record this descriptor was built from, in its original key order.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

fn string_field(record: &Map<String, Value>, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Missing, empty or negative (the catalog uses -1) means "not applicable".
fn expected_file_size(
    record: &Map<String, Value>,
    record_text: &str,
) -> Result<Option<u64>, ResourceError> {
    let invalid = |value: String| ResourceError::InvalidFileSize {
        value,
        record: record_text.to_string(),
    };
    let size = match record.get(EXPECTED_FILE_SIZE) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| invalid(n.to_string()))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid(s.clone()))?,
        Some(other) => return Err(invalid(other.to_string())),
    };
    Ok(u64::try_from(size).ok())
}
