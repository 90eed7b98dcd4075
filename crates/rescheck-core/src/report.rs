//! Check results and their archival JSON form.
//!
//! Key names are part of the output format consumed downstream and must not
//! change: `"Passed Checks"`, `"Resource Exists"`, then either `"File Size"`
//! or `"Response Text"`.

use serde::Serialize;
use serde_json::Value;

use crate::byte_size::human_readable;
use crate::content::ContentScan;
use crate::resource::Resource;

/// Key under which the report is attached to the resource record.
pub const REPORT_KEY: &str = "Report";

/// Rendering of a size that could not be determined.
pub const UNKNOWN_FILE_SIZE: &str = "Unknown (-1 bytes)";

/// Verdict for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    #[serde(rename = "Passed Checks")]
    pub passed_checks: bool,
    #[serde(rename = "Resource Exists")]
    pub resource_exists: bool,
    #[serde(flatten)]
    pub detail: Detail,
}

/// Protocol-specific part of a [`CheckResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Detail {
    #[serde(rename = "File Size")]
    FileSize(FileSizeDetail),
    #[serde(rename = "Response Text")]
    ResponseText(ResponseTextDetail),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSizeDetail {
    /// e.g. `"1.5 MB (1572864 bytes)"`.
    #[serde(rename = "File Size Found")]
    pub found: String,
    #[serde(rename = "File Size Acceptable")]
    pub acceptable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseTextDetail {
    #[serde(rename = "Has Expected Content")]
    pub has_expected_content: bool,
    #[serde(rename = "Error Response Text Present")]
    pub error_text_present: bool,
    #[serde(rename = "Expected Response Text Present")]
    pub expected_text_present: bool,
}

/// Assembles [`CheckResult`]s from a checker's findings.
pub struct ReportBuilder;

impl ReportBuilder {
    pub fn file_size(
        passed_checks: bool,
        resource_exists: bool,
        size: Option<u64>,
        size_acceptable: bool,
    ) -> CheckResult {
        CheckResult {
            passed_checks,
            resource_exists,
            detail: Detail::FileSize(FileSizeDetail {
                found: file_size_found(size),
                acceptable: size_acceptable,
            }),
        }
    }

    pub fn response_text(passed_checks: bool, resource_exists: bool, scan: ContentScan) -> CheckResult {
        CheckResult {
            passed_checks,
            resource_exists,
            detail: Detail::ResponseText(ResponseTextDetail {
                has_expected_content: scan.has_expected_content(),
                error_text_present: scan.error_text_present,
                expected_text_present: scan.expected_text_present,
            }),
        }
    }
}

impl CheckResult {
    pub fn to_json(&self) -> Value {
        // Plain structs of bools and strings always serialize.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// `"<human readable> (<n> bytes)"`, or [`UNKNOWN_FILE_SIZE`].
pub fn file_size_found(size: Option<u64>) -> String {
    size.and_then(|n| i64::try_from(n).ok())
        .and_then(|n| human_readable(n).ok().map(|h| format!("{h} ({n} bytes)")))
        .unwrap_or_else(|| UNKNOWN_FILE_SIZE.to_string())
}

/// The resource's original record followed by a `"Report"` entry.
pub fn resource_with_report(resource: &Resource, result: &CheckResult) -> Value {
    let mut record = resource.record().clone();
    record.insert(REPORT_KEY.to_string(), result.to_json());
    Value::Object(record)
}

/// Pretty-printed form of [`resource_with_report`].
pub fn resource_with_report_pretty(resource: &Resource, result: &CheckResult) -> String {
    let value = resource_with_report(resource, result);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
