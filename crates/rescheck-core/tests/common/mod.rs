#[allow(dead_code)]
pub mod ftp_server;
#[allow(dead_code)]
pub mod resource_server;

use rescheck_core::Resource;
use serde_json::json;

/// Catalog record for `url` with the optional checks filled in.
pub fn resource(resource_type: &str, url: &str, expected_text: &str, expected_size: i64) -> Resource {
    Resource::from_json(json!({
        "Release Step": "Add links",
        "Main Program": "add-links.jar",
        "Dependency in Source Code": "ENSEMBLFileRetriever.java",
        "Resource": "Ensembl",
        "Resource Description": "Ensembl gene mapping",
        "Resource Type": resource_type,
        "Resource URL": url,
        "Error Response Text": "Service unavailable",
        "Expected Response Text": expected_text,
        "Expected File Size": expected_size,
    }))
    .expect("valid resource")
}
