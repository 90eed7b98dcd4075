//! Loading resource catalogs from CSV or JSON files.
//!
//! A CSV catalog has a header row naming the fields; every value is kept as
//! a string. A JSON catalog is an array of objects.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::ResourceError;
use crate::resource::Resource;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported catalog format for {0} (expected .csv or .json)")]
    UnknownExtension(PathBuf),

    #[error("malformed JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed CSV catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON catalog must be an array of objects")]
    NotAnArray,

    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: ResourceError,
    },
}

/// Reads every resource of the catalog at `path`, choosing the format by extension.
pub fn load(path: &Path) -> Result<Vec<Resource>, CatalogError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let open = || {
        File::open(path).map(BufReader::new).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let resources = match extension.as_deref() {
        Some("json") => from_json_reader(open()?)?,
        Some("csv") => from_csv_reader(open()?)?,
        _ => return Err(CatalogError::UnknownExtension(path.to_path_buf())),
    };
    tracing::info!(path = %path.display(), count = resources.len(), "loaded catalog");
    Ok(resources)
}

pub fn from_json_str(text: &str) -> Result<Vec<Resource>, CatalogError> {
    from_json_value(serde_json::from_str(text)?)
}

fn from_json_reader<R: Read>(reader: R) -> Result<Vec<Resource>, CatalogError> {
    from_json_value(serde_json::from_reader(reader)?)
}

fn from_json_value(value: Value) -> Result<Vec<Resource>, CatalogError> {
    let Value::Array(items) = value else {
        return Err(CatalogError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => to_resource(index, record),
            _ => Err(CatalogError::NotAnArray),
        })
        .collect()
}

/// Parses a CSV catalog; the first row is the header.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Resource>, CatalogError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();

    let mut resources = Vec::new();
    for (index, row) in csv.records().enumerate() {
        let row = row?;
        let record: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        resources.push(to_resource(index, record)?);
    }
    Ok(resources)
}

fn to_resource(index: usize, record: Map<String, Value>) -> Result<Resource, CatalogError> {
    Resource::from_record(record).map_err(|source| CatalogError::Record { index, source })
}
