//! Loading JSON documents and schema documents.
//!
//! Handles loading from files, strings, and HTTP URLs. Schema documents are
//! parsed into [`Schema`] trees; structural mistakes are reported with the
//! path of the offending node.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{BuildError, LoadError};
use crate::schema::Schema;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "loading document");
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the response
/// body isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, LoadError> {
    debug!(url, "fetching document");
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(network_error)?
        .json()
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a JSON document from a file path or URL.
///
/// URLs need the `remote` feature; without it they report `FileNotFound`.
pub fn load_document_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Parse an already-loaded JSON document into a schema.
///
/// # Errors
///
/// Returns `LoadError::InvalidSchema` with the path of the first node that
/// cannot be mapped onto a schema shape.
pub fn parse_schema(document: Value) -> Result<Schema, LoadError> {
    serde_path_to_error::deserialize(document).map_err(|err| {
        // The document root displays as "."; paths are empty at the root.
        let path = match err.path().to_string() {
            root if root == "." => String::new(),
            path => path,
        };
        LoadError::InvalidSchema(BuildError::InvalidDocument {
            path,
            message: err.into_inner().to_string(),
        })
    })
}

/// Load and parse a schema document from a file path.
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    parse_schema(load_document(path)?)
}

/// Load and parse a schema document from a string.
pub fn load_schema_str(content: &str) -> Result<Schema, LoadError> {
    parse_schema(load_document_str(content)?)
}

/// Load and parse a schema document from a file path or URL.
pub fn load_schema_auto(source: &str) -> Result<Schema, LoadError> {
    parse_schema(load_document_auto(source)?)
}
