//! Typed errors for fetching, configuration, and export.
//!
//! Extraction has no error type of its own: markup that does not match a
//! site's selectors simply yields no headlines.

use thiserror::Error;

/// Failure to retrieve a listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout, or body-read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Failure to load a site registry file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read site registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid site registry {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("site registry {path} lists no sites")]
    Empty { path: String },
}

/// Failure to write an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export; no file was written.
    #[error("no headlines to export")]
    Empty,

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
