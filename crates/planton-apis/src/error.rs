//! API error types

use planton_core::SchemaError;
use thiserror::Error;

/// Errors raised while loading and typing resource manifests
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Manifest not found: {0}")]
    ManifestNotFound(String),

    #[error("Failed to download manifest from {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Manifest has no kind")]
    MissingKind,

    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("apiVersion '{actual}' does not match kind {kind} (expected '{expected}')")]
    ApiVersionMismatch {
        kind: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid override '{0}': expected path.to.key=value")]
    InvalidOverride(String),

    #[error("Cannot set '{path}': {reason}")]
    OverrideConflict { path: String, reason: String },

    #[error("Invalid {kind} manifest: {source}")]
    InvalidManifest {
        kind: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unresolved reference for {field}: {reference}")]
    UnresolvedReference { field: String, reference: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
