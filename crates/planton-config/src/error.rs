use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "Config file not found. Looked in:\n\
        - current directory: planton.yaml, .planton.yaml\n\
        - ./.planton/config.yaml\n\
        - ~/.config/planton/config.yaml\n\
        or set PLANTON_CONFIG_PATH to point at one"
    )]
    ConfigFileNotFound,

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid credentials in {path}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: planton_core::SchemaError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
