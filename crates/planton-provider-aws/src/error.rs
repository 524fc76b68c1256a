//! AWS provider error types

use planton_apis::ApiError;
use planton_iac::IacError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("{context}: {source}")]
    Resource {
        context: String,
        #[source]
        source: IacError,
    },

    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    #[error("Invalid CIDR {cidr}: {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("Kind {0} is not provisioned by the AWS provider")]
    UnsupportedKind(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Iac(#[from] IacError),
}

pub type Result<T> = std::result::Result<T, AwsError>;

pub(crate) trait Context<T> {
    fn context(self, context: &str) -> Result<T>;
}

impl<T> Context<T> for std::result::Result<T, IacError> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|source| AwsError::Resource {
            context: context.to_string(),
            source,
        })
    }
}
