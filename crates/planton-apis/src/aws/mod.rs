//! AWS resource schemas

pub mod s3_bucket;
pub mod vpc;

pub use s3_bucket::*;
pub use vpc::*;
