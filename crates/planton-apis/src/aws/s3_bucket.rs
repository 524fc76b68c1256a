//! AwsS3Bucket

use crate::credentials::AwsProviderConfig;
use crate::resource::cloud_resource;
use planton_core::reflect::{FieldDescriptor, Kind, MessageDescriptor};
use planton_core::{impl_message, proto_enum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

proto_enum! {
    pub enum AwsS3BucketEncryptionType as AWS_S3_BUCKET_ENCRYPTION_TYPE(
        "org.project_planton.provider.aws.awss3bucket.v1.AwsS3BucketSpec.EncryptionType"
    ) {
        Unspecified = 0 => "ENCRYPTION_TYPE_UNSPECIFIED",
        SseS3 = 1 => "ENCRYPTION_TYPE_SSE_S3",
        SseKms = 2 => "ENCRYPTION_TYPE_SSE_KMS",
    }
}

proto_enum! {
    pub enum AwsS3BucketStorageClass as AWS_S3_BUCKET_STORAGE_CLASS(
        "org.project_planton.provider.aws.awss3bucket.v1.AwsS3BucketSpec.StorageClass"
    ) {
        Unspecified = 0 => "STORAGE_CLASS_UNSPECIFIED",
        Standard = 1 => "STORAGE_CLASS_STANDARD",
        StandardIa = 2 => "STORAGE_CLASS_STANDARD_IA",
        OneZoneIa = 3 => "STORAGE_CLASS_ONE_ZONE_IA",
        IntelligentTiering = 4 => "STORAGE_CLASS_INTELLIGENT_TIERING",
        GlacierInstantRetrieval = 5 => "STORAGE_CLASS_GLACIER_INSTANT_RETRIEVAL",
        GlacierFlexibleRetrieval = 6 => "STORAGE_CLASS_GLACIER_FLEXIBLE_RETRIEVAL",
        GlacierDeepArchive = 7 => "STORAGE_CLASS_GLACIER_DEEP_ARCHIVE",
    }
}

impl AwsS3BucketStorageClass {
    /// Storage class identifier used by the S3 API
    pub fn aws_name(&self) -> Option<&'static str> {
        match self {
            AwsS3BucketStorageClass::Unspecified => None,
            AwsS3BucketStorageClass::Standard => Some("STANDARD"),
            AwsS3BucketStorageClass::StandardIa => Some("STANDARD_IA"),
            AwsS3BucketStorageClass::OneZoneIa => Some("ONEZONE_IA"),
            AwsS3BucketStorageClass::IntelligentTiering => Some("INTELLIGENT_TIERING"),
            AwsS3BucketStorageClass::GlacierInstantRetrieval => Some("GLACIER_IR"),
            AwsS3BucketStorageClass::GlacierFlexibleRetrieval => Some("GLACIER"),
            AwsS3BucketStorageClass::GlacierDeepArchive => Some("DEEP_ARCHIVE"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AwsS3BucketLifecycleRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_days: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_storage_class: Option<AwsS3BucketStorageClass>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_days: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub noncurrent_version_expiration_days: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_incomplete_multipart_upload_days: Option<u32>,
}

pub static AWS_S3_BUCKET_LIFECYCLE_RULE: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.aws.awss3bucket.v1.AwsS3BucketSpec.LifecycleRule",
    fields: &[
        FieldDescriptor::singular("id", 1, Kind::String),
        FieldDescriptor::singular("enabled", 2, Kind::Bool),
        FieldDescriptor::singular("prefix", 3, Kind::String),
        FieldDescriptor::singular("transition_days", 4, Kind::Uint32),
        FieldDescriptor::singular("transition_storage_class", 5, Kind::Enum(&AWS_S3_BUCKET_STORAGE_CLASS)),
        FieldDescriptor::singular("expiration_days", 6, Kind::Uint32),
        FieldDescriptor::singular("noncurrent_version_expiration_days", 7, Kind::Uint32),
        FieldDescriptor::singular("abort_incomplete_multipart_upload_days", 8, Kind::Uint32),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AwsS3BucketLoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bucket: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_prefix: Option<String>,
}

pub static AWS_S3_BUCKET_LOGGING_CONFIG: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.aws.awss3bucket.v1.AwsS3BucketSpec.LoggingConfig",
    fields: &[
        FieldDescriptor::singular("enabled", 1, Kind::Bool),
        FieldDescriptor::singular("target_bucket", 2, Kind::String),
        FieldDescriptor::singular("target_prefix", 3, Kind::String).with_default("logs/"),
    ],
};

impl_message! {
    AwsS3BucketLoggingConfig => AWS_S3_BUCKET_LOGGING_CONFIG;
    scalars: [enabled, target_bucket, target_prefix];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AwsS3BucketCorsRule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_methods: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_origins: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_headers: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expose_headers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_seconds: Option<u32>,
}

pub static AWS_S3_BUCKET_CORS_RULE: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.aws.awss3bucket.v1.AwsS3BucketSpec.CorsRule",
    fields: &[
        FieldDescriptor::repeated("allowed_methods", 1, Kind::String),
        FieldDescriptor::repeated("allowed_origins", 2, Kind::String),
        FieldDescriptor::repeated("allowed_headers", 3, Kind::String),
        FieldDescriptor::repeated("expose_headers", 4, Kind::String),
        FieldDescriptor::singular("max_age_seconds", 5, Kind::Uint32),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AwsS3BucketCorsConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cors_rules: Vec<AwsS3BucketCorsRule>,
}

pub static AWS_S3_BUCKET_CORS_CONFIG: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.aws.awss3bucket.v1.AwsS3BucketSpec.CorsConfig",
    fields: &[FieldDescriptor::repeated(
        "cors_rules",
        1,
        Kind::Message(&AWS_S3_BUCKET_CORS_RULE),
    )],
};

impl_message! {
    AwsS3BucketCorsConfig => AWS_S3_BUCKET_CORS_CONFIG;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AwsS3BucketSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<AwsS3BucketEncryptionType>,

    /// Required with SSE-KMS encryption
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lifecycle_rules: Vec<AwsS3BucketLifecycleRule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<AwsS3BucketLoggingConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<AwsS3BucketCorsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_destroy: Option<bool>,
}

pub static AWS_S3_BUCKET_SPEC: MessageDescriptor = MessageDescriptor {
    full_name: "org.project_planton.provider.aws.awss3bucket.v1.AwsS3BucketSpec",
    fields: &[
        FieldDescriptor::singular("aws_region", 1, Kind::String),
        FieldDescriptor::singular("is_public", 2, Kind::Bool),
        FieldDescriptor::singular("versioning_enabled", 3, Kind::Bool),
        FieldDescriptor::singular("encryption_type", 4, Kind::Enum(&AWS_S3_BUCKET_ENCRYPTION_TYPE))
            .with_default("ENCRYPTION_TYPE_SSE_S3"),
        FieldDescriptor::singular("kms_key_id", 5, Kind::String),
        FieldDescriptor::map("tags", 6, Kind::String),
        FieldDescriptor::repeated("lifecycle_rules", 7, Kind::Message(&AWS_S3_BUCKET_LIFECYCLE_RULE)),
        FieldDescriptor::singular("logging", 8, Kind::Message(&AWS_S3_BUCKET_LOGGING_CONFIG)),
        FieldDescriptor::singular("cors", 9, Kind::Message(&AWS_S3_BUCKET_CORS_CONFIG)),
        FieldDescriptor::singular("force_destroy", 10, Kind::Bool),
    ],
};

impl_message! {
    AwsS3BucketSpec => AWS_S3_BUCKET_SPEC;
    scalars: [aws_region, is_public, versioning_enabled, kms_key_id, force_destroy];
    enums: [encryption_type];
    messages: [logging, cors];
}

cloud_resource! {
    pub struct AwsS3Bucket as AWS_S3_BUCKET("org.project_planton.provider.aws.awss3bucket.v1.AwsS3Bucket") {
        api_version: "aws.project-planton.org/v1",
        kind: AwsS3Bucket,
        spec: AwsS3BucketSpec => AWS_S3_BUCKET_SPEC,
        stack_input: AwsS3BucketStackInput<AwsProviderConfig>,
    }
}
