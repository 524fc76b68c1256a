//! AwsS3Bucket module

use crate::error::{AwsError, Context, Result};
use crate::locals::Locals;
use crate::provider;
use planton_apis::aws::{
    AwsS3Bucket, AwsS3BucketCorsRule, AwsS3BucketEncryptionType, AwsS3BucketLifecycleRule,
    AwsS3BucketStackInput, AwsS3BucketStorageClass,
};
use planton_iac::{Inputs, RegisteredResource, ResourceOptions, StackContext};
use serde_json::{Map, Value, json};

pub const TYPE_BUCKET: &str = "aws:s3/bucketV2:BucketV2";
pub const TYPE_VERSIONING: &str = "aws:s3/bucketVersioningV2:BucketVersioningV2";
pub const TYPE_ENCRYPTION: &str =
    "aws:s3/bucketServerSideEncryptionConfigurationV2:BucketServerSideEncryptionConfigurationV2";
pub const TYPE_PUBLIC_ACCESS_BLOCK: &str = "aws:s3/bucketPublicAccessBlock:BucketPublicAccessBlock";
pub const TYPE_OWNERSHIP_CONTROLS: &str = "aws:s3/bucketOwnershipControls:BucketOwnershipControls";
pub const TYPE_LIFECYCLE: &str =
    "aws:s3/bucketLifecycleConfigurationV2:BucketLifecycleConfigurationV2";
pub const TYPE_LOGGING: &str = "aws:s3/bucketLoggingV2:BucketLoggingV2";
pub const TYPE_CORS: &str = "aws:s3/bucketCorsConfigurationV2:BucketCorsConfigurationV2";

pub const OP_BUCKET_ID: &str = "bucket_id";
pub const OP_BUCKET_ARN: &str = "bucket_arn";
pub const OP_REGION: &str = "region";
pub const OP_BUCKET_REGIONAL_DOMAIN_NAME: &str = "bucket_regional_domain_name";
pub const OP_HOSTED_ZONE_ID: &str = "hosted_zone_id";

pub async fn resources(ctx: &mut StackContext<'_>, input: &AwsS3BucketStackInput) -> Result<()> {
    let locals = Locals::new(&input.target)?;
    let spec = locals.spec;
    let locals = locals.with_tags(&spec.tags);
    let region = spec.aws_region.as_deref().unwrap_or_default();

    let options = provider::setup(ctx, input.provider_config.as_ref(), Some(region)).await?;

    // Validate everything before the first registration
    let encryption = encryption_rule(spec.encryption_type, spec.kms_key_id.as_deref())?;
    let lifecycle_rules = spec
        .lifecycle_rules
        .iter()
        .map(lifecycle_rule)
        .collect::<Result<Vec<_>>>()?;
    let logging = match &spec.logging {
        Some(logging) if logging.enabled.unwrap_or(false) => {
            let target = logging
                .target_bucket
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    AwsError::InvalidSpec("logging target_bucket is required".to_string())
                })?;
            Some((target, logging.target_prefix.as_deref().unwrap_or_default()))
        }
        _ => None,
    };
    let cors_rules = spec
        .cors
        .as_ref()
        .map(|cors| cors.cors_rules.iter().map(cors_rule).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();

    let bucket = bucket(ctx, &locals, options.clone()).await?;
    let child = || options.clone().parent(&bucket);

    if spec.versioning_enabled.unwrap_or(false) {
        ctx.register(
            TYPE_VERSIONING,
            "versioning",
            Inputs::new()
                .set("bucket", bucket.id())
                .set("versioningConfiguration", json!({ "status": "Enabled" })),
            child(),
        )
        .await
        .context("failed to enable bucket versioning")?;
    }

    ctx.register(
        TYPE_ENCRYPTION,
        "encryption",
        Inputs::new()
            .set("bucket", bucket.id())
            .set("rules", json!([encryption])),
        child(),
    )
    .await
    .context("failed to configure bucket encryption")?;

    let block = !spec.is_public.unwrap_or(false);
    ctx.register(
        TYPE_PUBLIC_ACCESS_BLOCK,
        "public-access-block",
        Inputs::new()
            .set("bucket", bucket.id())
            .set("blockPublicAcls", block)
            .set("blockPublicPolicy", block)
            .set("ignorePublicAcls", block)
            .set("restrictPublicBuckets", block),
        child(),
    )
    .await
    .context("failed to configure public access block")?;

    ctx.register(
        TYPE_OWNERSHIP_CONTROLS,
        "ownership-controls",
        Inputs::new()
            .set("bucket", bucket.id())
            .set("rule", json!({ "objectOwnership": "BucketOwnerEnforced" })),
        child(),
    )
    .await
    .context("failed to configure ownership controls")?;

    if !lifecycle_rules.is_empty() {
        ctx.register(
            TYPE_LIFECYCLE,
            "lifecycle",
            Inputs::new()
                .set("bucket", bucket.id())
                .set("rules", Value::Array(lifecycle_rules)),
            child(),
        )
        .await
        .context("failed to configure lifecycle rules")?;
    }

    if let Some((target_bucket, target_prefix)) = logging {
        ctx.register(
            TYPE_LOGGING,
            "logging",
            Inputs::new()
                .set("bucket", bucket.id())
                .set("targetBucket", target_bucket)
                .set("targetPrefix", target_prefix),
            child(),
        )
        .await
        .context("failed to configure logging")?;
    }

    if !cors_rules.is_empty() {
        ctx.register(
            TYPE_CORS,
            "cors",
            Inputs::new()
                .set("bucket", bucket.id())
                .set("corsRules", Value::Array(cors_rules)),
            child(),
        )
        .await
        .context("failed to configure CORS")?;
    }

    ctx.export(OP_BUCKET_ID, bucket.output("bucket"))?;
    ctx.export(OP_BUCKET_ARN, bucket.output("arn"))?;
    ctx.export(OP_REGION, region)?;
    ctx.export(
        OP_BUCKET_REGIONAL_DOMAIN_NAME,
        bucket.output("bucketRegionalDomainName"),
    )?;
    ctx.export(OP_HOSTED_ZONE_ID, bucket.output("hostedZoneId"))?;
    Ok(())
}

async fn bucket(
    ctx: &mut StackContext<'_>,
    locals: &Locals<'_, AwsS3Bucket>,
    options: ResourceOptions,
) -> Result<RegisteredResource> {
    let inputs = Inputs::new()
        .set("bucket", locals.name())
        .set("forceDestroy", locals.spec.force_destroy.unwrap_or(false))
        .set("tags", locals.tags.clone());

    ctx.register(TYPE_BUCKET, "bucket", inputs, options)
        .await
        .context("failed to create S3 bucket")
}

/// SSE-S3 unless SSE-KMS is requested; bucket keys are always enabled
fn encryption_rule(
    encryption_type: Option<AwsS3BucketEncryptionType>,
    kms_key_id: Option<&str>,
) -> Result<Value> {
    let default = match encryption_type {
        Some(AwsS3BucketEncryptionType::SseKms) => {
            let key = kms_key_id.filter(|k| !k.is_empty()).ok_or_else(|| {
                AwsError::InvalidSpec(
                    "kms_key_id is required when encryption_type is SSE_KMS".to_string(),
                )
            })?;
            json!({ "sseAlgorithm": "aws:kms", "kmsMasterKeyId": key })
        }
        _ => json!({ "sseAlgorithm": "AES256" }),
    };
    Ok(json!({
        "applyServerSideEncryptionByDefault": default,
        "bucketKeyEnabled": true,
    }))
}

fn lifecycle_rule(rule: &AwsS3BucketLifecycleRule) -> Result<Value> {
    let id = rule
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AwsError::InvalidSpec("lifecycle rule id is required".to_string()))?;

    let mut value = Map::new();
    value.insert("id".into(), json!(id));
    let status = if rule.enabled.unwrap_or(false) {
        "Enabled"
    } else {
        "Disabled"
    };
    value.insert("status".into(), json!(status));

    if let Some(prefix) = rule.prefix.as_deref().filter(|p| !p.is_empty()) {
        value.insert("filter".into(), json!({ "prefix": prefix }));
    }

    let storage_class = rule
        .transition_storage_class
        .and_then(|class| AwsS3BucketStorageClass::aws_name(&class));
    if let (Some(days), Some(class)) = (rule.transition_days.filter(|d| *d > 0), storage_class) {
        value.insert(
            "transitions".into(),
            json!([{ "days": days, "storageClass": class }]),
        );
    }
    if let Some(days) = rule.expiration_days.filter(|d| *d > 0) {
        value.insert("expiration".into(), json!({ "days": days }));
    }
    if let Some(days) = rule.noncurrent_version_expiration_days.filter(|d| *d > 0) {
        value.insert(
            "noncurrentVersionExpiration".into(),
            json!({ "noncurrentDays": days }),
        );
    }
    if let Some(days) = rule.abort_incomplete_multipart_upload_days.filter(|d| *d > 0) {
        value.insert(
            "abortIncompleteMultipartUpload".into(),
            json!({ "daysAfterInitiation": days }),
        );
    }
    Ok(Value::Object(value))
}

fn cors_rule(rule: &AwsS3BucketCorsRule) -> Result<Value> {
    if rule.allowed_methods.is_empty() || rule.allowed_origins.is_empty() {
        return Err(AwsError::InvalidSpec(
            "CORS rule must have at least one allowed method and origin".to_string(),
        ));
    }

    let mut value = Map::new();
    value.insert("allowedMethods".into(), json!(rule.allowed_methods));
    value.insert("allowedOrigins".into(), json!(rule.allowed_origins));
    if !rule.allowed_headers.is_empty() {
        value.insert("allowedHeaders".into(), json!(rule.allowed_headers));
    }
    if !rule.expose_headers.is_empty() {
        value.insert("exposeHeaders".into(), json!(rule.expose_headers));
    }
    if let Some(max_age) = rule.max_age_seconds.filter(|s| *s > 0) {
        value.insert("maxAgeSeconds".into(), json!(max_age));
    }
    Ok(Value::Object(value))
}
