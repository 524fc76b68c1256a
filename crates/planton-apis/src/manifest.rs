//! Manifest loading
//!
//! A manifest is a YAML document with `apiVersion`, `kind`, `metadata` and
//! `spec`. The `kind` selects the typed schema. `--set` overrides are applied
//! to the raw document before it is typed.

use crate::aws::{AwsS3Bucket, AwsVpc};
use crate::digitalocean::{
    DigitalOceanContainerRegistry, DigitalOceanDatabaseCluster, DigitalOceanDnsZone,
    DigitalOceanKubernetesCluster, DigitalOceanLoadBalancer, DigitalOceanVpc,
};
use crate::error::{ApiError, Result};
use crate::kind::CloudResourceKind;
use crate::resource::CloudResource;
use crate::shared::ApiResourceMetadata;
use planton_core::{Message, MessageDescriptor, apply_defaults};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// A single `path.to.key=value` override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub path: Vec<String>,
    pub value: String,
}

impl FromStr for Override {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| ApiError::InvalidOverride(s.to_string()))?;
        let path: Vec<String> = path.trim().split('.').map(str::to_string).collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(ApiError::InvalidOverride(s.to_string()));
        }
        Ok(Self {
            path,
            value: value.to_string(),
        })
    }
}

/// Apply overrides to a raw manifest document
///
/// Missing intermediate mappings are created. A value replacing an existing
/// string stays a string; otherwise it is read as a YAML scalar, so
/// `spec.nodeCount=3` yields a number.
pub fn apply_overrides(document: &mut Value, overrides: &[Override]) -> Result<()> {
    for item in overrides {
        let joined = item.path.join(".");
        let (last, parents) = item
            .path
            .split_last()
            .ok_or_else(|| ApiError::InvalidOverride(joined.clone()))?;

        let mut current = &mut *document;
        for segment in parents {
            if current.is_null() {
                *current = Value::Mapping(Mapping::new());
            }
            let mapping = current
                .as_mapping_mut()
                .ok_or_else(|| ApiError::OverrideConflict {
                    path: joined.clone(),
                    reason: format!("'{}' is not a mapping", segment),
                })?;
            current = mapping
                .entry(Value::String(segment.clone()))
                .or_insert(Value::Null);
        }

        if current.is_null() {
            *current = Value::Mapping(Mapping::new());
        }
        let mapping = current
            .as_mapping_mut()
            .ok_or_else(|| ApiError::OverrideConflict {
                path: joined.clone(),
                reason: "parent is not a mapping".to_string(),
            })?;

        let key = Value::String(last.clone());
        let value = match mapping.get(&key) {
            Some(Value::String(_)) => Value::String(item.value.clone()),
            _ => parse_scalar(&item.value),
        };
        debug!(path = %joined, "applying manifest override");
        mapping.insert(key, value);
    }
    Ok(())
}

fn parse_scalar(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

macro_rules! manifests {
    ($($kind:ident),+ $(,)?) => {
        /// A typed manifest of any supported kind
        #[derive(Debug, Clone, PartialEq)]
        pub enum Manifest {
            $($kind($kind),)+
        }

        impl Manifest {
            /// Type a raw document according to its `kind`
            pub fn from_value(document: Value) -> Result<Self> {
                let kind_name = document
                    .get("kind")
                    .and_then(Value::as_str)
                    .ok_or(ApiError::MissingKind)?;
                let kind: CloudResourceKind = kind_name.parse()?;

                let manifest = match kind {
                    $(
                        CloudResourceKind::$kind => Manifest::$kind(
                            serde_yaml::from_value(document).map_err(|source| {
                                ApiError::InvalidManifest {
                                    kind: kind.to_string(),
                                    source,
                                }
                            })?,
                        ),
                    )+
                    CloudResourceKind::Unspecified => {
                        return Err(ApiError::UnknownKind(kind.to_string()));
                    }
                };
                manifest.check_api_version()?;
                Ok(manifest)
            }

            pub fn kind(&self) -> CloudResourceKind {
                match self {
                    $(Manifest::$kind(_) => <$kind as CloudResource>::KIND,)+
                }
            }

            pub fn api_version(&self) -> Option<&str> {
                match self {
                    $(Manifest::$kind(r) => r.api_version.as_deref(),)+
                }
            }

            pub fn metadata(&self) -> Option<&ApiResourceMetadata> {
                match self {
                    $(Manifest::$kind(r) => CloudResource::metadata(r),)+
                }
            }

            pub fn as_message_mut(&mut self) -> &mut dyn Message {
                match self {
                    $(Manifest::$kind(r) => r as &mut dyn Message,)+
                }
            }

            pub fn to_yaml(&self) -> Result<String> {
                let yaml = match self {
                    $(Manifest::$kind(r) => serde_yaml::to_string(r)?,)+
                };
                Ok(yaml)
            }
        }

        $(
            impl From<$kind> for Manifest {
                fn from(resource: $kind) -> Self {
                    Manifest::$kind(resource)
                }
            }
        )+
    };
}

manifests! {
    AwsS3Bucket,
    AwsVpc,
    DigitalOceanContainerRegistry,
    DigitalOceanDatabaseCluster,
    DigitalOceanDnsZone,
    DigitalOceanKubernetesCluster,
    DigitalOceanLoadBalancer,
    DigitalOceanVpc,
}

impl Manifest {
    pub fn name(&self) -> &str {
        self.metadata().map(|m| m.name()).unwrap_or_default()
    }

    /// Fill unset fields from schema defaults
    pub fn apply_defaults(&mut self) -> Result<()> {
        apply_defaults(self.as_message_mut())?;
        Ok(())
    }

    fn check_api_version(&self) -> Result<()> {
        let kind = self.kind();
        match (self.api_version(), kind.api_version()) {
            (Some(actual), Some(expected)) if actual != expected => {
                Err(ApiError::ApiVersionMismatch {
                    kind: kind.to_string(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Root schema of a resource kind
pub fn descriptor_for(kind: CloudResourceKind) -> Option<&'static MessageDescriptor> {
    use crate::aws::{AWS_S3_BUCKET, AWS_VPC};
    use crate::digitalocean::{
        DIGITAL_OCEAN_CONTAINER_REGISTRY, DIGITAL_OCEAN_DATABASE_CLUSTER, DIGITAL_OCEAN_DNS_ZONE,
        DIGITAL_OCEAN_KUBERNETES_CLUSTER, DIGITAL_OCEAN_LOAD_BALANCER, DIGITAL_OCEAN_VPC,
    };

    let descriptor = match kind {
        CloudResourceKind::Unspecified => return None,
        CloudResourceKind::AwsS3Bucket => &AWS_S3_BUCKET,
        CloudResourceKind::AwsVpc => &AWS_VPC,
        CloudResourceKind::DigitalOceanContainerRegistry => &DIGITAL_OCEAN_CONTAINER_REGISTRY,
        CloudResourceKind::DigitalOceanDatabaseCluster => &DIGITAL_OCEAN_DATABASE_CLUSTER,
        CloudResourceKind::DigitalOceanDnsZone => &DIGITAL_OCEAN_DNS_ZONE,
        CloudResourceKind::DigitalOceanKubernetesCluster => &DIGITAL_OCEAN_KUBERNETES_CLUSTER,
        CloudResourceKind::DigitalOceanLoadBalancer => &DIGITAL_OCEAN_LOAD_BALANCER,
        CloudResourceKind::DigitalOceanVpc => &DIGITAL_OCEAN_VPC,
    };
    Some(descriptor)
}

/// Parse a manifest from YAML text, applying overrides first
pub fn parse_manifest(content: &str, overrides: &[Override]) -> Result<Manifest> {
    let mut document: Value = serde_yaml::from_str(content)?;
    apply_overrides(&mut document, overrides)?;
    Manifest::from_value(document)
}

/// Load a manifest file, applying overrides first
pub fn load_manifest(path: &Path, overrides: &[Override]) -> Result<Manifest> {
    if !path.exists() {
        return Err(ApiError::ManifestNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let manifest = parse_manifest(&content, overrides)?;
    debug!(
        path = %path.display(),
        kind = %manifest.kind(),
        name = manifest.name(),
        "loaded manifest"
    );
    Ok(manifest)
}

/// Whether a manifest source is an http(s) URL rather than a local path
pub fn is_manifest_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Download a manifest over http(s), applying overrides first
pub async fn fetch_manifest(url: &str, overrides: &[Override]) -> Result<Manifest> {
    let download = |source: reqwest::Error| ApiError::Download {
        url: url.to_string(),
        source,
    };
    let content = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(download)?
        .text()
        .await
        .map_err(download)?;

    let manifest = parse_manifest(&content, overrides)?;
    debug!(url, kind = %manifest.kind(), name = manifest.name(), "downloaded manifest");
    Ok(manifest)
}

/// Load a manifest from a local path or an http(s) URL
pub async fn resolve_manifest(source: &str, overrides: &[Override]) -> Result<Manifest> {
    if is_manifest_url(source) {
        fetch_manifest(source, overrides).await
    } else {
        load_manifest(Path::new(source), overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VPC_MANIFEST: &str = r#"
apiVersion: aws.project-planton.org/v1
kind: AwsVpc
metadata:
  name: main
  org: acme
  env: dev
spec:
  availabilityZones:
    - us-east-1a
    - us-east-1b
  subnetSize: 20
"#;

    fn overrides(items: &[&str]) -> Vec<Override> {
        items.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_parse_dispatches_on_kind() {
        let manifest = parse_manifest(VPC_MANIFEST, &[]).unwrap();
        assert_eq!(manifest.kind(), CloudResourceKind::AwsVpc);
        assert_eq!(manifest.name(), "main");

        let Manifest::AwsVpc(vpc) = manifest else {
            panic!("expected AwsVpc");
        };
        let spec = vpc.spec.unwrap();
        assert_eq!(spec.availability_zones.len(), 2);
        assert_eq!(spec.subnet_size, Some(20));
        assert_eq!(spec.vpc_cidr, None);
    }

    #[test]
    fn test_apply_defaults_through_manifest() {
        let mut manifest = parse_manifest(VPC_MANIFEST, &[]).unwrap();
        manifest.apply_defaults().unwrap();
        let Manifest::AwsVpc(vpc) = &manifest else {
            panic!("expected AwsVpc");
        };
        let spec = vpc.spec.as_ref().unwrap();
        assert_eq!(spec.vpc_cidr.as_deref(), Some("10.0.0.0/16"));
        assert_eq!(spec.subnet_size, Some(20));

        let yaml = manifest.to_yaml().unwrap();
        assert!(yaml.contains("vpcCidr: 10.0.0.0/16"));
        assert!(yaml.contains("isDnsSupportEnabled: true"));
    }

    #[test]
    fn test_overrides_typed_and_nested() {
        let manifest = parse_manifest(
            VPC_MANIFEST,
            &overrides(&[
                "spec.subnetSize=22",
                "spec.isNatGatewayEnabled=true",
                "metadata.name=12345",
                "metadata.labels.team=core",
            ]),
        )
        .unwrap();
        let Manifest::AwsVpc(vpc) = manifest else {
            panic!("expected AwsVpc");
        };
        let spec = vpc.spec.unwrap();
        assert_eq!(spec.subnet_size, Some(22));
        assert_eq!(spec.is_nat_gateway_enabled, Some(true));
        let metadata = vpc.metadata.unwrap();
        assert_eq!(metadata.name(), "12345");
        assert_eq!(metadata.labels.get("team").map(String::as_str), Some("core"));
    }

    #[test]
    fn test_override_conflict() {
        let err = parse_manifest(VPC_MANIFEST, &overrides(&["metadata.name.first=x"])).unwrap_err();
        assert!(matches!(err, ApiError::OverrideConflict { .. }));
    }

    #[test]
    fn test_invalid_override_syntax() {
        assert!("spec.subnetSize".parse::<Override>().is_err());
        assert!("spec..subnetSize=1".parse::<Override>().is_err());
        let item: Override = "spec.tags.env=a=b".parse().unwrap();
        assert_eq!(item.path, vec!["spec", "tags", "env"]);
        assert_eq!(item.value, "a=b");
    }

    #[test]
    fn test_unknown_and_missing_kind() {
        let err = parse_manifest("kind: GcpGkeCluster\n", &[]).unwrap_err();
        assert!(matches!(err, ApiError::UnknownKind(k) if k == "GcpGkeCluster"));

        let err = parse_manifest("metadata:\n  name: x\n", &[]).unwrap_err();
        assert!(matches!(err, ApiError::MissingKind));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_manifest("kind: AwsVpc\nspec:\n  vpcCdir: 10.0.0.0/16\n", &[]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidManifest { .. }));
    }

    #[test]
    fn test_api_version_mismatch() {
        let err = parse_manifest(
            "apiVersion: aws.project-planton.org/v1\nkind: DigitalOceanVpc\n",
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::ApiVersionMismatch { .. }));
    }

    #[test]
    fn test_load_manifest_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VPC_MANIFEST.as_bytes()).unwrap();

        let manifest = load_manifest(file.path(), &[]).unwrap();
        assert_eq!(manifest.kind(), CloudResourceKind::AwsVpc);

        let missing = load_manifest(Path::new("/nonexistent/manifest.yaml"), &[]);
        assert!(matches!(missing, Err(ApiError::ManifestNotFound(_))));
    }

    /// Serve one canned HTTP response on a local port
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/vpc.yaml", addr)
    }

    #[test]
    fn test_is_manifest_url() {
        assert!(is_manifest_url("https://example.com/vpc.yaml"));
        assert!(is_manifest_url("http://localhost:8080/vpc.yaml"));
        assert!(!is_manifest_url("vpc.yaml"));
        assert!(!is_manifest_url("/tmp/https/vpc.yaml"));
        assert!(!is_manifest_url("ftp://example.com/vpc.yaml"));
    }

    #[tokio::test]
    async fn test_resolve_manifest_from_url() {
        let url = serve_once("200 OK", VPC_MANIFEST).await;
        let overrides: Vec<Override> = vec!["spec.vpcCidr=10.8.0.0/16".parse().unwrap()];

        let manifest = resolve_manifest(&url, &overrides).await.unwrap();
        assert_eq!(manifest.kind(), CloudResourceKind::AwsVpc);
        assert_eq!(manifest.name(), "main");
        assert!(manifest.to_yaml().unwrap().contains("vpcCidr: 10.8.0.0/16"));
    }

    #[tokio::test]
    async fn test_fetch_manifest_http_error() {
        let url = serve_once("404 Not Found", "").await;
        let err = fetch_manifest(&url, &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Download { .. }));
        assert!(err.to_string().contains(&url));
    }

    #[tokio::test]
    async fn test_resolve_manifest_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VPC_MANIFEST.as_bytes()).unwrap();

        let source = file.path().to_str().unwrap();
        let manifest = resolve_manifest(source, &[]).await.unwrap();
        assert_eq!(manifest.kind(), CloudResourceKind::AwsVpc);
    }

    #[test]
    fn test_descriptor_for_every_kind() {
        for kind in CloudResourceKind::all() {
            let descriptor = descriptor_for(*kind).unwrap();
            assert_eq!(descriptor.name(), kind.to_string());
        }
        assert!(descriptor_for(CloudResourceKind::Unspecified).is_none());
    }
}
