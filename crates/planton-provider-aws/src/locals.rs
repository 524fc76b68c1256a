//! Values derived once per run and shared by every resource of a module

use crate::error::{AwsError, Result};
use planton_apis::CloudResource;
use std::collections::BTreeMap;

pub struct Locals<'a, R: CloudResource> {
    pub resource: &'a R,
    pub spec: &'a R::Spec,
    pub labels: BTreeMap<String, String>,
    /// Tags applied to every AWS resource, labels first
    pub tags: BTreeMap<String, String>,
}

impl<'a, R: CloudResource> Locals<'a, R> {
    pub fn new(resource: &'a R) -> Result<Self> {
        if resource.name().is_empty() {
            return Err(AwsError::InvalidSpec("metadata.name is required".to_string()));
        }
        let spec = resource.require_spec()?;
        let labels = resource.labels();
        Ok(Self {
            resource,
            spec,
            tags: labels.clone(),
            labels,
        })
    }

    /// Merge user tags over the label tags
    pub fn with_tags(mut self, tags: &BTreeMap<String, String>) -> Self {
        self.tags
            .extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn name(&self) -> &str {
        self.resource.name()
    }

    /// Tags plus a `Name` tag
    pub fn named_tags(&self, name: &str) -> BTreeMap<String, String> {
        let mut tags = self.tags.clone();
        tags.insert("Name".to_string(), name.to_string());
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planton_apis::ApiResourceMetadata;
    use planton_apis::aws::{AwsS3Bucket, AwsS3BucketSpec};

    fn bucket(tags: BTreeMap<String, String>) -> AwsS3Bucket {
        AwsS3Bucket {
            metadata: Some(ApiResourceMetadata {
                name: Some("assets".to_string()),
                env: Some("prod".to_string()),
                ..Default::default()
            }),
            spec: Some(AwsS3BucketSpec {
                tags,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_user_tags_merge_over_labels() {
        let mut user = BTreeMap::new();
        user.insert("team".to_string(), "web".to_string());
        let resource = bucket(user);
        let locals = Locals::new(&resource)
            .unwrap()
            .with_tags(&resource.spec.as_ref().unwrap().tags);

        assert_eq!(locals.tags.get("team").map(String::as_str), Some("web"));
        assert_eq!(locals.tags.len(), locals.labels.len() + 1);
        for key in locals.labels.keys() {
            assert!(locals.tags.contains_key(key));
        }
    }

    #[test]
    fn test_named_tags() {
        let resource = bucket(BTreeMap::new());
        let locals = Locals::new(&resource).unwrap();
        let tags = locals.named_tags("assets-igw");
        assert_eq!(tags.get("Name").map(String::as_str), Some("assets-igw"));
        assert!(!locals.tags.contains_key("Name"));
    }

    #[test]
    fn test_name_required() {
        let resource = AwsS3Bucket {
            spec: Some(AwsS3BucketSpec::default()),
            ..Default::default()
        };
        assert!(matches!(
            Locals::new(&resource),
            Err(AwsError::InvalidSpec(_))
        ));
    }
}
