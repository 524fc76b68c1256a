//! Resource property values
//!
//! An [`Output`] is known at registration time, computed by the engine once
//! the resource exists, or a secret that is redacted whenever it is written.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::engine::Urn;

const REDACTED: &str = "***";

/// A resource input or output value
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    /// Value known before the resource is created
    Known(serde_json::Value),

    /// Value produced by the engine for `property` of the resource at `urn`
    Computed { urn: String, property: String },

    /// Sensitive value; never serialized or printed
    Secret(#[serde(serialize_with = "redact")] String),
}

#[allow(clippy::ptr_arg)]
fn redact<S: serde::Serializer>(_: &String, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
}

// Secrets always compare equal
impl PartialEq for Output {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Output::Known(a), Output::Known(b)) => a == b,
            (
                Output::Computed { urn, property },
                Output::Computed {
                    urn: other_urn,
                    property: other_property,
                },
            ) => urn == other_urn && property == other_property,
            (Output::Secret(_), Output::Secret(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Known(v) => f.debug_tuple("Known").field(v).finish(),
            Output::Computed { urn, property } => f
                .debug_struct("Computed")
                .field("urn", urn)
                .field("property", property)
                .finish(),
            Output::Secret(_) => f.debug_tuple("Secret").field(&REDACTED).finish(),
        }
    }
}

impl Output {
    pub fn known(value: impl Into<serde_json::Value>) -> Self {
        Output::Known(value.into())
    }

    pub fn computed(urn: &Urn, property: impl Into<String>) -> Self {
        Output::Computed {
            urn: urn.to_string(),
            property: property.into(),
        }
    }

    pub fn secret(value: impl Into<String>) -> Self {
        Output::Secret(value.into())
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Output::Known(_))
    }

    pub fn as_known(&self) -> Option<&serde_json::Value> {
        match self {
            Output::Known(v) => Some(v),
            Output::Computed { .. } | Output::Secret(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_known().and_then(|v| v.as_str())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Known(serde_json::Value::String(s)) => write!(f, "{}", s),
            Output::Known(v) => write!(f, "{}", v),
            Output::Computed { property, .. } => write!(f, "<computed {}>", property),
            Output::Secret(_) => f.write_str(REDACTED),
        }
    }
}

macro_rules! impl_known_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Output {
                fn from(v: $ty) -> Self {
                    Output::Known(serde_json::Value::from(v))
                }
            }
        )*
    };
}

impl_known_from!(&str, String, bool, u32, u64, i32, i64, f64, Vec<String>);

impl From<serde_json::Value> for Output {
    fn from(v: serde_json::Value) -> Self {
        Output::Known(v)
    }
}

impl From<&Output> for Output {
    fn from(v: &Output) -> Self {
        v.clone()
    }
}

impl From<&String> for Output {
    fn from(v: &String) -> Self {
        Output::Known(serde_json::Value::String(v.clone()))
    }
}

impl From<BTreeMap<String, String>> for Output {
    fn from(v: BTreeMap<String, String>) -> Self {
        Output::Known(serde_json::Value::Object(
            v.into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect(),
        ))
    }
}

/// Resource inputs keyed by property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs(BTreeMap<String, Output>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Output>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set a sensitive property only when a value is present
    pub fn set_secret(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.set(key, Output::secret(v)),
            None => self,
        }
    }

    /// Set a property only when a value is present
    pub fn set_opt<T: Into<Output>>(self, key: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Output> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Output)> {
        self.0.iter()
    }

    /// Keys whose values differ between `self` and `other`, including keys
    /// present on only one side
    pub fn changed_keys(&self, other: &Inputs) -> Vec<String> {
        let mut keys: Vec<String> = self
            .0
            .iter()
            .filter(|(k, v)| other.0.get(*k) != Some(*v))
            .map(|(k, _)| k.clone())
            .collect();
        keys.extend(
            other
                .0
                .keys()
                .filter(|k| !self.0.contains_key(*k))
                .cloned(),
        );
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_builder() {
        let inputs = Inputs::new()
            .set("name", "main")
            .set("count", 3u32)
            .set_opt("region", None::<&str>)
            .set_opt("enabled", Some(true));

        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs.get("name").and_then(Output::as_str), Some("main"));
        assert!(!inputs.contains_key("region"));
        assert_eq!(
            inputs.get("enabled"),
            Some(&Output::Known(serde_json::json!(true)))
        );
    }

    #[test]
    fn test_changed_keys() {
        let before = Inputs::new().set("a", 1u32).set("b", "x").set("gone", true);
        let after = Inputs::new().set("a", 1u32).set("b", "y").set("new", true);
        assert_eq!(before.changed_keys(&after), vec!["b", "gone", "new"]);
        assert!(before.changed_keys(&before).is_empty());
    }

    #[test]
    fn test_output_serialization() {
        let computed = Output::Computed {
            urn: "urn:pulumi:dev::web::digitalocean:index/vpc:Vpc::vpc".to_string(),
            property: "id".to_string(),
        };
        let json = serde_json::to_value(&computed).unwrap();
        assert_eq!(json["computed"]["property"], "id");
        let back: Output = serde_json::from_value(json).unwrap();
        assert_eq!(back, computed);
        assert_eq!(computed.to_string(), "<computed id>");
        assert_eq!(Output::from("vpc-1").to_string(), "vpc-1");
    }

    #[test]
    fn test_secret_is_redacted() {
        let inputs = Inputs::new().set_secret("token", Some("dop_v1_abc"));
        let json = serde_json::to_string(&inputs).unwrap();
        assert!(!json.contains("dop_v1_abc"));
        assert!(json.contains("***"));

        let secret = inputs.get("token").unwrap();
        assert_eq!(secret.to_string(), "***");
        assert!(!format!("{:?}", secret).contains("dop_v1_abc"));

        // Round-tripped secrets still compare equal
        let back: Inputs = serde_json::from_str(&json).unwrap();
        assert!(back.changed_keys(&inputs).is_empty());
    }
}
