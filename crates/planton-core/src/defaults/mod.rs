//! Default application
//!
//! Fills unset scalar fields of a message from the string-encoded defaults
//! declared on its schema, recursing into nested messages that are present.

mod converter;

pub use converter::convert_string_to_field_value;

use crate::error::{Result, SchemaError};
use crate::reflect::{Kind, Message, MessageDescriptor};
use tracing::{debug, trace};

/// Apply schema defaults to every unset scalar field, depth-first
///
/// - repeated and map fields are skipped
/// - nested messages are visited only when already present
/// - fields that already hold a value are never overwritten, including
///   explicit zero values
///
/// Stops at the first conversion failure, reporting the fully-qualified
/// field name.
pub fn apply_defaults(message: &mut dyn Message) -> Result<()> {
    let descriptor = message.descriptor();

    for field in descriptor.fields {
        if field.is_list() || field.is_map() {
            continue;
        }

        if field.kind.is_message() {
            if let Some(nested) = message.message_mut(field) {
                apply_defaults(nested)?;
            }
            continue;
        }

        if message.has_field(field) {
            continue;
        }

        let Some(default) = field.default.filter(|d| !d.is_empty()) else {
            continue;
        };

        let wrap = |source: SchemaError| SchemaError::Default {
            field: descriptor.field_full_name(field),
            source: Box::new(source),
        };

        let value = convert_string_to_field_value(default, field).map_err(wrap)?;
        trace!(
            field = %descriptor.field_full_name(field),
            value = %value,
            "applying default"
        );
        message.set_field(field, value).map_err(wrap)?;
    }

    Ok(())
}

/// [`apply_defaults`] for a possibly-absent message; `None` is a no-op
pub fn apply_defaults_optional<M: Message>(message: Option<&mut M>) -> Result<()> {
    match message {
        Some(message) => apply_defaults(message),
        None => {
            debug!("no message to apply defaults to");
            Ok(())
        }
    }
}

/// A default declared somewhere in a schema tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDefault {
    /// Dotted field path from the root message (`spec.health_check.path`)
    pub path: String,
    pub kind: &'static str,
    pub default: &'static str,
}

/// List every default the walker could apply under `descriptor`
///
/// Follows singular message fields; recursive message types are visited
/// once per path.
pub fn declared_defaults(descriptor: &'static MessageDescriptor) -> Vec<DeclaredDefault> {
    let mut out = Vec::new();
    let mut stack = vec![descriptor.full_name];
    collect_defaults(descriptor, "", &mut stack, &mut out);
    out
}

fn collect_defaults(
    descriptor: &'static MessageDescriptor,
    prefix: &str,
    stack: &mut Vec<&'static str>,
    out: &mut Vec<DeclaredDefault>,
) {
    for field in descriptor.fields {
        if field.is_list() || field.is_map() {
            continue;
        }
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        if let Kind::Message(nested) = field.kind {
            if stack.contains(&nested.full_name) {
                continue;
            }
            stack.push(nested.full_name);
            collect_defaults(nested, &path, stack, out);
            stack.pop();
            continue;
        }

        if let Some(default) = field.default.filter(|d| !d.is_empty()) {
            out.push(DeclaredDefault {
                path,
                kind: field.kind.name(),
                default,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::FieldDescriptor;
    use crate::{impl_message, proto_enum};

    proto_enum! {
        pub enum Tier as TIER("test.v1.Tier") {
            Unspecified = 0 => "tier_unspecified",
            Basic = 1 => "basic",
            Professional = 2 => "professional",
        }
    }

    static PROBE: MessageDescriptor = MessageDescriptor {
        full_name: "test.v1.Probe",
        fields: &[
            FieldDescriptor::singular("path", 1, Kind::String).with_default("/healthz"),
            FieldDescriptor::singular("interval", 2, Kind::Uint32).with_default("10"),
        ],
    };

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Probe {
        path: Option<String>,
        interval: Option<u32>,
    }

    impl_message! {
        Probe => PROBE;
        scalars: [path, interval];
    }

    static SERVICE: MessageDescriptor = MessageDescriptor {
        full_name: "test.v1.Service",
        fields: &[
            FieldDescriptor::singular("name", 1, Kind::String).with_default("web"),
            FieldDescriptor::singular("replicas", 2, Kind::Int32).with_default("42"),
            FieldDescriptor::singular("max_bytes", 3, Kind::Int64).with_default("1048576"),
            FieldDescriptor::singular("port", 4, Kind::Uint32).with_default("8080"),
            FieldDescriptor::singular("quota", 5, Kind::Uint64).with_default("100"),
            FieldDescriptor::singular("public", 6, Kind::Bool).with_default("true"),
            FieldDescriptor::singular("ratio", 7, Kind::Float).with_default("0.5"),
            FieldDescriptor::singular("weight", 8, Kind::Double).with_default("1.25"),
            FieldDescriptor::singular("tier", 9, Kind::Enum(&TIER)).with_default("basic"),
            FieldDescriptor::singular("description", 10, Kind::String),
            FieldDescriptor::singular("note", 11, Kind::String).with_default(""),
            FieldDescriptor::singular("probe", 12, Kind::Message(&PROBE)),
            FieldDescriptor::repeated("probes", 13, Kind::Message(&PROBE)),
            FieldDescriptor::repeated("aliases", 14, Kind::String).with_default("www"),
            FieldDescriptor::map("labels", 15, Kind::String),
        ],
    };

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Service {
        name: Option<String>,
        replicas: Option<i32>,
        max_bytes: Option<i64>,
        port: Option<u32>,
        quota: Option<u64>,
        public: Option<bool>,
        ratio: Option<f32>,
        weight: Option<f64>,
        tier: Option<Tier>,
        description: Option<String>,
        note: Option<String>,
        probe: Option<Probe>,
        probes: Vec<Probe>,
        aliases: Vec<String>,
        labels: std::collections::BTreeMap<String, String>,
    }

    impl_message! {
        Service => SERVICE;
        scalars: [name, replicas, max_bytes, port, quota, public, ratio, weight, description, note];
        enums: [tier];
        messages: [probe];
    }

    static BROKEN: MessageDescriptor = MessageDescriptor {
        full_name: "test.v1.Broken",
        fields: &[
            FieldDescriptor::singular("first", 1, Kind::String).with_default("ok"),
            FieldDescriptor::singular("count", 2, Kind::Int32).with_default("many"),
            FieldDescriptor::singular("last", 3, Kind::String).with_default("never"),
        ],
    };

    #[derive(Debug, Default)]
    struct Broken {
        first: Option<String>,
        count: Option<i32>,
        last: Option<String>,
    }

    impl_message! {
        Broken => BROKEN;
        scalars: [first, count, last];
    }

    static NODE: MessageDescriptor = MessageDescriptor {
        full_name: "test.v1.Node",
        fields: &[
            FieldDescriptor::singular("label", 1, Kind::String).with_default("leaf"),
            FieldDescriptor::singular("child", 2, Kind::Message(&NODE)),
        ],
    };

    #[test]
    fn test_applies_every_scalar_kind() {
        let mut service = Service::default();
        apply_defaults(&mut service).unwrap();

        assert_eq!(service.name.as_deref(), Some("web"));
        assert_eq!(service.replicas, Some(42));
        assert_eq!(service.max_bytes, Some(1_048_576));
        assert_eq!(service.port, Some(8080));
        assert_eq!(service.quota, Some(100));
        assert_eq!(service.public, Some(true));
        assert_eq!(service.ratio, Some(0.5));
        assert_eq!(service.weight, Some(1.25));
        assert_eq!(service.tier, Some(Tier::Basic));
    }

    #[test]
    fn test_is_idempotent() {
        let mut service = Service {
            probe: Some(Probe::default()),
            ..Default::default()
        };
        apply_defaults(&mut service).unwrap();
        let first = service.clone();
        apply_defaults(&mut service).unwrap();
        assert_eq!(first, service);
    }

    #[test]
    fn test_preserves_explicit_zero_values() {
        let mut service = Service {
            name: Some(String::new()),
            replicas: Some(0),
            max_bytes: Some(0),
            port: Some(0),
            quota: Some(0),
            public: Some(false),
            ratio: Some(0.0),
            weight: Some(0.0),
            tier: Some(Tier::Unspecified),
            ..Default::default()
        };
        let before = service.clone();
        apply_defaults(&mut service).unwrap();
        assert_eq!(before, service);
    }

    #[test]
    fn test_preserves_custom_values() {
        let mut service = Service {
            name: Some("api".to_string()),
            tier: Some(Tier::Professional),
            ..Default::default()
        };
        apply_defaults(&mut service).unwrap();
        assert_eq!(service.name.as_deref(), Some("api"));
        assert_eq!(service.tier, Some(Tier::Professional));
        assert_eq!(service.replicas, Some(42));
    }

    #[test]
    fn test_nested_only_when_present() {
        let mut absent = Service::default();
        apply_defaults(&mut absent).unwrap();
        assert_eq!(absent.probe, None);

        let mut present = Service {
            probe: Some(Probe {
                interval: Some(30),
                ..Default::default()
            }),
            ..Default::default()
        };
        apply_defaults(&mut present).unwrap();
        assert_eq!(
            present.probe,
            Some(Probe {
                path: Some("/healthz".to_string()),
                interval: Some(30),
            })
        );
    }

    #[test]
    fn test_skips_repeated_and_map_fields() {
        let mut service = Service {
            probes: vec![Probe::default()],
            ..Default::default()
        };
        apply_defaults(&mut service).unwrap();
        assert_eq!(service.probes, vec![Probe::default()]);
        assert!(service.aliases.is_empty());
        assert!(service.labels.is_empty());
    }

    #[test]
    fn test_fields_without_default_stay_unset() {
        let mut service = Service::default();
        apply_defaults(&mut service).unwrap();
        assert_eq!(service.description, None);
        assert_eq!(service.note, None);
    }

    #[test]
    fn test_fails_fast_with_field_name() {
        let mut broken = Broken::default();
        let err = apply_defaults(&mut broken).unwrap_err();

        match &err {
            SchemaError::Default { field, source } => {
                assert_eq!(field, "test.v1.Broken.count");
                assert!(matches!(**source, SchemaError::Conversion { kind: "int32", .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("failed to convert \"many\" to int32"));
        assert_eq!(broken.first.as_deref(), Some("ok"));
        assert_eq!(broken.last, None);
    }

    #[test]
    fn test_optional_none_is_noop() {
        assert!(apply_defaults_optional::<Service>(None).is_ok());

        let mut service = Service::default();
        apply_defaults_optional(Some(&mut service)).unwrap();
        assert_eq!(service.replicas, Some(42));
    }

    #[test]
    fn test_declared_defaults() {
        let declared = declared_defaults(&SERVICE);
        let paths: Vec<&str> = declared.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "name",
                "replicas",
                "max_bytes",
                "port",
                "quota",
                "public",
                "ratio",
                "weight",
                "tier",
                "probe.path",
                "probe.interval",
            ]
        );
        assert_eq!(declared[8].kind, "enum");
        assert_eq!(declared[8].default, "basic");
    }

    #[test]
    fn test_declared_defaults_recursive_schema() {
        let declared = declared_defaults(&NODE);
        assert_eq!(
            declared,
            vec![DeclaredDefault {
                path: "label".to_string(),
                kind: "string",
                default: "leaf",
            }]
        );
    }
}
