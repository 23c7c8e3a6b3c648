//! The process-wide `(kind, version) -> schema + parser + serializer`
//! registry. Populated once at startup from a `ContractManifest` (see
//! `fin-agents::contracts`); every artifact read/write and cross-agent
//! payload consumption routes through the single instance handed to the
//! scheduler at construction time.

use crate::error::{ContractError, Result};
use crate::schema::{validate, Schema};
use crate::value::TypedValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

type ParseFn = Arc<dyn Fn(&Value) -> Result<TypedValue> + Send + Sync>;
type SerializeFn = Arc<dyn Fn(&TypedValue) -> Result<Value> + Send + Sync>;

struct KindEntry {
    schema: Schema,
    exclude_none: bool,
    parse: ParseFn,
    serialize: SerializeFn,
}

#[derive(Default)]
pub struct ContractRegistry {
    kinds: HashMap<(String, String), KindEntry>,
    /// consumer_agent -> producer_agent -> allowed kinds.
    consumption_policy: HashMap<(String, String), HashSet<String>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `(kind, version)` pair. `T` must round-trip through
    /// `serde_json` -- the parser deserializes into `T` only after the
    /// raw value has passed `schema`, and the serializer re-serializes
    /// `T` and (if `exclude_none`) strips JSON `null` fields recursively.
    ///
    /// Registering the same `(kind, version)` twice is a startup-fatal
    /// error, never a silent overwrite.
    pub fn register<T>(
        &mut self,
        kind: impl Into<String>,
        version: impl Into<String>,
        schema: Schema,
        exclude_none: bool,
    ) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let kind = kind.into();
        let version = version.into();
        let key = (kind.clone(), version.clone());
        if self.kinds.contains_key(&key) {
            return Err(ContractError::DuplicateRegistration { kind, version });
        }

        let parse_kind = kind.clone();
        let parse_version = version.clone();
        let parse: ParseFn = Arc::new(move |raw: &Value| {
            let typed: T = serde_json::from_value(raw.clone()).map_err(|e| {
                ContractError::SchemaViolation {
                    path: "".to_string(),
                    reason: format!("deserialization failed after schema passed: {e}"),
                }
            })?;
            Ok(TypedValue::new(parse_kind.clone(), parse_version.clone(), typed))
        });

        let ser_kind = kind.clone();
        let ser_version = version.clone();
        let serialize: SerializeFn = Arc::new(move |tv: &TypedValue| {
            let typed = tv.downcast_ref::<T>().ok_or_else(|| ContractError::TypeMismatch {
                kind: ser_kind.clone(),
                version: ser_version.clone(),
            })?;
            serde_json::to_value(typed).map_err(|e| ContractError::SchemaViolation {
                path: "".to_string(),
                reason: format!("serialization failed: {e}"),
            })
        });

        self.kinds.insert(key, KindEntry { schema, exclude_none, parse, serialize });
        Ok(())
    }

    /// Validate `raw` against the registered schema for `(kind, version)`,
    /// then deserialize. Strict: unknown required discriminators fail,
    /// missing required fields fail, there is no fallback parser.
    pub fn parse(&self, kind: &str, version: &str, raw: &Value) -> Result<TypedValue> {
        let entry = self.lookup(kind, version)?;
        validate(&entry.schema, raw, "")?;
        (entry.parse)(raw)
    }

    /// Serialize a previously-parsed [`TypedValue`] back to its canonical
    /// `(kind, version, data)` triple.
    pub fn serialize(&self, value: &TypedValue) -> Result<(String, String, Value)> {
        let entry = self.lookup(value.kind(), value.version())?;
        let mut data = (entry.serialize)(value)?;
        if entry.exclude_none {
            strip_nulls(&mut data);
        }
        Ok((value.kind().to_string(), value.version().to_string(), data))
    }

    /// Register that `consumer_agent` may request `kind` when produced by
    /// `producer_agent`. Called only during startup wiring.
    pub fn allow_consumption(
        &mut self,
        consumer_agent: impl Into<String>,
        producer_agent: impl Into<String>,
        kind: impl Into<String>,
    ) {
        self.consumption_policy
            .entry((consumer_agent.into(), producer_agent.into()))
            .or_default()
            .insert(kind.into());
    }

    pub fn allowed_consumption_kinds(&self, consumer_agent: &str, producer_agent: &str) -> HashSet<String> {
        self.consumption_policy
            .get(&(consumer_agent.to_string(), producer_agent.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Fail with [`ContractError::UnauthorizedKind`] unless `consumer_agent`
    /// is allow-listed for `kind` from `producer_agent`.
    pub fn authorize(&self, consumer_agent: &str, producer_agent: &str, kind: &str) -> Result<()> {
        if self.allowed_consumption_kinds(consumer_agent, producer_agent).contains(kind) {
            Ok(())
        } else {
            Err(ContractError::UnauthorizedKind {
                consumer: consumer_agent.to_string(),
                producer: producer_agent.to_string(),
                kind: kind.to_string(),
            })
        }
    }

    fn lookup(&self, kind: &str, version: &str) -> Result<&KindEntry> {
        if !self.kinds.keys().any(|(k, _)| k == kind) {
            return Err(ContractError::UnknownKind(kind.to_string()));
        }
        self.kinds
            .get(&(kind.to_string(), version.to_string()))
            .ok_or_else(|| ContractError::UnknownVersion {
                kind: kind.to_string(),
                version: version.to_string(),
            })
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                strip_nulls(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_nulls(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordField;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct NewsItem {
        id: String,
        title: String,
        sentiment: Option<String>,
    }

    fn news_schema() -> Schema {
        Schema::Record {
            fields: vec![
                RecordField::required("id", Schema::String { min_len: None, max_len: None }),
                RecordField::required("title", Schema::String { min_len: None, max_len: None }),
                RecordField::optional(
                    "sentiment",
                    Schema::Optional { inner: Box::new(Schema::String { min_len: None, max_len: None }), nullable: true },
                ),
            ],
            passthrough: false,
        }
    }

    #[test]
    fn duplicate_registration_is_fatal() {
        let mut registry = ContractRegistry::new();
        registry.register::<NewsItem>("news.item", "v1", news_schema(), true).unwrap();
        let err = registry.register::<NewsItem>("news.item", "v1", news_schema(), true).unwrap_err();
        assert!(matches!(err, ContractError::DuplicateRegistration { .. }));
    }

    #[test]
    fn parse_then_serialize_round_trips_and_excludes_none() {
        let mut registry = ContractRegistry::new();
        registry.register::<NewsItem>("news.item", "v1", news_schema(), true).unwrap();

        let raw = json!({"id": "n1", "title": "t", "sentiment": null});
        let typed = registry.parse("news.item", "v1", &raw).unwrap();
        let (kind, version, data) = registry.serialize(&typed).unwrap();
        assert_eq!(kind, "news.item");
        assert_eq!(version, "v1");
        assert!(data.get("sentiment").is_none());
    }

    #[test]
    fn unknown_kind_and_version_are_distinguished() {
        let mut registry = ContractRegistry::new();
        registry.register::<NewsItem>("news.item", "v1", news_schema(), true).unwrap();

        assert!(matches!(
            registry.parse("not.a.kind", "v1", &json!({})).unwrap_err(),
            ContractError::UnknownKind(_)
        ));
        assert!(matches!(
            registry.parse("news.item", "v2", &json!({})).unwrap_err(),
            ContractError::UnknownVersion { .. }
        ));
    }

    #[test]
    fn authorize_enforces_the_allow_list() {
        let mut registry = ContractRegistry::new();
        registry.allow_consumption("debate", "news", "news.items_list");
        assert!(registry.authorize("debate", "news", "news.items_list").is_ok());
        assert!(registry.authorize("debate", "news", "news.other").is_err());
        assert!(registry.authorize("technical", "news", "news.items_list").is_err());
    }
}
