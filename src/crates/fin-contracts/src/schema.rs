//! The typed schema model every registered `(kind, version)` validates
//! against: primitive fields with range constraints, closed enumerations,
//! tag-discriminated sum types, ordered sequences, key-unique mappings,
//! optional fields with an explicit `nullable` marker, and the composite
//! `TraceableField` (value + provenance + source + confidence).
//!
//! Validation is fail-fast and path-accurate: the first mismatch found
//! walking the value depth-first aborts with the JSON-pointer-style path
//! that led to it. There is no coercion -- a string where a number is
//! expected is a violation, not a conversion.

use crate::error::ContractError;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Schema {
    String { min_len: Option<usize>, max_len: Option<usize> },
    Number { min: Option<f64>, max: Option<f64> },
    Bool,
    /// A closed set of allowed string values.
    Enum(Vec<String>),
    /// A discriminated union: `tag` names the field carrying one of
    /// `variants`' keys; the rest of the object validates against that
    /// variant's schema.
    Sum {
        tag: String,
        variants: Vec<(String, Schema)>,
    },
    Sequence(Box<Schema>),
    /// A `string -> Schema` map with unique keys (which JSON objects give
    /// us for free; this variant exists to distinguish "object as map"
    /// from "object as record" in the schema itself).
    Mapping(Box<Schema>),
    /// `nullable: true` permits an explicit JSON `null`; `false` requires
    /// the field to be entirely absent to count as "not present".
    Optional { inner: Box<Schema>, nullable: bool },
    /// A fixed-shape record. `passthrough` controls whether unknown
    /// fields not named in `fields` are dropped silently (true) or
    /// rejected as a violation (false) -- the registry default is
    /// `false`; a kind opts into passthrough explicitly.
    Record {
        fields: Vec<RecordField>,
        passthrough: bool,
    },
    /// `{value, provenance, source, confidence}` -- confidence is
    /// constrained to `[0.0, 1.0]`.
    Traceable(Box<Schema>),
}

#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
}

impl RecordField {
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self { name: name.into(), schema, required: true }
    }

    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self { name: name.into(), schema, required: false }
    }
}

/// Validate `value` against `schema`, starting at JSON-pointer path `""`.
pub fn validate(schema: &Schema, value: &Value, path: &str) -> Result<(), ContractError> {
    match schema {
        Schema::String { min_len, max_len } => {
            let s = expect_str(value, path)?;
            if let Some(min) = min_len {
                if s.len() < *min {
                    return violation(path, format!("string shorter than {min}"));
                }
            }
            if let Some(max) = max_len {
                if s.len() > *max {
                    return violation(path, format!("string longer than {max}"));
                }
            }
            Ok(())
        }
        Schema::Number { min, max } => {
            let n = value
                .as_f64()
                .ok_or_else(|| mismatch(path, "number"))?;
            if let Some(min) = min {
                if n < *min {
                    return violation(path, format!("{n} is below minimum {min}"));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    return violation(path, format!("{n} is above maximum {max}"));
                }
            }
            Ok(())
        }
        Schema::Bool => {
            if value.is_boolean() {
                Ok(())
            } else {
                violation(path, "expected bool".to_string())
            }
        }
        Schema::Enum(allowed) => {
            let s = expect_str(value, path)?;
            if allowed.iter().any(|a| a == s) {
                Ok(())
            } else {
                violation(path, format!("{s:?} is not one of {allowed:?}"))
            }
        }
        Schema::Sum { tag, variants } => {
            let obj = expect_obj(value, path)?;
            let tag_value = obj
                .get(tag)
                .and_then(Value::as_str)
                .ok_or_else(|| missing_discriminator(path, tag))?;
            let (_, variant_schema) = variants
                .iter()
                .find(|(name, _)| name == tag_value)
                .ok_or_else(|| unknown_discriminator(path, tag, tag_value))?;
            validate(variant_schema, value, path)
        }
        Schema::Sequence(item_schema) => {
            let arr = value
                .as_array()
                .ok_or_else(|| mismatch(path, "array"))?;
            for (i, item) in arr.iter().enumerate() {
                validate(item_schema, item, &format!("{path}/{i}"))?;
            }
            Ok(())
        }
        Schema::Mapping(value_schema) => {
            let obj = expect_obj(value, path)?;
            for (k, v) in obj {
                validate(value_schema, v, &format!("{path}/{k}"))?;
            }
            Ok(())
        }
        Schema::Optional { inner, nullable } => {
            if value.is_null() {
                if *nullable {
                    Ok(())
                } else {
                    violation(path, "null is not permitted for this field".to_string())
                }
            } else {
                validate(inner, value, path)
            }
        }
        Schema::Record { fields, passthrough } => {
            let obj = expect_obj(value, path)?;
            for field in fields {
                let field_path = format!("{path}/{}", field.name);
                match obj.get(&field.name) {
                    Some(v) => validate(&field.schema, v, &field_path)?,
                    None => {
                        if field.required {
                            return violation(&field_path, "required field is missing".to_string());
                        }
                    }
                }
            }
            if !passthrough {
                let known: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                for key in obj.keys() {
                    if !known.contains(&key.as_str()) {
                        return violation(
                            &format!("{path}/{key}"),
                            "unknown field not permitted (passthrough disabled)".to_string(),
                        );
                    }
                }
            }
            Ok(())
        }
        Schema::Traceable(value_schema) => {
            let obj = expect_obj(value, path)?;
            let value_field = obj
                .get("value")
                .ok_or_else(|| violation_err(path, "value is missing".to_string()))?;
            validate(value_schema, value_field, &format!("{path}/value"))?;
            for key in ["provenance", "source"] {
                if !obj.contains_key(key) || !obj[key].is_string() {
                    return violation(&format!("{path}/{key}"), format!("{key} must be a string"));
                }
            }
            let confidence = obj
                .get("confidence")
                .and_then(Value::as_f64)
                .ok_or_else(|| mismatch(&format!("{path}/confidence"), "number"))?;
            if !(0.0..=1.0).contains(&confidence) {
                return violation(
                    &format!("{path}/confidence"),
                    format!("confidence {confidence} is outside [0.0, 1.0]"),
                );
            }
            Ok(())
        }
    }
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, ContractError> {
    value.as_str().ok_or_else(|| mismatch(path, "string"))
}

fn expect_obj<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a serde_json::Map<String, Value>, ContractError> {
    value.as_object().ok_or_else(|| mismatch(path, "object"))
}

fn mismatch(path: &str, expected: &str) -> ContractError {
    ContractError::SchemaViolation {
        path: path.to_string(),
        reason: format!("expected {expected}"),
    }
}

fn missing_discriminator(path: &str, tag: &str) -> ContractError {
    ContractError::SchemaViolation {
        path: path.to_string(),
        reason: format!("missing discriminator field {tag:?}"),
    }
}

fn unknown_discriminator(path: &str, tag: &str, value: &str) -> ContractError {
    ContractError::SchemaViolation {
        path: path.to_string(),
        reason: format!("{tag:?} = {value:?} does not match any known variant"),
    }
}

fn violation(path: &str, reason: String) -> Result<(), ContractError> {
    Err(violation_err(path, reason))
}

fn violation_err(path: &str, reason: String) -> ContractError {
    ContractError::SchemaViolation { path: path.to_string(), reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_rejects_unknown_fields_without_passthrough() {
        let schema = Schema::Record {
            fields: vec![RecordField::required("id", Schema::String { min_len: None, max_len: None })],
            passthrough: false,
        };
        let value = json!({"id": "n1", "extra": true});
        let err = validate(&schema, &value, "").unwrap_err();
        assert!(matches!(err, ContractError::SchemaViolation { .. }));
    }

    #[test]
    fn sum_type_validates_the_matching_variant_only() {
        let schema = Schema::Sum {
            tag: "kind".to_string(),
            variants: vec![
                ("bullish".to_string(), Schema::Bool),
                ("bearish".to_string(), Schema::Bool),
            ],
        };
        let err = validate(&schema, &json!({"kind": "neutral"}), "").unwrap_err();
        assert!(matches!(err, ContractError::SchemaViolation { .. }));
    }

    #[test]
    fn traceable_requires_confidence_in_unit_interval() {
        let schema = Schema::Traceable(Box::new(Schema::Number { min: None, max: None }));
        let value = json!({"value": 1.0, "provenance": "10-K", "source": "fundamental", "confidence": 1.5});
        assert!(validate(&schema, &value, "").is_err());
    }

    #[test]
    fn optional_nullable_accepts_null_non_nullable_does_not() {
        let nullable = Schema::Optional {
            inner: Box::new(Schema::Bool),
            nullable: true,
        };
        assert!(validate(&nullable, &Value::Null, "").is_ok());

        let non_nullable = Schema::Optional {
            inner: Box::new(Schema::Bool),
            nullable: false,
        };
        assert!(validate(&non_nullable, &Value::Null, "").is_err());
    }
}
