//! Validates a resume payload against the pending interrupt's schema.
//!
//! The schema on the wire is JSON-Schema-shaped (`properties`, `enum`,
//! `required`) so a frontend can render a form from it directly; this
//! is the one place that shape is actually interpreted, via the
//! `jsonschema` crate, rather than inventing a third hand-rolled
//! validator alongside the artifact registry's.

use crate::error::InterruptError;
use fin_events::InterruptRequest;
use jsonschema::JSONSchema;
use serde_json::Value;

pub struct InterruptController;

impl InterruptController {
    /// Validate `resume_payload` against `request.schema`. On success,
    /// returns the payload unchanged (it flows back into the resuming
    /// node's input as-is).
    pub fn validate_resume(request: &InterruptRequest, resume_payload: &Value) -> Result<Value, InterruptError> {
        let compiled = JSONSchema::compile(&request.schema).map_err(|e| InterruptError::MalformedSchema {
            kind: request.kind.clone(),
            reason: e.to_string(),
        })?;

        if let Err(mut errors) = compiled.validate(resume_payload) {
            let first = errors.next().expect("validate() only errs with at least one error");
            return Err(InterruptError::InvalidResumePayload {
                path: first.instance_path.to_string(),
                reason: first.to_string(),
            });
        }

        Ok(resume_payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticker_request() -> InterruptRequest {
        InterruptRequest {
            kind: "ticker_selection".into(),
            title: "Pick a ticker".into(),
            description: "Multiple matches for \"GOOG\"".into(),
            data: json!({"candidates": ["GOOG", "GOOGL"]}),
            schema: json!({
                "type": "object",
                "properties": {
                    "selected_symbol": {"type": "string", "enum": ["GOOG", "GOOGL"]}
                },
                "required": ["selected_symbol"]
            }),
            ui_hints: json!({}),
        }
    }

    #[test]
    fn accepts_a_payload_matching_the_enum() {
        let request = ticker_request();
        let result = InterruptController::validate_resume(&request, &json!({"selected_symbol": "GOOG"}));
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_a_value_outside_the_enum() {
        let request = ticker_request();
        let err = InterruptController::validate_resume(&request, &json!({"selected_symbol": "AAPL"})).unwrap_err();
        match err {
            InterruptError::InvalidResumePayload { path, .. } => assert!(path.contains("selected_symbol")),
            other => panic!("expected InvalidResumePayload, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_missing_required_field() {
        let request = ticker_request();
        let err = InterruptController::validate_resume(&request, &json!({})).unwrap_err();
        assert!(matches!(err, InterruptError::InvalidResumePayload { .. }));
    }
}
