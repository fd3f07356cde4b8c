use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::FEATURE_COUNT;
use crate::errors::PredictionError;

/// Interaction telemetry sent by the front end.
///
/// The wire payload is loosely typed: every field is optional and missing
/// or null fields read as zero. Use [`Telemetry::from_json`] to coerce a raw
/// payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Telemetry {
    /// Seconds since the user's last action.
    pub inactivity_time: f64,
    pub tool_id: f64,
    pub cursor_velocity: f64,
    pub click_frequency: f64,
    /// Seconds since the session started.
    pub session_duration: f64,
    /// Recent command history. Carried through, not used for features.
    pub recent_commands: Vec<Value>,
}

impl Telemetry {
    /// Coerce a raw JSON payload into telemetry.
    ///
    /// Numbers are taken as-is, booleans count as 1/0 and numeric strings
    /// are parsed. Anything else in a numeric field is rejected, as is a
    /// payload that is not a JSON object.
    pub fn from_json(payload: &Value) -> Result<Self, PredictionError> {
        let fields = payload
            .as_object()
            .ok_or_else(|| PredictionError::InvalidTelemetry {
                kind: json_kind(payload).to_string(),
            })?;

        let number = |field: &str| -> Result<f64, PredictionError> {
            fields.get(field).map_or(Ok(0.0), |v| coerce_number(field, v))
        };

        let recent_commands = match fields.get("recent_commands") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        Ok(Self {
            inactivity_time: number("inactivity_time")?,
            tool_id: number("tool_id")?,
            cursor_velocity: number("cursor_velocity")?,
            click_frequency: number("click_frequency")?,
            session_duration: number("session_duration")?,
            recent_commands,
        })
    }

    /// The numeric features in network input order.
    ///
    /// `tool_id` and `recent_commands` are not part of the vector.
    pub fn feature_values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.inactivity_time,
            self.cursor_velocity,
            self.click_frequency,
            self.session_duration,
        ]
    }
}

fn coerce_number(field: &str, value: &Value) -> Result<f64, PredictionError> {
    let parsed = match value {
        Value::Null => return Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().ok_or_else(|| "number out of range".to_string()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not a number")),
        other => Err(format!("unexpected {}", json_kind(other))),
    };

    match parsed {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(PredictionError::InvalidField {
            field: field.to_string(),
            reason: "value is not finite".to_string(),
        }),
        Err(reason) => Err(PredictionError::InvalidField {
            field: field.to_string(),
            reason,
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_all_zero() {
        let t = Telemetry::from_json(&json!({})).unwrap();
        assert_eq!(t, Telemetry::default());
        assert_eq!(t.feature_values(), [0.0; FEATURE_COUNT]);
    }

    #[test]
    fn features_skip_tool_id() {
        let t = Telemetry::from_json(&json!({
            "inactivity_time": 12.5,
            "tool_id": 7,
            "cursor_velocity": 3,
            "click_frequency": 0.25,
            "session_duration": 600,
        }))
        .unwrap();
        assert_eq!(t.tool_id, 7.0);
        assert_eq!(t.feature_values(), [12.5, 3.0, 0.25, 600.0]);
    }

    #[test]
    fn null_bool_and_numeric_string_are_coerced() {
        let t = Telemetry::from_json(&json!({
            "inactivity_time": null,
            "cursor_velocity": true,
            "click_frequency": " 1.5 ",
        }))
        .unwrap();
        assert_eq!(t.feature_values(), [0.0, 1.0, 1.5, 0.0]);
    }

    #[test]
    fn non_numeric_string_is_rejected_with_field_name() {
        let err = Telemetry::from_json(&json!({ "session_duration": "forever" })).unwrap_err();
        match err {
            PredictionError::InvalidField { field, .. } => assert_eq!(field, "session_duration"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(Telemetry::from_json(&json!({ "cursor_velocity": [1, 2] })).is_err());
        assert!(Telemetry::from_json(&json!({ "cursor_velocity": { "x": 1 } })).is_err());
    }

    #[test]
    fn non_finite_string_is_rejected() {
        assert!(Telemetry::from_json(&json!({ "inactivity_time": "NaN" })).is_err());
        assert!(Telemetry::from_json(&json!({ "inactivity_time": "inf" })).is_err());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = Telemetry::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            PredictionError::InvalidTelemetry {
                kind: "array".to_string()
            }
        );
    }

    #[test]
    fn recent_commands_kept_but_non_sequence_ignored() {
        let t = Telemetry::from_json(&json!({ "recent_commands": [3, "undo"] })).unwrap();
        assert_eq!(t.recent_commands.len(), 2);

        let t = Telemetry::from_json(&json!({ "recent_commands": "undo" })).unwrap();
        assert!(t.recent_commands.is_empty());
    }
}
