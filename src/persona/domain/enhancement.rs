//! Persona enhancements and their typed payloads.

use super::row::RowFields;
use crate::error::{PersonaError, Result};
use crate::types::{BehaviorWeights, Row, StructuredMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed enhancement payload, one variant per type tag.
///
/// Parsed once when the row is normalized. Absent or mistyped payload
/// sub-fields degrade to defaults here, so merging never has to inspect raw
/// JSON and never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnhancementKind {
    Prompt {
        text: Option<String>,
    },
    Tool {
        tools: Vec<String>,
        append: bool,
    },
    Weight {
        weights: BehaviorWeights,
    },
    Nats {
        subjects: Vec<String>,
    },
    Model {
        model: Option<String>,
    },
    Eval {
        gates: StructuredMap,
    },
    Geometry {
        default_shape_id: String,
        decode_mode: String,
    },
    /// Rate and pitch keep the payload's number text, so `2` stays `2`.
    Voice {
        speaking_rate: String,
        pitch_shift: String,
        personality_traits: Vec<String>,
    },
    /// Unrecognized tag; merges as a no-op.
    Unknown {
        tag: String,
    },
}

impl EnhancementKind {
    pub fn parse(tag: &str, payload: &Value) -> Self {
        match tag {
            "prompt" => EnhancementKind::Prompt {
                text: text_field(payload, "prompt").or_else(|| text_field(payload, "text")),
            },
            "tool" => EnhancementKind::Tool {
                tools: string_items(payload.get("tools")),
                append: payload
                    .get("append")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            "weight" => EnhancementKind::Weight {
                weights: payload
                    .get("weights")
                    .and_then(Value::as_object)
                    .map(|weights| {
                        weights
                            .iter()
                            .filter_map(|(k, v)| v.as_f64().map(|w| (k.clone(), w)))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "nats" => EnhancementKind::Nats {
                subjects: string_items(payload.get("subjects")),
            },
            "model" => EnhancementKind::Model {
                model: text_field(payload, "model"),
            },
            "eval" => EnhancementKind::Eval {
                gates: payload
                    .get("gates")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
            },
            "geometry" => EnhancementKind::Geometry {
                default_shape_id: display_field(payload, "default_shape_id")
                    .unwrap_or_else(|| "none".to_string()),
                decode_mode: display_field(payload, "decode_mode")
                    .unwrap_or_else(|| "exact".to_string()),
            },
            "voice" => EnhancementKind::Voice {
                speaking_rate: number_text(payload, "speaking_rate", "1.0"),
                pitch_shift: number_text(payload, "pitch_shift", "0.0"),
                personality_traits: string_items(payload.get("personality_traits")),
            },
            other => EnhancementKind::Unknown {
                tag: other.to_string(),
            },
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            EnhancementKind::Prompt { .. } => "prompt",
            EnhancementKind::Tool { .. } => "tool",
            EnhancementKind::Weight { .. } => "weight",
            EnhancementKind::Nats { .. } => "nats",
            EnhancementKind::Model { .. } => "model",
            EnhancementKind::Eval { .. } => "eval",
            EnhancementKind::Geometry { .. } => "geometry",
            EnhancementKind::Voice { .. } => "voice",
            EnhancementKind::Unknown { tag } => tag.as_str(),
        }
    }
}

fn text_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn number_text(payload: &Value, key: &str, default: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_number)
        .map(|n| n.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Strings pass through; other scalars are rendered as JSON text.
fn display_field(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// A prioritized, typed modifier fetched alongside its persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaEnhancement {
    pub enhancement_id: String,
    pub persona_id: String,
    pub enhancement_name: String,
    /// Higher priority is applied later and wins exclusive fields.
    pub priority: i64,
    pub kind: EnhancementKind,
    /// Raw payload as stored, kept for display.
    pub enhancement_value: Value,
    #[serde(default)]
    pub metadata: StructuredMap,
}

impl PersonaEnhancement {
    pub fn new(
        enhancement_id: impl Into<String>,
        persona_id: impl Into<String>,
        enhancement_type: &str,
        enhancement_name: impl Into<String>,
        enhancement_value: Value,
        priority: i64,
    ) -> Self {
        let kind = EnhancementKind::parse(enhancement_type, &enhancement_value);
        Self {
            enhancement_id: enhancement_id.into(),
            persona_id: persona_id.into(),
            enhancement_name: enhancement_name.into(),
            priority,
            kind,
            enhancement_value,
            metadata: StructuredMap::new(),
        }
    }

    pub fn enhancement_type(&self) -> &str {
        self.kind.tag()
    }

    /// Normalize an enhancement store row.
    pub fn from_row(row: &Row) -> Result<Self> {
        let fields = RowFields::new("enhancement", row);

        let enhancement_id = fields.required_string("enhancement_id")?;
        let persona_id = fields.required_string("persona_id")?;
        let enhancement_type = fields.required_string("enhancement_type")?;
        let enhancement_name = fields.required_string("enhancement_name")?;
        let enhancement_value = fields
            .column("enhancement_value")
            .cloned()
            .ok_or_else(|| PersonaError::missing("enhancement", "enhancement_value"))?;

        let priority = match fields.column("priority") {
            None => 0,
            Some(value) => value.as_i64().ok_or_else(|| {
                PersonaError::invalid("priority", format!("expected an integer, got {}", value))
            })?,
        };
        let metadata = fields
            .column("metadata")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let mut enhancement = PersonaEnhancement::new(
            enhancement_id,
            persona_id,
            &enhancement_type,
            enhancement_name,
            enhancement_value,
            priority,
        );
        enhancement.metadata = metadata;
        Ok(enhancement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn enhancement_row_normalizes() {
        let enhancement = PersonaEnhancement::from_row(&row(json!({
            "enhancement_id": "enh-uuid-123",
            "persona_id": "persona-uuid",
            "enhancement_type": "tool",
            "enhancement_name": "code-review-access",
            "enhancement_value": {"permission": "write"},
            "priority": 5,
            "metadata": {"added_by": "admin"}
        })))
        .unwrap();

        assert_eq!(enhancement.enhancement_id, "enh-uuid-123");
        assert_eq!(enhancement.enhancement_type(), "tool");
        assert_eq!(enhancement.priority, 5);
        assert_eq!(enhancement.enhancement_value, json!({"permission": "write"}));
        assert_eq!(enhancement.metadata["added_by"], json!("admin"));
        // No tools key: replacement with an empty list.
        assert_eq!(
            enhancement.kind,
            EnhancementKind::Tool {
                tools: vec![],
                append: false
            }
        );
    }

    #[test]
    fn priority_and_metadata_default() {
        let enhancement = PersonaEnhancement::from_row(&row(json!({
            "enhancement_id": 7,
            "persona_id": "p",
            "enhancement_type": "model",
            "enhancement_name": "opus",
            "enhancement_value": {"model": "claude-opus-4-5"}
        })))
        .unwrap();
        assert_eq!(enhancement.enhancement_id, "7");
        assert_eq!(enhancement.priority, 0);
        assert!(enhancement.metadata.is_empty());
    }

    #[test]
    fn enhancement_row_requires_payload() {
        let err = PersonaEnhancement::from_row(&row(json!({
            "enhancement_id": "e",
            "persona_id": "p",
            "enhancement_type": "model",
            "enhancement_name": "opus"
        })))
        .unwrap_err();
        assert_eq!(err.missing_field(), Some("enhancement_value"));
    }

    #[test]
    fn payload_defaults_when_fields_absent() {
        assert_eq!(
            EnhancementKind::parse("geometry", &json!({})),
            EnhancementKind::Geometry {
                default_shape_id: "none".to_string(),
                decode_mode: "exact".to_string()
            }
        );
        assert_eq!(
            EnhancementKind::parse("voice", &json!(null)),
            EnhancementKind::Voice {
                speaking_rate: "1.0".to_string(),
                pitch_shift: "0.0".to_string(),
                personality_traits: vec![]
            }
        );
        assert_eq!(
            EnhancementKind::parse(
                "voice",
                &json!({"speaking_rate": 2, "pitch_shift": -0.25, "personality_traits": ["calm"]})
            ),
            EnhancementKind::Voice {
                speaking_rate: "2".to_string(),
                pitch_shift: "-0.25".to_string(),
                personality_traits: vec!["calm".to_string()]
            }
        );
        assert_eq!(
            EnhancementKind::parse("voice", &json!({"speaking_rate": "fast"})),
            EnhancementKind::parse("voice", &json!({}))
        );
        assert_eq!(
            EnhancementKind::parse("model", &json!({"model": 3})),
            EnhancementKind::Model { model: None }
        );
    }

    #[test]
    fn prompt_accepts_prompt_or_text_key() {
        assert_eq!(
            EnhancementKind::parse("prompt", &json!({"prompt": "Be terse."})),
            EnhancementKind::Prompt {
                text: Some("Be terse.".to_string())
            }
        );
        assert_eq!(
            EnhancementKind::parse("prompt", &json!({"text": "Be kind."})),
            EnhancementKind::Prompt {
                text: Some("Be kind.".to_string())
            }
        );
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let kind = EnhancementKind::parse("hologram", &json!({"x": 1}));
        assert_eq!(kind.tag(), "hologram");
        assert!(matches!(kind, EnhancementKind::Unknown { .. }));
    }
}
