//! The Brief Record: a flat JSON object of production-brief fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{BriefError, Result};

/// Known brief fields, declared in canonical rendering order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum BriefField {
    Style,
    Bpm,
    Key,
    Ambiance,
    Structure,
    Instruments,
    DrumsPatterns,
    PresetsPlugins,
    MixTips,
    MasteringTips,
    Effects,
    AutomationTips,
    ArrangementGuide,
}

impl BriefField {
    /// Section title shown in the rendered document.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Style => "Style Musical",
            Self::Bpm => "Tempo",
            Self::Key => "Tonalité",
            Self::Ambiance => "Ambiance",
            Self::Structure => "Structure",
            Self::Instruments => "Instruments",
            Self::DrumsPatterns => "Patterns de Batterie",
            Self::PresetsPlugins => "Presets & Plugins",
            Self::MixTips => "Conseils Mixage",
            Self::MasteringTips => "Conseils Mastering",
            Self::Effects => "Effets",
            Self::AutomationTips => "Automation",
            Self::ArrangementGuide => "Arrangement",
        }
    }
}

/// One field's value, tagged by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Map(Vec<(String, String)>),
    List(Vec<String>),
}

impl FieldValue {
    /// Classify a raw JSON value. Non-string scalars use their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), scalar_text(v)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items.iter().map(scalar_text).collect()),
            other => Self::Text(scalar_text(other)),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parsed brief, kept in raw form so unknown fields survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BriefRecord(Map<String, Value>);

impl BriefRecord {
    /// Parse extracted JSON text. The top level must be an object.
    pub fn from_json_str(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(BriefError::parse(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Wrap an already-decoded JSON value. Non-objects are rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Value of a known field, if present.
    pub fn field(&self, field: BriefField) -> Option<FieldValue> {
        self.0.get(field.as_ref()).map(FieldValue::from_json)
    }

    /// Present known fields in canonical order.
    pub fn sections(&self) -> impl Iterator<Item = (BriefField, FieldValue)> + '_ {
        BriefField::iter().filter_map(move |field| self.field(field).map(|v| (field, v)))
    }
}

impl From<Map<String, Value>> for BriefRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_names_are_snake_case() {
        assert_eq!(BriefField::DrumsPatterns.as_ref(), "drums_patterns");
        assert_eq!(
            "arrangement_guide".parse::<BriefField>().unwrap(),
            BriefField::ArrangementGuide
        );
        assert_eq!(BriefField::iter().count(), 13);
    }

    #[test]
    fn non_object_top_level_is_a_parse_error() {
        let err = BriefRecord::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, BriefError::Parse(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            BriefRecord::from_json_str("{\"style\": }"),
            Err(BriefError::Parse(_))
        ));
    }

    #[test]
    fn values_are_classified_by_shape() {
        assert_eq!(
            FieldValue::from_json(&json!({"low_end": "cut 30Hz", "gain": 3})),
            FieldValue::Map(vec![
                ("low_end".to_string(), "cut 30Hz".to_string()),
                ("gain".to_string(), "3".to_string()),
            ])
        );
        assert_eq!(
            FieldValue::from_json(&json!(["kick", 2])),
            FieldValue::List(vec!["kick".to_string(), "2".to_string()])
        );
        assert_eq!(FieldValue::from_json(&json!(92)), FieldValue::Text("92".to_string()));
        assert_eq!(FieldValue::from_json(&json!(null)), FieldValue::Text(String::new()));
    }

    #[test]
    fn sections_follow_canonical_order_and_skip_unknown() {
        let record = BriefRecord::from_json_str(
            r#"{"mix_tips": "a", "extra": "z", "style": "b", "bpm": "90"}"#,
        )
        .unwrap();
        let fields: Vec<BriefField> = record.sections().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            vec![BriefField::Style, BriefField::Bpm, BriefField::MixTips]
        );
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let record = BriefRecord::from_json_str(r#"{"style": "lofi", "mood": "calm"}"#).unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"style": "lofi", "mood": "calm"})
        );
    }
}
