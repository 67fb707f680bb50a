//! Structured input values handed to a content builder.
//!
//! Blueprints are named sections of key/value context shared across a
//! whole project ("Brand Voice", "Target Audience", ...). Field values are
//! the flat inputs specific to the one category being generated. Both
//! arrive as loosely-typed key/value pairs from the caller and are
//! rendered into prompt blocks here so every builder formats them the
//! same way.

use serde::{Deserialize, Serialize};

/// One key/value entry inside a blueprint section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintEntry {
    /// Caller-side identifier; opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A named section of contextual key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintValue {
    pub title: String,
    #[serde(default)]
    pub values: Vec<BlueprintEntry>,
}

/// A single field input for the category being generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

/// Everything a builder receives for one generation call.
///
/// `params` carries the fixed trailing arguments from the resolved
/// registry descriptor; `homepage_reference` is an optional existing page
/// the output should stay stylistically consistent with.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub blueprint_values: Vec<BlueprintValue>,
    pub field_values: Vec<FieldValue>,
    pub params: Vec<String>,
    pub homepage_reference: Option<String>,
}

impl GenerationInput {
    /// Render the blueprint sections as a prompt context block.
    ///
    /// Sections and entries with no usable value are skipped rather than
    /// rendered as empty lines.
    pub fn context_block(&self) -> String {
        let mut out = String::new();
        for section in &self.blueprint_values {
            let lines: Vec<String> = section
                .values
                .iter()
                .filter_map(|entry| {
                    let value = entry.value.as_deref()?.trim();
                    if value.is_empty() {
                        return None;
                    }
                    match entry.key.as_deref() {
                        Some(key) if !key.trim().is_empty() => {
                            Some(format!("- {}: {}", key.trim(), value))
                        }
                        _ => Some(format!("- {value}")),
                    }
                })
                .collect();
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("## {}\n{}\n\n", section.title, lines.join("\n")));
        }
        out.trim_end().to_string()
    }

    /// Render the category field values as a prompt block.
    pub fn fields_block(&self) -> String {
        self.field_values
            .iter()
            .filter_map(|field| {
                let value = field.value.as_deref()?.trim();
                if value.is_empty() {
                    return None;
                }
                match field.key.as_deref() {
                    Some(key) if !key.trim().is_empty() => {
                        Some(format!("{}: {}", key.trim(), value))
                    }
                    _ => Some(value.to_string()),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Look up a field value by key.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.field_values
            .iter()
            .find(|f| f.key.as_deref() == Some(key))
            .and_then(|f| f.value.as_deref())
    }

    /// Fixed descriptor param by position.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> GenerationInput {
        GenerationInput {
            blueprint_values: vec![
                BlueprintValue {
                    title: "Brand Voice".to_string(),
                    values: vec![
                        BlueprintEntry {
                            id: None,
                            key: Some("Tone".to_string()),
                            value: Some("confident, plain-spoken".to_string()),
                        },
                        BlueprintEntry {
                            id: None,
                            key: None,
                            value: Some("avoid jargon".to_string()),
                        },
                    ],
                },
                BlueprintValue {
                    title: "Empty Section".to_string(),
                    values: vec![BlueprintEntry::default()],
                },
            ],
            field_values: vec![
                FieldValue::new("Product", "CRM for plumbers"),
                FieldValue {
                    key: Some("Unused".to_string()),
                    value: Some("   ".to_string()),
                },
            ],
            params: vec!["facebook".to_string()],
            homepage_reference: None,
        }
    }

    #[test]
    fn context_block_skips_empty_sections_and_entries() {
        let block = sample_input().context_block();
        assert!(block.contains("## Brand Voice"));
        assert!(block.contains("- Tone: confident, plain-spoken"));
        assert!(block.contains("- avoid jargon"));
        assert!(!block.contains("Empty Section"));
    }

    #[test]
    fn fields_block_drops_blank_values() {
        let block = sample_input().fields_block();
        assert_eq!(block, "Product: CRM for plumbers");
    }

    #[test]
    fn field_lookup_by_key() {
        let input = sample_input();
        assert_eq!(input.field("Product"), Some("CRM for plumbers"));
        assert_eq!(input.field("Missing"), None);
    }

    #[test]
    fn param_by_position() {
        let input = sample_input();
        assert_eq!(input.param(0), Some("facebook"));
        assert_eq!(input.param(1), None);
    }

    #[test]
    fn round_trips_through_json() {
        let section = BlueprintValue {
            title: "Offer".to_string(),
            values: vec![BlueprintEntry {
                id: Some("64f0".to_string()),
                key: Some("Price".to_string()),
                value: Some("$49/mo".to_string()),
            }],
        };
        let json = serde_json::to_string(&section).unwrap();
        let back: BlueprintValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
    }
}
