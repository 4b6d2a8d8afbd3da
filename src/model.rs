use crate::text::clean_text;
use serde::Serialize;
use serde_json::{Map, Value};

/// A single raw ingredient line. Splitting into amount and name is
/// best-effort; both stay unset when only the raw line is known.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Ingredient {
    pub line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One instruction step. Numbers are assigned by the pipeline, contiguous
/// from 1, never trusted from input.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Instruction {
    #[serde(rename = "stepNumber")]
    pub step_number: u32,
    pub text: String,
}

/// The canonical normalized recipe record. Field names follow the external
/// camelCase contract; unset optionals are omitted from the payload, the
/// tags list is always present.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_calories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_protein: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_carbs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_fat: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chef_notes: Option<String>,

    pub source_platform: String,
    pub source_url: String,
    pub source_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_via: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_local_path: Option<String>,

    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Recipe {
    /// Serialize to the external payload mapping. The `tags` key is always
    /// present even when empty.
    pub fn into_payload(self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Build ingredient lines from raw strings, dropping empty or
/// whitespace-only entries.
pub fn ingredients_from_lines<I, S>(lines: I) -> Vec<Ingredient>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|raw| {
            let cleaned = clean_text(Some(raw.as_ref()));
            if cleaned.is_empty() {
                return None;
            }
            Some(Ingredient {
                line: cleaned,
                amount: None,
                name: None,
            })
        })
        .collect()
}

/// Build instruction steps from raw strings. Empty lines are dropped first,
/// then steps are numbered contiguously from 1.
pub fn instructions_from_lines<I, S>(lines: I) -> Vec<Instruction>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|raw| {
            let cleaned = clean_text(Some(raw.as_ref()));
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .enumerate()
        .map(|(idx, text)| Instruction {
            step_number: idx as u32 + 1,
            text,
        })
        .collect()
}
