use crate::config::Settings;
use crate::error::ImportError;
use crate::model::{ingredients_from_lines, instructions_from_lines, Recipe};
use crate::text::{clean_text, ensure_domain};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const EXTRACTION_PROMPT: &str = r#"
You extract recipes from messy web page text. Respond with only a JSON object,
no prose and no code fences, using exactly these keys (use null when a value
is not present in the text):

{
  "title": "<recipe title>",
  "description": "<short description or null>",
  "mealType": "<breakfast/lunch/dinner/dessert/... or null>",
  "difficulty": "<easy/medium/hard or null>",
  "prepTime": "<e.g. 15 min, or null>",
  "cookTime": "<e.g. 1 h 30 min, or null>",
  "totalTime": "<or null>",
  "servings": "<e.g. 4, or null>",
  "nutritionCalories": "<or null>",
  "nutritionProtein": "<or null>",
  "nutritionCarbs": "<or null>",
  "nutritionFat": "<or null>",
  "tags": ["<tag>", ...],
  "ingredients": ["<one ingredient line per entry>", ...],
  "instructions": ["<one step per entry>", ...]
}

If the text contains no recipe at all, still return the object with a best
guess title and empty lists.
"#;

/// Opaque text-to-record extractor backed by an OpenAI-compatible chat
/// endpoint. Potentially slow and costly; only invoked when no structured
/// data is available.
#[derive(Debug)]
pub struct OpenAiExtractor {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiExtractor {
    /// Build from settings. Fails with a configuration error when no API key
    /// is available, so the problem surfaces exactly when the fallback path
    /// is taken.
    pub fn from_settings(settings: &Settings) -> Result<Self, ImportError> {
        let api_key = settings
            .openai_api_key
            .clone()
            .ok_or_else(|| ImportError::Configuration("OPENAI_API_KEY is not configured".to_string()))?;

        Ok(OpenAiExtractor {
            client: Client::new(),
            api_key,
            base_url: settings.openai_base_url.trim_end_matches('/').to_string(),
            model: settings.openai_model.clone(),
        })
    }

    /// Extract a recipe record from plain page text.
    pub async fn extract(
        &self,
        page_url: &str,
        page_text: &str,
        image_url: Option<String>,
        platform: &str,
        extracted_via: &str,
    ) -> Result<Recipe, ImportError> {
        let response: Value = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": EXTRACTION_PROMPT},
                    {"role": "user", "content": page_text}
                ],
                "temperature": 0.2
            }))
            .send()
            .await?
            .json()
            .await?;

        debug!("OpenAI response: {response:?}");

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ImportError::Extraction("No content in model response".to_string()))?;

        let parsed: Value = serde_json::from_str(strip_code_fences(content))
            .map_err(|err| ImportError::Extraction(format!("Model returned invalid JSON: {err}")))?;

        Ok(recipe_from_model_json(
            &parsed,
            page_url,
            image_url,
            platform,
            extracted_via,
        ))
    }
}

/// Models sometimes wrap the JSON in markdown fences despite instructions.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn field(parsed: &Value, key: &str) -> Option<String> {
    match parsed.get(key) {
        Some(Value::String(s)) => {
            let cleaned = clean_text(Some(s.as_str()));
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(parsed: &Value, key: &str) -> Vec<String> {
    parsed[key]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn recipe_from_model_json(
    parsed: &Value,
    page_url: &str,
    image_url: Option<String>,
    platform: &str,
    extracted_via: &str,
) -> Recipe {
    let title = field(parsed, "title").unwrap_or_else(|| "Untitled Recipe".to_string());
    let tags = string_list(parsed, "tags")
        .into_iter()
        .map(|tag| clean_text(Some(tag.as_str())))
        .filter(|tag| !tag.is_empty())
        .collect();

    Recipe {
        title,
        description: field(parsed, "description"),
        meal_type: field(parsed, "mealType"),
        difficulty: field(parsed, "difficulty"),
        prep_time: field(parsed, "prepTime"),
        cook_time: field(parsed, "cookTime"),
        total_time: field(parsed, "totalTime"),
        servings: field(parsed, "servings"),
        nutrition_calories: field(parsed, "nutritionCalories"),
        nutrition_protein: field(parsed, "nutritionProtein"),
        nutrition_carbs: field(parsed, "nutritionCarbs"),
        nutrition_fat: field(parsed, "nutritionFat"),
        source_platform: platform.to_string(),
        source_url: page_url.to_string(),
        source_domain: ensure_domain(page_url),
        extracted_via: Some(extracted_via.to_string()),
        media_image_url: image_url,
        tags,
        ingredients: ingredients_from_lines(string_list(parsed, "ingredients")),
        instructions: instructions_from_lines(string_list(parsed, "instructions")),
        ..Recipe::default()
    }
}
