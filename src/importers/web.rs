use super::Importer;
use crate::error::ImportError;
use crate::model::{ingredients_from_lines, instructions_from_lines, Recipe};
use crate::schema::{
    extract_json_ld_blocks, extract_og_image, find_recipe_nodes, pick_best_recipe,
    resolve_schema_image,
};
use crate::text::{clean_text, ensure_domain, normalize_iso_duration};
use html_escape::decode_html_entities;
use log::info;
use serde_json::Value;

impl Importer {
    /// Import a recipe from an arbitrary web page: structured data first,
    /// language-model fallback on the page text otherwise.
    pub async fn import_web(&self, url: &str) -> Result<Value, ImportError> {
        let html = self.fetch_html(url).await?;
        let page_image = extract_og_image(&html);

        let blocks = extract_json_ld_blocks(&html);
        let nodes: Vec<&Value> = blocks.iter().flat_map(find_recipe_nodes).collect();

        let recipe = match pick_best_recipe(&nodes) {
            Some(node) => {
                info!("Importing {url} from structured data");
                let image = resolve_schema_image(node).or(page_image);
                schema_to_recipe(node, url, image, "web", "web_schema")
            }
            None => {
                info!("No structured data on {url}, using language-model fallback");
                self.recipe_from_page(url, &html, page_image, "web", "web_openai")
                    .await?
            }
        };

        Ok(recipe.into_payload())
    }
}

/// One schema string: entity-decoded, whitespace-collapsed, empty → None.
fn schema_text(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => decode_html_entities(s).into_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let cleaned = clean_text(Some(raw.as_str()));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn schema_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(schema_text)
}

fn duration_field(node: &Value, key: &str) -> Option<String> {
    let raw = schema_field(node, key)?;
    normalize_iso_duration(Some(&raw))
}

/// recipeYield may be a string, a number, or an array; for arrays the
/// descriptive entry (e.g. "6 servings") beats a bare number.
fn servings_field(node: &Value) -> Option<String> {
    match node.get("recipeYield")? {
        Value::Array(items) => {
            let strings: Vec<String> = items.iter().filter_map(schema_text).collect();
            strings
                .iter()
                .find(|s| s.contains(char::is_alphabetic))
                .or_else(|| strings.first())
                .cloned()
        }
        other => schema_text(other),
    }
}

fn nutrition_field(node: &Value, key: &str) -> Option<String> {
    node.get("nutrition").and_then(|n| n.get(key)).and_then(schema_text)
}

/// keywords is either a comma-separated string or an array of strings.
fn tags_field(node: &Value) -> Vec<String> {
    match node.get("keywords") {
        Some(Value::String(s)) => s
            .split(',')
            .map(|tag| clean_text(Some(tag)))
            .filter(|tag| !tag.is_empty())
            .collect(),
        Some(Value::Array(items)) => items.iter().filter_map(schema_text).collect(),
        _ => Vec::new(),
    }
}

fn ingredient_lines(node: &Value) -> Vec<String> {
    match node.get("recipeIngredient") {
        Some(Value::Array(items)) => items.iter().filter_map(schema_text).collect(),
        Some(other) => schema_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// recipeInstructions may be a single string, a list of strings, a list of
/// HowToStep objects, or HowToSection containers nesting further steps.
fn instruction_lines(node: &Value) -> Vec<String> {
    fn collect(value: &Value, lines: &mut Vec<String>) {
        match value {
            Value::String(_) | Value::Number(_) => {
                if let Some(text) = schema_text(value) {
                    lines.push(text);
                }
            }
            Value::Array(items) => {
                for item in items {
                    collect(item, lines);
                }
            }
            Value::Object(map) => {
                if let Some(text) = map.get("text").and_then(schema_text) {
                    lines.push(text);
                } else if let Some(nested) = map.get("itemListElement") {
                    collect(nested, lines);
                } else if let Some(name) = map.get("name").and_then(schema_text) {
                    lines.push(name);
                }
            }
            _ => {}
        }
    }

    let mut lines = Vec::new();
    if let Some(instructions) = node.get("recipeInstructions") {
        collect(instructions, &mut lines);
    }
    lines
}

fn video_field(node: &Value) -> Option<String> {
    let video = node.get("video")?;
    let object = match video {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match object {
        Value::String(_) => schema_text(object),
        Value::Object(map) => map.get("contentUrl").and_then(schema_text),
        _ => None,
    }
}

fn meal_type_field(node: &Value) -> Option<String> {
    match node.get("recipeCategory") {
        Some(Value::Array(items)) => items.first().and_then(schema_text),
        Some(other) => schema_text(other),
        None => None,
    }
}

/// Deterministic mapping from a Recipe-typed JSON-LD node to a record.
/// Image precedence (schema image vs. page image) is decided by the caller.
pub fn schema_to_recipe(
    node: &Value,
    url: &str,
    image_url: Option<String>,
    platform: &str,
    extracted_via: &str,
) -> Recipe {
    let title = schema_field(node, "name").unwrap_or_else(|| "Untitled Recipe".to_string());

    Recipe {
        title,
        description: schema_field(node, "description"),
        meal_type: meal_type_field(node),
        prep_time: duration_field(node, "prepTime"),
        cook_time: duration_field(node, "cookTime"),
        total_time: duration_field(node, "totalTime"),
        servings: servings_field(node),
        nutrition_calories: nutrition_field(node, "calories"),
        nutrition_protein: nutrition_field(node, "proteinContent"),
        nutrition_carbs: nutrition_field(node, "carbohydrateContent"),
        nutrition_fat: nutrition_field(node, "fatContent"),
        source_platform: platform.to_string(),
        source_url: url.to_string(),
        source_domain: ensure_domain(url),
        extracted_via: Some(extracted_via.to_string()),
        media_video_url: video_field(node),
        media_image_url: image_url,
        tags: tags_field(node),
        ingredients: ingredients_from_lines(ingredient_lines(node)),
        instructions: instructions_from_lines(instruction_lines(node)),
        ..Recipe::default()
    }
}
