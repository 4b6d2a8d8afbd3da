use log::debug;
use scraper::{Html, Selector};
use serde_json::Value;

/// Parse every JSON-LD script block in the page into a generic value.
/// Malformed blocks are skipped so one corrupt script cannot hide the rest.
pub fn extract_json_ld_blocks(html: &str) -> Vec<Value> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script[type]").unwrap();

    let mut blocks = Vec::new();
    for script in document.select(&selector) {
        let is_json_ld = script
            .value()
            .attr("type")
            .map(|t| t.to_ascii_lowercase().contains("application/ld+json"))
            .unwrap_or(false);
        if !is_json_ld {
            continue;
        }

        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => blocks.push(value),
            Err(err) => debug!("Skipping malformed JSON-LD block: {err}"),
        }
    }
    blocks
}

fn is_recipe_node(node: &Value) -> bool {
    let Value::Object(map) = node else {
        return false;
    };
    match map.get("@type") {
        Some(Value::String(ty)) => ty.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .any(|entry| matches!(entry, Value::String(ty) if ty.eq_ignore_ascii_case("recipe"))),
        _ => false,
    }
}

/// Recursively collect every `"@type": "Recipe"` node in a JSON-LD value,
/// including nodes wrapped inside `@graph` containers. Discovery order is
/// preserved.
pub fn find_recipe_nodes(value: &Value) -> Vec<&Value> {
    let mut nodes = Vec::new();
    walk(value, &mut nodes);
    nodes
}

fn walk<'a>(value: &'a Value, nodes: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if is_recipe_node(value) {
                nodes.push(value);
            }
            if let Some(graph) = map.get("@graph") {
                walk(graph, nodes);
            }
            for (key, child) in map {
                if key != "@graph" {
                    walk(child, nodes);
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                walk(child, nodes);
            }
        }
        _ => {}
    }
}

fn field_missing(node: &Value, key: &str) -> bool {
    match node.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Pick the most complete candidate: fewest missing fields among `name`,
/// `recipeIngredient` and `recipeInstructions`, first match winning ties.
pub fn pick_best_recipe<'a>(nodes: &[&'a Value]) -> Option<&'a Value> {
    let score = |node: &Value| -> usize {
        ["name", "recipeIngredient", "recipeInstructions"]
            .iter()
            .filter(|key| field_missing(node, key))
            .count()
    };

    nodes.iter().min_by_key(|node| score(node)).copied()
}

/// Normalize schema.org's image field, which may be a plain URL string, a
/// list of strings, an ImageObject, or a list of ImageObjects.
pub fn resolve_schema_image(node: &Value) -> Option<String> {
    fn url_of(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(map) => match map.get("url") {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            },
            _ => None,
        }
    }

    match node.get("image")? {
        Value::Array(items) => items.first().and_then(url_of),
        other => url_of(other),
    }
}

/// The trimmed `og:image` meta property of a page, if any.
pub fn extract_og_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[property="og:image"]"#).unwrap();
    document
        .select(&selector)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}
