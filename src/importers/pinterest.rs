use super::{schema_to_recipe, Importer};
use crate::error::ImportError;
use crate::schema::{
    extract_json_ld_blocks, extract_og_image, find_recipe_nodes, pick_best_recipe,
    resolve_schema_image,
};
use crate::text::ensure_domain;
use log::info;
use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

/// Find the external page a pin actually promotes.
///
/// Redirect-wrapper anchors (`…outgoing…url=…`) are the platform's own
/// declared destination and win outright; bare external links are only a
/// fallback, so the two passes must stay separate and in this order.
pub fn extract_destination_url(pin_html: &str) -> Option<String> {
    let document = Html::parse_document(pin_html);
    let selector = Selector::parse("a[href]").unwrap();

    for anchor in document.select(&selector) {
        let href = anchor.value().attr("href").unwrap_or_default();
        if href.contains("outgoing") && href.contains("url=") {
            if let Some(target) = wrapped_url_param(href) {
                return Some(target);
            }
        }
    }

    for anchor in document.select(&selector) {
        let href = anchor.value().attr("href").unwrap_or_default().trim();
        let href = if let Some(rest) = href.strip_prefix("//") {
            format!("https://{rest}")
        } else {
            href.to_string()
        };
        if !href.starts_with("http") {
            continue;
        }
        if let Ok(parsed) = Url::parse(&href) {
            let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
            if !host.contains("pinterest.") && !host.contains("pinimg.") {
                return Some(href);
            }
        }
    }

    None
}

/// The decoded `url=` query parameter of a redirect-wrapper link. The href
/// may be relative, so the query string is located by hand.
fn wrapped_url_param(href: &str) -> Option<String> {
    let query = href.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes()).find_map(|(key, value)| {
        if key == "url" && !value.is_empty() {
            Some(value.into_owned())
        } else {
            None
        }
    })
}

impl Importer {
    /// Import a recipe from a Pinterest pin, chasing through the pin's
    /// destination link before extracting.
    pub async fn import_pinterest(&self, url: &str) -> Result<Value, ImportError> {
        let pin_html = self.fetch_html(url).await?;
        let pin_image = extract_og_image(&pin_html);
        let destination_url = extract_destination_url(&pin_html);

        let recipe = match destination_url {
            None => {
                info!("No destination found for pin {url}, extracting from the pin page");
                self.recipe_from_page(url, &pin_html, pin_image, "pinterest", "openai_from_pinterest_pin")
                    .await?
            }
            Some(destination_url) => {
                info!("Pin {url} resolves to {destination_url}");
                let dest_html = self.fetch_html(&destination_url).await?;
                let dest_image = extract_og_image(&dest_html).or(pin_image);

                let blocks = extract_json_ld_blocks(&dest_html);
                let nodes: Vec<&Value> = blocks.iter().flat_map(find_recipe_nodes).collect();

                let mut recipe = match pick_best_recipe(&nodes) {
                    Some(node) => {
                        let image = resolve_schema_image(node).or(dest_image);
                        schema_to_recipe(node, url, image, "pinterest", "pinterest_destination_schema")
                    }
                    None => {
                        self.recipe_from_page(
                            url,
                            &dest_html,
                            dest_image,
                            "pinterest",
                            "pinterest_destination_openai",
                        )
                        .await?
                    }
                };

                recipe.metadata.insert(
                    "destinationUrl".to_string(),
                    Value::String(destination_url.clone()),
                );
                recipe.metadata.insert(
                    "destinationDomain".to_string(),
                    Value::String(ensure_domain(&destination_url)),
                );
                recipe
            }
        };

        Ok(recipe.into_payload())
    }
}
