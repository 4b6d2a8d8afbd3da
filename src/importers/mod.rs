mod pinterest;
mod web;

pub use pinterest::extract_destination_url;
pub use web::schema_to_recipe;

use crate::config::Settings;
use crate::error::ImportError;
use crate::fetch::PageFetcher;
use crate::model::Recipe;
use crate::openai::OpenAiExtractor;
use crate::text::extract_page_text;
use std::time::Duration;

/// Runs import pipelines. Each import call is a self-contained sequential
/// pipeline; instances hold no mutable state, so one `Importer` can serve
/// many concurrent requests.
pub struct Importer {
    settings: Settings,
    fetcher: PageFetcher,
}

impl Importer {
    pub fn new() -> Result<Self, ImportError> {
        Self::from_settings(Settings::load()?)
    }

    pub fn from_settings(settings: Settings) -> Result<Self, ImportError> {
        let fetcher = PageFetcher::new(Duration::from_secs(settings.timeout))?;
        Ok(Importer { settings, fetcher })
    }

    pub(crate) async fn fetch_html(&self, url: &str) -> Result<String, ImportError> {
        self.fetcher.fetch(url).await
    }

    /// Language-model fallback shared by all import strategies: renders the
    /// page to plain text and hands it to the extractor. The missing-API-key
    /// configuration error surfaces here, when the fallback is actually
    /// needed.
    pub(crate) async fn recipe_from_page(
        &self,
        page_url: &str,
        html: &str,
        image_url: Option<String>,
        platform: &str,
        extracted_via: &str,
    ) -> Result<Recipe, ImportError> {
        let extractor = OpenAiExtractor::from_settings(&self.settings)?;
        let page_text = extract_page_text(html);
        extractor
            .extract(page_url, &page_text, image_url, platform, extracted_via)
            .await
    }
}
