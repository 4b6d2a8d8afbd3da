pub mod config;
pub mod error;
pub mod fetch;
pub mod importers;
pub mod model;
pub mod openai;
pub mod schema;
pub mod text;

pub use config::Settings;
pub use error::ImportError;
pub use importers::Importer;
pub use model::{Ingredient, Instruction, Recipe};

use serde_json::Value;

/// Import a recipe from an arbitrary web page URL.
pub async fn import_web(url: &str) -> Result<Value, ImportError> {
    Importer::new()?.import_web(url).await
}

/// Import a recipe from a Pinterest pin URL, resolving the pin's destination
/// page first.
pub async fn import_pinterest(url: &str) -> Result<Value, ImportError> {
    Importer::new()?.import_pinterest(url).await
}
