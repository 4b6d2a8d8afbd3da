use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Runtime settings for the importer.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// API key for the language-model fallback (can also come from the
    /// OPENAI_API_KEY environment variable)
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Model identifier used by the fallback extractor
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    /// HTTP timeout in seconds for page fetches
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Root directory for downloaded media
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("storage")
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            timeout: default_timeout(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl Settings {
    /// Load settings, with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPEFY__ prefix
    /// 2. config.toml file in the current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPEFY__OPENAI_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("RECIPEFY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut loaded: Settings = settings.try_deserialize()?;
        if loaded.openai_api_key.is_none() {
            loaded.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        Ok(loaded)
    }

    /// Resolve a path under the storage root, creating the directory (or the
    /// file's parent directory) as needed.
    pub fn storage_path<P: AsRef<Path>>(&self, parts: &[P], is_file: bool) -> io::Result<PathBuf> {
        let mut target = self.storage_dir.clone();
        for part in parts {
            target.push(part);
        }
        if is_file {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
        } else {
            fs::create_dir_all(&target)?;
        }
        Ok(target)
    }
}
