use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up when `FOLIO_SERVICE_CONFIG` is not set, without extension.
pub const DEFAULT_CONFIG_NAME: &str = "config/default";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub chrome: ChromeConfig,
    /// Directory relative paths are resolved against (set during loading)
    #[serde(skip)]
    base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Content JSON, read once at startup.
    pub content: PathBuf,
    /// Name offered in `Content-Disposition`.
    pub filename: String,
    pub max_concurrent_generations: usize,
    pub timeout_secs: u64,
    pub asset_base_url: Option<String>,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChromeConfig {
    pub executable: Option<PathBuf>,
    pub sandbox: bool,
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Loads `FOLIO_SERVICE_CONFIG` (or `config/default`) if present, then
    /// layers `FOLIO_SERVICE__SECTION__KEY` environment variables on top.
    pub fn load() -> Result<Self, config::ConfigError> {
        let name = std::env::var("FOLIO_SERVICE_CONFIG")
            .ok()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string());
        Self::load_from(&name)
    }

    /// Loads the config file `name` (without extension) over the built-in defaults.
    pub fn load_from(name: &str) -> Result<Self, config::ConfigError> {
        let config_file = PathBuf::from(format!("{}.toml", name));
        // `<base>/config/default.toml` resolves paths against `<base>`.
        let base_path = if config_file.exists() {
            config_file
                .parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        } else {
            None
        };

        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("generation.content", "content/document.json")?
            .set_default("generation.filename", "document.pdf")?
            .set_default("generation.max_concurrent_generations", 2)?
            .set_default("generation.timeout_secs", 60)?
            .set_default("generation.stylesheets", Vec::<String>::new())?
            .set_default("generation.scripts", Vec::<String>::new())?
            .set_default("chrome.sandbox", true)?
            .add_source(config::File::with_name(name).required(false))
            .add_source(config::Environment::with_prefix("FOLIO_SERVICE").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.base_path = base_path;
        config.resolve_paths();
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self) {
        if let Some(base) = &self.base_path
            && self.generation.content.is_relative()
        {
            self.generation.content = base.join(&self.generation.content);
        }
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.generation.max_concurrent_generations == 0 {
            return Err(config::ConfigError::Message(
                "generation.max_concurrent_generations must be at least 1".to_string(),
            ));
        }
        if self.generation.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "generation.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.generation.filename.contains('"') {
            return Err(config::ConfigError::Message(
                "generation.filename must not contain quotes".to_string(),
            ));
        }
        Ok(())
    }
}
