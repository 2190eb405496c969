use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable consulted for the Gemini API key when the config has none
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Name reported by the health and readiness endpoints
    pub service_name: String,
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Generation provider settings
    pub gemini: GeminiConfig,
    /// Recipe history settings
    pub history: HistoryConfig,
}

/// HTTP listener configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port (the plain `PORT` variable takes precedence)
    pub port: u16,
    /// Directory holding index.html, robots.txt, sitemap.xml and friends
    pub static_dir: String,
}

/// Configuration for the Google Gemini provider
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (can also be set via `GEMINI_API_KEY`)
    pub api_key: Option<String>,
    /// Model identifier (e.g., "gemini-2.0-flash")
    pub model: String,
    /// API root, overridable for proxies and tests
    pub base_url: String,
    /// Temperature for generation (0.0-1.0); provider default when unset
    pub temperature: Option<f32>,
    /// Maximum tokens to generate; provider default when unset
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Attempts per generation request, 1 disables retrying
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (grows linearly)
    pub retry_delay_ms: u64,
}

/// Configuration for the file-backed recipe history used by the CLI
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    /// Directory holding the history slot
    pub path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "chomptron".to_string(),
            server: ServerConfig::default(),
            gemini: GeminiConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "static".to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: None,
            max_tokens: None,
            timeout: 60,
            retry_attempts: 1,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: "chomptron-history".to_string(),
        }
    }
}

impl GeminiConfig {
    /// Resolve the API key: config first, then the `GEMINI_API_KEY` environment variable.
    ///
    /// Empty values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_or(|| std::env::var(GEMINI_API_KEY_VAR).ok())
    }

    fn resolve_api_key_or(&self, fallback: impl FnOnce() -> Option<String>) -> Option<String> {
        let non_blank = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(non_blank)
            .or_else(|| fallback().filter(non_blank))
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. `PORT` for the listener port
    /// 2. Environment variables with CHOMPTRON__ prefix
    /// 3. chomptron.toml file in current directory
    /// 4. Default values
    ///
    /// Environment variable format: CHOMPTRON__GEMINI__MODEL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("chomptron").required(false))
            // Use double underscore for nested: CHOMPTRON__SERVER__STATIC_DIR
            .add_source(
                Environment::with_prefix("CHOMPTRON")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {port}")))?;
        }

        Ok(config)
    }
}
