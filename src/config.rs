use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the trained latent-factor model artifact (JSON).
    /// When unset or unreadable the server runs cold-start only.
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Path to the asset catalog (JSON). When unset the built-in rule table is used.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Number of recommendations returned when the request does not say
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Upper bound accepted for a request's `top_k`
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_k() -> usize {
    5
}

fn default_max_top_k() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: None,
            catalog_path: None,
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.max_top_k >= 1, "MAX_TOP_K must be at least 1");
        anyhow::ensure!(
            (1..=self.max_top_k).contains(&self.default_top_k),
            "DEFAULT_TOP_K must be between 1 and MAX_TOP_K ({}), got {}",
            self.max_top_k,
            self.default_top_k
        );
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
