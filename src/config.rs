use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Search engine base URL
    #[serde(default = "default_elastic_url")]
    pub elastic_url: String,

    /// Index holding the board game catalog
    #[serde(default = "default_elastic_index")]
    pub elastic_index: String,

    /// Search engine basic auth username
    #[serde(default = "default_elastic_username")]
    pub elastic_username: String,

    /// Search engine basic auth password; auth is skipped when unset
    pub elastic_password: Option<String>,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Assistant service endpoint for game conversations
    #[serde(default = "default_assistant_url")]
    pub assistant_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_elastic_url() -> String {
    "https://localhost:9200".to_string()
}

fn default_elastic_index() -> String {
    "bgg".to_string()
}

fn default_elastic_username() -> String {
    "elastic".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_assistant_url() -> String {
    "http://localhost:8000/ask".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
