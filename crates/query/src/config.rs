use thiserror::Error;

pub const DEFAULT_DATABASE: &str = "neo4j";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub neo4j: Neo4jConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl QueryConfig {
    /// Read from the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| value(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            neo4j: Neo4jConfig {
                uri: required("NEO4J_URI")?,
                user: required("NEO4J_USER")?,
                password: required("NEO4J_PASSWORD")?,
                database: value("NEO4J_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            },
            gemini: GeminiConfig {
                api_key: required("GEMINI_API_KEY")?,
                model: value("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: value("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            },
        })
    }
}
