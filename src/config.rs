//! Configuration management for the research agent.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `TAVILY_API_KEY` - Required. Your Tavily search API key.
//! - `DEFAULT_MODEL` - Optional. The default LLM model to use. Defaults to `openai/gpt-4o-mini`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `10`.
//! - `SEARCH_MAX_RESULTS` - Optional. Maximum web search results per query. Defaults to `5`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter API key
    pub api_key: String,

    /// Tavily search API key
    pub tavily_api_key: String,

    /// Default LLM model identifier (OpenRouter format)
    pub default_model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// Maximum web search results per query
    pub search_max_results: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` or
    /// `TAVILY_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let tavily_api_key = std::env::var("TAVILY_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("TAVILY_API_KEY".to_string()))?;

        let default_model = std::env::var("DEFAULT_MODEL")
            .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

        let host = std::env::var("HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e)))?;

        let search_max_results = std::env::var("SEARCH_MAX_RESULTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("SEARCH_MAX_RESULTS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            api_key,
            tavily_api_key,
            default_model,
            host,
            port,
            max_iterations,
            search_max_results,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, tavily_api_key: String, default_model: String) -> Self {
        Self {
            api_key,
            tavily_api_key,
            default_model,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_iterations: 10,
            search_max_results: 5,
        }
    }
}
