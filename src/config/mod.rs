use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

const DEVELOPMENT: &str = "development";

fn default_port() -> u16 {
    5000
}

fn default_app_env() -> String {
    "production".to_string()
}

fn default_api_url() -> String {
    "http://localhost:5000/graphql".to_string()
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL, only needed when serving from PostgreSQL
    pub database_url: Option<String>,

    /// Port the GraphQL server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment; `development` turns on GraphiQL
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// GraphQL endpoint the terminal client talks to
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        Self::from_pairs(std::env::vars())
    }

    /// Build a configuration from explicit key/value pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config =
            envy::from_iter::<_, Config>(pairs).context("invalid environment configuration")?;
        Ok(config)
    }

    /// Get the database URL, failing when it was never configured
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set unless the server runs with --in-memory")
    }

    /// Whether the interactive GraphiQL explorer should be served
    pub fn graphiql_enabled(&self) -> bool {
        self.app_env.eq_ignore_ascii_case(DEVELOPMENT)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = Config::from_pairs(Vec::new()).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.app_env, "production");
        assert_eq!(config.api_url, "http://localhost:5000/graphql");
        assert!(config.database_url.is_none());
        assert!(!config.graphiql_enabled());
    }

    #[test]
    fn test_values_read_from_environment_names() {
        let config = Config::from_pairs(pairs(&[
            ("DATABASE_URL", "postgres://localhost/tracker"),
            ("PORT", "8080"),
            ("APP_ENV", "development"),
        ]))
        .unwrap();

        assert_eq!(config.database_url().unwrap(), "postgres://localhost/tracker");
        assert_eq!(config.port, 8080);
        assert!(config.graphiql_enabled());
    }

    #[test]
    fn test_missing_database_url_is_an_error() {
        let config = Config::from_pairs(Vec::new()).unwrap();
        let err = config.database_url().unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = Config::from_pairs(pairs(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }
}
