use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";
const DEFAULT_DATABASE_URL: &str = "sqlite://gitlab.db";

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the GitLab REST API, e.g. `https://gitlab.example.com/api/v4`
    #[serde(default = "default_api_url")]
    pub gitlab_api_url: String,

    /// Personal access token sent as the `Private-Token` header
    #[serde(default)]
    pub private_token: Option<String>,

    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if the file exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Deserialize configuration from an explicit set of variables
    #[cfg(test)]
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(vars)?)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn api_url(&self) -> &str {
        &self.gitlab_api_url
    }

    /// The access token, if one is configured and non-empty
    pub fn token(&self) -> Option<&str> {
        self.private_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Initialize environment variables and load configuration
pub fn init(database_url: Option<String>) -> Result<Config> {
    let mut config = Config::load()?;

    if let Some(url) = database_url {
        config.database_url = url;
    }

    Ok(config)
}
