use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Url};
use serde_json::Value;

use super::ProjectSource;
use crate::config::Config;
use crate::errors::{AppError, Result};

#[derive(Debug)]
pub struct GitlabClient {
    client: Client,
    base_url: Url,
}

impl GitlabClient {
    const TOKEN_HEADER: &'static str = "Private-Token";
    const PROJECTS_PATH: &'static str = "projects";

    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self> {
        Self::with_builder(Client::builder(), api_url, token)
    }

    fn with_builder(builder: ClientBuilder, api_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            headers.insert(Self::TOKEN_HEADER, value);
        }

        // A trailing slash keeps `join` from replacing the last path segment
        let base_url = Url::parse(&format!("{}/", api_url.trim_end_matches('/')))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("not a usable API base URL: {api_url}")));
        }

        Ok(Self {
            client: builder.default_headers(headers).build()?,
            base_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        if config.token().is_none() {
            tracing::warn!("PRIVATE_TOKEN is not set, only public projects will be listed");
        }
        Self::new(config.api_url(), config.token())
    }

    pub fn projects_url(&self, per_page: u32, page: u32) -> Result<Url> {
        let mut url = self.base_url.join(Self::PROJECTS_PATH)?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

impl ProjectSource for GitlabClient {
    async fn list_projects(&self, per_page: u32, page: u32) -> Result<Vec<Value>> {
        let url = self.projects_url(per_page, page)?;
        tracing::info!(%url, "Fetching projects from GitLab API...");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<Value>(&body)? {
            Value::Array(items) => {
                tracing::debug!(count = items.len(), "Received project listing");
                Ok(items)
            }
            other => Err(AppError::UnexpectedResponse(format!(
                "expected a JSON array of projects, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
