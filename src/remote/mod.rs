mod gitlab;

pub use gitlab::GitlabClient;

use serde_json::Value;

use crate::errors::Result;

/// A paginated source of raw project listing items
pub trait ProjectSource {
    /// Fetch one page of items, left as raw JSON for the caller to normalize
    async fn list_projects(&self, per_page: u32, page: u32) -> Result<Vec<Value>>;
}
