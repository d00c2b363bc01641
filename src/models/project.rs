use std::fmt;

/// Placeholder stored when the remote listing has no usable name
pub const UNKNOWN_NAME: &str = "unknown";

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Project {
    pub fn new(id: i64, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description,
        }
    }
}

// `[id] name - description`, with a missing description shown as `None`
impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {}",
            self.id,
            self.name,
            self.description.as_deref().unwrap_or("None")
        )
    }
}
