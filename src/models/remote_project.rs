use serde_json::Value;

use super::{Project, UNKNOWN_NAME};

/// One project item from a remote listing, normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProject {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RemoteProject {
    pub fn into_project(self) -> Project {
        Project {
            id: self.id,
            name: self.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            description: self.description,
        }
    }
}

/// Parse a single listing item.
///
/// Returns `None` when the item is not an object or has no integer id.
/// Ids given as integral floats or numeric strings are accepted; `name` and
/// `description` are only taken when they are strings, and an empty name
/// counts as missing.
pub fn parse_remote_project(item: &Value) -> Option<RemoteProject> {
    let fields = item.as_object()?;
    let id = fields.get("id").and_then(parse_id)?;

    Some(RemoteProject {
        id,
        name: string_field(fields.get("name")).filter(|name| !name.is_empty()),
        description: string_field(fields.get("description")),
    })
}

// 2^63, the first float past i64::MAX; `as` would saturate at or above it
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < I64_UPPER_BOUND)
            .map(|f| f as i64),
        // Integers beyond i64 are rejected rather than clamped
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}
