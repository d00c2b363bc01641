mod project;
mod remote_project;

pub use project::{Project, UNKNOWN_NAME};
pub use remote_project::parse_remote_project;
