use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
/// Resolved against the working directory. No artifacts ship under this name;
/// `models/demo` holds a small pair for a first run.
pub const DEFAULT_ARTIFACTS_DIR: &str = "static";

/// Where to listen, where to load the model artifacts from, and how large a
/// request body may be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifacts_dir: PathBuf,
    /// Maximum request body size in bytes. `None` accepts bodies of any size.
    pub max_body_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            max_body_bytes: None,
        }
    }
}
