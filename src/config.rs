use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base directory for the prompt store (`prompts/` and `tags.json`).
    pub data_dir: PathBuf,
    /// Bearer token required for mutating endpoints. Mutations are
    /// disabled entirely when unset.
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PROMPTVAULT_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8081);

        let data_dir = std::env::var("PROMPTVAULT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".promptvault")
            });

        let admin_token = std::env::var("PROMPTVAULT_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Self {
            port,
            data_dir,
            admin_token,
        }
    }
}
