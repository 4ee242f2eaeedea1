use std::path::PathBuf;

use thiserror::Error;

/// Environment variable holding the GIPHY API key.
pub const API_KEY_VAR: &str = "GIPHY_API_KEY";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("GIPHY_API_KEY is not set; add it to your environment or ~/.config/jiffy/.env")]
    MissingApiKey,
}

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/jiffy/.env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load .env files. Earlier files win because dotenvy does not overwrite
/// variables that are already set.
pub fn load_env_files() {
    for path in env_file_paths() {
        if path.exists()
            && let Err(e) = dotenvy::from_path(&path)
        {
            tracing::warn!(path = %path.display(), "failed to load .env file: {e}");
        }
    }
}

/// Load the GIPHY API key from the environment, trying .env files first.
pub fn load_api_key() -> Result<String, CredentialError> {
    load_env_files();
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String, CredentialError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(CredentialError::MissingApiKey)
}
