use facecart_core::DEFAULT_IDENTITY;
use std::path::PathBuf;

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Face-recognition backend base URL, without trailing slash.
    pub base_url: String,
    /// Path to the SQLite order store.
    pub db_path: PathBuf,
    /// Identity used when none is supplied.
    pub default_name: String,
}

impl Config {
    /// Load configuration from `FACECART_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("facecart");

        let db_path = std::env::var("FACECART_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("orders.db"));

        Self {
            base_url: normalize_base_url(
                &std::env::var("FACECART_BASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            ),
            db_path,
            default_name: std::env::var("FACECART_DEFAULT_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IDENTITY.to_string()),
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
