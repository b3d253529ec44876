use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the tracking API.
    pub api_base_url: String,
    /// Per-request timeout for gateway calls.
    pub request_timeout_ms: u64,
    /// Cadence of the background feed poll while tracking.
    pub poll_interval_ms: u64,
    /// Cadence of the reveal auto-advance while playing.
    pub advance_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 10_000,
            poll_interval_ms: 30_000,
            advance_interval_ms: 2_000,
        }
    }
}

pub fn load_config() -> AppConfig {
    let path = config_path();
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    toml::from_str(&contents).unwrap_or_default()
}

pub fn save_config(config: &AppConfig) -> std::io::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).unwrap_or_default();
    std::fs::write(path, contents)
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("COMMITDECK_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("COMMITDECK_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("Commitdeck");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("Commitdeck");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("commitdeck");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("commitdeck");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".commitdeck")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn config_roundtrip_via_env_path() {
        let tmp_file = NamedTempFile::new().unwrap();
        let path = tmp_file.path().to_path_buf();
        let prev = std::env::var_os("COMMITDECK_CONFIG_PATH");
        unsafe {
            std::env::set_var("COMMITDECK_CONFIG_PATH", &path);
        }

        let config = AppConfig {
            api_base_url: "http://example.test:9000".to_string(),
            poll_interval_ms: 5_000,
            ..Default::default()
        };
        save_config(&config).unwrap();

        let loaded = load_config();
        assert_eq!(loaded.api_base_url, "http://example.test:9000");
        assert_eq!(loaded.poll_interval_ms, 5_000);
        assert_eq!(loaded.advance_interval_ms, 2_000);

        match prev {
            Some(value) => unsafe {
                std::env::set_var("COMMITDECK_CONFIG_PATH", value);
            },
            None => unsafe {
                std::env::remove_var("COMMITDECK_CONFIG_PATH");
            },
        }
    }

    #[test]
    fn defaults_match_reference_behavior() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.poll_interval_ms, 30_000);
        assert_eq!(config.advance_interval_ms, 2_000);
    }
}
