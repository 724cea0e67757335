// src/environment.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://cari-magang-be-production.up.railway.app";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub session_path: PathBuf,
    pub log_path: PathBuf,
}

/// One environment section of `config.yaml`; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigSection {
    api_url: Option<String>,
    timeout_seconds: Option<u64>,
    page_size: Option<u32>,
    search_debounce_ms: Option<u64>,
    session_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: ConfigSection,
    #[serde(default)]
    production: ConfigSection,
}

/// A missing `.env` is fine; one that exists but cannot be read or parsed is not.
fn dotenv_loaded<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env"),
    }
}

impl ClientConfig {
    /// Load configuration for the current environment from `.env`, the optional
    /// config file and `JOB_BOARD_API_URL`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        dotenv_loaded(dotenvy::dotenv())?;

        let environment = Self::environment_name();

        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config.yaml"));

        let section = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::section_for(&content, &environment)?
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        } else {
            ConfigSection::default()
        };

        let api_url_override = std::env::var("JOB_BOARD_API_URL").ok();
        Self::resolve(section, api_url_override)
    }

    /// `CARIMAGANG_ENV`, then `ENVIRONMENT`, then `ENV`; `local` when none is set.
    pub fn environment_name() -> String {
        std::env::var("CARIMAGANG_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn section_for(content: &str, environment: &str) -> Result<ConfigSection> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn resolve(section: ConfigSection, api_url_override: Option<String>) -> Result<Self> {
        let api_url = api_url_override
            .filter(|u| !u.trim().is_empty())
            .or(section.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            anyhow::bail!("api_url must not be empty");
        }

        let session_path = match section.session_path {
            Some(path) => path,
            None => Self::state_dir()?.join("session.json"),
        };
        let log_path = match section.log_path {
            Some(path) => path,
            None => Self::state_dir()?.join("carimagang.log"),
        };

        Ok(Self {
            api_url,
            timeout_seconds: section.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
            page_size: section.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
            search_debounce_ms: section
                .search_debounce_ms
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
            session_path,
            log_path,
        })
    }

    fn state_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".carimagang"))
            .context("Home directory not found; set session_path and log_path in config.yaml")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  api_url: http://localhost:5000/
  page_size: 20
  session_path: /tmp/cm/session.json
  log_path: /tmp/cm/cm.log
production:
  timeout_seconds: 5
  session_path: /var/lib/cm/session.json
  log_path: /var/log/cm.log
"#;

    #[test]
    fn picks_section_by_environment() {
        let local = ClientConfig::resolve(ClientConfig::section_for(SAMPLE, "local").unwrap(), None)
            .unwrap();
        assert_eq!(local.api_url, "http://localhost:5000");
        assert_eq!(local.page_size, 20);
        assert_eq!(local.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(local.session_path, PathBuf::from("/tmp/cm/session.json"));

        let prod = ClientConfig::resolve(
            ClientConfig::section_for(SAMPLE, "production").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(prod.api_url, DEFAULT_API_URL);
        assert_eq!(prod.timeout_seconds, 5);
        assert_eq!(prod.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(prod.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn env_override_wins_over_file() {
        let section = ClientConfig::section_for(SAMPLE, "local").unwrap();
        let config =
            ClientConfig::resolve(section, Some("https://api.example.com/".to_string())).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
    }

    #[test]
    fn blank_api_url_is_rejected() {
        let section = ConfigSection {
            api_url: Some(" / ".to_string()),
            session_path: Some(PathBuf::from("s.json")),
            log_path: Some(PathBuf::from("l.log")),
            ..ConfigSection::default()
        };
        assert!(ClientConfig::resolve(section, None).is_err());
    }

    #[test]
    fn missing_dotenv_is_ignored_but_malformed_is_not() {
        let dir = tempfile::tempdir().unwrap();
        assert!(dotenv_loaded(dotenvy::from_path(dir.path().join(".env"))).is_ok());

        let broken = dir.path().join("broken.env");
        std::fs::write(&broken, "this is not valid\n").unwrap();
        assert!(dotenv_loaded(dotenvy::from_path(&broken)).is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(ClientConfig::section_for("local: [unclosed", "local").is_err());
    }
}
