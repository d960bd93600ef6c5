use crate::errors::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static PLACEHOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)your[-_]?(project|supabase|anon|backend|key|url)").expect("valid regex"),
        Regex::new(r"(?i)\b(placeholder|changeme|example)\b").expect("valid regex"),
        Regex::new(r"^<.*>$").expect("valid regex"),
    ]
});

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/]+").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistenceMode {
    Local,
    Remote,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// True when both connection parameters are present and neither is a
    /// template placeholder.
    pub fn is_configured(&self) -> bool {
        let url = self.url.trim();
        let key = self.anon_key.trim();
        if url.is_empty() || key.is_empty() {
            return false;
        }
        if !HTTP_URL.is_match(url) {
            return false;
        }
        !is_placeholder(url) && !is_placeholder(key)
    }

    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_PATTERNS.iter().any(|pattern| pattern.is_match(value))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: Option<BackendConfig>,
    pub simulate_latency: bool,
    pub log_filter: String,
    pub reminders: ReminderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".zirtually"),
            backend: None,
            simulate_latency: false,
            log_filter: "info".to_string(),
            reminders: ReminderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the optional YAML file, then lets the process environment
    /// override individual values.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = fs::read_to_string(path)?;
                serde_yaml::from_str::<AppConfig>(&raw)?
            }
            Some(path) => {
                return Err(AppError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )))
            }
            None => AppConfig::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| names.iter().find_map(|name| lookup(name));

        if let Some(dir) = first(&["ZIRTUALLY_DATA_DIR"]) {
            self.data_dir = PathBuf::from(dir);
        }

        let url = first(&["ZIRTUALLY_BACKEND_URL", "SUPABASE_URL"]);
        let key = first(&["ZIRTUALLY_BACKEND_ANON_KEY", "SUPABASE_ANON_KEY"]);
        if url.is_some() || key.is_some() {
            let mut backend = self.backend.clone().unwrap_or_default();
            if let Some(url) = url {
                backend.url = url;
            }
            if let Some(key) = key {
                backend.anon_key = key;
            }
            self.backend = Some(backend);
        }

        if let Some(flag) = first(&["ZIRTUALLY_SIMULATE_LATENCY"]) {
            self.simulate_latency = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(filter) = first(&["ZIRTUALLY_LOG"]) {
            self.log_filter = filter;
        }
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        match &self.backend {
            Some(backend) if backend.is_configured() => PersistenceMode::Remote,
            _ => PersistenceMode::Local,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("local_storage.sqlite")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
