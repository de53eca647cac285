use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RequestConfig;

pub const DEFAULT_BASE_URL: &str = "https://apifox.evanfang.com.cn";

pub const TIMEOUT_MIN_MS: u64 = 1_000;
pub const TIMEOUT_MAX_MS: u64 = 60_000;
pub const TIMEOUT_DEFAULT_MS: u64 = 10_000;

pub const RETRIES_MIN: u32 = 0;
pub const RETRIES_MAX: u32 = 5;
pub const RETRIES_DEFAULT: u32 = 2;

pub const ENV_BASE_URL: &str = "APIFOX_BASE_URL";
pub const ENV_TIMEOUT: &str = "APIFOX_TIMEOUT";
pub const ENV_RETRIES: &str = "APIFOX_RETRIES";
pub const ENV_API_KEY: &str = "APIFOX_API_KEY";

/// Global configuration loaded from `~/.config/apifox-mcp/config.toml`,
/// then overridden by `APIFOX_*` environment variables.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Apifox docs host; request URLs are `{base_url}/apidoc/shared/{key}/...`.
    pub base_url: String,
    /// Default per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Default number of retries after the first attempt.
    pub retries: u32,
    /// Default key (UUID or share URL) used when a call names none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: TIMEOUT_DEFAULT_MS,
            retries: RETRIES_DEFAULT,
            api_key: None,
        }
    }
}

// The key grants read access to a doc, so it never reaches the logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("retries", &self.retries)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Per-call overrides from a tool call or CLI flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
}

impl AppConfig {
    /// Apply `APIFOX_*` overrides read through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = var(ENV_BASE_URL) {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = var(ENV_TIMEOUT) {
            self.timeout_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{} is not an integer: {:?}", ENV_TIMEOUT, raw))?;
        }
        if let Some(raw) = var(ENV_RETRIES) {
            self.retries = raw
                .trim()
                .parse()
                .with_context(|| format!("{} is not an integer: {:?}", ENV_RETRIES, raw))?;
        }
        if let Some(key) = var(ENV_API_KEY) {
            self.api_key = Some(key.trim().to_string());
        }
        Ok(())
    }

    /// Check ranges and the base URL; reports every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if !(TIMEOUT_MIN_MS..=TIMEOUT_MAX_MS).contains(&self.timeout_ms) {
            errors.push(format!(
                "timeout must be between {} and {} ms, got {}",
                TIMEOUT_MIN_MS, TIMEOUT_MAX_MS, self.timeout_ms
            ));
        }
        if !(RETRIES_MIN..=RETRIES_MAX).contains(&self.retries) {
            errors.push(format!(
                "retries must be between {} and {}, got {}",
                RETRIES_MIN, RETRIES_MAX, self.retries
            ));
        }
        match url::Url::parse(&self.base_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            _ => errors.push(format!(
                "base_url must be a valid http(s) URL, got {:?}",
                self.base_url
            )),
        }
        if !errors.is_empty() {
            anyhow::bail!("invalid configuration:\n{}", errors.join("\n"));
        }
        Ok(())
    }

    pub fn has_default_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Merge per-call overrides with the defaults, clamping into the allowed ranges.
    pub fn request_config(&self, overrides: RequestOverrides) -> RequestConfig {
        let timeout_ms = overrides
            .timeout_ms
            .unwrap_or(self.timeout_ms)
            .clamp(TIMEOUT_MIN_MS, TIMEOUT_MAX_MS);
        let retries = overrides
            .retries
            .unwrap_or(self.retries)
            .clamp(RETRIES_MIN, RETRIES_MAX);
        if overrides.timeout_ms.is_some_and(|t| t != timeout_ms)
            || overrides.retries.is_some_and(|r| r != retries)
        {
            tracing::debug!(timeout_ms, retries, "request overrides clamped");
        }
        // timeout_ms >= TIMEOUT_MIN_MS, so the budget is never zero.
        RequestConfig::new(Duration::from_millis(timeout_ms), retries).unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("apifox-mcp")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`, creating a default file if none exists.
pub fn load_or_init_at(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let default_cfg = AppConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: AppConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Full load: config file, environment overrides, validation.
pub fn load() -> Result<AppConfig> {
    let mut cfg = load_or_init_at(&config_path()?)?;
    cfg.apply_env(|name| std::env::var(name).ok())?;
    cfg.validate()?;
    tracing::info!(
        base_url = %cfg.base_url,
        timeout_ms = cfg.timeout_ms,
        retries = cfg.retries,
        has_default_key = cfg.has_default_key(),
        "configuration loaded"
    );
    Ok(cfg)
}
