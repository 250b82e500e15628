#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, RetryPolicy};
use crate::utils::error::{CrowdingError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_url, Validate,
};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const MAX_TIMEOUT_MS: u64 = 600_000;
pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_BACKOFF_MULTIPLIER: f32 = 1.0;

/// 最終生效的設定：預設值 ← TOML 檔 ← 命令列參數
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub backoff_multiplier: f32,
    pub discard_stale: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            discard_stale: true,
        }
    }
}

impl ClientSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut settings = Self::default();

        if let Some(server) = &config.server {
            if let Some(scheme) = &server.scheme {
                settings.scheme = scheme.clone();
            }
            if let Some(host) = &server.host {
                settings.host = host.clone();
            }
            if let Some(port) = server.port {
                settings.port = port;
            }
        }

        if let Some(retry) = &config.retry {
            settings.timeout_ms = retry.timeout_ms.unwrap_or(settings.timeout_ms);
            settings.max_retries = retry.max_retries.unwrap_or(settings.max_retries);
            settings.backoff_multiplier = retry
                .backoff_multiplier
                .unwrap_or(settings.backoff_multiplier);
        }

        if let Some(discard) = config.session.as_ref().and_then(|s| s.discard_stale) {
            settings.discard_stale = discard;
        }

        settings
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &cli::CliConfig) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = cli.max_retries {
            self.max_retries = max_retries;
        }
        if let Some(multiplier) = cli.backoff_multiplier {
            self.backoff_multiplier = multiplier;
        }
        if cli.keep_stale {
            self.discard_stale = false;
        }
    }

    /// 讀取 `--config` 指定的檔案 (若有) 並套用命令列覆蓋
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &cli::CliConfig) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_toml(&TomlConfig::from_file(path)?)
            }
            None => Self::default(),
        };
        settings.apply_cli_overrides(cli);
        Ok(settings)
    }
}

impl ConfigProvider for ClientSettings {
    fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.timeout_ms),
            self.max_retries,
            self.backoff_multiplier,
        )
    }

    fn discard_stale(&self) -> bool {
        self.discard_stale
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        validate_url("server", &self.base_url())?;
        validate_range("retry.timeout_ms", self.timeout_ms, 1, MAX_TIMEOUT_MS)?;
        validate_range("retry.max_retries", self.max_retries, 0, 5)?;
        if !self.backoff_multiplier.is_finite() {
            return Err(CrowdingError::InvalidConfigValueError {
                field: "retry.backoff_multiplier".to_string(),
                value: self.backoff_multiplier.to_string(),
                reason: "Value must be a finite number".to_string(),
            });
        }
        validate_range("retry.backoff_multiplier", self.backoff_multiplier, 0.0, 10.0)?;
        Ok(())
    }
}
