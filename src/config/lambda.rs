use crate::config::{
    default_user_agent, DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_UPSTREAM_ENDPOINT,
    DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{ExplorerError, Result};
use crate::utils::validation::{self, Validate};
use std::env;
use std::time::Duration;

/// 代理函式在無伺服器環境中的設定，全部來自環境變數
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub upstream_endpoint: String,
    pub upstream_timeout_secs: u64,
    pub user_agent: String,
    pub cache_max_age_secs: u64,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            upstream_endpoint: DEFAULT_UPSTREAM_ENDPOINT.to_string(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
        }
    }
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// 以任意查詢函式讀取設定，方便測試時不動到行程環境變數
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            upstream_endpoint: lookup("UPSTREAM_ENDPOINT").unwrap_or(defaults.upstream_endpoint),
            upstream_timeout_secs: parse_number(
                "UPSTREAM_TIMEOUT_SECS",
                lookup("UPSTREAM_TIMEOUT_SECS"),
                defaults.upstream_timeout_secs,
            )?,
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
            cache_max_age_secs: parse_number(
                "CACHE_MAX_AGE_SECS",
                lookup("CACHE_MAX_AGE_SECS"),
                defaults.cache_max_age_secs,
            )?,
        })
    }
}

fn parse_number(field: &str, raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ExplorerError::InvalidConfigValueError {
                field: field.to_string(),
                value: value.clone(),
                reason: "Value must be a non-negative integer".to_string(),
            }),
    }
}

impl ConfigProvider for LambdaConfig {
    fn upstream_endpoint(&self) -> &str {
        &self.upstream_endpoint
    }

    fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn cache_max_age_secs(&self) -> u64 {
        self.cache_max_age_secs
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        // 驗證上游端點
        validation::validate_url("upstream_endpoint", &self.upstream_endpoint)?;

        // 驗證逾時
        validation::validate_timeout_secs("upstream_timeout_secs", self.upstream_timeout_secs)?;

        validation::validate_non_empty_string("user_agent", &self.user_agent)?;

        tracing::debug!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
