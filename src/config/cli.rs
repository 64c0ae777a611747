use crate::config::{
    default_user_agent, FileConfig, DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_CLIENT_TIMEOUT_SECS,
    DEFAULT_UPSTREAM_ENDPOINT, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

pub use crate::core::render::OutputFormat;

#[derive(Debug, Clone, Parser)]
#[command(name = "uni-explorer")]
#[command(about = "Search universities by country and state/province")]
pub struct CliConfig {
    #[arg(short, long, help = "Country to search, e.g. \"Canada\"")]
    pub country: Option<String>,

    #[arg(short, long, help = "Optional state/province substring filter")]
    pub state: Option<String>,

    #[arg(long, help = "Deployed proxy function URL; runs the proxy in-process when omitted")]
    pub proxy_url: Option<String>,

    #[arg(long, help = "University directory search endpoint")]
    pub upstream_url: Option<String>,

    #[arg(long, help = "Upstream request timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Proxy request timeout in seconds")]
    pub client_timeout_secs: Option<u64>,

    #[arg(long, help = "User-Agent sent to the university directory")]
    pub user_agent: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Write results to a file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(skip = DEFAULT_CACHE_MAX_AGE_SECS)]
    pub cache_max_age_secs: u64,

    #[arg(skip = default_user_agent())]
    default_user_agent: String,
}

impl CliConfig {
    /// 以設定檔補齊命令列未指定的欄位
    pub fn merge_file(&mut self, file: &FileConfig) {
        if self.proxy_url.is_none() {
            self.proxy_url = file.proxy_url().map(str::to_string);
        }
        if self.upstream_url.is_none() {
            self.upstream_url = file.upstream_endpoint().map(str::to_string);
        }
        if self.timeout_secs.is_none() {
            self.timeout_secs = file.upstream_timeout_secs();
        }
        if self.client_timeout_secs.is_none() {
            self.client_timeout_secs = file.client_timeout_secs();
        }
        if self.user_agent.is_none() {
            self.user_agent = file.user_agent().map(str::to_string);
        }
        if let Some(max_age) = file.cache_max_age_secs() {
            self.cache_max_age_secs = max_age;
        }
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(
            self.client_timeout_secs
                .unwrap_or(DEFAULT_CLIENT_TIMEOUT_SECS),
        )
    }
}

impl ConfigProvider for CliConfig {
    fn upstream_endpoint(&self) -> &str {
        self.upstream_url
            .as_deref()
            .unwrap_or(DEFAULT_UPSTREAM_ENDPOINT)
    }

    fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS))
    }

    fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(&self.default_user_agent)
    }

    fn cache_max_age_secs(&self) -> u64 {
        self.cache_max_age_secs
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        // 國家為必填，空白值交給搜尋流程回報 InvalidInput
        validation::validate_required_field("country", &self.country)?;

        validation::validate_url("upstream_url", self.upstream_endpoint())?;
        if let Some(url) = &self.proxy_url {
            validation::validate_url("proxy_url", url)?;
        }
        if let Some(secs) = self.timeout_secs {
            validation::validate_timeout_secs("timeout_secs", secs)?;
        }
        if let Some(secs) = self.client_timeout_secs {
            validation::validate_timeout_secs("client_timeout_secs", secs)?;
        }
        validation::validate_non_empty_string("user_agent", self.user_agent())?;
        Ok(())
    }
}
