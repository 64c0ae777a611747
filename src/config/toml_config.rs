use crate::utils::error::{ExplorerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 設定檔內容，所有欄位皆可省略，命令列參數優先
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub upstream: Option<UpstreamSection>,
    pub proxy: Option<ProxySection>,
    pub client: Option<ClientSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamSection {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxySection {
    /// 已部署代理函式的網址；未設定時代理函式在本地執行
    pub url: Option<String>,
    pub cache_max_age_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSection {
    pub timeout_seconds: Option<u64>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExplorerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExplorerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PROXY_URL})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExplorerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn upstream_endpoint(&self) -> Option<&str> {
        self.upstream.as_ref()?.endpoint.as_deref()
    }

    pub fn upstream_timeout_secs(&self) -> Option<u64> {
        self.upstream.as_ref()?.timeout_seconds
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.upstream.as_ref()?.user_agent.as_deref()
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy.as_ref()?.url.as_deref()
    }

    pub fn cache_max_age_secs(&self) -> Option<u64> {
        self.proxy.as_ref()?.cache_max_age_seconds
    }

    pub fn client_timeout_secs(&self) -> Option<u64> {
        self.client.as_ref()?.timeout_seconds
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = self.upstream_endpoint() {
            validation::validate_url("upstream.endpoint", endpoint)?;
        }
        if let Some(url) = self.proxy_url() {
            validation::validate_url("proxy.url", url)?;
        }
        if let Some(secs) = self.upstream_timeout_secs() {
            validation::validate_timeout_secs("upstream.timeout_seconds", secs)?;
        }
        if let Some(secs) = self.client_timeout_secs() {
            validation::validate_timeout_secs("client.timeout_seconds", secs)?;
        }
        Ok(())
    }
}
