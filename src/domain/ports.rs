use crate::utils::error::{SearchError, UpstreamError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// 代理函式對上游目錄服務的單次查詢
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn search(&self, country: &str) -> std::result::Result<Vec<Value>, UpstreamError>;
}

/// 代理函式回給呼叫端的原始狀態碼與內容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyReply {
    pub status: u16,
    pub body: String,
}

/// 搜尋流程呼叫代理函式的介面
///
/// 傳輸層失敗 (逾時、連線錯誤) 以 `SearchError::NetworkFailure` 回報，
/// 其他狀況一律回傳 `ProxyReply` 交給呼叫端判讀。
#[async_trait]
pub trait UniversitySource: Send + Sync {
    async fn fetch(&self, country: &str) -> std::result::Result<ProxyReply, SearchError>;
}

pub trait ConfigProvider: Send + Sync {
    fn upstream_endpoint(&self) -> &str;
    fn upstream_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn cache_max_age_secs(&self) -> u64;
}
