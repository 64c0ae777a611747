use crate::domain::ports::{DirectoryClient, ProxyReply, UniversitySource};
use crate::utils::error::{Result, SearchError, UpstreamError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// 上游大學目錄服務 (hipolabs) 的 HTTP 客戶端
#[derive(Debug, Clone)]
pub struct HipolabsClient {
    client: Client,
    endpoint: String,
}

impl HipolabsClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl DirectoryClient for HipolabsClient {
    async fn search(&self, country: &str) -> std::result::Result<Vec<Value>, UpstreamError> {
        tracing::debug!("Making upstream request to: {} (country={})", self.endpoint, country);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("country", country)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Upstream response status: {}", status);

        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        match response.json::<Value>().await? {
            Value::Array(items) => Ok(items),
            other => Err(UpstreamError::Malformed(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// 透過 HTTP 呼叫已部署的代理函式
#[derive(Debug, Clone)]
pub struct ProxyHttpClient {
    client: Client,
    proxy_url: String,
}

impl ProxyHttpClient {
    pub fn new(proxy_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            proxy_url: proxy_url.into(),
        })
    }
}

#[async_trait]
impl UniversitySource for ProxyHttpClient {
    async fn fetch(&self, country: &str) -> std::result::Result<ProxyReply, SearchError> {
        tracing::debug!("Calling proxy: {} (country={})", self.proxy_url, country);

        let response = self
            .client
            .get(&self.proxy_url)
            .query(&[("country", country)])
            .send()
            .await
            .map_err(|e| network_failure(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| network_failure(&e))?;

        Ok(ProxyReply { status, body })
    }
}

fn network_failure(e: &reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::NetworkFailure("request to proxy timed out".to_string())
    } else {
        SearchError::NetworkFailure(format!("no response from proxy: {}", e))
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
