use crate::adapters::http::HipolabsClient;
use crate::core::{ConfigProvider, DirectoryClient, ProxyReply, UniversitySource};
use crate::utils::error::{Result, SearchError, UpstreamError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

const ALLOWED_METHODS: &str = "GET, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE_SECS: u64 = 86_400;

/// API gateway 格式的入站事件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl ProxyRequest {
    pub fn get(country: &str) -> Self {
        Self {
            http_method: Some("GET".to_string()),
            query_string_parameters: Some(HashMap::from([(
                "country".to_string(),
                country.to_string(),
            )])),
        }
    }

    pub fn preflight() -> Self {
        Self {
            http_method: Some("OPTIONS".to_string()),
            query_string_parameters: None,
        }
    }

    /// 未帶方法的事件視為 GET
    pub fn method(&self) -> String {
        self.http_method
            .as_deref()
            .unwrap_or("GET")
            .to_ascii_uppercase()
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters.as_ref()?.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    fn new(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());

        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    fn json(status_code: u16, body: &Value) -> Self {
        Self::new(status_code, body.to_string())
            .with_header("Content-Type", "application/json")
    }

    fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_string(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// 上游失敗時的統一回應內容：一律 200 並標記 degraded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedBody {
    pub results: Vec<Value>,
    pub degraded: bool,
    pub reason: String,
}

impl DegradedBody {
    pub fn from_upstream(error: &UpstreamError) -> Self {
        let failure = if error.is_network() {
            SearchError::NetworkFailure(error.to_string())
        } else {
            SearchError::UpstreamFailure(error.to_string())
        };

        Self {
            results: Vec::new(),
            degraded: true,
            reason: failure.reason().to_string(),
        }
    }
}

/// 代理函式：驗證請求、轉發到上游目錄服務，並正規化所有失敗
pub struct ProxyFunction<D: DirectoryClient> {
    client: D,
    timeout: Duration,
    cache_max_age_secs: u64,
}

impl ProxyFunction<HipolabsClient> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = HipolabsClient::new(
            config.upstream_endpoint(),
            config.upstream_timeout(),
            config.user_agent(),
        )?;

        Ok(Self::new(
            client,
            config.upstream_timeout(),
            config.cache_max_age_secs(),
        ))
    }
}

impl<D: DirectoryClient> ProxyFunction<D> {
    pub fn new(client: D, timeout: Duration, cache_max_age_secs: u64) -> Self {
        Self {
            client,
            timeout,
            cache_max_age_secs,
        }
    }

    pub async fn handle(&self, request: ProxyRequest) -> ProxyResponse {
        match request.method().as_str() {
            "OPTIONS" => Self::preflight(),
            "GET" => self.search(&request).await,
            method => {
                tracing::warn!("Rejected {} request to proxy", method);
                ProxyResponse::json(405, &json!({ "error": "Method not allowed" }))
                    .with_header("Allow", ALLOWED_METHODS)
            }
        }
    }

    fn preflight() -> ProxyResponse {
        ProxyResponse::new(204, String::new())
            .with_header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .with_header("Access-Control-Allow-Headers", ALLOWED_HEADERS)
            .with_header("Access-Control-Max-Age", PREFLIGHT_MAX_AGE_SECS.to_string())
    }

    async fn search(&self, request: &ProxyRequest) -> ProxyResponse {
        let country = match request.query("country").map(str::trim) {
            Some(country) if !country.is_empty() => country,
            _ => {
                tracing::debug!("Proxy request without country parameter");
                return ProxyResponse::json(
                    400,
                    &json!({ "error": "Country parameter is required" }),
                );
            }
        };

        // 不論客戶端本身的設定，代理函式自己保證逾時上限
        let outcome = match tokio::time::timeout(self.timeout, self.client.search(country)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(UpstreamError::Timeout),
        };

        match outcome {
            Ok(items) => {
                tracing::info!("Upstream returned {} records for {}", items.len(), country);
                ProxyResponse::json(200, &Value::Array(items)).with_header(
                    "Cache-Control",
                    format!("public, max-age={}", self.cache_max_age_secs),
                )
            }
            Err(e) => {
                tracing::warn!("Upstream search for {} failed: {}", country, e);
                let body = DegradedBody::from_upstream(&e);
                ProxyResponse::json(200, &json!(body)).with_header("Cache-Control", "no-store")
            }
        }
    }
}

#[async_trait]
impl<D: DirectoryClient> UniversitySource for ProxyFunction<D> {
    async fn fetch(&self, country: &str) -> std::result::Result<ProxyReply, SearchError> {
        let response = self.handle(ProxyRequest::get(country)).await;
        Ok(ProxyReply {
            status: response.status_code,
            body: response.body,
        })
    }
}
