use crate::adapters::http::json_kind;
use crate::core::proxy::DegradedBody;
use crate::core::{ProxyReply, SearchQuery, SearchResult, UniversityRecord, UniversitySource};
use crate::utils::error::SearchError;
use serde_json::Value;

/// 搜尋流程：驗證輸入、呼叫代理函式、驗證資料並套用州/省篩選
pub struct SearchOrchestrator<S: UniversitySource> {
    source: S,
}

impl<S: UniversitySource> SearchOrchestrator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// 只有輸入錯誤會回傳 `Err`；網路或上游失敗一律降級成空結果
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        let country = query.validated_country()?;

        tracing::info!(
            "🔍 Searching universities in {} (state filter: {:?})",
            country,
            query.state_filter()
        );

        let reply = match self.source.fetch(country).await {
            Ok(reply) => reply,
            Err(failure) => {
                tracing::warn!("❌ Search for {} failed: {}", country, failure);
                return Ok(SearchResult::degraded(failure));
            }
        };

        let records = match interpret_reply(&reply) {
            Ok(records) => records,
            Err(failure) => {
                tracing::warn!("❌ Search for {} degraded: {}", country, failure);
                return Ok(SearchResult::degraded(failure));
            }
        };

        let filtered = filter_by_state(records, query.state_filter());
        tracing::info!("✅ {} universities matched", filtered.len());

        Ok(SearchResult::new(filtered))
    }
}

/// 判讀代理函式的回覆：陣列、降級格式或無法辨識的內容
fn interpret_reply(reply: &ProxyReply) -> Result<Vec<UniversityRecord>, SearchError> {
    if !(200..300).contains(&reply.status) {
        return Err(SearchError::UpstreamFailure(format!(
            "proxy returned status {}",
            reply.status
        )));
    }

    let body: Value = serde_json::from_str(&reply.body)
        .map_err(|e| SearchError::UpstreamFailure(format!("invalid JSON body: {}", e)))?;

    match body {
        Value::Array(items) => Ok(ingest(&items)),
        other => match serde_json::from_value::<DegradedBody>(other.clone()) {
            Ok(degraded) if degraded.degraded => Err(if degraded.reason == "network" {
                SearchError::NetworkFailure("upstream directory unreachable".to_string())
            } else {
                SearchError::UpstreamFailure("upstream directory returned an error".to_string())
            }),
            _ => Err(SearchError::UpstreamFailure(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
        },
    }
}

/// 驗證每一筆上游資料，不合格的直接略過
fn ingest(items: &[Value]) -> Vec<UniversityRecord> {
    let records: Vec<UniversityRecord> =
        items.iter().filter_map(UniversityRecord::from_value).collect();

    let dropped = items.len() - records.len();
    if dropped > 0 {
        tracing::warn!("Dropped {} malformed university entries", dropped);
    }

    records
}

pub fn filter_by_state(
    records: Vec<UniversityRecord>,
    state_filter: Option<&str>,
) -> Vec<UniversityRecord> {
    match state_filter {
        Some(filter) => records
            .into_iter()
            .filter(|record| record.matches_state(filter))
            .collect(),
        None => records,
    }
}
