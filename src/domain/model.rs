use crate::utils::error::SearchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub country: String,
    pub state_province: Option<String>,
}

impl SearchQuery {
    /// 建立查詢：兩個欄位都會 trim，空白的州/省視為未指定
    pub fn new(country: impl Into<String>, state_province: Option<String>) -> Self {
        let state_province = state_province
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            country: country.into().trim().to_string(),
            state_province,
        }
    }

    /// 國家必須非空白才能發出任何網路請求
    pub fn validated_country(&self) -> Result<&str, SearchError> {
        let country = self.country.trim();
        if country.is_empty() {
            return Err(SearchError::InvalidInput);
        }
        Ok(country)
    }

    pub fn state_filter(&self) -> Option<&str> {
        self.state_province
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// 上游目錄服務的一筆大學資料，JSON 欄位名稱沿用上游格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityRecord {
    pub name: String,
    pub country: String,
    #[serde(rename = "state-province", default)]
    pub state_province: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub web_pages: Vec<String>,
}

impl UniversityRecord {
    /// 在進入點驗證上游資料的形狀，只做存在性檢查
    ///
    /// `name` 與 `country` 必須是字串，其餘欄位缺少時給預設值，
    /// 陣列內非字串的項目會被略過。
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name")?.as_str()?.to_string();
        let country = obj.get("country")?.as_str()?.to_string();

        let state_province = obj
            .get("state-province")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Some(Self {
            name,
            country,
            state_province,
            domains: string_list(obj.get("domains")),
            web_pages: string_list(obj.get("web_pages")),
        })
    }

    pub fn primary_domain(&self) -> Option<&str> {
        self.domains.first().map(String::as_str)
    }

    pub fn primary_web_page(&self) -> Option<&str> {
        self.web_pages.first().map(String::as_str)
    }

    /// 州/省不分大小寫的子字串比對；沒有州/省欄位的資料一律不符合
    pub fn matches_state(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.state_province
            .as_deref()
            .is_some_and(|state| state.to_lowercase().contains(&needle))
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// 一次搜尋的結果；`failure` 有值代表這次搜尋已降級為空結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub records: Vec<UniversityRecord>,
    pub failure: Option<SearchError>,
}

impl SearchResult {
    pub fn new(records: Vec<UniversityRecord>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    pub fn degraded(failure: SearchError) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(failure),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}
