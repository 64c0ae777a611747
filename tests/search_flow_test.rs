use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};
use uni_explorer::core::page::View;
use uni_explorer::core::render::{self, OutputFormat};
use uni_explorer::{
    Command, Dispatch, HipolabsClient, PageController, ProxyFunction, ProxyHttpClient,
    SearchError, SearchOrchestrator, SearchQuery,
};

const PROXY_PATH: &str = "/.netlify/functions/universities";

/// 代理函式在本地執行，上游為 mock server
fn local_orchestrator(
    server: &MockServer,
    timeout: Duration,
) -> Result<SearchOrchestrator<ProxyFunction<HipolabsClient>>> {
    let client = HipolabsClient::new(server.url("/search"), timeout, "uni-explorer-test")?;
    Ok(SearchOrchestrator::new(ProxyFunction::new(client, timeout, 300)))
}

fn north_south() -> serde_json::Value {
    json!([
        {"name": "A", "country": "X", "state-province": "North", "domains": ["a.x"], "web_pages": ["https://a.x/"]},
        {"name": "B", "country": "X", "state-province": "South", "domains": ["b.x"], "web_pages": ["https://b.x/"]}
    ])
}

#[tokio::test]
async fn test_blank_country_makes_no_network_call() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!([]));
    });
    let orchestrator = local_orchestrator(&server, Duration::from_secs(5))?;

    for country in ["", " ", "\t  \n"] {
        let err = assert_err!(orchestrator.search(&SearchQuery::new(country, None)).await);
        assert_eq!(err, SearchError::InvalidInput);
    }

    assert_eq!(api_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_state_filter_end_to_end() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/search").query_param("country", "X");
        then.status(200).json_body(north_south());
    });
    let orchestrator = local_orchestrator(&server, Duration::from_secs(5))?;

    let result = assert_ok!(
        orchestrator
            .search(&SearchQuery::new("X", Some("nor".to_string())))
            .await
    );

    api_mock.assert_hits(1);
    assert_eq!(result.len(), 1);
    assert_eq!(result.records[0].name, "A");
    assert!(result.failure.is_none());
    Ok(())
}

#[tokio::test]
async fn test_each_search_calls_upstream_once() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(north_south());
    });
    let orchestrator = local_orchestrator(&server, Duration::from_secs(5))?;
    let query = SearchQuery::new("X", None);

    let first = assert_ok!(orchestrator.search(&query).await);
    api_mock.assert_hits(1);
    let second = assert_ok!(orchestrator.search(&query).await);
    api_mock.assert_hits(2);

    // 相同輸入與相同上游回應得到相同結果
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_non_array_upstream_body_yields_empty_result() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(json!({"name": "not a list"}));
    });
    let orchestrator = local_orchestrator(&server, Duration::from_secs(5))?;

    let result = assert_ok!(orchestrator.search(&SearchQuery::new("X", None)).await);

    assert!(result.is_empty());
    assert!(matches!(
        result.failure,
        Some(SearchError::UpstreamFailure(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_timeout_yields_network_failure_without_hanging() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .delay(Duration::from_secs(5))
            .json_body(north_south());
    });
    let orchestrator = local_orchestrator(&server, Duration::from_secs(1))?;

    let started = Instant::now();
    let result = assert_ok!(orchestrator.search(&SearchQuery::new("X", None)).await);

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(result.is_empty());
    assert!(matches!(result.failure, Some(SearchError::NetworkFailure(_))));
    Ok(())
}

#[tokio::test]
async fn test_remote_proxy_success() -> Result<()> {
    let server = MockServer::start();
    let proxy_mock = server.mock(|when, then| {
        when.method(GET)
            .path(PROXY_PATH)
            .query_param("country", "X");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(north_south());
    });

    let source = ProxyHttpClient::new(server.url(PROXY_PATH), Duration::from_secs(5))?;
    let orchestrator = SearchOrchestrator::new(source);

    let result = assert_ok!(orchestrator.search(&SearchQuery::new("X", None)).await);

    proxy_mock.assert();
    let names: Vec<&str> = result.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    Ok(())
}

#[tokio::test]
async fn test_remote_proxy_degraded_shape() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PROXY_PATH);
        then.status(200)
            .json_body(json!({"results": [], "degraded": true, "reason": "network"}));
    });

    let source = ProxyHttpClient::new(server.url(PROXY_PATH), Duration::from_secs(5))?;
    let result = assert_ok!(
        SearchOrchestrator::new(source)
            .search(&SearchQuery::new("X", None))
            .await
    );

    assert!(result.is_empty());
    assert!(matches!(result.failure, Some(SearchError::NetworkFailure(_))));
    Ok(())
}

#[tokio::test]
async fn test_remote_proxy_server_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PROXY_PATH);
        then.status(500)
            .json_body(json!({"error": "Failed to fetch universities"}));
    });

    let source = ProxyHttpClient::new(server.url(PROXY_PATH), Duration::from_secs(5))?;
    let result = assert_ok!(
        SearchOrchestrator::new(source)
            .search(&SearchQuery::new("X", None))
            .await
    );

    assert!(result.is_empty());
    assert!(matches!(result.failure, Some(SearchError::UpstreamFailure(_))));
    Ok(())
}

#[tokio::test]
async fn test_injected_markup_is_rendered_as_text() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(json!([
            {
                "name": "<script>alert('x')</script> University",
                "country": "X",
                "state-province": "<img src=x onerror=alert(1)>",
                "domains": ["evil.x"],
                "web_pages": ["javascript:alert(1)\" onclick=\"steal()"]
            }
        ]));
    });

    let page = PageController::new(local_orchestrator(&server, Duration::from_secs(5))?);
    let dispatch = page
        .dispatch(Command::SubmitSearch {
            country: "X".to_string(),
            state_province: None,
        })
        .await;
    assert_eq!(dispatch, Dispatch::Rendered(1));

    let html = match page.snapshot().view {
        View::Results(html) => html,
        other => panic!("unexpected view: {:?}", other),
    };

    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img"));
    assert!(!html.contains("javascript:"));
    assert!(html.contains("evil.x"));
    assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; University"));
    Ok(())
}

#[tokio::test]
async fn test_page_recovers_after_failure() -> Result<()> {
    let server = MockServer::start();
    let mut failing = server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(502);
    });

    let page = PageController::new(local_orchestrator(&server, Duration::from_secs(5))?);
    let submit = || Command::SubmitSearch {
        country: "X".to_string(),
        state_province: Some("south".to_string()),
    };

    let dispatch = page.dispatch(submit()).await;
    assert!(matches!(dispatch, Dispatch::NoResults { failure: Some(_) }));
    let state = page.snapshot();
    assert!(!state.loading);
    assert_eq!(state.view, View::NoResults);
    assert!(state.notification.is_some());

    failing.delete();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(north_south());
    });

    assert_eq!(page.dispatch(submit()).await, Dispatch::Rendered(1));
    let state = page.snapshot();
    assert!(!state.loading);
    assert!(state.notification.is_none());
    Ok(())
}

#[tokio::test]
async fn test_cli_output_formats() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(north_south());
    });
    let orchestrator = local_orchestrator(&server, Duration::from_secs(5))?;
    let result = assert_ok!(orchestrator.search(&SearchQuery::new("X", None)).await);

    let csv = render::render(&result, OutputFormat::Csv)?;
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("A,X,North,a.x,https://a.x/"));

    let json_out = render::render(&result, OutputFormat::Json)?;
    let parsed: serde_json::Value = serde_json::from_str(&json_out)?;
    assert_eq!(parsed, north_south());

    let html = render::render(&result, OutputFormat::Html)?;
    assert_eq!(html.matches("university-card").count(), 2);
    Ok(())
}
