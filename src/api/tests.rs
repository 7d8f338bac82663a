//! Tests for the SmartSurvey API module

use super::*;
use crate::config::{ClientConfig, Credentials};
use crate::error::Error;
use crate::pagination::{AggregateResult, PageAggregator};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::ops::Range;
use std::time::Duration;
use test_case::test_case;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SmartSurveyClient {
    let config = ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::with_credentials("tok", "sec")
    };
    SmartSurveyClient::new(config).unwrap()
}

fn page_body(ids: Range<u32>, total: u32) -> ResponseTemplate {
    let items: Vec<Value> = ids.map(|id| json!({ "id": id })).collect();
    ResponseTemplate::new(200)
        .set_body_json(items)
        .insert_header("x-ss-pagination-total", total.to_string().as_str())
}

fn ids(items: &[Value]) -> Vec<u64> {
    items.iter().map(|v| v["id"].as_u64().unwrap()).collect()
}

// ============================================================================
// Query Tests
// ============================================================================

#[test_case("partial" => Completion::Partial)]
#[test_case("0" => Completion::Partial)]
#[test_case("Completed" => Completion::Completed)]
#[test_case("2" => Completion::Both)]
fn test_completion_from_str(input: &str) -> Completion {
    input.parse().unwrap()
}

#[test]
fn test_completion_invalid() {
    assert_err!("sometimes".parse::<Completion>());
}

#[test]
fn test_surveys_query_to_request() {
    let request = SurveysQuery::new()
        .page(3)
        .page_size(25)
        .sort_by("title")
        .sort_by("date_created")
        .to_request();

    pretty_assertions::assert_eq!(request.query.get("page").map(String::as_str), Some("3"));
    pretty_assertions::assert_eq!(request.query.get("page_size").map(String::as_str), Some("25"));
    pretty_assertions::assert_eq!(
        request.query.get("sort_by").map(String::as_str),
        Some("title,date_created")
    );
}

#[test]
fn test_empty_query_sends_nothing() {
    assert!(SurveysQuery::new().to_request().query.is_empty());
    assert!(ResponsesQuery::new().to_request().query.is_empty());
}

#[test]
fn test_responses_query_to_request() {
    let request = ResponsesQuery::new()
        .completed(Completion::Both)
        .since(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        .filter_id(11)
        .tracking_link_id(12)
        .unique_id(13)
        .include_labels(true)
        .to_request();

    let get = |key: &str| request.query.get(key).map(String::as_str);
    pretty_assertions::assert_eq!(get("completed"), Some("2"));
    pretty_assertions::assert_eq!(get("since"), Some("2024-01-02T03:04:05Z"));
    pretty_assertions::assert_eq!(get("until"), None);
    pretty_assertions::assert_eq!(get("filter_id"), Some("11"));
    pretty_assertions::assert_eq!(get("tracking_link_id"), Some("12"));
    pretty_assertions::assert_eq!(get("unique_id"), Some("13"));
    pretty_assertions::assert_eq!(get("include_labels"), Some("true"));
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_fails_before_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        base_url: mock_server.uri(),
        ..Default::default()
    };
    let client = SmartSurveyClient::new(config).unwrap();

    let err = client.get_surveys(SurveysQuery::new()).await.unwrap_err();
    assert!(matches!(err, Error::MissingCredential { .. }));
    pretty_assertions::assert_eq!(err.to_string(), "API token is required");
}

#[tokio::test]
async fn test_missing_secret() {
    let config = ClientConfig {
        credentials: Credentials {
            api_token: Some("tok".into()),
            api_token_secret: None,
        },
        ..Default::default()
    };
    let client = SmartSurveyClient::new(config).unwrap();

    let err = client.get_folder(1, None).await.unwrap_err();
    pretty_assertions::assert_eq!(err.to_string(), "API token secret is required");
    assert!(err.is_config());
}

#[tokio::test]
async fn test_per_call_credentials_override() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("api_token", "other"))
        .and(query_param("api_token_secret", "other-sec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = SurveysQuery::new().credentials(Credentials::new("other", "other-sec"));
    assert_ok!(client.get_surveys(query).await);
}

#[tokio::test]
async fn test_incomplete_per_call_credentials_use_client() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys/5"))
        .and(query_param("api_token", "tok"))
        .and(query_param("api_token_secret", "sec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let partial = Credentials {
        api_token: Some("other".into()),
        api_token_secret: None,
    };
    let response = client
        .get_survey(5, SurveyQuery::new().credentials(partial))
        .await
        .unwrap();
    pretty_assertions::assert_eq!(response.data["id"], 5);
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_get_surveys() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "5"))
        .and(query_param("api_token", "tok"))
        .respond_with(
            page_body(5..10, 12)
                .insert_header("x-ss-pagination-page", "2")
                .insert_header("x-ss-release", "1.0"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .get_surveys(SurveysQuery::new().page(2).page_size(5))
        .await
        .unwrap();

    pretty_assertions::assert_eq!(ids(&response.data), vec![5, 6, 7, 8, 9]);
    let pagination = response.meta.pagination.unwrap();
    pretty_assertions::assert_eq!(pagination.page, Some(2));
    pretty_assertions::assert_eq!(pagination.total, Some(12));
    pretty_assertions::assert_eq!(response.meta.release.as_deref(), Some("1.0"));
}

#[tokio::test]
async fn test_get_survey_detailed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys/42/detailed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "pages": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .get_survey(42, SurveyQuery::new().detailed(true))
        .await
        .unwrap();
    pretty_assertions::assert_eq!(response.data["pages"], json!([]));
}

#[tokio::test]
async fn test_get_responses_with_filters() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys/7/responses"))
        .and(query_param("completed", "1"))
        .and(query_param("until", "2024-06-30T00:00:00Z"))
        .and(query_param("include_labels", "false"))
        .respond_with(page_body(0..2, 2))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = ResponsesQuery::new()
        .completed(Completion::Completed)
        .until(Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap())
        .include_labels(false);
    let response = client.get_responses(7, query).await.unwrap();
    pretty_assertions::assert_eq!(response.data.len(), 2);
}

#[tokio::test]
async fn test_get_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys/7/responses/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 99})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get_response(7, 99, None).await.unwrap();
    pretty_assertions::assert_eq!(response.data["id"], 99);
}

#[tokio::test]
async fn test_get_folder() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveyfolders/3/detailed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get_folder(3, None).await.unwrap();
    pretty_assertions::assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_endpoint_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveyfolders/3/detailed"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status": 403,
            "code": 1010,
            "message": "Access denied"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_folder(3, None).await.unwrap_err();
    pretty_assertions::assert_eq!(err.status(), Some(403));
    pretty_assertions::assert_eq!(err.code(), Some("1010"));
}

// ============================================================================
// Aggregation Tests
// ============================================================================

#[tokio::test]
async fn test_all_surveys_ordered_merge() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10"))
        .respond_with(page_body(0..10, 25))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("page", "2"))
        .respond_with(page_body(10..20, 25).set_delay(Duration::from_millis(80)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("page", "3"))
        .respond_with(page_body(20..25, 25))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut arrivals = Vec::new();
    let aggregator = PageAggregator::<Value>::new()
        .page_size(10)
        .on_page(|page| arrivals.push(page.data[0]["id"].as_u64().unwrap()));

    let result = client
        .all_surveys(SurveysQuery::new().sort_by("title"), aggregator)
        .await
        .unwrap();

    let data = result.into_data().unwrap();
    pretty_assertions::assert_eq!(ids(&data), (0..25).collect::<Vec<u64>>());
    pretty_assertions::assert_eq!(arrivals, vec![0, 20, 10]);
}

#[tokio::test]
async fn test_all_surveys_single_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .respond_with(page_body(0..5, 5))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .all_surveys(SurveysQuery::new(), client.aggregator())
        .await
        .unwrap();

    pretty_assertions::assert_eq!(ids(&result.into_data().unwrap()), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_all_surveys_page_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("page", "1"))
        .respond_with(page_body(0..10, 30))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Internal error"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/surveys"))
        .and(query_param("page", "3"))
        .respond_with(page_body(20..30, 30))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .all_surveys(SurveysQuery::new(), PageAggregator::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 500, .. }));
    pretty_assertions::assert_eq!(err.to_string(), "Internal error (status 500)");
}

#[tokio::test]
async fn test_all_responses_discard_mode() {
    let mock_server = MockServer::start().await;
    for page in 1..=3u32 {
        let start = (page - 1) * 4;
        Mock::given(method("GET"))
            .and(path("/surveys/8/responses"))
            .and(query_param("page", page.to_string().as_str()))
            .and(query_param("page_size", "4"))
            .and(query_param("completed", "2"))
            .respond_with(page_body(start..(start + 4).min(10), 10))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let mut received = 0;
    let aggregator = PageAggregator::new()
        .page_size(4)
        .collect(false)
        .on_page(|page| received += page.data.len());

    let result = client
        .all_responses(
            8,
            ResponsesQuery::new().completed(Completion::Both),
            aggregator,
        )
        .await
        .unwrap();

    pretty_assertions::assert_eq!(result, AggregateResult::Unit);
    pretty_assertions::assert_eq!(received, 10);
}
