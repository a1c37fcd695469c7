//! End-to-end tests for `SoqlHandler` against a mock Salesforce org.

use std::collections::HashMap;

use serde_json::json;
use sfsoql::auth::field;
use sfsoql::{ErrorKind, PasswordCredentials, SoqlHandler};
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/services/oauth2/token";
const QUERY_PATH: &str = "/services/data/v62.0/query";

fn credential_map(server: &MockServer) -> HashMap<String, String> {
    [
        (field::LOGIN_ENDPOINT, format!("{}{}", server.uri(), TOKEN_PATH)),
        (field::API_ENDPOINT, "services/data/v62.0".to_string()),
        (field::SERVICE_URL, format!("{}/", server.uri())),
        (field::OAUTH_ENDPOINT, format!("{}{}", server.uri(), TOKEN_PATH)),
        (field::USERNAME, "integration@example.com".to_string()),
        (field::PASSWORD, "p@ss".to_string()),
        (field::SECURITY_TOKEN, "SECTOKEN".to_string()),
        (field::CONSUMER_KEY, "consumer-key".to_string()),
        (field::CONSUMER_SECRET, "consumer-secret".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("password=p%40ssSECTOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "handler-token",
            "instance_url": server.uri(),
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> SoqlHandler {
    mount_token(server).await;
    SoqlHandler::from_source(&credential_map(server))
        .await
        .expect("handler should connect")
}

async fn mount_three_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("q", "SELECT f1, f2 FROM X"))
        .and(header("Authorization", "Bearer handler-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 3,
            "done": false,
            "nextRecordsUrl": "/services/data/v62.0/query/01gQX-1",
            "records": [{"attributes": {"type": "X"}, "f1": "a1", "f2": "v1"}]
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query/01gQX-1"))
        .and(header("Authorization", "Bearer handler-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 3,
            "done": false,
            "nextRecordsUrl": "/services/data/v62.0/query/01gQX-2",
            "records": [{"attributes": {"type": "X"}, "f1": "a2"}]
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query/01gQX-2"))
        .and(header("Authorization", "Bearer handler-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 3,
            "done": true,
            "records": [{"attributes": {"type": "X"}, "f1": "a3", "f2": "v3"}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn three_pages_merge_into_one_result() {
    let server = MockServer::start().await;
    let handler = connect(&server).await;
    mount_three_pages(&server).await;

    let merged = handler.query_json("SELECT f1, f2 FROM X").await.unwrap();

    assert_eq!(merged["done"], json!(true));
    assert_eq!(merged["totalSize"], json!(3));
    assert!(merged.get("nextRecordsUrl").is_none());
    let f1: Vec<&str> = merged["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["f1"].as_str().unwrap())
        .collect();
    assert_eq!(f1, ["a1", "a2", "a3"]);
}

#[tokio::test]
async fn query_string_is_parseable_json() {
    let server = MockServer::start().await;
    let handler = connect(&server).await;
    mount_three_pages(&server).await;

    let text = handler.query_string("SELECT f1, f2 FROM X").await.unwrap();
    assert!(text.contains('\n'));

    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["records"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn missing_field_projects_to_empty_cell() {
    let server = MockServer::start().await;
    let handler = connect(&server).await;
    mount_three_pages(&server).await;

    let columns = handler.query_columns("SELECT f1, f2 FROM X").await.unwrap();

    assert_eq!(
        columns,
        vec![vec!["f1", "a1", "a2", "a3"], vec!["f2", "v1", "", "v3"]]
    );
}

#[tokio::test]
async fn typed_result_from_merged_pages() {
    #[derive(Debug, serde::Deserialize)]
    struct Row {
        f1: String,
        #[serde(default)]
        f2: Option<String>,
    }

    let server = MockServer::start().await;
    let handler = connect(&server).await;
    mount_three_pages(&server).await;

    let result = handler
        .query_result::<Row>("SELECT f1, f2 FROM X")
        .await
        .unwrap();

    assert!(result.done);
    assert_eq!(result.records.len(), 3);
    assert_eq!(result.records[0].f1, "a1");
    assert_eq!(result.records[1].f2, None);
}

#[tokio::test]
async fn select_without_columns_is_malformed() {
    let server = MockServer::start().await;
    let handler = connect(&server).await;

    let err = handler.query_table("SELECT FROM X").await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedQuery(_)));
}

#[tokio::test]
async fn failing_page_fails_whole_query() {
    let server = MockServer::start().await;
    let handler = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 2,
            "done": false,
            "nextRecordsUrl": "/services/data/v62.0/query/01gQX-9",
            "records": [{"f1": "a1"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query/01gQX-9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .mount(&server)
        .await;

    let err = handler.query_json("SELECT f1 FROM X").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn page_without_records_is_parse_error() {
    let server = MockServer::start().await;
    let handler = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"totalSize": 0, "done": true})),
        )
        .mount(&server)
        .await;

    let err = handler.query_json("SELECT f1 FROM X").await.unwrap_err();
    assert!(err.is_parse_error());
}

#[tokio::test]
async fn missing_access_token_fails_construction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instance_url": server.uri()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = SoqlHandler::from_source(&credential_map(&server))
        .await
        .unwrap_err();

    match err.kind {
        ErrorKind::Auth { status, .. } => assert_eq!(status, 200),
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_credentials_fail_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut map = credential_map(&server);
    map.remove(field::USERNAME);
    map.insert(field::CONSUMER_SECRET.to_string(), String::new());

    let err = SoqlHandler::from_source(&map).await.unwrap_err();
    match err.kind {
        ErrorKind::Config(message) => {
            assert!(message.contains("username"));
            assert!(message.contains("consumer_secret"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn connect_with_builder_credentials() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let credentials = PasswordCredentials::builder()
        .login_endpoint(format!("{}{}", server.uri(), TOKEN_PATH))
        .api_endpoint("/services/data/v62.0/")
        .service_url(server.uri())
        .oauth_endpoint(format!("{}{}", server.uri(), TOKEN_PATH))
        .username("integration@example.com")
        .password("p@ss")
        .security_token("SECTOKEN")
        .consumer_key("consumer-key")
        .consumer_secret("consumer-secret")
        .build()
        .unwrap();

    let handler = SoqlHandler::connect(credentials).await.unwrap();
    assert_eq!(handler.session().access_token(), "handler-token");
    assert!(!format!("{:?}", handler).contains("handler-token"));
}

#[tokio::test]
async fn record_updates_use_the_session_token() {
    let server = MockServer::start().await;
    let handler = connect(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/services/data/v62.0/sobjects/Account/001xx01"))
        .and(header("Authorization", "Bearer handler-token"))
        .and(body_string("<root><Name>Acme &amp; Co</Name></root>"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/services/data/v62.0/sobjects/Account/001xx01"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/data/v62.0/sobjects/Account"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "001xx02",
            "success": true,
            "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/data/v62.0/sobjects/Account"))
        .and(body_string("<root><Name>Initech</Name></root>"))
        .respond_with(ResponseTemplate::new(201).set_body_string("<Result/>"))
        .expect(1)
        .mount(&server)
        .await;

    handler
        .patch_value("Account", "001xx01", "Name", "Acme & Co")
        .await
        .unwrap();
    handler
        .patch_fields("Account", "001xx01", &json!({"Industry": "Retail"}))
        .await
        .unwrap();

    let created = handler
        .post_fields("Account", &json!({"Name": "Globex"}))
        .await
        .unwrap();
    assert_eq!(created.id, "001xx02");

    let body = handler
        .post_value("Account", "Name", "Initech")
        .await
        .unwrap();
    assert_eq!(body, "<Result/>");
}
