use serde_json::json;
use vulminator_client::{ClientError, RunBackend, ScanClient};
use vulminator_core::domain::run::{RunId, RunRequest, RunStatus, ScanPreset};
use vulminator_core::dto::run::AnalyzeRequest;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

#[tokio::test]
async fn analyze_posts_payload_without_blank_token() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(json!({
            "repo_url": "https://github.com/org/repo",
            "preset": "exhaustive",
            "run_ai_report": true
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "run_id": "run-1", "status": "queued" })),
        )
        .expect(1)
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let request = RunRequest::new("https://github.com/org/repo")
        .with_preset(ScanPreset::Exhaustive)
        .with_credential("   ");

    let accepted = client.analyze(&AnalyzeRequest::from(&request)).await.unwrap();

    assert_eq!(accepted.run_id, "run-1");
    assert_eq!(accepted.status, RunStatus::Queued);
}

#[tokio::test]
async fn analyze_forwards_trimmed_token() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(json!({
            "repo_url": "https://github.com/org/repo",
            "preset": "fast",
            "run_ai_report": true,
            "github_token": "ghp_abc"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "run_id": "run-2", "status": "queued" })),
        )
        .expect(1)
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let request = RunRequest::new("https://github.com/org/repo").with_credential(" ghp_abc\n");

    let accepted = client.start_run(&AnalyzeRequest::from(&request)).await.unwrap();
    assert_eq!(accepted.run_id, "run-2");
}

#[tokio::test]
async fn analyze_non_success_is_api_error() {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid repo_url"))
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let request = RunRequest::new("https://github.com/org/repo");

    let err = client
        .analyze(&AnalyzeRequest::from(&request))
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert!(err.to_string().contains("invalid repo_url"));
}

#[tokio::test]
async fn get_run_decodes_observation() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/run-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "run_id": "run-3",
            "status": "running",
            "message": "Cloning;Scanning;Done",
            "findings": []
        })))
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let run_id = RunId::new("run-3").unwrap();

    let observation = client.fetch_run(&run_id).await.unwrap();

    assert_eq!(observation.status, RunStatus::Running);
    assert_eq!(observation.message.as_deref(), Some("Cloning;Scanning;Done"));
    assert_eq!(observation.findings, Some(vec![]));
    assert!(observation.pr_url.is_none());
}

#[tokio::test]
async fn get_run_missing_is_not_found() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Run not found" })))
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let err = client
        .get_run(&RunId::new("ghost").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound(ref id) if id == "ghost"));
}

#[tokio::test]
async fn get_run_malformed_body_is_parse_error() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/run-4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let err = client
        .get_run(&RunId::new("run-4").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ParseError(_)));
}

#[tokio::test]
async fn health_reports_ok() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "workspace": "/srv/.runs" })),
        )
        .mount(&mock)
        .await;

    let client = ScanClient::new(format!("{}/", mock.uri()));
    let health = client.health().await.unwrap();

    assert!(health.is_ok());
    assert_eq!(health.workspace.as_deref(), Some("/srv/.runs"));
}

#[tokio::test]
async fn unreachable_backend_is_request_failure() {
    // Nothing listens on the discard port.
    let client = ScanClient::new("http://127.0.0.1:9");
    let err = client
        .get_run(&RunId::new("run-5").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::RequestFailed(_)));
    assert!(err.is_connection_error());
}

#[tokio::test]
async fn get_run_escapes_run_id_as_one_segment() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/runs/a%2Fb%3Fc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .expect(1)
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let observation = client.get_run(&RunId::new("a/b?c").unwrap()).await.unwrap();

    assert_eq!(observation.status, RunStatus::Running);
}

#[tokio::test]
async fn get_run_cannot_reach_other_endpoints() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(0)
        .mount(&mock)
        .await;

    let client = ScanClient::new(mock.uri());
    let err = client
        .get_run(&RunId::new("../health").unwrap())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn get_run_with_invalid_backend_url_is_invalid_request() {
    let client = ScanClient::new("not a url");
    let err = client
        .get_run(&RunId::new("run-6").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
}
