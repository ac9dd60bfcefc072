use std::sync::{Arc, Mutex};

use axum::{
  extract::State,
  http::{Method, StatusCode, Uri},
  Json, Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use quant_console::utils::{
  api::ApiClient,
  audit::AuditLogFilter,
  models::{ProjectConfig, ThemeConfigItem, TradeMode},
  pagination::PageQuery,
  server::{AlgorithmPayload, AppError, SelfTestRequest},
  themes::ThemeEditor,
};

#[derive(Debug, Clone)]
struct Recorded {
  method: Method,
  path: String,
  query: Option<String>,
  body: Value,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

async fn stub(State(log): State<Log>, method: Method, uri: Uri, body: String) -> (StatusCode, Json<Value>) {
  let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
  log.lock().unwrap().push(Recorded {
    method: method.clone(),
    path: uri.path().to_string(),
    query: uri.query().map(str::to_string),
    body: body.clone(),
  });

  match (method.as_str(), uri.path()) {
    ("GET", "/api/audit-logs/page") => (StatusCode::OK, Json(json!({
      "items": [{"id": 1, "actor": "ops", "action": "update", "resource_type": "project", "resource_id": "3", "detail": {"field": "themes"}, "created_at": "2024-01-02T03:04:05Z"}],
      "total": 51, "page": 2, "page_size": 50
    }))),
    ("GET", "/api/brokerage/lean/pool/status") => (StatusCode::OK, Json(json!({
      "mode": "live",
      "clients": [{"client_id": "lean-1", "role": "leader", "status": "running", "last_heartbeat": "2024-01-02T03:04:05Z"}],
      "updated_at": "2024-01-02T03:04:06Z"
    }))),
    ("POST", "/api/algorithms/7/self-test") => (StatusCode::CREATED, Json(json!({"id": 42}))),
    ("PUT", "/api/algorithms/9") => (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "name taken"}))),
    ("POST", "/api/projects/3/config") => (StatusCode::OK, Json(json!({
      "project_id": 3, "config": body["config"], "version": body["version"]
    }))),
    ("POST", "/api/projects/4/config") => (StatusCode::OK, Json(json!({
      "project_id": 4, "version": body["version"]
    }))),
    ("GET", "/api/system-themes") => (StatusCode::OK, Json(json!([
      {"id": 11, "key": "AI", "label": "Artificial intelligence", "latest_version": {"id": 4, "version": "v4"}}
    ]))),
    _ => (StatusCode::NOT_FOUND, Json(json!({"error": "no route"}))),
  }
}

async fn spawn_backend() -> (ApiClient, Log) {
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  let app = Router::new().fallback(stub).with_state(log.clone());
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (ApiClient::new(&format!("http://{}/", addr)), log)
}

fn last(log: &Log) -> Recorded {
  log.lock().unwrap().last().cloned().expect("no request recorded")
}

#[tokio::test]
async fn audit_filters_skip_blank_values() {
  let (api, log) = spawn_backend().await;
  let filter = AuditLogFilter { action: " update ".into(), resource_type: "   ".into(), resource_id: String::new() };

  let page = api.list_audit_logs(&filter.to_query(PageQuery { page: 2, page_size: 50 })).await.unwrap();

  let req = last(&log);
  assert_eq!(req.path, "/api/audit-logs/page");
  assert_eq!(req.query.as_deref(), Some("page=2&page_size=50&action=update"));
  assert_eq!(page.total, 51);
  assert_eq!(page.items[0].detail, json!({"field": "themes"}));
}

#[tokio::test]
async fn pool_status_carries_the_mode() {
  let (api, log) = spawn_backend().await;

  let status = api.pool_status(TradeMode::Live).await.unwrap();

  assert_eq!(last(&log).query.as_deref(), Some("mode=live"));
  assert_eq!(status.mode, TradeMode::Live);
  assert_eq!(status.clients.len(), 1);
  assert_eq!(status.clients[0].last_error, None);
}

#[tokio::test]
async fn self_test_posts_version_and_benchmark() {
  let (api, log) = spawn_backend().await;
  let request = SelfTestRequest { version_id: 5, benchmark: "SPY".into() };

  let run = api.self_test(7, &request).await.unwrap();

  let req = last(&log);
  assert_eq!(req.method, Method::POST);
  assert_eq!(req.body, json!({"version_id": 5, "benchmark": "SPY"}));
  assert_eq!(run.run_id(), "42");
}

#[tokio::test]
async fn error_status_keeps_backend_message() {
  let (api, _log) = spawn_backend().await;
  let payload = AlgorithmPayload { name: "Momentum".into(), description: None, language: None, file_path: None, type_name: None, version: None };

  let err = api.update_algorithm(9, &payload).await.unwrap_err();

  assert_eq!(err, AppError::Status { status: 422, message: "name taken".into() });
}

#[tokio::test]
async fn config_save_posts_the_whole_document() {
  let (api, log) = spawn_backend().await;
  let mut config: ProjectConfig = serde_json::from_value(json!({
    "template": "growth",
    "rebalance": {"day": "fri"},
    "symbol_types": {"spy": "etf"}
  })).unwrap();
  config.themes = vec![
    ThemeConfigItem { key: "TECH".into(), label: "Tech".into(), weight: 0.6, priority: 2, ..Default::default() },
    ThemeConfigItem { key: "ENERGY".into(), label: "Energy".into(), weight: 0.4, priority: 1, ..Default::default() },
  ];
  let mut editor = ThemeEditor::load(config);
  editor.set_override("tsla", "Exclude").unwrap();
  let request = editor.build_save_request(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()).unwrap();

  let saved = api.save_project_config(3, &request).await.unwrap();

  let body = last(&log).body;
  assert_eq!(body["version"], "ui-20240102030405");
  assert_eq!(body["config"]["rebalance"], json!({"day": "fri"}));
  assert_eq!(body["config"]["weights"], json!({"ENERGY": 0.4, "TECH": 0.6}));
  assert_eq!(body["config"]["categories"], json!(["ENERGY", "TECH"]));
  assert_eq!(body["config"]["symbol_types"], json!({"SPY": "etf", "TSLA": "exclude"}));
  assert_eq!(body["config"]["themes"][0]["exclude"], json!(["TSLA"]));
  assert_eq!(saved.themes.len(), 2);
}

#[tokio::test]
async fn save_acknowledgement_keeps_the_sent_document() {
  let (api, _log) = spawn_backend().await;
  let editor = ThemeEditor::load(ProjectConfig {
    themes: vec![ThemeConfigItem { key: "TECH".into(), label: "Tech".into(), weight: 1.0, ..Default::default() }],
    ..Default::default()
  });
  let request = editor.build_save_request(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()).unwrap();

  let saved = api.save_project_config(4, &request).await.unwrap();

  assert_eq!(saved, request.config);
  assert_eq!(saved.themes[0].key, "TECH");
}

#[tokio::test]
async fn bare_array_lists_are_accepted() {
  let (api, _log) = spawn_backend().await;

  let themes = api.list_system_themes().await.unwrap();

  assert_eq!(themes.len(), 1);
  assert_eq!(themes[0].latest_version.as_ref().map(|v| v.id), Some(4));
}
