use dioxus::{logger::tracing::{info, warn}, prelude::*};
use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{
  models::{Algorithm, AlgorithmVersion, AuditLog, PoolStatus, Project, ProjectConfig, SystemTheme, ThemeChangeReport, ThemeSummary, TradeMode},
  pagination::PageQuery,
  server::{
    AlgorithmPayload, AppError, ErrorBody, ImportThemeRequest, ListPayload, Page, ProjectConfigEnvelope, ProjectFromVersionRequest,
    RunCreated, SaveConfigRequest, SelfTestRequest, SymbolSearch, ThemeSymbols, VersionDiff, VersionPayload
  }
};

type Query = Vec<(&'static str, String)>;

/// Client provided by `App` as context.
pub fn use_api() -> Signal<ApiClient> {
  use_context::<Signal<ApiClient>>()
}

/// Typed client for the quant backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
  client: reqwest::Client,
  base_url: String,
}

impl PartialEq for ApiClient {
  fn eq(&self, other: &Self) -> bool {
    self.base_url == other.base_url
  }
}

impl ApiClient {
  pub fn new(base_url: &str) -> Self {
    Self::with_client(reqwest::Client::new(), base_url)
  }

  pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
    Self { client, base_url: base_url.trim_end_matches('/').to_string() }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(&self, method: Method, path: &str, query: &[(&'static str, String)], body: Option<&B>) -> Result<T, AppError> {
    let mut req = self.client.request(method.clone(), self.url(path));
    if !query.is_empty() {
      req = req.query(query);
    }
    if let Some(body) = body {
      req = req.json(body);
    }
    let resp = req.send().await.map_err(|e| {
      warn!("{} {} failed: {}", method, path, e);
      // body serialization failures surface as builder errors
      if e.is_builder() {
        AppError::Encode(e.to_string())
      } else {
        AppError::Request(e.to_string())
      }
    })?;
    Self::parse(method, path, resp).await
  }

  async fn parse<T: DeserializeOwned>(method: Method, path: &str, resp: Response) -> Result<T, AppError> {
    let status = resp.status();
    if !status.is_success() {
      let text = resp.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ErrorBody>(&text).ok().and_then(ErrorBody::into_message).unwrap_or(text);
      warn!("{} {} responded {}: {}", method, path, status.as_u16(), message);
      return Err(AppError::Status { status: status.as_u16(), message });
    }
    resp.json::<T>().await.map_err(|e| {
      warn!("{} {} returned an unexpected body: {}", method, path, e);
      AppError::Decode(e.to_string())
    })
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T, AppError> {
    self.send::<(), T>(Method::GET, path, query, None).await
  }

  async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AppError> {
    self.send(Method::POST, path, &[], Some(body)).await
  }

  async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AppError> {
    self.send(Method::PUT, path, &[], Some(body)).await
  }

  /* Algorithms */
  pub async fn list_algorithms(&self, page: PageQuery) -> Result<Page<Algorithm>, AppError> {
    self.get("/api/algorithms/page", &page.to_query()).await
  }

  pub async fn create_algorithm(&self, payload: &AlgorithmPayload) -> Result<Algorithm, AppError> {
    let created: Algorithm = self.post("/api/algorithms", payload).await?;
    info!("registered algorithm {} ({})", created.name, created.id);
    Ok(created)
  }

  pub async fn update_algorithm(&self, algorithm_id: i64, payload: &AlgorithmPayload) -> Result<Algorithm, AppError> {
    self.put(&format!("/api/algorithms/{}", algorithm_id), payload).await
  }

  pub async fn list_versions(&self, algorithm_id: i64) -> Result<Vec<AlgorithmVersion>, AppError> {
    let list: ListPayload<AlgorithmVersion> = self.get(&format!("/api/algorithms/{}/versions", algorithm_id), &[]).await?;
    Ok(list.into_items())
  }

  pub async fn list_versions_page(&self, algorithm_id: i64, page: PageQuery) -> Result<Page<AlgorithmVersion>, AppError> {
    self.get(&format!("/api/algorithms/{}/versions/page", algorithm_id), &page.to_query()).await
  }

  pub async fn get_version(&self, algorithm_id: i64, version_id: i64) -> Result<AlgorithmVersion, AppError> {
    self.get(&format!("/api/algorithms/{}/versions/{}", algorithm_id, version_id), &[]).await
  }

  pub async fn create_version(&self, algorithm_id: i64, payload: &VersionPayload) -> Result<AlgorithmVersion, AppError> {
    let created: AlgorithmVersion = self.post(&format!("/api/algorithms/{}/versions", algorithm_id), payload).await?;
    info!("created version {} for algorithm {}", created.id, algorithm_id);
    Ok(created)
  }

  pub async fn diff_versions(&self, algorithm_id: i64, from_id: i64, to_id: i64) -> Result<VersionDiff, AppError> {
    let query: Query = vec![("from_id", from_id.to_string()), ("to_id", to_id.to_string())];
    self.get(&format!("/api/algorithms/{}/diff", algorithm_id), &query).await
  }

  pub async fn self_test(&self, algorithm_id: i64, request: &SelfTestRequest) -> Result<RunCreated, AppError> {
    let run: RunCreated = self.post(&format!("/api/algorithms/{}/self-test", algorithm_id), request).await?;
    info!("self-test {} started for version {}", run.run_id(), request.version_id);
    Ok(run)
  }

  pub async fn create_project_from_version(&self, algorithm_id: i64, version_id: i64, request: &ProjectFromVersionRequest) -> Result<Project, AppError> {
    self.post(&format!("/api/algorithms/{}/versions/{}/projects", algorithm_id, version_id), request).await
  }

  /* Projects & themes */
  pub async fn list_projects(&self, page: PageQuery) -> Result<Page<Project>, AppError> {
    self.get("/api/projects/page", &page.to_query()).await
  }

  pub async fn get_project_config(&self, project_id: i64) -> Result<ProjectConfigEnvelope, AppError> {
    self.get(&format!("/api/projects/{}/config", project_id), &[]).await
  }

  /// Stored document after a save. A bare acknowledgement stands for the document that was sent.
  pub async fn save_project_config(&self, project_id: i64, request: &SaveConfigRequest) -> Result<ProjectConfig, AppError> {
    let saved: ProjectConfigEnvelope = self.post(&format!("/api/projects/{}/config", project_id), request).await?;
    info!("saved config {} for project {}", request.version, project_id);
    Ok(saved.config.unwrap_or_else(|| request.config.clone()))
  }

  pub async fn theme_summary(&self, project_id: i64) -> Result<ThemeSummary, AppError> {
    self.get(&format!("/api/projects/{}/themes/summary", project_id), &[]).await
  }

  pub async fn theme_symbols(&self, project_id: i64, category: &str) -> Result<ThemeSymbols, AppError> {
    let query: Query = vec![("category", category.to_string())];
    self.get(&format!("/api/projects/{}/themes/symbols", project_id), &query).await
  }

  pub async fn search_symbol(&self, project_id: i64, symbol: &str) -> Result<SymbolSearch, AppError> {
    let query: Query = vec![("symbol", symbol.to_string())];
    self.get(&format!("/api/projects/{}/themes/search", project_id), &query).await
  }

  /* System themes */
  pub async fn list_system_themes(&self) -> Result<Vec<SystemTheme>, AppError> {
    let list: ListPayload<SystemTheme> = self.get("/api/system-themes", &[]).await?;
    Ok(list.into_items())
  }

  pub async fn refresh_system_theme(&self, theme_id: i64) -> Result<Value, AppError> {
    self.post(&format!("/api/system-themes/{}/refresh", theme_id), &serde_json::json!({})).await
  }

  pub async fn import_system_theme(&self, project_id: i64, request: &ImportThemeRequest) -> Result<Value, AppError> {
    self.post(&format!("/api/system-themes/projects/{}/import", project_id), request).await
  }

  pub async fn list_theme_reports(&self, project_id: i64, page: PageQuery) -> Result<Page<ThemeChangeReport>, AppError> {
    self.get(&format!("/api/system-themes/projects/{}/reports/page", project_id), &page.to_query()).await
  }

  /* Audit */
  pub async fn list_audit_logs(&self, query: &[(&'static str, String)]) -> Result<Page<AuditLog>, AppError> {
    self.get("/api/audit-logs/page", query).await
  }

  /* Lean bridge pool */
  pub async fn pool_status(&self, mode: TradeMode) -> Result<PoolStatus, AppError> {
    let query: Query = vec![("mode", mode.as_str().to_string())];
    self.get("/api/brokerage/lean/pool/status", &query).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn base_url_is_normalised() {
    let api = ApiClient::new("http://localhost:8000/");
    assert_eq!(api.base_url(), "http://localhost:8000");
    assert_eq!(api.url("/api/algorithms/page"), "http://localhost:8000/api/algorithms/page");
  }
}
