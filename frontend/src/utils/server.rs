use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::models::{ImportMode, ProjectConfig};

/* Server Requests */
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlgorithmPayload {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub language: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file_path: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub type_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VersionPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file_path: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub params: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfTestRequest {
  pub version_id: i64,
  pub benchmark: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectFromVersionRequest {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub lock_version: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveConfigRequest {
  pub config: ProjectConfig,
  pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportThemeRequest {
  pub theme_id: i64,
  pub mode: ImportMode,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,
}

/* Server Responses */
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub page: u64,
  #[serde(default)]
  pub page_size: u64,
}

/// Non-paged list endpoints answer either with the page envelope or a bare array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
  Paged(Page<T>),
  Items(Vec<T>),
}

impl<T> ListPayload<T> {
  pub fn into_items(self) -> Vec<T> {
    match self {
      Self::Paged(page) => page.items,
      Self::Items(items) => items,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunCreated {
  pub id: Value,
}

impl RunCreated {
  pub fn run_id(&self) -> String {
    match &self.id {
      Value::String(s) => s.clone(),
      other => other.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VersionDiff {
  #[serde(default)]
  pub from_id: Option<i64>,
  #[serde(default)]
  pub to_id: Option<i64>,
  #[serde(default)]
  pub diff: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectConfigEnvelope {
  #[serde(default)]
  pub project_id: Option<i64>,
  /// Absent when the backend only acknowledges a save.
  #[serde(default)]
  pub config: Option<ProjectConfig>,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThemeSymbols {
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymbolSearch {
  #[serde(default)]
  pub symbol: String,
  #[serde(default)]
  pub themes: Vec<String>,
}

/// Error body shapes the backend is known to send.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
  #[serde(default)]
  pub detail: Option<Value>,
  #[serde(default)]
  pub error: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

impl ErrorBody {
  pub fn into_message(self) -> Option<String> {
    self.message.or(self.error).or_else(|| self.detail.map(|d| match d {
      Value::String(s) => s,
      other => other.to_string(),
    }))
  }
}

// App Errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
  #[error("Request error: {0}")]
  Request(String),
  #[error("Server responded with {status}: {message}")]
  Status { status: u16, message: String },
  #[error("Deserialize error: {0}")]
  Decode(String),
  #[error("Serialize error: {0}")]
  Encode(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn list_payload_accepts_envelope_and_bare_array() {
    let paged: ListPayload<i64> = serde_json::from_str(r#"{"items":[1,2],"total":2,"page":1,"page_size":20}"#).unwrap();
    let bare: ListPayload<i64> = serde_json::from_str("[3]").unwrap();
    assert_eq!(paged.into_items(), vec![1, 2]);
    assert_eq!(bare.into_items(), vec![3]);
  }

  #[test]
  fn run_id_is_rendered_without_quotes() {
    let by_str: RunCreated = serde_json::from_str(r#"{"id":"bt-42"}"#).unwrap();
    let by_num: RunCreated = serde_json::from_str(r#"{"id":42}"#).unwrap();
    assert_eq!(by_str.run_id(), "bt-42");
    assert_eq!(by_num.run_id(), "42");
  }

  #[test]
  fn optional_fields_are_left_out_of_bodies() {
    let body = serde_json::to_value(AlgorithmPayload { name: "momentum".into(), ..Default::default() }).unwrap();
    assert_eq!(body, serde_json::json!({"name": "momentum"}));

    let import = serde_json::to_value(ImportThemeRequest { theme_id: 7, mode: ImportMode::PinVersion, weight: None }).unwrap();
    assert_eq!(import, serde_json::json!({"theme_id": 7, "mode": "pin_version"}));
  }

  #[test]
  fn save_acknowledgement_has_no_config() {
    let ack: ProjectConfigEnvelope = serde_json::from_str(r#"{"project_id":3,"version":"ui-20260301093000"}"#).unwrap();
    assert_eq!(ack.config, None);
    let full: ProjectConfigEnvelope = serde_json::from_str(r#"{"project_id":3,"config":{"themes":[{"key":"TECH"}]}}"#).unwrap();
    assert_eq!(full.config.map(|c| c.themes.len()), Some(1));
  }

  #[test]
  fn error_body_prefers_message() {
    let body: ErrorBody = serde_json::from_str(r#"{"detail":"not found","message":"missing project"}"#).unwrap();
    assert_eq!(body.into_message().as_deref(), Some("missing project"));
    let body: ErrorBody = serde_json::from_str(r#"{"detail":{"loc":["name"]}}"#).unwrap();
    assert_eq!(body.into_message().as_deref(), Some(r#"{"loc":["name"]}"#));
  }
}
