use std::{collections::BTreeMap, fmt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/* Algorithms */
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Algorithm {
  pub id: i64,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub language: Option<String>,
  #[serde(default)]
  pub file_path: Option<String>,
  #[serde(default)]
  pub type_name: Option<String>,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlgorithmVersion {
  pub id: i64,
  pub algorithm_id: i64,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub file_path: Option<String>,
  #[serde(default)]
  pub content: Option<String>,
  #[serde(default)]
  pub content_hash: Option<String>,
  #[serde(default)]
  pub params: Option<Value>,
  #[serde(default)]
  pub created_at: Option<String>,
}

impl AlgorithmVersion {
  pub fn label(&self) -> String {
    match self.version.as_deref().filter(|v| !v.trim().is_empty()) {
      Some(v) => format!("#{} {}", self.id, v),
      None => format!("#{}", self.id),
    }
  }
}

/// Strategy parameter blob. Keys the console does not know about ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AlgorithmParams {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cadence: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub universe: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub core_allocation: Option<f64>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub defensive_symbols: Vec<String>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub theme_weights: BTreeMap<String, f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blend: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub selection: Option<SelectionThresholds>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub risk: Option<RiskLimits>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SelectionThresholds {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub top_n: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_score: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_volume: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RiskLimits {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_position_weight: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_drawdown: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stop_loss: Option<f64>,
}

/* Projects */
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
  pub id: i64,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub algorithm_id: Option<i64>,
  #[serde(default)]
  pub locked_version_id: Option<i64>,
  #[serde(default)]
  pub created_at: Option<String>,
}

/// Project config document. Saved by full replace, so unknown keys are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub template: Option<String>,
  #[serde(default)]
  pub universe: UniverseConfig,
  #[serde(default)]
  pub data: DataConfig,
  #[serde(default)]
  pub themes: Vec<ThemeConfigItem>,
  #[serde(default)]
  pub weights: BTreeMap<String, f64>,
  #[serde(default)]
  pub categories: Vec<String>,
  #[serde(default)]
  pub symbol_types: BTreeMap<String, String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UniverseConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mode: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DataConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vendor: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThemeConfigItem {
  pub key: String,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub weight: f64,
  #[serde(default)]
  pub priority: i32,
  #[serde(default)]
  pub keywords: Vec<String>,
  #[serde(default)]
  pub manual: Vec<String>,
  #[serde(default)]
  pub exclude: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub system: Option<SystemThemeLink>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SystemThemeLink {
  pub theme_id: i64,
  pub mode: ImportMode,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
  #[default]
  FollowLatest,
  PinVersion,
  Snapshot,
}

impl ImportMode {
  pub const ALL: [ImportMode; 3] = [ImportMode::FollowLatest, ImportMode::PinVersion, ImportMode::Snapshot];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::FollowLatest => "follow_latest",
      Self::PinVersion => "pin_version",
      Self::Snapshot => "snapshot",
    }
  }

  pub fn from_value(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|m| m.as_str() == s)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThemeSummary {
  #[serde(default)]
  pub project_id: Option<i64>,
  #[serde(default)]
  pub themes: Vec<ThemeSummaryItem>,
  #[serde(default)]
  pub total_symbols: usize,
  #[serde(default)]
  pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThemeSummaryItem {
  pub key: String,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub weight: f64,
  #[serde(default)]
  pub symbol_count: usize,
  #[serde(default)]
  pub sample: Vec<String>,
  #[serde(default)]
  pub manual_count: usize,
  #[serde(default)]
  pub exclude_count: usize,
}

/* System themes */
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SystemTheme {
  pub id: i64,
  pub key: String,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub latest_version: Option<SystemThemeVersion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SystemThemeVersion {
  pub id: i64,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThemeChangeReport {
  pub id: i64,
  pub project_id: i64,
  pub theme_id: i64,
  #[serde(default)]
  pub theme_key: Option<String>,
  #[serde(default)]
  pub from_version_id: Option<i64>,
  #[serde(default)]
  pub to_version_id: Option<i64>,
  #[serde(default)]
  pub diff: BTreeMap<String, FieldDiff>,
  #[serde(default)]
  pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldDiff {
  #[serde(default)]
  pub added: Vec<String>,
  #[serde(default)]
  pub removed: Vec<String>,
}

/* Audit */
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuditLog {
  pub id: i64,
  #[serde(default)]
  pub actor: Option<String>,
  pub action: String,
  #[serde(default)]
  pub resource_type: Option<String>,
  #[serde(default)]
  pub resource_id: Option<String>,
  #[serde(default)]
  pub detail: Value,
  #[serde(default)]
  pub created_at: Option<String>,
}

/* Lean bridge pool */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeMode {
  #[default]
  Paper,
  Live,
}

impl TradeMode {
  pub const ALL: [TradeMode; 2] = [TradeMode::Paper, TradeMode::Live];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Paper => "paper",
      Self::Live => "live",
    }
  }

}

impl fmt::Display for TradeMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PoolStatus {
  #[serde(default)]
  pub mode: TradeMode,
  #[serde(default)]
  pub clients: Vec<PoolClient>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PoolClient {
  pub client_id: String,
  #[serde(default)]
  pub role: String,
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub last_heartbeat: Option<String>,
  #[serde(default)]
  pub last_order: Option<String>,
  #[serde(default)]
  pub output_dir: Option<String>,
  #[serde(default)]
  pub last_error: Option<String>,
}
