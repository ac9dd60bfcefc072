use std::collections::BTreeMap;
use serde_json::{Map, Value};

use super::{
  forms::{non_empty, FormError},
  models::{Algorithm, AlgorithmParams, RiskLimits, SelectionThresholds},
  server::{AlgorithmPayload, AppError, ProjectFromVersionRequest, RunCreated, SelfTestRequest, VersionPayload},
  themes::parse_symbol_list,
};

pub const DEFAULT_BENCHMARK: &str = "SPY";
pub const HASH_PREFIX_LEN: usize = 12;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlgorithmForm {
  pub name: String,
  pub description: String,
  pub language: String,
  pub file_path: String,
  pub type_name: String,
  pub version: String,
}

impl AlgorithmForm {
  pub fn from_algorithm(algo: &Algorithm) -> Self {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    Self {
      name: algo.name.clone(),
      description: text(&algo.description),
      language: text(&algo.language),
      file_path: text(&algo.file_path),
      type_name: text(&algo.type_name),
      version: text(&algo.version),
    }
  }

  /// Body for a create. Blank optional fields are left out.
  pub fn to_payload(&self) -> Result<AlgorithmPayload, FormError> {
    let name = non_empty(&self.name).ok_or(FormError::NameRequired)?;
    Ok(AlgorithmPayload {
      name,
      description: non_empty(&self.description),
      language: non_empty(&self.language),
      file_path: non_empty(&self.file_path),
      type_name: non_empty(&self.type_name),
      version: non_empty(&self.version),
    })
  }

  /// Body for an update. Every field is sent so a cleared input clears the stored value.
  pub fn to_update_payload(&self) -> Result<AlgorithmPayload, FormError> {
    let name = non_empty(&self.name).ok_or(FormError::NameRequired)?;
    let text = |v: &str| Some(v.trim().to_string());
    Ok(AlgorithmPayload {
      name,
      description: text(&self.description),
      language: text(&self.language),
      file_path: text(&self.file_path),
      type_name: text(&self.type_name),
      version: text(&self.version),
    })
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ParamsMode {
  #[default]
  Form,
  Json,
}

/// Text inputs backing the structured params editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamsForm {
  pub cadence: String,
  pub universe: String,
  pub core_allocation: String,
  pub defensive_symbols: String,
  pub theme_weights: String,
  pub blend: String,
  pub top_n: String,
  pub min_score: String,
  pub min_volume: String,
  pub max_position_weight: String,
  pub max_drawdown: String,
  pub stop_loss: String,
  pub extra: Map<String, Value>,
}

fn parse_number(raw: &str, field: &'static str) -> Result<Option<f64>, FormError> {
  match non_empty(raw) {
    None => Ok(None),
    Some(v) => v.parse::<f64>().ok().filter(|n| n.is_finite()).map(Some).ok_or(FormError::ParamsNumber(field)),
  }
}

fn number_text(v: Option<f64>) -> String {
  v.map(|n| n.to_string()).unwrap_or_default()
}

/// `TECH=0.4, ENERGY=0.2` into a key → weight map.
fn parse_theme_weights(raw: &str) -> Result<BTreeMap<String, f64>, FormError> {
  let mut weights = BTreeMap::new();
  for pair in raw.split(|c| c == ',' || c == '\n').map(str::trim).filter(|p| !p.is_empty()) {
    let (key, value) = pair.split_once('=').ok_or(FormError::ParamsNumber("theme_weights"))?;
    let key = non_empty(key).ok_or(FormError::ParamsNumber("theme_weights"))?;
    let weight = parse_number(value, "theme_weights")?.ok_or(FormError::ParamsNumber("theme_weights"))?;
    weights.insert(key, weight);
  }
  Ok(weights)
}

impl ParamsForm {
  pub fn from_params(params: &AlgorithmParams) -> Self {
    let selection = params.selection.clone().unwrap_or_default();
    let risk = params.risk.clone().unwrap_or_default();
    Self {
      cadence: params.cadence.clone().unwrap_or_default(),
      universe: params.universe.clone().unwrap_or_default(),
      core_allocation: number_text(params.core_allocation),
      defensive_symbols: params.defensive_symbols.join(", "),
      theme_weights: params.theme_weights.iter().map(|(k, w)| format!("{}={}", k, w)).collect::<Vec<_>>().join(", "),
      blend: number_text(params.blend),
      top_n: selection.top_n.map(|n| n.to_string()).unwrap_or_default(),
      min_score: number_text(selection.min_score),
      min_volume: number_text(selection.min_volume),
      max_position_weight: number_text(risk.max_position_weight),
      max_drawdown: number_text(risk.max_drawdown),
      stop_loss: number_text(risk.stop_loss),
      extra: params.extra.clone(),
    }
  }

  pub fn to_params(&self) -> Result<AlgorithmParams, FormError> {
    let top_n = match non_empty(&self.top_n) {
      None => None,
      Some(v) => Some(v.parse::<u32>().map_err(|_| FormError::ParamsNumber("top_n"))?),
    };
    let selection = SelectionThresholds {
      top_n,
      min_score: parse_number(&self.min_score, "min_score")?,
      min_volume: parse_number(&self.min_volume, "min_volume")?,
    };
    let risk = RiskLimits {
      max_position_weight: parse_number(&self.max_position_weight, "max_position_weight")?,
      max_drawdown: parse_number(&self.max_drawdown, "max_drawdown")?,
      stop_loss: parse_number(&self.stop_loss, "stop_loss")?,
    };
    Ok(AlgorithmParams {
      cadence: non_empty(&self.cadence),
      universe: non_empty(&self.universe),
      core_allocation: parse_number(&self.core_allocation, "core_allocation")?,
      defensive_symbols: parse_symbol_list(&self.defensive_symbols),
      theme_weights: parse_theme_weights(&self.theme_weights)?,
      blend: parse_number(&self.blend, "blend")?,
      selection: (selection != SelectionThresholds::default()).then_some(selection),
      risk: (risk != RiskLimits::default()).then_some(risk),
      extra: self.extra.clone(),
    })
  }
}

/// Raw JSON params: blank means no params, otherwise it must be an object.
pub fn parse_params_json(text: &str) -> Result<Map<String, Value>, FormError> {
  if text.trim().is_empty() {
    return Ok(Map::new());
  }
  match serde_json::from_str::<Value>(text) {
    Ok(Value::Object(map)) => Ok(map),
    Ok(other) => Err(FormError::ParamsJson(format!("expected an object, got {}", kind_of(&other)))),
    Err(e) => Err(FormError::ParamsJson(e.to_string())),
  }
}

fn kind_of(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

fn params_to_map(params: &AlgorithmParams) -> Result<Map<String, Value>, FormError> {
  match serde_json::to_value(params) {
    Ok(Value::Object(map)) => Ok(map),
    Ok(_) => Ok(Map::new()),
    Err(e) => Err(FormError::ParamsJson(e.to_string())),
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamsEditor {
  pub mode: ParamsMode,
  pub form: ParamsForm,
  pub json: String,
}

impl ParamsEditor {
  pub fn payload(&self) -> Result<Map<String, Value>, FormError> {
    match self.mode {
      ParamsMode::Form => params_to_map(&self.form.to_params()?),
      ParamsMode::Json => parse_params_json(&self.json),
    }
  }

  /// Carries the current params across modes. A failed conversion leaves the editor untouched.
  pub fn switch_mode(&mut self, mode: ParamsMode) -> Result<(), FormError> {
    if mode == self.mode {
      return Ok(());
    }
    match mode {
      ParamsMode::Json => {
        let map = self.payload()?;
        self.json = if map.is_empty() {
          String::new()
        } else {
          serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| FormError::ParamsJson(e.to_string()))?
        };
      }
      ParamsMode::Form => {
        let map = parse_params_json(&self.json)?;
        let params: AlgorithmParams = serde_json::from_value(Value::Object(map)).map_err(|e| FormError::ParamsJson(e.to_string()))?;
        self.form = ParamsForm::from_params(&params);
      }
    }
    self.mode = mode;
    Ok(())
  }

  /// Fills the editor from a stored version's params.
  pub fn load(&mut self, params: Option<&Value>) {
    let map = match params {
      Some(Value::Object(map)) => map.clone(),
      _ => Map::new(),
    };
    self.json = if map.is_empty() {
      String::new()
    } else {
      serde_json::to_string_pretty(&Value::Object(map.clone())).unwrap_or_default()
    };
    match serde_json::from_value::<AlgorithmParams>(Value::Object(map)) {
      Ok(params) => self.form = ParamsForm::from_params(&params),
      // shapes the form can't hold are only editable as JSON
      Err(_) => self.mode = ParamsMode::Json,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionForm {
  pub version: String,
  pub description: String,
  pub file_path: String,
  pub content: String,
  pub params: ParamsEditor,
}

impl VersionForm {
  pub fn to_payload(&self) -> Result<VersionPayload, FormError> {
    let params = self.params.payload()?;
    let payload = VersionPayload {
      version: non_empty(&self.version),
      description: non_empty(&self.description),
      file_path: non_empty(&self.file_path),
      content: (!self.content.trim().is_empty()).then(|| self.content.clone()),
      params: (!params.is_empty()).then_some(params),
    };
    if payload.version.is_none() && payload.file_path.is_none() && payload.content.is_none() && payload.params.is_none() {
      return Err(FormError::VersionContentRequired);
    }
    Ok(payload)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiffSelection {
  pub from_id: Option<i64>,
  pub to_id: Option<i64>,
}

impl DiffSelection {
  pub fn ids(&self) -> Result<(i64, i64), FormError> {
    match (self.from_id, self.to_id) {
      (Some(from), Some(to)) => Ok((from, to)),
      _ => Err(FormError::DiffSelection),
    }
  }
}

/// Diff text exactly as the backend produced it.
pub fn render_diff(diff: &Value) -> String {
  match diff {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
  }
}

pub fn short_hash(hash: &str) -> &str {
  match hash.char_indices().nth(HASH_PREFIX_LEN) {
    Some((idx, _)) => &hash[..idx],
    None => hash,
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfTestState {
  pub benchmark: String,
  pub running: bool,
  pub run_id: Option<String>,
  pub error: Option<&'static str>,
}

impl Default for SelfTestState {
  fn default() -> Self {
    Self { benchmark: DEFAULT_BENCHMARK.to_string(), running: false, run_id: None, error: None }
  }
}

impl SelfTestState {
  pub fn request(&self, version_id: Option<i64>) -> Result<SelfTestRequest, FormError> {
    let version_id = version_id.ok_or(FormError::VersionRequired)?;
    let benchmark = non_empty(&self.benchmark).map(|b| b.to_uppercase()).unwrap_or_else(|| DEFAULT_BENCHMARK.to_string());
    Ok(SelfTestRequest { version_id, benchmark })
  }

  pub fn begin(&mut self) {
    self.running = true;
    self.run_id = None;
    self.error = None;
  }

  pub fn finish(&mut self, result: Result<RunCreated, AppError>) {
    self.running = false;
    match result {
      Ok(run) => self.run_id = Some(run.run_id()),
      Err(_) => self.error = Some("algorithms.errors.selfTest"),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFromVersionForm {
  pub name: String,
  pub description: String,
  pub lock_version: bool,
}

impl Default for ProjectFromVersionForm {
  fn default() -> Self {
    Self { name: String::new(), description: String::new(), lock_version: true }
  }
}

impl ProjectFromVersionForm {
  pub fn to_request(&self, version_id: Option<i64>) -> Result<(i64, ProjectFromVersionRequest), FormError> {
    let name = non_empty(&self.name).ok_or(FormError::ProjectNameRequired)?;
    let version_id = version_id.ok_or(FormError::VersionRequired)?;
    Ok((version_id, ProjectFromVersionRequest { name, description: non_empty(&self.description), lock_version: self.lock_version }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn algorithm_name_is_required() {
    let form = AlgorithmForm { name: "   ".into(), language: "python".into(), ..Default::default() };
    assert_eq!(form.to_payload(), Err(FormError::NameRequired));

    let form = AlgorithmForm { name: " Momentum ".into(), language: "python".into(), ..Default::default() };
    let payload = form.to_payload().unwrap();
    assert_eq!(payload.name, "Momentum");
    assert_eq!(payload.language.as_deref(), Some("python"));
    assert_eq!(payload.file_path, None);
  }

  #[test]
  fn update_sends_cleared_fields() {
    let algo = Algorithm {
      id: 4,
      name: "Momentum".into(),
      description: Some("old notes".into()),
      language: Some("python".into()),
      file_path: Some("algos/momentum.py".into()),
      type_name: None,
      version: Some("1.0".into()),
      created_at: None,
      updated_at: None,
    };
    let mut form = AlgorithmForm::from_algorithm(&algo);
    form.description = "  ".into();
    form.file_path.clear();

    let payload = form.to_update_payload().unwrap();
    assert_eq!(payload.description.as_deref(), Some(""));
    assert_eq!(payload.file_path.as_deref(), Some(""));
    let body = serde_json::to_value(&payload).unwrap();
    assert_eq!(body["description"], json!(""));
    assert_eq!(body["name"], json!("Momentum"));

    form.name = " ".into();
    assert_eq!(form.to_update_payload(), Err(FormError::NameRequired));
  }

  #[test]
  fn empty_version_is_rejected() {
    let form = VersionForm::default();
    assert_eq!(form.to_payload(), Err(FormError::VersionContentRequired));

    let mut json_only = VersionForm::default();
    json_only.params.mode = ParamsMode::Json;
    json_only.params.json = "   ".into();
    assert_eq!(json_only.to_payload(), Err(FormError::VersionContentRequired));
  }

  #[test]
  fn params_alone_permit_a_version() {
    let mut form = VersionForm::default();
    form.params.mode = ParamsMode::Json;
    form.params.json = r#"{"notes":"x"}"#.into();
    let payload = form.to_payload().unwrap();
    assert_eq!(payload.params.map(Value::Object), Some(json!({"notes": "x"})));
    assert_eq!(payload.version, None);
  }

  #[test]
  fn malformed_json_blocks_save() {
    let err = parse_params_json("{").unwrap_err();
    assert_eq!(err.key(), "algorithms.errors.paramsJson");
    assert!(matches!(parse_params_json("null"), Err(FormError::ParamsJson(_))));
    assert!(matches!(parse_params_json("[1,2]"), Err(FormError::ParamsJson(_))));
  }

  #[test]
  fn empty_object_is_an_empty_payload() {
    assert_eq!(parse_params_json("{}").unwrap(), Map::new());
  }

  #[test]
  fn structured_form_builds_nested_params() {
    let form = ParamsForm {
      cadence: "weekly".into(),
      core_allocation: "0.6".into(),
      defensive_symbols: "tlt, gld".into(),
      theme_weights: "TECH=0.4, ENERGY=0.6".into(),
      top_n: "15".into(),
      stop_loss: "0.08".into(),
      ..Default::default()
    };
    let map = params_to_map(&form.to_params().unwrap()).unwrap();
    assert_eq!(Value::Object(map), json!({
      "cadence": "weekly",
      "core_allocation": 0.6,
      "defensive_symbols": ["TLT", "GLD"],
      "theme_weights": {"ENERGY": 0.6, "TECH": 0.4},
      "selection": {"top_n": 15},
      "risk": {"stop_loss": 0.08}
    }));
  }

  #[test]
  fn bad_numbers_name_the_field() {
    let form = ParamsForm { blend: "half".into(), ..Default::default() };
    assert_eq!(form.to_params(), Err(FormError::ParamsNumber("blend")));
    let form = ParamsForm { theme_weights: "TECH".into(), ..Default::default() };
    assert_eq!(form.to_params(), Err(FormError::ParamsNumber("theme_weights")));
  }

  #[test]
  fn switching_modes_keeps_unknown_keys() {
    let mut editor = ParamsEditor { mode: ParamsMode::Json, json: r#"{"cadence":"monthly","notes":"keep me"}"#.into(), ..Default::default() };
    editor.switch_mode(ParamsMode::Form).unwrap();
    assert_eq!(editor.form.cadence, "monthly");
    assert_eq!(editor.form.extra.get("notes"), Some(&json!("keep me")));

    editor.switch_mode(ParamsMode::Json).unwrap();
    assert_eq!(parse_params_json(&editor.json).unwrap().get("notes"), Some(&json!("keep me")));
  }

  #[test]
  fn failed_switch_leaves_mode_alone() {
    let mut editor = ParamsEditor { mode: ParamsMode::Json, json: "{".into(), ..Default::default() };
    assert!(editor.switch_mode(ParamsMode::Form).is_err());
    assert_eq!(editor.mode, ParamsMode::Json);
  }

  #[test]
  fn loading_an_unusual_shape_falls_back_to_json() {
    let mut editor = ParamsEditor::default();
    editor.load(Some(&json!({"cadence": 5})));
    assert_eq!(editor.mode, ParamsMode::Json);
    assert!(editor.json.contains("\"cadence\": 5"));
  }

  #[test]
  fn diff_needs_both_ids() {
    assert_eq!(DiffSelection { from_id: Some(1), to_id: None }.ids(), Err(FormError::DiffSelection));
    assert_eq!(DiffSelection { from_id: Some(1), to_id: Some(3) }.ids(), Ok((1, 3)));
    assert_eq!(render_diff(&json!("--- a\n+++ b")), "--- a\n+++ b");
  }

  #[test]
  fn self_test_flow() {
    let mut state = SelfTestState { benchmark: " qqq ".into(), ..Default::default() };
    assert_eq!(state.request(None), Err(FormError::VersionRequired));
    assert_eq!(state.request(Some(9)).unwrap(), SelfTestRequest { version_id: 9, benchmark: "QQQ".into() });

    state.begin();
    assert!(state.running);
    state.finish(Err(AppError::Request("offline".into())));
    assert!(!state.running);
    assert_eq!(state.error, Some("algorithms.errors.selfTest"));

    state.begin();
    state.finish(Ok(RunCreated { id: json!("run-7") }));
    assert_eq!(state.run_id.as_deref(), Some("run-7"));
    assert_eq!(state.error, None);
  }

  #[test]
  fn project_from_version_requires_name_then_version() {
    let form = ProjectFromVersionForm::default();
    assert_eq!(form.to_request(Some(1)), Err(FormError::ProjectNameRequired));
    let form = ProjectFromVersionForm { name: "Growth".into(), ..Default::default() };
    assert_eq!(form.to_request(None), Err(FormError::VersionRequired));
    let (vid, req) = form.to_request(Some(4)).unwrap();
    assert_eq!(vid, 4);
    assert!(req.lock_version);
  }

  #[test]
  fn hashes_are_truncated() {
    assert_eq!(short_hash("9f86d081884c7d659a2feaa0c55ad015"), "9f86d081884c");
    assert_eq!(short_hash("abc"), "abc");
  }
}
