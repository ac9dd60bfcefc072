use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use chrono::{DateTime, Utc};

use super::{
  forms::FormError,
  models::{ProjectConfig, ThemeConfigItem},
  server::SaveConfigRequest,
};

/// Drafts whose weights sum further than this from 1 get a warning.
pub const WEIGHT_TOLERANCE: f64 = 0.02;
/// Symbol-type override value that also excludes the ticker from every theme.
pub const EXCLUDE_TYPE: &str = "exclude";

pub fn normalize_symbol(raw: &str) -> Option<String> {
  let symbol = raw.trim().to_uppercase();
  if symbol.is_empty() {
    None
  } else {
    Some(symbol)
  }
}

/// Splits on commas and whitespace, uppercases, drops repeats (first one wins).
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  raw.split(|c: char| c == ',' || c.is_whitespace())
    .filter_map(normalize_symbol)
    .filter(|s| seen.insert(s.clone()))
    .collect()
}

pub fn parse_keywords(raw: &str) -> Vec<String> {
  raw.split(',').map(str::trim).filter(|k| !k.is_empty()).map(str::to_string).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSummary {
  pub total: f64,
  pub warning: bool,
}

pub fn weight_summary(themes: &[ThemeConfigItem]) -> WeightSummary {
  let total: f64 = themes.iter().map(|t| t.weight).sum();
  WeightSummary { total, warning: (total - 1.0).abs() > WEIGHT_TOLERANCE }
}

/// Rescales weights to sum to 1. Leaves them alone when the total is zero.
pub fn normalize_weights(themes: &mut [ThemeConfigItem]) {
  let total: f64 = themes.iter().map(|t| t.weight).sum();
  if total.abs() < f64::EPSILON {
    return;
  }
  for theme in themes.iter_mut() {
    theme.weight /= total;
  }
}

pub fn validate_keys(themes: &[ThemeConfigItem]) -> Result<(), FormError> {
  let mut seen = HashSet::new();
  for theme in themes {
    let key = theme.key.trim();
    if key.is_empty() {
      return Err(FormError::ThemeKeyRequired);
    }
    if !seen.insert(key) {
      return Err(FormError::DuplicateThemeKey(key.to_string()));
    }
  }
  Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeComparison {
  pub shared: Vec<String>,
  pub only_a: Vec<String>,
  pub only_b: Vec<String>,
}

pub fn compare_symbols(a: &[String], b: &[String]) -> ThemeComparison {
  let a: BTreeSet<&String> = a.iter().collect();
  let b: BTreeSet<&String> = b.iter().collect();
  ThemeComparison {
    shared: a.intersection(&b).map(|s| s.to_string()).collect(),
    only_a: a.difference(&b).map(|s| s.to_string()).collect(),
    only_b: b.difference(&a).map(|s| s.to_string()).collect(),
  }
}

pub fn symbols_csv(symbols: &[String]) -> String {
  std::iter::once("symbol").chain(symbols.iter().map(String::as_str)).collect::<Vec<_>>().join("\n")
}

pub fn csv_file_name(project: &str, theme: &str) -> String {
  let clean = |s: &str| -> String {
    s.trim().chars().map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' }).collect()
  };
  format!("{}-{}.csv", clean(project), clean(theme))
}

pub fn version_tag(now: DateTime<Utc>) -> String {
  format!("ui-{}", now.format("%Y%m%d%H%M%S"))
}

/// In-memory draft of a project's theme list plus the symbol-type overrides.
///
/// Every draft row carries a row id that survives reorders, and every change bumps `revision`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeEditor {
  pub base: ProjectConfig,
  pub drafts: Vec<ThemeConfigItem>,
  pub overrides: BTreeMap<String, String>,
  pub dirty: bool,
  pub revision: u64,
  row_ids: Vec<u64>,
  next_row: u64,
}

fn normalized_overrides(config: &ProjectConfig) -> BTreeMap<String, String> {
  config.symbol_types.iter().filter_map(|(k, v)| normalize_symbol(k).map(|k| (k, v.clone()))).collect()
}

impl ThemeEditor {
  pub fn load(config: ProjectConfig) -> Self {
    let mut editor = Self {
      drafts: config.themes.clone(),
      overrides: normalized_overrides(&config),
      base: config,
      ..Default::default()
    };
    editor.row_ids = (0..editor.drafts.len() as u64).collect();
    editor.next_row = editor.drafts.len() as u64;
    editor
  }

  fn touch(&mut self) {
    self.dirty = true;
    self.revision += 1;
  }

  /// Stable id of the draft at `idx`.
  pub fn row_id(&self, idx: usize) -> Option<u64> {
    self.row_ids.get(idx).copied()
  }

  pub fn rows(&self) -> impl Iterator<Item = (u64, &ThemeConfigItem)> + '_ {
    self.row_ids.iter().copied().zip(self.drafts.iter())
  }

  pub fn weight_summary(&self) -> WeightSummary {
    weight_summary(&self.drafts)
  }

  pub fn keys(&self) -> Vec<String> {
    self.drafts.iter().map(|t| t.key.clone()).collect()
  }

  pub fn position(&self, key: &str) -> Option<usize> {
    self.drafts.iter().position(|t| t.key == key)
  }

  /// Appends a blank theme with an unused `THEME_n` key and returns its index.
  pub fn add_theme(&mut self) -> usize {
    let mut n = self.drafts.len() + 1;
    while self.drafts.iter().any(|t| t.key == format!("THEME_{}", n)) {
      n += 1;
    }
    self.drafts.push(ThemeConfigItem {
      key: format!("THEME_{}", n),
      label: format!("Theme {}", n),
      priority: n as i32,
      ..Default::default()
    });
    self.row_ids.push(self.next_row);
    self.next_row += 1;
    self.touch();
    self.drafts.len() - 1
  }

  pub fn remove_theme(&mut self, idx: usize) {
    if idx < self.drafts.len() {
      self.drafts.remove(idx);
      self.row_ids.remove(idx);
      self.touch();
    }
  }

  pub fn move_theme(&mut self, idx: usize, up: bool) {
    let target = if up { idx.checked_sub(1) } else { Some(idx + 1) };
    if let Some(target) = target.filter(|t| *t < self.drafts.len()) {
      if idx < self.drafts.len() {
        self.drafts.swap(idx, target);
        self.row_ids.swap(idx, target);
        self.touch();
      }
    }
  }

  fn edit(&mut self, idx: usize, f: impl FnOnce(&mut ThemeConfigItem)) {
    if let Some(theme) = self.drafts.get_mut(idx) {
      f(theme);
      self.touch();
    }
  }

  pub fn rename_key(&mut self, idx: usize, key: &str) {
    self.edit(idx, |t| t.key = key.trim().to_string());
  }

  pub fn set_label(&mut self, idx: usize, label: &str) {
    self.edit(idx, |t| t.label = label.to_string());
  }

  pub fn set_weight(&mut self, idx: usize, weight: f64) {
    if weight.is_finite() {
      self.edit(idx, |t| t.weight = weight);
    }
  }

  pub fn set_priority(&mut self, idx: usize, priority: i32) {
    self.edit(idx, |t| t.priority = priority);
  }

  pub fn set_keywords(&mut self, idx: usize, raw: &str) {
    self.edit(idx, |t| t.keywords = parse_keywords(raw));
  }

  pub fn normalize_weights(&mut self) {
    normalize_weights(&mut self.drafts);
    self.touch();
  }

  /// Adds symbols to the manual list. A symbol can't be manual and excluded in the same theme.
  pub fn add_manual(&mut self, idx: usize, raw: &str) -> bool {
    let symbols = parse_symbol_list(raw);
    let Some(theme) = self.drafts.get_mut(idx) else { return false };
    let mut changed = false;
    for symbol in symbols {
      theme.exclude.retain(|s| *s != symbol);
      if !theme.manual.contains(&symbol) {
        theme.manual.push(symbol);
        changed = true;
      }
    }
    if changed {
      self.touch();
    }
    changed
  }

  pub fn add_exclude(&mut self, idx: usize, raw: &str) -> bool {
    let symbols = parse_symbol_list(raw);
    let Some(theme) = self.drafts.get_mut(idx) else { return false };
    let mut changed = false;
    for symbol in symbols {
      theme.manual.retain(|s| *s != symbol);
      if !theme.exclude.contains(&symbol) {
        theme.exclude.push(symbol);
        changed = true;
      }
    }
    if changed {
      self.touch();
    }
    changed
  }

  /// Flips a symbol in or out of the manual list.
  pub fn toggle_manual(&mut self, idx: usize, symbol: &str) -> bool {
    let Some(symbol) = normalize_symbol(symbol) else { return false };
    let Some(theme) = self.drafts.get(idx) else { return false };
    if theme.manual.contains(&symbol) {
      self.edit(idx, |t| t.manual.retain(|s| *s != symbol));
      true
    } else {
      self.add_manual(idx, &symbol)
    }
  }

  pub fn toggle_exclude(&mut self, idx: usize, symbol: &str) -> bool {
    let Some(symbol) = normalize_symbol(symbol) else { return false };
    let Some(theme) = self.drafts.get(idx) else { return false };
    if theme.exclude.contains(&symbol) {
      self.edit(idx, |t| t.exclude.retain(|s| *s != symbol));
      true
    } else {
      self.add_exclude(idx, &symbol)
    }
  }

  pub fn set_override(&mut self, ticker: &str, kind: &str) -> Result<(), FormError> {
    let ticker = normalize_symbol(ticker).ok_or(FormError::SymbolRequired)?;
    let kind = kind.trim();
    if kind.is_empty() {
      self.overrides.remove(&ticker);
    } else {
      self.overrides.insert(ticker, kind.to_lowercase());
    }
    self.touch();
    Ok(())
  }

  pub fn remove_override(&mut self, ticker: &str) {
    if let Some(ticker) = normalize_symbol(ticker) {
      if self.overrides.remove(&ticker).is_some() {
        self.touch();
      }
    }
  }

  /// Full config document to POST. Fails without building anything when keys are blank or repeated.
  pub fn build_save_request(&self, now: DateTime<Utc>) -> Result<SaveConfigRequest, FormError> {
    validate_keys(&self.drafts)?;

    let mut themes = self.drafts.clone();
    for theme in themes.iter_mut() {
      theme.key = theme.key.trim().to_string();
    }
    for (ticker, kind) in &self.overrides {
      if kind.eq_ignore_ascii_case(EXCLUDE_TYPE) {
        for theme in themes.iter_mut() {
          theme.manual.retain(|s| s != ticker);
          if !theme.exclude.contains(ticker) {
            theme.exclude.push(ticker.clone());
          }
        }
      }
    }

    let mut config = self.base.clone();
    config.weights = themes.iter().map(|t| (t.key.clone(), t.weight)).collect();
    let mut ordered: Vec<&ThemeConfigItem> = themes.iter().collect();
    ordered.sort_by_key(|t| t.priority);
    config.categories = ordered.iter().map(|t| t.key.clone()).collect();
    config.symbol_types = self.overrides.clone();
    config.themes = themes;

    Ok(SaveConfigRequest { config, version: version_tag(now) })
  }

  /// Takes the stored document after a save built at `revision`.
  /// Drafts edited since then are kept and stay dirty; only the base moves forward.
  pub fn apply_saved(&mut self, config: ProjectConfig, revision: u64) {
    if self.revision != revision {
      self.base = config;
      return;
    }
    let row_ids = std::mem::take(&mut self.row_ids);
    let (next_row, revision) = (self.next_row, self.revision);
    *self = Self::load(config);
    if row_ids.len() == self.drafts.len() {
      self.row_ids = row_ids;
      self.next_row = next_row;
    } else {
      self.row_ids = (next_row..next_row + self.drafts.len() as u64).collect();
      self.next_row = next_row + self.drafts.len() as u64;
    }
    self.revision = revision;
  }
}

/// Which project is picked and whose config actually reached the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectFocus {
  selected: Option<i64>,
  loaded: Option<i64>,
}

impl ProjectFocus {
  pub fn select(&mut self, project_id: i64) {
    self.selected = Some(project_id);
    self.loaded = None;
  }

  pub fn selected(&self) -> Option<i64> {
    self.selected
  }

  /// Whether a response fetched for `project_id` still belongs on screen.
  pub fn accepts(&self, project_id: i64) -> bool {
    self.selected == Some(project_id)
  }

  pub fn mark_loaded(&mut self, project_id: i64) {
    if self.accepts(project_id) {
      self.loaded = Some(project_id);
    }
  }

  pub fn mark_failed(&mut self, project_id: i64) {
    if self.accepts(project_id) {
      self.loaded = None;
    }
  }

  /// Saving is only allowed once the selected project's config is in the editor.
  pub fn can_save(&self, project_id: i64) -> bool {
    self.accepts(project_id) && self.loaded == Some(project_id)
  }
}

/// Symbol sets fetched for one project during a page session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolCache {
  project_id: Option<i64>,
  entries: HashMap<String, Vec<String>>,
}

impl SymbolCache {
  pub fn get(&self, project_id: i64, key: &str) -> Option<&Vec<String>> {
    if self.project_id != Some(project_id) {
      return None;
    }
    self.entries.get(key)
  }

  pub fn insert(&mut self, project_id: i64, key: &str, symbols: Vec<String>) {
    if self.project_id != Some(project_id) {
      self.entries.clear();
      self.project_id = Some(project_id);
    }
    self.entries.insert(key.to_string(), symbols);
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn theme(key: &str, weight: f64) -> ThemeConfigItem {
    ThemeConfigItem { key: key.into(), label: key.into(), weight, ..Default::default() }
  }

  fn editor_with(themes: Vec<ThemeConfigItem>) -> ThemeEditor {
    ThemeEditor::load(ProjectConfig { themes, ..Default::default() })
  }

  fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn weights_summing_to_one_do_not_warn() {
    let summary = weight_summary(&[theme("A", 0.4), theme("B", 0.35), theme("C", 0.25)]);
    assert!((summary.total - 1.0).abs() < 1e-9);
    assert!(!summary.warning);
  }

  #[test]
  fn short_weights_warn() {
    let summary = weight_summary(&[theme("A", 0.4), theme("B", 0.3)]);
    assert!((summary.total - 0.7).abs() < 1e-9);
    assert!(summary.warning);
  }

  #[test]
  fn normalize_rescales_and_skips_zero() {
    let mut themes = vec![theme("A", 2.0), theme("B", 2.0)];
    normalize_weights(&mut themes);
    assert_eq!(themes[0].weight, 0.5);
    let mut zeros = vec![theme("A", 0.0)];
    normalize_weights(&mut zeros);
    assert_eq!(zeros[0].weight, 0.0);
  }

  #[test]
  fn comparison_splits_sets() {
    let cmp = compare_symbols(&strings(&["AAPL", "MSFT"]), &strings(&["MSFT", "GOOG"]));
    assert_eq!(cmp.shared, strings(&["MSFT"]));
    assert_eq!(cmp.only_a, strings(&["AAPL"]));
    assert_eq!(cmp.only_b, strings(&["GOOG"]));

    let swapped = compare_symbols(&strings(&["MSFT", "GOOG"]), &strings(&["AAPL", "MSFT"]));
    assert_eq!(swapped.shared, cmp.shared);
    assert_eq!(swapped.only_a, cmp.only_b);
    assert_eq!(swapped.only_b, cmp.only_a);
  }

  #[test]
  fn csv_has_header_and_one_ticker_per_line() {
    assert_eq!(symbols_csv(&strings(&["AAPL", "MSFT"])), "symbol\nAAPL\nMSFT");
    assert_eq!(symbols_csv(&[]), "symbol");
    assert_eq!(csv_file_name("Growth Fund", "TECH"), "Growth_Fund-TECH.csv");
  }

  #[test]
  fn duplicate_keys_block_the_save() {
    let editor = editor_with(vec![theme("TECH", 0.5), theme("TECH", 0.5)]);
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    assert_eq!(editor.build_save_request(now), Err(FormError::DuplicateThemeKey("TECH".into())));

    let blank = editor_with(vec![theme("  ", 1.0)]);
    assert_eq!(blank.build_save_request(now), Err(FormError::ThemeKeyRequired));
  }

  #[test]
  fn save_request_recomputes_weights_and_categories() {
    let mut editor = ThemeEditor::load(ProjectConfig {
      template: Some("thematic".into()),
      themes: vec![
        ThemeConfigItem { priority: 2, ..theme("TECH", 0.6) },
        ThemeConfigItem { priority: 1, ..theme("ENERGY", 0.4) },
      ],
      symbol_types: BTreeMap::from([("spy".to_string(), "etf".to_string())]),
      ..Default::default()
    });
    editor.add_manual(0, "nvda");
    editor.set_override("xom", "exclude").unwrap();

    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 5).unwrap();
    let req = editor.build_save_request(now).unwrap();
    assert_eq!(req.version, "ui-20260301093005");
    assert_eq!(req.config.template.as_deref(), Some("thematic"));
    assert_eq!(req.config.weights, BTreeMap::from([("ENERGY".to_string(), 0.4), ("TECH".to_string(), 0.6)]));
    assert_eq!(req.config.categories, strings(&["ENERGY", "TECH"]));
    assert_eq!(req.config.symbol_types.get("SPY").map(String::as_str), Some("etf"));
    assert_eq!(req.config.symbol_types.get("XOM").map(String::as_str), Some("exclude"));
    assert_eq!(req.config.themes[0].manual, strings(&["NVDA"]));
    assert!(req.config.themes.iter().all(|t| t.exclude.contains(&"XOM".to_string())));
  }

  #[test]
  fn manual_and_exclude_are_exclusive() {
    let mut editor = editor_with(vec![theme("TECH", 1.0)]);
    assert!(editor.add_manual(0, " aapl, msft aapl"));
    assert_eq!(editor.drafts[0].manual, strings(&["AAPL", "MSFT"]));

    assert!(editor.toggle_exclude(0, "msft"));
    assert_eq!(editor.drafts[0].manual, strings(&["AAPL"]));
    assert_eq!(editor.drafts[0].exclude, strings(&["MSFT"]));

    assert!(editor.toggle_exclude(0, "MSFT"));
    assert!(editor.drafts[0].exclude.is_empty());
    assert!(!editor.toggle_manual(0, "   "));
    assert!(!editor.add_manual(5, "AAPL"));
  }

  #[test]
  fn add_theme_picks_unused_key() {
    let mut editor = editor_with(vec![theme("THEME_2", 0.0)]);
    let idx = editor.add_theme();
    assert_eq!(editor.drafts[idx].key, "THEME_3");
    assert!(editor.dirty);
    editor.move_theme(idx, true);
    assert_eq!(editor.keys(), strings(&["THEME_3", "THEME_2"]));
    editor.move_theme(0, true);
    assert_eq!(editor.keys(), strings(&["THEME_3", "THEME_2"]));
  }

  #[test]
  fn symbol_cache_is_scoped_to_one_project() {
    let mut cache = SymbolCache::default();
    cache.insert(1, "TECH", strings(&["AAPL"]));
    assert_eq!(cache.get(1, "TECH"), Some(&strings(&["AAPL"])));
    assert_eq!(cache.get(2, "TECH"), None);
    cache.insert(2, "ENERGY", strings(&["XOM"]));
    assert_eq!(cache.get(1, "TECH"), None);
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn removed_overrides_leave_the_saved_document() {
    let mut editor = ThemeEditor::load(ProjectConfig {
      themes: vec![theme("TECH", 1.0)],
      symbol_types: BTreeMap::from([("tsla".to_string(), "etf".to_string()), ("SPY".to_string(), "etf".to_string())]),
      ..Default::default()
    });
    editor.remove_override("TSLA");
    editor.set_override("spy", "  ").unwrap();
    assert!(editor.dirty);

    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    let req = editor.build_save_request(now).unwrap();
    assert!(req.config.symbol_types.is_empty());
  }

  #[test]
  fn edits_made_while_saving_are_kept() {
    let mut editor = editor_with(vec![theme("TECH", 1.0)]);
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    let revision = editor.revision;
    let req = editor.build_save_request(now).unwrap();

    editor.set_label(0, "Technology");
    editor.apply_saved(req.config.clone(), revision);
    assert_eq!(editor.drafts[0].label, "Technology");
    assert!(editor.dirty);
    assert_eq!(editor.base.categories, strings(&["TECH"]));

    let revision = editor.revision;
    let req = editor.build_save_request(now).unwrap();
    let row = editor.row_id(0);
    editor.apply_saved(req.config, revision);
    assert!(!editor.dirty);
    assert_eq!(editor.drafts[0].label, "Technology");
    assert_eq!(editor.row_id(0), row);
  }

  #[test]
  fn row_ids_follow_their_theme() {
    let mut editor = editor_with(vec![theme("A", 0.3), theme("B", 0.3), theme("C", 0.4)]);
    let ids: Vec<Option<u64>> = (0..3).map(|i| editor.row_id(i)).collect();

    editor.move_theme(2, true);
    assert_eq!(editor.keys(), strings(&["A", "C", "B"]));
    assert_eq!(editor.row_id(1), ids[2]);

    editor.remove_theme(0);
    assert_eq!(editor.row_id(0), ids[2]);
    assert_eq!(editor.row_id(1), ids[1]);

    let idx = editor.add_theme();
    assert!(!ids.contains(&editor.row_id(idx)));
    assert_eq!(editor.row_id(3), None);
  }

  #[test]
  fn focus_only_saves_a_loaded_selection() {
    let mut focus = ProjectFocus::default();
    assert!(!focus.can_save(1));

    focus.select(1);
    focus.select(2);
    assert!(!focus.accepts(1));
    focus.mark_loaded(1);
    assert!(!focus.can_save(1));
    assert!(!focus.can_save(2));

    focus.mark_loaded(2);
    assert!(focus.can_save(2));
    focus.mark_failed(2);
    assert!(!focus.can_save(2));

    focus.mark_loaded(2);
    focus.select(3);
    assert_eq!(focus.selected(), Some(3));
    assert!(!focus.can_save(3));
  }
}
