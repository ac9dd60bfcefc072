use thiserror::Error;

/// Pre-flight validation failures. These short-circuit before any request is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
  #[error("algorithm name is required")]
  NameRequired,
  #[error("a version needs a label, file path, content or params")]
  VersionContentRequired,
  #[error("params must be a JSON object: {0}")]
  ParamsJson(String),
  #[error("invalid number for {0}")]
  ParamsNumber(&'static str),
  #[error("select two versions to diff")]
  DiffSelection,
  #[error("select a version first")]
  VersionRequired,
  #[error("project name is required")]
  ProjectNameRequired,
  #[error("theme key is required")]
  ThemeKeyRequired,
  #[error("duplicate theme key {0}")]
  DuplicateThemeKey(String),
  #[error("symbol is required")]
  SymbolRequired,
  #[error("select two themes to compare")]
  CompareSelection,
}

impl FormError {
  /// i18n key shown to the operator.
  pub fn key(&self) -> &'static str {
    match self {
      Self::NameRequired => "algorithms.errors.nameRequired",
      Self::VersionContentRequired => "algorithms.errors.versionContentRequired",
      Self::ParamsJson(_) => "algorithms.errors.paramsJson",
      Self::ParamsNumber(_) => "algorithms.errors.paramsNumber",
      Self::DiffSelection => "algorithms.errors.diffSelection",
      Self::VersionRequired => "algorithms.errors.versionRequired",
      Self::ProjectNameRequired => "algorithms.errors.projectName",
      Self::ThemeKeyRequired => "themes.errors.keyRequired",
      Self::DuplicateThemeKey(_) => "themes.errors.duplicateKey",
      Self::SymbolRequired => "themes.errors.symbolRequired",
      Self::CompareSelection => "themes.errors.compareSelection",
    }
  }
}

/// Trimmed value, `None` when blank.
pub fn non_empty(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_strings_are_none() {
    assert_eq!(non_empty("   "), None);
    assert_eq!(non_empty(" SPY "), Some("SPY".to_string()));
  }

  #[test]
  fn keys_are_namespaced_by_page() {
    assert_eq!(FormError::DuplicateThemeKey("TECH".into()).key(), "themes.errors.duplicateKey");
    assert_eq!(FormError::ParamsJson("eof".into()).key(), "algorithms.errors.paramsJson");
  }
}
