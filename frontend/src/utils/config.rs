use std::str::FromStr;
use dioxus::logger::tracing::Level;

use super::i18n::Locale;

pub const API_BASE: &str = env!("CONSOLE_API_BASE");
pub const DEFAULT_LOCALE: &str = env!("CONSOLE_LOCALE");
pub const LOG_LEVEL: &str = env!("CONSOLE_LOG_LEVEL");

/// Settings baked in at compile time by `build.rs` (from `.env` or the process env).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub api_base: String,
  pub locale: Locale,
  pub log_level: Level,
}

impl AppConfig {
  pub fn from_env() -> Self {
    Self::from_values(API_BASE, DEFAULT_LOCALE, LOG_LEVEL)
  }

  pub fn from_values(api_base: &str, locale: &str, log_level: &str) -> Self {
    Self {
      api_base: api_base.trim().trim_end_matches('/').to_string(),
      locale: Locale::from_str(locale).unwrap_or_default(),
      log_level: Level::from_str(log_level.trim()).unwrap_or(Level::INFO),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trailing_slash_is_dropped_from_api_base() {
    let cfg = AppConfig::from_values("http://quant.local:8000/ ", "zh-CN", "debug");
    assert_eq!(cfg.api_base, "http://quant.local:8000");
    assert_eq!(cfg.locale, Locale::Zh);
    assert_eq!(cfg.log_level, Level::DEBUG);
  }

  #[test]
  fn unknown_values_fall_back() {
    let cfg = AppConfig::from_values("http://localhost:8000", "fr", "loud");
    assert_eq!(cfg.locale, Locale::En);
    assert_eq!(cfg.log_level, Level::INFO);
  }
}
