use dioxus::logger::tracing::warn;

use super::{
  models::{PoolClient, PoolStatus, TradeMode},
  server::AppError,
};

pub const LOAD_ERROR: &str = "pool.errors.load";

/// Bridge pool view state. A failed refresh keeps the last list on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolMonitor {
  pub mode: TradeMode,
  pub clients: Vec<PoolClient>,
  pub updated_at: Option<String>,
  pub error: Option<&'static str>,
  pub loading: bool,
}

impl PoolMonitor {
  pub fn new(mode: TradeMode) -> Self {
    Self { mode, ..Default::default() }
  }

  /// Returns whether the mode changed (and a refresh is due).
  pub fn set_mode(&mut self, mode: TradeMode) -> bool {
    let changed = self.mode != mode;
    self.mode = mode;
    changed
  }

  pub fn begin_refresh(&mut self) {
    self.loading = true;
  }

  pub fn apply(&mut self, result: Result<PoolStatus, AppError>) {
    self.loading = false;
    match result {
      Ok(status) => {
        self.clients = status.clients;
        self.updated_at = status.updated_at;
        self.error = None;
      }
      Err(e) => {
        warn!("pool status for {} failed: {}", self.mode, e);
        self.error = Some(LOAD_ERROR);
      }
    }
  }

  pub fn count_with_status(&self, status: &str) -> usize {
    self.clients.iter().filter(|c| c.status.eq_ignore_ascii_case(status)).count()
  }
}

/// CSS modifier for a client status badge.
pub fn status_class(status: &str) -> &'static str {
  match status.to_lowercase().as_str() {
    "running" | "ready" | "idle" | "online" => "badge badge-ok",
    "starting" | "busy" | "leased" => "badge badge-warn",
    "error" | "failed" | "offline" | "stopped" => "badge badge-danger",
    _ => "badge",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(id: &str, status: &str) -> PoolClient {
    PoolClient { client_id: id.into(), role: "worker".into(), status: status.into(), ..Default::default() }
  }

  #[test]
  fn failed_refresh_keeps_previous_clients() {
    let mut monitor = PoolMonitor::new(TradeMode::Paper);
    monitor.begin_refresh();
    monitor.apply(Ok(PoolStatus { mode: TradeMode::Paper, clients: vec![client("c1", "running")], updated_at: None }));
    assert_eq!(monitor.clients.len(), 1);
    assert_eq!(monitor.error, None);

    monitor.begin_refresh();
    monitor.apply(Err(AppError::Request("connection refused".into())));
    assert!(!monitor.loading);
    assert_eq!(monitor.error, Some(LOAD_ERROR));
    assert_eq!(monitor.clients, vec![client("c1", "running")]);

    monitor.apply(Ok(PoolStatus::default()));
    assert_eq!(monitor.error, None);
    assert!(monitor.clients.is_empty());
  }

  #[test]
  fn mode_switch_reports_change() {
    let mut monitor = PoolMonitor::default();
    assert!(!monitor.set_mode(TradeMode::Paper));
    assert!(monitor.set_mode(TradeMode::Live));
  }

  #[test]
  fn statuses_are_counted_case_insensitively() {
    let monitor = PoolMonitor { clients: vec![client("a", "Running"), client("b", "running"), client("c", "error")], ..Default::default() };
    assert_eq!(monitor.count_with_status("running"), 2);
    assert_eq!(status_class("ERROR"), "badge badge-danger");
  }
}
