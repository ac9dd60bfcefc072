use dioxus::prelude::*;

use crate::utils::{
  api::{use_api, ApiClient},
  i18n::{dash, use_i18n},
  models::TradeMode,
  pool::{status_class, PoolMonitor},
};

pub(crate) async fn refresh_pool(api: ApiClient, mut monitor: Signal<PoolMonitor>) {
  let mode = monitor.read().mode;
  monitor.write().begin_refresh();
  let result = api.pool_status(mode).await;
  // a mode switch while in flight makes this answer irrelevant
  if monitor.read().mode == mode {
    monitor.write().apply(result);
  }
}

#[component]
pub fn LeanBridgePoolPage() -> Element {
  let api = use_api();
  let i18n = use_i18n();
  let monitor = use_signal(|| PoolMonitor::new(TradeMode::Paper));

  use_hook(move || {
    spawn(refresh_pool(api(), monitor));
  });

  rsx! {
    div {
      class: "page-grid",
      section {
        class: "card wide-card",
        div {
          class: "card-header",
          h2 { class: "card-title", {i18n.t("pool.title")} }
          PoolControls { monitor }
        }
        PoolTable { monitor }
      }
    }
  }
}

/// Mode toggle plus manual refresh. Switching mode refetches.
#[component]
pub fn PoolControls(monitor: Signal<PoolMonitor>) -> Element {
  let api = use_api();
  let i18n = use_i18n();
  let mut monitor = monitor;
  let current = monitor.read().mode;

  rsx! {
    div {
      class: "form-actions",
      div {
        class: "tabs",
        for mode in TradeMode::ALL {
          button {
            key: "{mode}",
            class: if mode == current { "tab tab-active" } else { "tab" },
            onclick: move |_| {
              if monitor.write().set_mode(mode) {
                spawn(refresh_pool(api(), monitor));
              }
            },
            {i18n.t(&format!("pool.mode.{}", mode.as_str()))}
          }
        }
      }
      button {
        class: "button",
        disabled: monitor.read().loading,
        onclick: move |_| {
          spawn(refresh_pool(api(), monitor));
        },
        if monitor.read().loading { {i18n.t("common.loading")} } else { {i18n.t("common.refresh")} }
      }
    }
  }
}

#[component]
pub fn PoolTable(monitor: Signal<PoolMonitor>) -> Element {
  let i18n = use_i18n();
  let state = monitor();
  let summary = i18n.t_with("pool.summary", &[
    ("total", state.clients.len().to_string()),
    ("running", state.count_with_status("running").to_string()),
  ]);

  rsx! {
    if let Some(key) = state.error {
      p { class: "form-message form-error", {i18n.t(key)} }
    }
    p {
      class: "muted",
      "{summary} · "
      {i18n.t("common.updatedAt")} ": "
      {i18n.date(state.updated_at.as_deref())}
    }
    table {
      class: "data-table",
      thead {
        tr {
          th { {i18n.t("pool.clientId")} }
          th { {i18n.t("pool.role")} }
          th { {i18n.t("pool.status")} }
          th { {i18n.t("pool.heartbeat")} }
          th { {i18n.t("pool.lastOrder")} }
          th { {i18n.t("pool.outputDir")} }
          th { {i18n.t("pool.lastError")} }
        }
      }
      tbody {
        for client in state.clients.iter().cloned() {
          tr {
            key: "{client.client_id}",
            td { class: "mono", "{client.client_id}" }
            td { "{client.role}" }
            td { span { class: status_class(&client.status), "{client.status}" } }
            td { {i18n.date(client.last_heartbeat.as_deref())} }
            td { {dash(client.last_order.as_deref())} }
            td { class: "mono", {dash(client.output_dir.as_deref())} }
            td { class: "text-danger", {dash(client.last_error.as_deref())} }
          }
        }
      }
    }
    if state.clients.is_empty() {
      p { class: "empty", {i18n.t("pool.empty")} }
    }
  }
}
