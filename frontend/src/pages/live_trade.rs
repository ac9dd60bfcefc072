use dioxus::{logger::tracing::warn, prelude::*};

use crate::{
  pages::lean_pool::{refresh_pool, PoolControls, PoolTable},
  utils::{
    api::{use_api, ApiClient},
    i18n::use_i18n,
    models::{Project, ThemeSummary, TradeMode},
    pagination::PageQuery,
    pool::PoolMonitor,
  }
};

const PROJECT_PICKER_SIZE: u64 = 100;

async fn fetch_projects(api: ApiClient, mut projects: Signal<Vec<Project>>) {
  match api.list_projects(PageQuery { page: 1, page_size: PROJECT_PICKER_SIZE }).await {
    Ok(result) => projects.set(result.items),
    Err(e) => {
      warn!("loading projects failed: {}", e);
      projects.set(vec![]);
    }
  }
}

async fn fetch_summary(api: ApiClient, project_id: i64, mut summary: Signal<Option<ThemeSummary>>) {
  match api.theme_summary(project_id).await {
    Ok(result) => summary.set(Some(result)),
    Err(e) => {
      warn!("loading theme summary of project {} failed: {}", project_id, e);
      summary.set(None);
    }
  }
}

/// Read-only trading overview: one project's themes next to the bridge pool.
#[component]
pub fn LiveTradePage() -> Element {
  let api = use_api();
  let i18n = use_i18n();
  let projects: Signal<Vec<Project>> = use_signal(Vec::new);
  let mut selected: Signal<Option<i64>> = use_signal(|| None);
  let summary: Signal<Option<ThemeSummary>> = use_signal(|| None);
  let monitor = use_signal(|| PoolMonitor::new(TradeMode::Paper));

  use_hook(move || {
    spawn(fetch_projects(api(), projects));
    spawn(refresh_pool(api(), monitor));
  });

  rsx! {
    div {
      class: "page-grid",
      section {
        class: "card",
        h2 { class: "card-title", {i18n.t("live.title")} }
        div {
          class: "form-group",
          label { class: "form-label", {i18n.t("live.project")} }
          select {
            class: "form-input",
            onchange: move |evt| {
              let project_id = evt.value().parse::<i64>().ok();
              selected.set(project_id);
              if let Some(project_id) = project_id {
                spawn(fetch_summary(api(), project_id, summary));
              }
            },
            option { value: "", selected: selected().is_none(), {i18n.t("common.choose")} }
            for project in projects() {
              option { key: "{project.id}", value: "{project.id}", selected: selected() == Some(project.id), "{project.name}" }
            }
          }
        }
        if let Some(current) = summary() {
          p {
            class: "muted",
            {i18n.t_with("themes.totalSymbols", &[("count", current.total_symbols.to_string())])}
            " · "
            {i18n.date(current.updated_at.as_deref())}
          }
          ul {
            class: "summary-list",
            for item in current.themes.clone() {
              li {
                key: "{item.key}",
                strong { "{item.key}" }
                " {item.label} · "
                {format!("{:.1}%", item.weight * 100.0)}
                " · "
                {i18n.t_with("live.symbolCount", &[("count", item.symbol_count.to_string())])}
              }
            }
          }
        } else {
          p { class: "empty", {i18n.t("live.noSummary")} }
        }
      }
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
