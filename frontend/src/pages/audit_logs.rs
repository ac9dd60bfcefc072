use dioxus::{logger::tracing::warn, prelude::*};

use crate::{
  components::pagination::Pagination,
  utils::{
    api::{use_api, ApiClient},
    audit::{detail_pretty, AuditLogFilter},
    i18n::{dash, use_i18n},
    models::AuditLog,
    pagination::{PageChange, PageState},
  }
};

async fn fetch_logs(api: ApiClient, filter: AuditLogFilter, mut page: Signal<PageState>, mut logs: Signal<Vec<AuditLog>>, mut failed: Signal<bool>) {
  let query = filter.to_query(page.read().query());
  match api.list_audit_logs(&query).await {
    Ok(result) => {
      page.write().set_total(result.total);
      logs.set(result.items);
      failed.set(false);
    }
    Err(e) => {
      warn!("loading audit logs failed: {}", e);
      logs.set(vec![]);
      failed.set(true);
    }
  }
}

#[component]
pub fn AuditLogsPage() -> Element {
  let api = use_api();
  let i18n = use_i18n();
  let mut filter = use_signal(AuditLogFilter::default);
  // filter the current rows were fetched with, kept apart from the inputs
  let mut applied = use_signal(AuditLogFilter::default);
  let mut page = use_signal(PageState::default);
  let logs: Signal<Vec<AuditLog>> = use_signal(Vec::new);
  let failed = use_signal(|| false);
  let mut expanded: Signal<Option<i64>> = use_signal(|| None);

  use_hook(move || {
    spawn(fetch_logs(api(), AuditLogFilter::default(), page, logs, failed));
  });

  let mut apply_filter = move || {
    applied.set(filter());
    page.write().reset();
    expanded.set(None);
    spawn(fetch_logs(api(), filter(), page, logs, failed));
  };

  rsx! {
    div {
      class: "page-grid",
      section {
        class: "card wide-card",
        h2 { class: "card-title", {i18n.t("audit.title")} }
        form {
          class: "form-row",
          onsubmit: move |evt| {
            evt.prevent_default();
            apply_filter();
          },
          input { class: "form-input", placeholder: i18n.t("audit.action"), value: filter.read().action.clone(), oninput: move |evt| filter.write().action = evt.value() }
          input { class: "form-input", placeholder: i18n.t("audit.resourceType"), value: filter.read().resource_type.clone(), oninput: move |evt| filter.write().resource_type = evt.value() }
          input { class: "form-input", placeholder: i18n.t("audit.resourceId"), value: filter.read().resource_id.clone(), oninput: move |evt| filter.write().resource_id = evt.value() }
          button { class: "button button-primary", r#type: "submit", {i18n.t("audit.apply")} }
          button {
            class: "button",
            r#type: "button",
            disabled: filter.read().is_empty() && applied.read().is_empty(),
            onclick: move |_| {
              filter.set(AuditLogFilter::default());
              apply_filter();
            },
            {i18n.t("audit.clear")}
          }
        }
        if failed() {
          p { class: "form-message form-error", {i18n.t("audit.errors.load")} }
        }
        table {
          class: "data-table",
          thead {
            tr {
              th { "ID" }
              th { {i18n.t("audit.actor")} }
              th { {i18n.t("audit.action")} }
              th { {i18n.t("audit.resourceType")} }
              th { {i18n.t("audit.resourceId")} }
              th { {i18n.t("common.createdAt")} }
              th { }
            }
          }
          tbody {
            for log in logs() {
              tr {
                key: "{log.id}",
                td { "{log.id}" }
                td { {dash(log.actor.as_deref())} }
                td { "{log.action}" }
                td { {dash(log.resource_type.as_deref())} }
                td { {dash(log.resource_id.as_deref())} }
                td { {i18n.date(log.created_at.as_deref())} }
                td {
                  button {
                    class: "button button-small",
                    onclick: move |_| {
                      let next = if expanded() == Some(log.id) { None } else { Some(log.id) };
                      expanded.set(next);
                    },
                    if expanded() == Some(log.id) { {i18n.t("audit.hideDetail")} } else { {i18n.t("audit.showDetail")} }
                  }
                }
              }
              if expanded() == Some(log.id) {
                tr {
                  td { colspan: "7", pre { class: "detail-output", {detail_pretty(&log.detail)} } }
                }
              }
            }
          }
        }
        if logs.read().is_empty() && !failed() {
          p { class: "empty", {i18n.t("common.empty")} }
        }
        Pagination {
          state: page(),
          on_change: move |change: PageChange| {
            page.write().apply(change);
            spawn(fetch_logs(api(), applied(), page, logs, failed));
          }
        }
      }
    }
  }
}
