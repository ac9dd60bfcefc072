use dioxus::prelude::*;

use crate::utils::{i18n::use_i18n, pagination::{PageChange, PageState, PAGE_SIZE_OPTIONS}};

/// Prev/next pager with a page-size picker. Owners apply the emitted change and refetch.
#[component]
pub fn Pagination(state: PageState, on_change: EventHandler<PageChange>) -> Element {
  let i18n = use_i18n();
  let summary = match state.row_range() {
    Some((start, end)) => i18n.t_with("pagination.range", &[("start", start.to_string()), ("end", end.to_string()), ("total", state.total.to_string())]),
    None => i18n.t("pagination.empty"),
  };
  let page_label = i18n.t_with("pagination.page", &[("page", state.page.to_string()), ("pages", state.total_pages().to_string())]);

  rsx! {
    div {
      class: "pagination",
      span { class: "pagination-summary", "{summary}" }
      button {
        class: "button button-small",
        disabled: !state.has_prev(),
        onclick: move |_| on_change.call(PageChange::Page(state.page - 1)),
        {i18n.t("pagination.prev")}
      }
      span { class: "pagination-page", "{page_label}" }
      button {
        class: "button button-small",
        disabled: !state.has_next(),
        onclick: move |_| on_change.call(PageChange::Page(state.page + 1)),
        {i18n.t("pagination.next")}
      }
      select {
        class: "form-input pagination-size",
        onchange: move |evt| {
          if let Ok(size) = evt.value().parse::<u64>() {
            on_change.call(PageChange::PageSize(size));
          }
        },
        for size in PAGE_SIZE_OPTIONS {
          option { key: "{size}", value: "{size}", selected: size == state.page_size, {i18n.t_with("pagination.perPage", &[("size", size.to_string())])} }
        }
      }
    }
  }
}
