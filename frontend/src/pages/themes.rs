use std::time::Duration;
use chrono::Utc;
use dioxus::{logger::tracing::{error, info, warn}, prelude::*};

use crate::{
  components::{pagination::Pagination, toast::{FormMessage, SuccessToast}},
  utils::{
    api::{use_api, ApiClient},
    autosave::{Debouncer, SaveSequence},
    browser::{download_text, show_toast, CSV_MIME},
    forms::FormError,
    i18n::{dash, use_i18n},
    models::{ImportMode, Project, SystemTheme, ThemeChangeReport, ThemeConfigItem, ThemeSummary},
    pagination::{PageChange, PageState},
    server::{AppError, ImportThemeRequest, SymbolSearch},
    themes::{compare_symbols, csv_file_name, normalize_symbol, symbols_csv, ProjectFocus, SymbolCache, ThemeComparison, ThemeEditor},
  }
};

const SAVED_TOAST: &str = "themes-saved-toast";

/// Signals shared by the loaders below.
#[derive(Clone, Copy)]
struct ThemeState {
  focus: Signal<ProjectFocus>,
  editor: Signal<ThemeEditor>,
  summary: Signal<Option<ThemeSummary>>,
  cache: Signal<SymbolCache>,
  save_seq: Signal<SaveSequence>,
  reports: Signal<Vec<ThemeChangeReport>>,
  report_page: Signal<PageState>,
  error: Signal<Option<&'static str>>,
}

async fn fetch_projects(api: ApiClient, mut page: Signal<PageState>, mut projects: Signal<Vec<Project>>) {
  let query = page.read().query();
  match api.list_projects(query).await {
    Ok(result) => {
      page.write().set_total(result.total);
      projects.set(result.items);
    }
    Err(e) => {
      warn!("loading projects failed: {}", e);
      projects.set(vec![]);
    }
  }
}

/// Config and summary are fetched side by side and not reconciled.
async fn fetch_project(api: ApiClient, project_id: i64, mut state: ThemeState) {
  let (config, summary) = futures::future::join(api.get_project_config(project_id), api.theme_summary(project_id)).await;
  if !state.focus.read().accepts(project_id) {
    info!("dropping config of project {} after a project switch", project_id);
    return;
  }
  match config {
    Ok(envelope) => {
      state.editor.set(ThemeEditor::load(envelope.config.unwrap_or_default()));
      state.focus.write().mark_loaded(project_id);
    }
    Err(e) => {
      warn!("loading config of project {} failed: {}", project_id, e);
      state.focus.write().mark_failed(project_id);
      state.editor.set(ThemeEditor::default());
      state.error.set(Some("themes.errors.load"));
    }
  }
  match summary {
    Ok(summary) => state.summary.set(Some(summary)),
    Err(e) => {
      warn!("loading theme summary of project {} failed: {}", project_id, e);
      state.summary.set(None);
    }
  }
}

async fn fetch_summary(api: ApiClient, project_id: i64, mut state: ThemeState) {
  let result = api.theme_summary(project_id).await;
  if !state.focus.read().accepts(project_id) {
    return;
  }
  match result {
    Ok(result) => state.summary.set(Some(result)),
    Err(e) => warn!("reloading theme summary of project {} failed: {}", project_id, e),
  }
}

async fn fetch_reports(api: ApiClient, project_id: i64, mut state: ThemeState) {
  let query = state.report_page.read().query();
  let result = api.list_theme_reports(project_id, query).await;
  if !state.focus.read().accepts(project_id) {
    return;
  }
  match result {
    Ok(result) => {
      state.report_page.write().set_total(result.total);
      state.reports.set(result.items);
    }
    Err(e) => {
      warn!("loading change reports of project {} failed: {}", project_id, e);
      state.reports.set(vec![]);
    }
  }
}

async fn fetch_system_themes(api: ApiClient, mut system_themes: Signal<Vec<SystemTheme>>) {
  match api.list_system_themes().await {
    Ok(items) => system_themes.set(items),
    Err(e) => {
      warn!("loading system themes failed: {}", e);
      system_themes.set(vec![]);
    }
  }
}

/// Cached symbol set of one theme, fetched on a miss.
async fn symbols_for(api: ApiClient, project_id: i64, key: &str, mut cache: Signal<SymbolCache>) -> Result<Vec<String>, AppError> {
  if let Some(symbols) = cache.read().get(project_id, key) {
    return Ok(symbols.clone());
  }
  let result = api.theme_symbols(project_id, key).await?;
  cache.write().insert(project_id, key, result.symbols.clone());
  Ok(result.symbols)
}

/// Posts the whole draft. Only the response of the newest save is applied.
async fn save_config(api: ApiClient, project_id: i64, mut state: ThemeState) -> bool {
  if !state.focus.read().can_save(project_id) {
    warn!("config of project {} is not loaded, skipping save", project_id);
    return false;
  }
  let (request, revision) = {
    let editor = state.editor.read();
    (editor.build_save_request(Utc::now()), editor.revision)
  };
  let request = match request {
    Ok(request) => request,
    Err(e) => {
      state.error.set(Some(e.key()));
      return false;
    }
  };
  let seq = state.save_seq.write().begin();
  let result = api.save_project_config(project_id, &request).await;
  if !state.save_seq.read().is_latest(seq) {
    info!("dropping stale config save #{} for project {}", seq, project_id);
    return false;
  }
  match result {
    Ok(config) => {
      state.editor.write().apply_saved(config, revision);
      state.cache.write().clear();
      state.error.set(None);
      fetch_summary(api, project_id, state).await;
      true
    }
    Err(e) => {
      error!("saving config of project {} failed: {}", project_id, e);
      state.error.set(Some("themes.errors.save"));
      false
    }
  }
}

#[component]
pub fn ThemesPage() -> Element {
  let api = use_api();
  let i18n = use_i18n();

  let mut project_page = use_signal(PageState::default);
  let projects: Signal<Vec<Project>> = use_signal(Vec::new);
  let mut selected: Signal<Option<Project>> = use_signal(|| None);

  let state = ThemeState {
    focus: use_signal(ProjectFocus::default),
    editor: use_signal(ThemeEditor::default),
    summary: use_signal(|| None),
    cache: use_signal(SymbolCache::default),
    save_seq: use_signal(SaveSequence::default),
    reports: use_signal(Vec::new),
    report_page: use_signal(PageState::default),
    error: use_signal(|| None),
  };
  let ThemeState { mut focus, mut editor, summary, mut cache, mut save_seq, reports, mut report_page, mut error } = state;
  let debouncer = use_signal(Debouncer::default);

  let mut active_symbols: Signal<Option<(String, Vec<String>)>> = use_signal(|| None);
  let mut search_input = use_signal(String::new);
  let mut search_result: Signal<Option<SymbolSearch>> = use_signal(|| None);
  let mut compare_a = use_signal(String::new);
  let mut compare_b = use_signal(String::new);
  let mut comparison: Signal<Option<ThemeComparison>> = use_signal(|| None);
  let mut override_ticker = use_signal(String::new);
  let mut override_kind = use_signal(String::new);
  let system_themes: Signal<Vec<SystemTheme>> = use_signal(Vec::new);

  use_hook(move || {
    spawn(fetch_projects(api(), project_page, projects));
    spawn(fetch_system_themes(api(), system_themes));
  });

  let selected_id = selected.read().as_ref().map(|p| p.id);

  let mut select_project = move |project: Project| {
    let project_id = project.id;
    debouncer.read().cancel();
    save_seq.write().begin();
    cache.write().clear();
    active_symbols.set(None);
    search_result.set(None);
    comparison.set(None);
    error.set(None);
    focus.write().select(project_id);
    editor.set(ThemeEditor::default());
    selected.set(Some(project));
    report_page.write().reset();
    spawn(fetch_project(api(), project_id, state));
    spawn(fetch_reports(api(), project_id, state));
  };

  let autosave = use_callback(move |_: ()| {
    let Some(project_id) = focus.read().selected() else { return };
    if !focus.read().can_save(project_id) {
      return;
    }
    debouncer.read().schedule(Duration::ZERO, move || async move {
      if save_config(api(), project_id, state).await {
        info!("autosaved themes of project {}", project_id);
      }
    });
  });

  let save_now = move |_: MouseEvent| {
    let Some(project_id) = selected_id else { return };
    debouncer.read().cancel();
    spawn(async move {
      if save_config(api(), project_id, state).await {
        show_toast(SAVED_TOAST);
      }
    });
  };

  let view_symbols = use_callback(move |key: String| {
    let Some(project_id) = selected.read().as_ref().map(|p| p.id) else { return };
    spawn(async move {
      match symbols_for(api(), project_id, &key, cache).await {
        Ok(symbols) => active_symbols.set(Some((key, symbols))),
        Err(e) => {
          warn!("loading symbols of {} failed: {}", key, e);
          error.set(Some("themes.errors.symbols"));
        }
      }
    });
  });

  let run_search = move |_: MouseEvent| {
    let Some(project_id) = selected_id else { return };
    let Some(symbol) = normalize_symbol(&search_input.read()) else {
      error.set(Some(FormError::SymbolRequired.key()));
      return;
    };
    spawn(async move {
      match api().search_symbol(project_id, &symbol).await {
        Ok(result) => search_result.set(Some(result)),
        Err(e) => {
          warn!("searching {} failed: {}", symbol, e);
          search_result.set(None);
          error.set(Some("themes.errors.search"));
        }
      }
    });
  };

  let run_compare = move |_: MouseEvent| {
    let Some(project_id) = selected_id else { return };
    let (a, b) = (compare_a(), compare_b());
    if a.is_empty() || b.is_empty() {
      error.set(Some(FormError::CompareSelection.key()));
      return;
    }
    spawn(async move {
      let set_a = symbols_for(api(), project_id, &a, cache).await;
      let set_b = symbols_for(api(), project_id, &b, cache).await;
      match (set_a, set_b) {
        (Ok(set_a), Ok(set_b)) => comparison.set(Some(compare_symbols(&set_a, &set_b))),
        (Err(e), _) | (_, Err(e)) => {
          warn!("comparing {} with {} failed: {}", a, b, e);
          error.set(Some("themes.errors.symbols"));
        }
      }
    });
  };

  let import_theme = use_callback(move |request: ImportThemeRequest| {
    let Some(project_id) = selected.read().as_ref().map(|p| p.id) else { return };
    spawn(async move {
      match api().import_system_theme(project_id, &request).await {
        Ok(_) => {
          info!("imported system theme {} into project {}", request.theme_id, project_id);
          cache.write().clear();
          fetch_project(api(), project_id, state).await;
          fetch_reports(api(), project_id, state).await;
        }
        Err(e) => {
          error!("importing system theme {} failed: {}", request.theme_id, e);
          error.set(Some("themes.errors.import"));
        }
      }
    });
  });

  let refresh_theme = use_callback(move |theme_id: i64| {
    let project_id = selected.read().as_ref().map(|p| p.id);
    spawn(async move {
      match api().refresh_system_theme(theme_id).await {
        Ok(_) => {
          cache.write().clear();
          active_symbols.set(None);
          fetch_system_themes(api(), system_themes).await;
          if let Some(project_id) = project_id {
            fetch_summary(api(), project_id, state).await;
            fetch_reports(api(), project_id, state).await;
          }
        }
        Err(e) => {
          error!("refreshing system theme {} failed: {}", theme_id, e);
          error.set(Some("themes.errors.refresh"));
        }
      }
    });
  });

  let weights = editor.read().weight_summary();
  let keys = editor.read().keys();
  let rows: Vec<(u64, ThemeConfigItem)> = editor.read().rows().map(|(id, t)| (id, t.clone())).collect();
  let overrides = editor.read().overrides.clone();
  let project_name = selected.read().as_ref().map(|p| p.name.clone()).unwrap_or_default();

  rsx! {
    div {
      class: "page-grid",
      section {
        class: "card",
        h2 { class: "card-title", {i18n.t("themes.projects")} }
        ul {
          class: "select-list",
          for project in projects() {
            li {
              key: "{project.id}",
              class: if selected_id == Some(project.id) { "row-selected" } else { "" },
              onclick: {
                let project = project.clone();
                move |_| select_project(project.clone())
              },
              span { "{project.name}" }
              span { class: "muted", {dash(project.description.as_deref())} }
            }
          }
        }
        if projects.read().is_empty() {
          p { class: "empty", {i18n.t("common.empty")} }
        }
        Pagination {
          state: project_page(),
          on_change: move |change: PageChange| {
            project_page.write().apply(change);
            spawn(fetch_projects(api(), project_page, projects));
          }
        }
      }

      if selected_id.is_none() {
        section { class: "card wide-card", p { class: "muted", {i18n.t("themes.pickProject")} } }
      }

      if let Some(project_id) = selected_id {
        section {
          class: "card wide-card",
          div {
            class: "card-header",
            h2 { class: "card-title", {i18n.t("themes.drafts")} " · {project_name}" }
            div {
              class: "form-actions",
              span {
                class: if weights.warning { "badge badge-warn" } else { "badge badge-ok" },
                {i18n.t_with("themes.weightTotal", &[("total", format!("{:.3}", weights.total))])}
              }
              button { class: "button", onclick: move |_| editor.write().normalize_weights(), {i18n.t("themes.normalize")} }
              button { class: "button", onclick: move |_| { editor.write().add_theme(); }, {i18n.t("themes.add")} }
              button {
                class: "button button-primary",
                disabled: !focus.read().can_save(project_id),
                onclick: save_now,
                {i18n.t("common.save")}
                if editor.read().dirty { " *" }
              }
            }
          }
          if weights.warning {
            p { class: "form-message form-warning", {i18n.t("themes.weightWarning")} }
          }
          FormMessage { error: error().map(|k| i18n.t(k)) }
          table {
            class: "data-table",
            thead {
              tr {
                th { {i18n.t("themes.key")} }
                th { {i18n.t("themes.label")} }
                th { {i18n.t("themes.weight")} }
                th { {i18n.t("themes.priority")} }
                th { {i18n.t("themes.keywords")} }
                th { {i18n.t("themes.manual")} }
                th { {i18n.t("themes.exclude")} }
                th { }
              }
            }
            tbody {
              for (idx, (row, theme)) in rows.iter().cloned().enumerate() {
                ThemeRow {
                  key: "{row}",
                  idx,
                  theme,
                  count: rows.len(),
                  editor,
                  on_symbols_changed: autosave,
                  on_view: view_symbols,
                }
              }
            }
          }
          if rows.is_empty() {
            p { class: "empty", {i18n.t("themes.noThemes")} }
          }
        }

        section {
          class: "card",
          h3 { {i18n.t("themes.summary")} }
          if let Some(current) = summary() {
            p {
              class: "muted",
              {i18n.t_with("themes.totalSymbols", &[("count", current.total_symbols.to_string())])}
              " · "
              {i18n.date(current.updated_at.as_deref())}
            }
            table {
              class: "data-table",
              thead {
                tr {
                  th { {i18n.t("themes.key")} }
                  th { {i18n.t("themes.symbolCount")} }
                  th { {i18n.t("themes.sample")} }
                  th { {i18n.t("themes.manual")} }
                  th { {i18n.t("themes.exclude")} }
                }
              }
              tbody {
                for item in current.themes.clone() {
                  tr {
                    key: "{item.key}",
                    td { title: item.label.clone(), "{item.key}" }
                    td { "{item.symbol_count}" }
                    td { class: "mono", {item.sample.join(", ")} }
                    td { "{item.manual_count}" }
                    td { "{item.exclude_count}" }
                  }
                }
              }
            }
          } else {
            p { class: "empty", {i18n.t("common.empty")} }
          }
        }

        section {
          class: "card",
          h3 { {i18n.t("themes.symbols")} }
          if let Some((key, symbols)) = active_symbols() {
            div {
              class: "card-header",
              span { "{key} · {symbols.len()}" }
              button {
                class: "button button-small",
                onclick: {
                  let (key, symbols) = (key.clone(), symbols.clone());
                  let project_name = project_name.clone();
                  move |_| download_text(&csv_file_name(&project_name, &key), CSV_MIME, &symbols_csv(&symbols))
                },
                {i18n.t("themes.exportCsv")}
              }
            }
            div {
              class: "chip-list",
              for symbol in symbols.clone() {
                span {
                  key: "{symbol}",
                  class: "chip",
                  "{symbol}"
                  button {
                    class: "chip-action",
                    title: i18n.t("themes.toggleExclude"),
                    onclick: {
                      let (key, symbol) = (key.clone(), symbol.clone());
                      move |_| {
                        let idx = editor.read().position(&key);
                        if let Some(idx) = idx {
                          if editor.write().toggle_exclude(idx, &symbol) {
                            autosave.call(());
                          }
                        }
                      }
                    },
                    "⊘"
                  }
                }
              }
            }
          } else {
            p { class: "muted", {i18n.t("themes.pickTheme")} }
          }
        }

        section {
          class: "card",
          h3 { {i18n.t("themes.search")} }
          div {
            class: "form-row",
            input {
              class: "form-input",
              placeholder: "AAPL",
              value: search_input(),
              oninput: move |evt| search_input.set(evt.value())
            }
            button { class: "button", onclick: run_search, {i18n.t("common.search")} }
          }
          if let Some(result) = search_result() {
            if result.themes.is_empty() {
              p { class: "muted", {i18n.t_with("themes.searchNone", &[("symbol", result.symbol.clone())])} }
            } else {
              p { {i18n.t_with("themes.searchHits", &[("symbol", result.symbol.clone()), ("themes", result.themes.join(", "))])} }
            }
          }

          h3 { {i18n.t("themes.compare")} }
          div {
            class: "form-row",
            ThemeKeySelect { keys: keys.clone(), selected: compare_a(), on_select: move |k: String| compare_a.set(k) }
            ThemeKeySelect { keys: keys.clone(), selected: compare_b(), on_select: move |k: String| compare_b.set(k) }
            button { class: "button", onclick: run_compare, {i18n.t("themes.runCompare")} }
          }
          if let Some(result) = comparison() {
            div {
              class: "compare-grid",
              div { h4 { {i18n.t_with("themes.shared", &[("count", result.shared.len().to_string())])} } p { class: "mono", {result.shared.join(", ")} } }
              div { h4 { {i18n.t_with("themes.onlyA", &[("count", result.only_a.len().to_string())])} } p { class: "mono", {result.only_a.join(", ")} } }
              div { h4 { {i18n.t_with("themes.onlyB", &[("count", result.only_b.len().to_string())])} } p { class: "mono", {result.only_b.join(", ")} } }
            }
          }
        }

        section {
          class: "card",
          h3 { {i18n.t("themes.overrides")} }
          table {
            class: "data-table",
            tbody {
              for (ticker, kind) in overrides {
                tr {
                  key: "{ticker}",
                  td { class: "mono", "{ticker}" }
                  td { "{kind}" }
                  td {
                    button {
                      class: "button button-small",
                      onclick: {
                        let ticker = ticker.clone();
                        move |_| editor.write().remove_override(&ticker)
                      },
                      {i18n.t("common.remove")}
                    }
                  }
                }
              }
            }
          }
          div {
            class: "form-row",
            input { class: "form-input", placeholder: "TICKER", value: override_ticker(), oninput: move |evt| override_ticker.set(evt.value()) }
            input { class: "form-input", list: "symbol-types", placeholder: "exclude", value: override_kind(), oninput: move |evt| override_kind.set(evt.value()) }
            datalist {
              id: "symbol-types",
              option { value: "exclude" }
              option { value: "stock" }
              option { value: "etf" }
            }
            button {
              class: "button",
              onclick: move |_| {
                let result = editor.write().set_override(&override_ticker.read(), &override_kind.read());
                match result {
                  Ok(()) => {
                    override_ticker.set(String::new());
                    override_kind.set(String::new());
                  }
                  Err(e) => error.set(Some(e.key())),
                }
              },
              {i18n.t("themes.setOverride")}
            }
          }
        }

        section {
          class: "card wide-card",
          h3 { {i18n.t("themes.systemThemes")} }
          table {
            class: "data-table",
            thead {
              tr {
                th { {i18n.t("themes.key")} }
                th { {i18n.t("themes.source")} }
                th { {i18n.t("themes.latestVersion")} }
                th { {i18n.t("themes.importMode")} }
                th { {i18n.t("themes.weight")} }
                th { }
              }
            }
            tbody {
              for theme in system_themes() {
                SystemThemeRow { key: "{theme.id}", theme, on_import: import_theme, on_refresh: refresh_theme }
              }
            }
          }
          if system_themes.read().is_empty() {
            p { class: "empty", {i18n.t("common.empty")} }
          }
        }

        section {
          class: "card wide-card",
          h3 { {i18n.t("themes.reports")} }
          table {
            class: "data-table",
            thead {
              tr {
                th { "ID" }
                th { {i18n.t("themes.key")} }
                th { {i18n.t("themes.versionChange")} }
                th { {i18n.t("themes.changes")} }
                th { {i18n.t("common.createdAt")} }
              }
            }
            tbody {
              for report in reports() {
                tr {
                  key: "{report.id}",
                  td { "{report.id}" }
                  td { {report.theme_key.clone().unwrap_or_else(|| format!("#{}", report.theme_id))} }
                  td { {format!("{} → {}", version_ref(report.from_version_id), version_ref(report.to_version_id))} }
                  td {
                    for (field, change) in report.diff.iter() {
                      div {
                        key: "{field}",
                        strong { "{field}: " }
                        if !change.added.is_empty() { span { class: "diff-added", {format!("+{}", change.added.join(", "))} } }
                        " "
                        if !change.removed.is_empty() { span { class: "diff-removed", {format!("-{}", change.removed.join(", "))} } }
                      }
                    }
                  }
                  td { {i18n.date(report.created_at.as_deref())} }
                }
              }
            }
          }
          if reports.read().is_empty() {
            p { class: "empty", {i18n.t("common.empty")} }
          }
          Pagination {
            state: report_page(),
            on_change: move |change: PageChange| {
              report_page.write().apply(change);
              spawn(fetch_reports(api(), project_id, state));
            }
          }
        }
      }
      SuccessToast { id: SAVED_TOAST, content: i18n.t("themes.saved") }
    }
  }
}

fn version_ref(id: Option<i64>) -> String {
  id.map(|id| format!("#{}", id)).unwrap_or_else(|| "-".to_string())
}

/// One editable draft row. Symbol list changes go through `on_symbols_changed` so the page can autosave.
#[component]
fn ThemeRow(
  idx: usize,
  theme: ThemeConfigItem,
  count: usize,
  editor: Signal<ThemeEditor>,
  on_symbols_changed: EventHandler<()>,
  on_view: EventHandler<String>,
) -> Element {
  let i18n = use_i18n();
  let mut editor = editor;
  let mut manual_input = use_signal(String::new);
  let mut exclude_input = use_signal(String::new);
  let view_key = theme.key.clone();

  rsx! {
    tr {
      td {
        input { class: "form-input mono", value: theme.key.clone(), onchange: move |evt| editor.write().rename_key(idx, &evt.value()) }
        if let Some(link) = theme.system.as_ref() {
          span { class: "badge", title: link.mode.as_str(), {i18n.t("themes.systemLinked")} }
        }
      }
      td { input { class: "form-input", value: theme.label.clone(), onchange: move |evt| editor.write().set_label(idx, &evt.value()) } }
      td {
        input {
          class: "form-input number-input",
          r#type: "number",
          step: "0.01",
          value: theme.weight.to_string(),
          onchange: move |evt| {
            if let Ok(weight) = evt.value().trim().parse::<f64>() {
              editor.write().set_weight(idx, weight);
            }
          }
        }
      }
      td {
        input {
          class: "form-input number-input",
          r#type: "number",
          value: theme.priority.to_string(),
          onchange: move |evt| {
            if let Ok(priority) = evt.value().trim().parse::<i32>() {
              editor.write().set_priority(idx, priority);
            }
          }
        }
      }
      td { input { class: "form-input", value: theme.keywords.join(", "), onchange: move |evt| editor.write().set_keywords(idx, &evt.value()) } }
      td {
        SymbolChips { symbols: theme.manual.clone(), on_remove: move |symbol: String| {
          if editor.write().toggle_manual(idx, &symbol) {
            on_symbols_changed.call(());
          }
        } }
        div {
          class: "form-row",
          input { class: "form-input", placeholder: "AAPL, MSFT", value: manual_input(), oninput: move |evt| manual_input.set(evt.value()) }
          button {
            class: "button button-small",
            onclick: move |_| {
              if editor.write().add_manual(idx, &manual_input.read()) {
                on_symbols_changed.call(());
              }
              manual_input.set(String::new());
            },
            "+"
          }
        }
      }
      td {
        SymbolChips { symbols: theme.exclude.clone(), on_remove: move |symbol: String| {
          if editor.write().toggle_exclude(idx, &symbol) {
            on_symbols_changed.call(());
          }
        } }
        div {
          class: "form-row",
          input { class: "form-input", placeholder: "TSLA", value: exclude_input(), oninput: move |evt| exclude_input.set(evt.value()) }
          button {
            class: "button button-small",
            onclick: move |_| {
              if editor.write().add_exclude(idx, &exclude_input.read()) {
                on_symbols_changed.call(());
              }
              exclude_input.set(String::new());
            },
            "+"
          }
        }
      }
      td {
        class: "row-actions",
        button { class: "button button-small", disabled: idx == 0, onclick: move |_| editor.write().move_theme(idx, true), "↑" }
        button { class: "button button-small", disabled: idx + 1 >= count, onclick: move |_| editor.write().move_theme(idx, false), "↓" }
        button { class: "button button-small", onclick: move |_| on_view.call(view_key.clone()), {i18n.t("themes.viewSymbols")} }
        button { class: "button button-small button-danger", onclick: move |_| editor.write().remove_theme(idx), {i18n.t("common.remove")} }
      }
    }
  }
}

#[component]
fn SymbolChips(symbols: Vec<String>, on_remove: EventHandler<String>) -> Element {
  rsx! {
    div {
      class: "chip-list",
      for symbol in symbols {
        span {
          key: "{symbol}",
          class: "chip",
          "{symbol}"
          button {
            class: "chip-action",
            onclick: {
              let symbol = symbol.clone();
              move |_| on_remove.call(symbol.clone())
            },
            "×"
          }
        }
      }
    }
  }
}

#[component]
fn ThemeKeySelect(keys: Vec<String>, selected: String, on_select: EventHandler<String>) -> Element {
  let i18n = use_i18n();
  rsx! {
    select {
      class: "form-input",
      onchange: move |evt| on_select.call(evt.value()),
      option { value: "", selected: selected.is_empty(), {i18n.t("common.choose")} }
      for key in keys {
        option { key: "{key}", value: key.clone(), selected: key == selected, "{key}" }
      }
    }
  }
}

#[component]
fn SystemThemeRow(theme: SystemTheme, on_import: EventHandler<ImportThemeRequest>, on_refresh: EventHandler<i64>) -> Element {
  let i18n = use_i18n();
  let mut mode = use_signal(ImportMode::default);
  let mut weight = use_signal(String::new);
  let theme_id = theme.id;
  let latest = theme.latest_version.as_ref().map(|v| {
    format!("#{} {}", v.id, v.version.clone().unwrap_or_default())
  });

  rsx! {
    tr {
      td { title: theme.label.clone(), "{theme.key}" }
      td { {dash(theme.source.as_deref())} }
      td { {dash(latest.as_deref())} }
      td {
        select {
          class: "form-input",
          onchange: move |evt| mode.set(ImportMode::from_value(&evt.value()).unwrap_or_default()),
          for option_mode in ImportMode::ALL {
            option { key: "{option_mode.as_str()}", value: option_mode.as_str(), selected: option_mode == mode(), {i18n.t(&format!("themes.mode.{}", option_mode.as_str()))} }
          }
        }
      }
      td { input { class: "form-input number-input", r#type: "number", step: "0.01", value: weight(), oninput: move |evt| weight.set(evt.value()) } }
      td {
        class: "row-actions",
        button {
          class: "button button-small button-primary",
          onclick: move |_| {
            let weight = weight.read().trim().parse::<f64>().ok().filter(|w| w.is_finite());
            on_import.call(ImportThemeRequest { theme_id, mode: mode(), weight });
          },
          {i18n.t("themes.import")}
        }
        button { class: "button button-small", onclick: move |_| on_refresh.call(theme_id), {i18n.t("themes.refresh")} }
      }
    }
  }
}
