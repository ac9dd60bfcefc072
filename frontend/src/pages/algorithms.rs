use dioxus::{logger::tracing::{error, warn}, prelude::*};

use crate::{
  components::{pagination::Pagination, toast::{FormMessage, SuccessToast}},
  utils::{
    algorithms::{render_diff, short_hash, AlgorithmForm, DiffSelection, ParamsEditor, ParamsMode, ProjectFromVersionForm, SelfTestState, VersionForm},
    api::{use_api, ApiClient},
    browser::show_toast,
    i18n::{dash, use_i18n},
    models::{Algorithm, AlgorithmVersion},
    pagination::{PageChange, PageState},
  }
};

const SAVED_TOAST: &str = "algorithms-saved-toast";

async fn fetch_algorithms(api: ApiClient, mut page: Signal<PageState>, mut algorithms: Signal<Vec<Algorithm>>) {
  let query = page.read().query();
  match api.list_algorithms(query).await {
    Ok(result) => {
      page.write().set_total(result.total);
      algorithms.set(result.items);
    }
    Err(e) => {
      warn!("loading algorithms failed: {}", e);
      algorithms.set(vec![]);
    }
  }
}

async fn fetch_versions(api: ApiClient, algorithm_id: i64, mut page: Signal<PageState>, mut versions: Signal<Vec<AlgorithmVersion>>, mut all_versions: Signal<Vec<AlgorithmVersion>>) {
  let query = page.read().query();
  let (paged, all) = futures::future::join(api.list_versions_page(algorithm_id, query), api.list_versions(algorithm_id)).await;
  match paged {
    Ok(result) => {
      page.write().set_total(result.total);
      versions.set(result.items);
    }
    Err(e) => {
      warn!("loading versions of algorithm {} failed: {}", algorithm_id, e);
      versions.set(vec![]);
    }
  }
  match all {
    Ok(items) => all_versions.set(items),
    Err(e) => {
      warn!("loading version list of algorithm {} failed: {}", algorithm_id, e);
      all_versions.set(vec![]);
    }
  }
}

#[component]
pub fn AlgorithmsPage() -> Element {
  let api = use_api();
  let i18n = use_i18n();

  let mut algo_page = use_signal(PageState::default);
  let algorithms: Signal<Vec<Algorithm>> = use_signal(Vec::new);
  let mut selected: Signal<Option<Algorithm>> = use_signal(|| None);
  let mut algo_form = use_signal(AlgorithmForm::default);
  let mut editing: Signal<Option<i64>> = use_signal(|| None);
  let mut algo_error: Signal<Option<&'static str>> = use_signal(|| None);
  let mut notice: Signal<Option<String>> = use_signal(|| None);

  let mut version_page = use_signal(PageState::default);
  let versions: Signal<Vec<AlgorithmVersion>> = use_signal(Vec::new);
  let all_versions: Signal<Vec<AlgorithmVersion>> = use_signal(Vec::new);
  let mut selected_version: Signal<Option<AlgorithmVersion>> = use_signal(|| None);
  let mut version_form = use_signal(VersionForm::default);
  let mut version_error: Signal<Option<&'static str>> = use_signal(|| None);

  let mut diff = use_signal(DiffSelection::default);
  let mut diff_text: Signal<Option<String>> = use_signal(|| None);
  let mut diff_error: Signal<Option<&'static str>> = use_signal(|| None);
  let mut self_test = use_signal(SelfTestState::default);
  let mut project_form = use_signal(ProjectFromVersionForm::default);
  let mut project_error: Signal<Option<&'static str>> = use_signal(|| None);

  use_hook(move || {
    spawn(fetch_algorithms(api(), algo_page, algorithms));
  });

  let mut select_algorithm = move |algo: Algorithm| {
    let id = algo.id;
    algo_form.set(AlgorithmForm::from_algorithm(&algo));
    editing.set(Some(id));
    selected.set(Some(algo));
    selected_version.set(None);
    version_form.set(VersionForm::default());
    diff.set(DiffSelection::default());
    diff_text.set(None);
    self_test.set(SelfTestState::default());
    version_page.write().reset();
    spawn(fetch_versions(api(), id, version_page, versions, all_versions));
  };

  let select_version = move |algorithm_id: i64, version_id: i64| {
    spawn(async move {
      match api().get_version(algorithm_id, version_id).await {
        Ok(detail) => selected_version.set(Some(detail)),
        Err(e) => {
          warn!("loading version {} failed: {}", version_id, e);
          version_error.set(Some("algorithms.errors.loadVersion"));
        }
      }
    });
  };

  let save_algorithm = move |_: MouseEvent| {
    let editing_id = editing();
    let payload = match editing_id {
      Some(_) => algo_form.read().to_update_payload(),
      None => algo_form.read().to_payload(),
    };
    let payload = match payload {
      Ok(p) => p,
      Err(e) => {
        algo_error.set(Some(e.key()));
        return;
      }
    };
    algo_error.set(None);
    spawn(async move {
      let result = match editing_id {
        Some(id) => api().update_algorithm(id, &payload).await,
        None => api().create_algorithm(&payload).await,
      };
      match result {
        Ok(algo) => {
          notice.set(Some(algo.name.clone()));
          show_toast(SAVED_TOAST);
          if editing_id.is_some() {
            selected.set(Some(algo));
          } else {
            algo_form.set(AlgorithmForm::default());
          }
          fetch_algorithms(api(), algo_page, algorithms).await;
        }
        Err(e) => {
          error!("saving algorithm failed: {}", e);
          algo_error.set(Some("algorithms.errors.save"));
        }
      }
    });
  };

  let create_version = move |_: MouseEvent| {
    let Some(algorithm_id) = selected.read().as_ref().map(|a| a.id) else { return };
    let payload = match version_form.read().to_payload() {
      Ok(p) => p,
      Err(e) => {
        version_error.set(Some(e.key()));
        return;
      }
    };
    version_error.set(None);
    spawn(async move {
      match api().create_version(algorithm_id, &payload).await {
        Ok(created) => {
          notice.set(Some(created.label()));
          show_toast(SAVED_TOAST);
          version_form.set(VersionForm::default());
          selected_version.set(Some(created));
          fetch_versions(api(), algorithm_id, version_page, versions, all_versions).await;
        }
        Err(e) => {
          error!("creating version failed: {}", e);
          version_error.set(Some("algorithms.errors.createVersion"));
        }
      }
    });
  };

  let run_diff = move |_: MouseEvent| {
    let Some(algorithm_id) = selected.read().as_ref().map(|a| a.id) else { return };
    let (from_id, to_id) = match diff.read().ids() {
      Ok(ids) => ids,
      Err(e) => {
        diff_error.set(Some(e.key()));
        return;
      }
    };
    diff_error.set(None);
    spawn(async move {
      match api().diff_versions(algorithm_id, from_id, to_id).await {
        Ok(result) => diff_text.set(Some(render_diff(&result.diff))),
        Err(e) => {
          error!("diff {} -> {} failed: {}", from_id, to_id, e);
          diff_text.set(None);
          diff_error.set(Some("algorithms.errors.diff"));
        }
      }
    });
  };

  let run_self_test = move |_: MouseEvent| {
    let Some(algorithm_id) = selected.read().as_ref().map(|a| a.id) else { return };
    let version_id = selected_version.read().as_ref().map(|v| v.id);
    let requested = self_test.read().request(version_id);
    let request = match requested {
      Ok(r) => r,
      Err(e) => {
        self_test.write().error = Some(e.key());
        return;
      }
    };
    self_test.write().begin();
    spawn(async move {
      let result = api().self_test(algorithm_id, &request).await;
      if let Err(e) = &result {
        error!("self-test for version {} failed: {}", request.version_id, e);
      }
      self_test.write().finish(result);
    });
  };

  let create_project = move |_: MouseEvent| {
    let Some(algorithm_id) = selected.read().as_ref().map(|a| a.id) else { return };
    let version_id = selected_version.read().as_ref().map(|v| v.id);
    let (version_id, request) = match project_form.read().to_request(version_id) {
      Ok(r) => r,
      Err(e) => {
        project_error.set(Some(e.key()));
        return;
      }
    };
    project_error.set(None);
    spawn(async move {
      match api().create_project_from_version(algorithm_id, version_id, &request).await {
        Ok(project) => {
          notice.set(Some(project.name));
          show_toast(SAVED_TOAST);
          project_form.set(ProjectFromVersionForm::default());
        }
        Err(e) => {
          error!("creating project from version {} failed: {}", version_id, e);
          project_error.set(Some("algorithms.errors.createProject"));
        }
      }
    });
  };

  let selected_id = selected.read().as_ref().map(|a| a.id);
  let selected_version_id = selected_version.read().as_ref().map(|v| v.id);
  let params_mode = version_form.read().params.mode;

  rsx! {
    div {
      class: "page-grid",
      section {
        class: "card",
        h2 { class: "card-title", {i18n.t("algorithms.title")} }
        table {
          class: "data-table",
          thead {
            tr {
              th { "ID" }
              th { {i18n.t("algorithms.name")} }
              th { {i18n.t("algorithms.language")} }
              th { {i18n.t("algorithms.typeName")} }
              th { {i18n.t("algorithms.version")} }
              th { {i18n.t("common.updatedAt")} }
            }
          }
          tbody {
            for algo in algorithms() {
              tr {
                key: "{algo.id}",
                class: if selected_id == Some(algo.id) { "row-selected" } else { "" },
                onclick: {
                  let algo = algo.clone();
                  move |_| select_algorithm(algo.clone())
                },
                td { "{algo.id}" }
                td { "{algo.name}" }
                td { {dash(algo.language.as_deref())} }
                td { {dash(algo.type_name.as_deref())} }
                td { {dash(algo.version.as_deref())} }
                td { {i18n.date(algo.updated_at.as_deref().or(algo.created_at.as_deref()))} }
              }
            }
          }
        }
        if algorithms.read().is_empty() {
          p { class: "empty", {i18n.t("common.empty")} }
        }
        Pagination {
          state: algo_page(),
          on_change: move |change: PageChange| {
            algo_page.write().apply(change);
            spawn(fetch_algorithms(api(), algo_page, algorithms));
          }
        }
      }

      section {
        class: "card",
        h2 {
          class: "card-title",
          if editing().is_some() { {i18n.t("algorithms.edit")} } else { {i18n.t("algorithms.create")} }
        }
        div {
          class: "form-group",
          label { class: "form-label", {i18n.t("algorithms.name")} }
          input { class: "form-input", value: algo_form.read().name.clone(), oninput: move |evt| algo_form.write().name = evt.value() }
        }
        div {
          class: "form-group",
          label { class: "form-label", {i18n.t("algorithms.description")} }
          input { class: "form-input", value: algo_form.read().description.clone(), oninput: move |evt| algo_form.write().description = evt.value() }
        }
        div {
          class: "form-row",
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("algorithms.language")} }
            input { class: "form-input", placeholder: "python", value: algo_form.read().language.clone(), oninput: move |evt| algo_form.write().language = evt.value() }
          }
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("algorithms.typeName")} }
            input { class: "form-input", value: algo_form.read().type_name.clone(), oninput: move |evt| algo_form.write().type_name = evt.value() }
          }
        }
        div {
          class: "form-row",
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("algorithms.filePath")} }
            input { class: "form-input", value: algo_form.read().file_path.clone(), oninput: move |evt| algo_form.write().file_path = evt.value() }
          }
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("algorithms.version")} }
            input { class: "form-input", value: algo_form.read().version.clone(), oninput: move |evt| algo_form.write().version = evt.value() }
          }
        }
        FormMessage { error: algo_error().map(|k| i18n.t(k)) }
        div {
          class: "form-actions",
          button { class: "button button-primary", onclick: save_algorithm, {i18n.t("common.save")} }
          if editing().is_some() {
            button {
              class: "button",
              onclick: move |_| {
                editing.set(None);
                algo_form.set(AlgorithmForm::default());
                algo_error.set(None);
              },
              {i18n.t("algorithms.new")}
            }
          }
        }
      }

      if let Some(algo) = selected() {
        section {
          class: "card wide-card",
          h2 { class: "card-title", {i18n.t("algorithms.versions")} " · {algo.name}" }
          table {
            class: "data-table",
            thead {
              tr {
                th { "ID" }
                th { {i18n.t("algorithms.version")} }
                th { {i18n.t("algorithms.contentHash")} }
                th { {i18n.t("algorithms.filePath")} }
                th { {i18n.t("common.createdAt")} }
              }
            }
            tbody {
              for version in versions() {
                tr {
                  key: "{version.id}",
                  class: if selected_version_id == Some(version.id) { "row-selected" } else { "" },
                  onclick: {
                    let (algorithm_id, version_id) = (algo.id, version.id);
                    move |_| select_version(algorithm_id, version_id)
                  },
                  td { "{version.id}" }
                  td { {dash(version.version.as_deref())} }
                  td { class: "mono", title: version.content_hash.clone().unwrap_or_default(), {dash(version.content_hash.as_deref().map(short_hash))} }
                  td { {dash(version.file_path.as_deref())} }
                  td { {i18n.date(version.created_at.as_deref())} }
                }
              }
            }
          }
          if versions.read().is_empty() {
            p { class: "empty", {i18n.t("common.empty")} }
          }
          Pagination {
            state: version_page(),
            on_change: move |change: PageChange| {
              version_page.write().apply(change);
              spawn(fetch_versions(api(), algo.id, version_page, versions, all_versions));
            }
          }
        }

        section {
          class: "card",
          h3 { {i18n.t("algorithms.newVersion")} }
          div {
            class: "form-row",
            div {
              class: "form-group",
              label { class: "form-label", {i18n.t("algorithms.version")} }
              input { class: "form-input", value: version_form.read().version.clone(), oninput: move |evt| version_form.write().version = evt.value() }
            }
            div {
              class: "form-group",
              label { class: "form-label", {i18n.t("algorithms.filePath")} }
              input { class: "form-input", value: version_form.read().file_path.clone(), oninput: move |evt| version_form.write().file_path = evt.value() }
            }
          }
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("algorithms.description")} }
            input { class: "form-input", value: version_form.read().description.clone(), oninput: move |evt| version_form.write().description = evt.value() }
          }
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("algorithms.content")} }
            textarea { class: "form-input mono", rows: "6", value: version_form.read().content.clone(), oninput: move |evt| version_form.write().content = evt.value() }
          }
          div {
            class: "tabs",
            button {
              class: if params_mode == ParamsMode::Form { "tab tab-active" } else { "tab" },
              onclick: move |_| {
                let result = version_form.write().params.switch_mode(ParamsMode::Form);
                version_error.set(result.err().map(|e| e.key()));
              },
              {i18n.t("algorithms.paramsForm")}
            }
            button {
              class: if params_mode == ParamsMode::Json { "tab tab-active" } else { "tab" },
              onclick: move |_| {
                let result = version_form.write().params.switch_mode(ParamsMode::Json);
                version_error.set(result.err().map(|e| e.key()));
              },
              {i18n.t("algorithms.paramsJson")}
            }
            if let Some(current) = selected_version() {
              button {
                class: "button",
                onclick: move |_| version_form.write().params.load(current.params.as_ref()),
                {i18n.t("algorithms.copyParams")}
              }
            }
          }
          if params_mode == ParamsMode::Json {
            textarea {
              class: "form-input mono",
              rows: "10",
              placeholder: "{{}}",
              value: version_form.read().params.json.clone(),
              oninput: move |evt| version_form.write().params.json = evt.value()
            }
          } else {
            ParamsFields { editor: version_form.read().params.clone(), on_change: move |editor: ParamsEditor| version_form.write().params = editor }
          }
          FormMessage { error: version_error().map(|k| i18n.t(k)) }
          div {
            class: "form-actions",
            button { class: "button button-primary", onclick: create_version, {i18n.t("algorithms.createVersion")} }
          }
        }

        section {
          class: "card",
          h3 { {i18n.t("algorithms.diff")} }
          div {
            class: "form-row",
            VersionSelect {
              label: i18n.t("algorithms.diffFrom"),
              versions: all_versions(),
              selected: diff.read().from_id,
              on_select: move |id: Option<i64>| diff.write().from_id = id
            }
            VersionSelect {
              label: i18n.t("algorithms.diffTo"),
              versions: all_versions(),
              selected: diff.read().to_id,
              on_select: move |id: Option<i64>| diff.write().to_id = id
            }
          }
          FormMessage { error: diff_error().map(|k| i18n.t(k)) }
          button { class: "button", onclick: run_diff, {i18n.t("algorithms.runDiff")} }
          if let Some(text) = diff_text() {
            pre { class: "diff-output", "{text}" }
          }
        }

        section {
          class: "card",
          h3 { {i18n.t("algorithms.selfTest")} }
          p {
            class: "muted",
            {i18n.t("algorithms.selectedVersion")} ": "
            {selected_version.read().as_ref().map(|v| v.label()).unwrap_or_else(|| i18n.t("algorithms.noVersion"))}
          }
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("algorithms.benchmark")} }
            input { class: "form-input", value: self_test.read().benchmark.clone(), oninput: move |evt| self_test.write().benchmark = evt.value() }
          }
          button {
            class: "button button-primary",
            disabled: self_test.read().running,
            onclick: run_self_test,
            if self_test.read().running { {i18n.t("algorithms.selfTestRunning")} } else { {i18n.t("algorithms.runSelfTest")} }
          }
          FormMessage {
            error: self_test.read().error.map(|k| i18n.t(k)),
            success: self_test.read().run_id.clone().map(|id| i18n.t_with("algorithms.selfTestStarted", &[("id", id)]))
          }

          h3 { {i18n.t("algorithms.createProject")} }
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("projects.name")} }
            input { class: "form-input", value: project_form.read().name.clone(), oninput: move |evt| project_form.write().name = evt.value() }
          }
          div {
            class: "form-group",
            label { class: "form-label", {i18n.t("projects.description")} }
            input { class: "form-input", value: project_form.read().description.clone(), oninput: move |evt| project_form.write().description = evt.value() }
          }
          label {
            class: "checkbox",
            input { r#type: "checkbox", checked: project_form.read().lock_version, onchange: move |evt| project_form.write().lock_version = evt.checked() }
            {i18n.t("algorithms.lockVersion")}
          }
          FormMessage { error: project_error().map(|k| i18n.t(k)) }
          button { class: "button", onclick: create_project, {i18n.t("algorithms.createProject")} }
        }
      }
      SuccessToast { id: SAVED_TOAST, content: i18n.t_with("common.savedItem", &[("name", notice().unwrap_or_default())]) }
    }
  }
}

#[component]
fn VersionSelect(label: String, versions: Vec<AlgorithmVersion>, selected: Option<i64>, on_select: EventHandler<Option<i64>>) -> Element {
  let i18n = use_i18n();
  rsx! {
    div {
      class: "form-group",
      label { class: "form-label", "{label}" }
      select {
        class: "form-input",
        onchange: move |evt| on_select.call(evt.value().parse::<i64>().ok()),
        option { value: "", selected: selected.is_none(), {i18n.t("common.choose")} }
        for version in versions {
          option { key: "{version.id}", value: "{version.id}", selected: selected == Some(version.id), {version.label()} }
        }
      }
    }
  }
}

/// Structured params inputs. Emits the whole editor on every keystroke.
#[component]
fn ParamsFields(editor: ParamsEditor, on_change: EventHandler<ParamsEditor>) -> Element {
  let i18n = use_i18n();
  let fields: [(&'static str, &'static str, String); 12] = [
    ("cadence", "params.cadence", editor.form.cadence.clone()),
    ("universe", "params.universe", editor.form.universe.clone()),
    ("core_allocation", "params.coreAllocation", editor.form.core_allocation.clone()),
    ("defensive_symbols", "params.defensiveSymbols", editor.form.defensive_symbols.clone()),
    ("theme_weights", "params.themeWeights", editor.form.theme_weights.clone()),
    ("blend", "params.blend", editor.form.blend.clone()),
    ("top_n", "params.topN", editor.form.top_n.clone()),
    ("min_score", "params.minScore", editor.form.min_score.clone()),
    ("min_volume", "params.minVolume", editor.form.min_volume.clone()),
    ("max_position_weight", "params.maxPositionWeight", editor.form.max_position_weight.clone()),
    ("max_drawdown", "params.maxDrawdown", editor.form.max_drawdown.clone()),
    ("stop_loss", "params.stopLoss", editor.form.stop_loss.clone()),
  ];

  rsx! {
    div {
      class: "params-grid",
      for (field, key, value) in fields {
        div {
          key: "{field}",
          class: "form-group",
          label { class: "form-label", {i18n.t(key)} }
          input {
            class: "form-input",
            value,
            oninput: {
              let editor = editor.clone();
              move |evt: FormEvent| {
                let mut next = editor.clone();
                set_param_field(&mut next, field, evt.value());
                on_change.call(next);
              }
            }
          }
        }
      }
      if !editor.form.extra.is_empty() {
        p { class: "muted", {i18n.t_with("params.extraKeys", &[("keys", editor.form.extra.keys().cloned().collect::<Vec<_>>().join(", "))])} }
      }
    }
  }
}

fn set_param_field(editor: &mut ParamsEditor, field: &str, value: String) {
  let form = &mut editor.form;
  match field {
    "cadence" => form.cadence = value,
    "universe" => form.universe = value,
    "core_allocation" => form.core_allocation = value,
    "defensive_symbols" => form.defensive_symbols = value,
    "theme_weights" => form.theme_weights = value,
    "blend" => form.blend = value,
    "top_n" => form.top_n = value,
    "min_score" => form.min_score = value,
    "min_volume" => form.min_volume = value,
    "max_position_weight" => form.max_position_weight = value,
    "max_drawdown" => form.max_drawdown = value,
    "stop_loss" => form.stop_loss = value,
    _ => {}
  }
}
