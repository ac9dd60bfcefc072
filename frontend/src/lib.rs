#![allow(non_snake_case)]
pub mod components;
pub mod pages;
pub mod utils;

use components::nav::NavBar;
use dioxus::prelude::*;
use pages::{
  algorithms::AlgorithmsPage, audit_logs::AuditLogsPage, home::Home, lean_pool::LeanBridgePoolPage, live_trade::LiveTradePage,
  themes::ThemesPage
};
use utils::{api::ApiClient, config::AppConfig, i18n::{use_i18n, I18n}};

#[derive(Routable, PartialEq, Clone)]
pub enum Route {
  #[layout(NavBar)]
  #[route("/")]
  Home {},
  #[route("/algorithms")]
  AlgorithmsPage {},
  #[route("/themes")]
  ThemesPage {},
  #[route("/live-trade")]
  LiveTradePage {},
  #[route("/lean-pool")]
  LeanBridgePoolPage {},
  #[route("/audit-logs")]
  AuditLogsPage {},
  #[route("/:..route")]
  PageNotFound { route: Vec<String> }
}

#[component]
pub fn App() -> Element {
  let config = use_hook(AppConfig::from_env);
  use_context_provider(|| Signal::new(ApiClient::new(&config.api_base)));
  let locale = use_signal(|| config.locale);
  use_context_provider(|| I18n::new(locale));

  rsx! { Router::<Route> {} }
}

#[component]
fn PageNotFound(route: Vec<String>) -> Element {
  let i18n = use_i18n();
  rsx! {
    h1 { {i18n.t("notFound.title")} }
    p { {i18n.t("notFound.body")} }
    pre { color: "red", "log:\nattemped to navigate to: {route:?}" }
  }
}
