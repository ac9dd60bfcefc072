use dioxus::prelude::*;

use crate::{utils::i18n::use_i18n, Route};

#[component]
pub fn Home() -> Element {
  let i18n = use_i18n();
  let cards = [
    (Route::AlgorithmsPage {}, "nav.algorithms", "home.algorithms"),
    (Route::ThemesPage {}, "nav.themes", "home.themes"),
    (Route::LiveTradePage {}, "nav.liveTrade", "home.liveTrade"),
    (Route::LeanBridgePoolPage {}, "nav.pool", "home.pool"),
    (Route::AuditLogsPage {}, "nav.audit", "home.audit"),
  ];

  rsx! {
    div {
      class: "home-page",
      section {
        class: "hero",
        h1 { {i18n.t("home.title")} }
        p { {i18n.t("home.subtitle")} }
      }
      section {
        class: "features",
        for (route, title, body) in cards {
          Link {
            key: "{title}",
            class: "feature-card",
            to: route,
            h3 { class: "feature-card-title", {i18n.t(title)} }
            p { {i18n.t(body)} }
          }
        }
      }
    }
  }
}
