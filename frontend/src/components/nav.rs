use dioxus::prelude::*;

use crate::{utils::i18n::{use_i18n, Locale}, Route};

#[component]
pub fn NavBar() -> Element {
  static CSS: Asset = asset!("/assets/console.css");
  let mut i18n = use_i18n();
  let current = i18n.locale();

  rsx! {
    document::Stylesheet { href: CSS },
    nav {
      div {
        class: "nav-container",
        Link {
          class: "logo",
          to: Route::Home {},
          {i18n.t("nav.brand")}
        }
        div {
          class: "nav-links",
          Link { active_class: "nav-active", to: Route::AlgorithmsPage {}, {i18n.t("nav.algorithms")} }
          Link { active_class: "nav-active", to: Route::ThemesPage {}, {i18n.t("nav.themes")} }
          Link { active_class: "nav-active", to: Route::LiveTradePage {}, {i18n.t("nav.liveTrade")} }
          Link { active_class: "nav-active", to: Route::LeanBridgePoolPage {}, {i18n.t("nav.pool")} }
          Link { active_class: "nav-active", to: Route::AuditLogsPage {}, {i18n.t("nav.audit")} }
        }
        select {
          class: "locale-select",
          onchange: move |evt| i18n.set_locale(evt.value().parse().unwrap_or_default()),
          for locale in Locale::ALL {
            option { key: "{locale.code()}", value: locale.code(), selected: locale == current, {locale.label()} }
          }
        }
      }
    }
    main {
      class: "console-main",
      Outlet::<Route> {}
    }
  }
}
