use quant_console::{utils::config::AppConfig, App};

fn main() {
  let config = AppConfig::from_env();
  // a logger may already be installed (hot reload)
  let _ = dioxus::logger::init(config.log_level);
  dioxus::launch(App);
}
