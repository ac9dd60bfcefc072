use dotenvy::dotenv;

const DEFAULTS: [(&str, &str); 3] = [
  ("CONSOLE_API_BASE", "http://localhost:8000"),
  ("CONSOLE_LOCALE", "en"),
  ("CONSOLE_LOG_LEVEL", "info"),
];

fn main() {
  // Tell Cargo that if the env file changes, to rerun this build script.
  println!("cargo::rerun-if-changed=.env");

  // a missing .env is fine, every key has a default
  let _ = dotenv();

  for (key, default) in DEFAULTS {
    println!("cargo::rerun-if-env-changed={}", key);
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    println!("cargo::rustc-env={}={}", key, value);
  }
}
