use dioxus::prelude::*;

pub const CSV_MIME: &str = "text/csv";

/// Flashes a toast element for two seconds.
pub fn show_toast(id: &str) {
  document::eval(&format!(r#"
  var x = document.getElementById("{id}");
  if (x) {{
    x.classList.add("show");
    setTimeout(function(){{x.classList.remove("show");}}, 2000);
  }}
  "#));
}

/// Triggers a browser download of `contents` through a blob URL.
pub fn download_text(file_name: &str, mime: &str, contents: &str) {
  let script = download_script(file_name, mime, contents);
  document::eval(&script);
}

fn download_script(file_name: &str, mime: &str, contents: &str) -> String {
  // JSON string literals are valid JS string literals
  let js = |s: &str| serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
  format!(r#"
  const blob = new Blob([{contents}], {{ type: {mime} }});
  const url = URL.createObjectURL(blob);
  const a = document.createElement("a");
  a.href = url;
  a.download = {name};
  document.body.appendChild(a);
  a.click();
  a.remove();
  URL.revokeObjectURL(url);
  "#, contents = js(contents), mime = js(mime), name = js(file_name))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn download_script_escapes_contents() {
    let script = download_script("growth-TECH.csv", CSV_MIME, "symbol\nAAPL\n\"x\"");
    assert!(script.contains(r#"new Blob(["symbol\nAAPL\n\"x\""]"#));
    assert!(script.contains(r#"a.download = "growth-TECH.csv";"#));
    assert!(script.contains(r#"type: "text/csv""#));
  }
}
