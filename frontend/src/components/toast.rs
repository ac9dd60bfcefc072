use dioxus::prelude::*;

#[component]
pub fn SuccessToast(id: &'static str, content: String) -> Element {
  rsx! {
    div {
      id,
      class: "toast toast-success",
      "{content}"
    }
  }
}

/// Inline status line under a form. Renders nothing when both are empty.
#[component]
pub fn FormMessage(#[props(default)] error: Option<String>, #[props(default)] success: Option<String>) -> Element {
  rsx! {
    if let Some(message) = error {
      p { class: "form-message form-error", "{message}" }
    }
    if let Some(message) = success {
      p { class: "form-message form-success", "{message}" }
    }
  }
}
