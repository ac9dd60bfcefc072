use serde_json::Value;

use super::{forms::non_empty, pagination::PageQuery};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
  pub action: String,
  pub resource_type: String,
  pub resource_id: String,
}

impl AuditLogFilter {
  /// Paging plus whichever filters are non-blank after trimming.
  pub fn to_query(&self, page: PageQuery) -> Vec<(&'static str, String)> {
    let mut query = page.to_query();
    let filters = [("action", &self.action), ("resource_type", &self.resource_type), ("resource_id", &self.resource_id)];
    for (name, raw) in filters {
      if let Some(value) = non_empty(raw) {
        query.push((name, value));
      }
    }
    query
  }

  pub fn is_empty(&self) -> bool {
    [&self.action, &self.resource_type, &self.resource_id].iter().all(|v| v.trim().is_empty())
  }
}

pub fn detail_pretty(detail: &Value) -> String {
  match detail {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn whitespace_filters_are_omitted() {
    let filter = AuditLogFilter { action: "   ".into(), resource_type: "\t".into(), resource_id: "".into() };
    let query = filter.to_query(PageQuery { page: 2, page_size: 50 });
    assert_eq!(query, vec![("page", "2".to_string()), ("page_size", "50".to_string())]);
    assert!(filter.is_empty());
  }

  #[test]
  fn filters_are_trimmed() {
    let filter = AuditLogFilter { action: " update ".into(), resource_type: "".into(), resource_id: " 42".into() };
    let query = filter.to_query(PageQuery::default());
    assert!(query.contains(&("action", "update".to_string())));
    assert!(query.contains(&("resource_id", "42".to_string())));
    assert!(!query.iter().any(|(k, _)| *k == "resource_type"));
  }

  #[test]
  fn detail_is_pretty_printed() {
    assert_eq!(detail_pretty(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    assert_eq!(detail_pretty(&Value::Null), "");
  }
}
