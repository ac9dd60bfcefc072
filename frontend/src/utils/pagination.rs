pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const PAGE_SIZE_OPTIONS: [u64; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageQuery {
  pub page: u64,
  pub page_size: u64,
}

impl PageQuery {
  pub fn to_query(&self) -> Vec<(&'static str, String)> {
    vec![("page", self.page.to_string()), ("page_size", self.page_size.to_string())]
  }
}

impl Default for PageQuery {
  fn default() -> Self {
    Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
  }
}

/// Event emitted by the pagination widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageChange {
  Page(u64),
  PageSize(u64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageState {
  pub page: u64,
  pub page_size: u64,
  pub total: u64,
}

impl Default for PageState {
  fn default() -> Self {
    Self::new(DEFAULT_PAGE_SIZE)
  }
}

impl PageState {
  pub fn new(page_size: u64) -> Self {
    Self { page: 1, page_size: page_size.max(1), total: 0 }
  }

  pub fn total_pages(&self) -> u64 {
    if self.total == 0 {
      1
    } else {
      (self.total + self.page_size - 1) / self.page_size
    }
  }

  pub fn has_prev(&self) -> bool {
    self.page > 1
  }

  pub fn has_next(&self) -> bool {
    self.page < self.total_pages()
  }

  pub fn query(&self) -> PageQuery {
    PageQuery { page: self.page, page_size: self.page_size }
  }

  /// Page-size changes jump back to the first page.
  pub fn apply(&mut self, change: PageChange) {
    match change {
      PageChange::Page(page) => self.page = page.clamp(1, self.total_pages()),
      PageChange::PageSize(size) => {
        self.page_size = size.max(1);
        self.page = 1;
      }
    }
  }

  pub fn set_total(&mut self, total: u64) {
    self.total = total;
  }

  pub fn reset(&mut self) {
    self.page = 1;
  }

  /// 1-based inclusive row range shown on the current page, `None` when empty.
  pub fn row_range(&self) -> Option<(u64, u64)> {
    if self.total == 0 {
      return None;
    }
    let start = (self.page - 1) * self.page_size + 1;
    let end = (self.page * self.page_size).min(self.total);
    Some((start, end))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pages_round_up() {
    let mut state = PageState::new(20);
    assert_eq!(state.total_pages(), 1);
    state.set_total(41);
    assert_eq!(state.total_pages(), 3);
    assert!(state.has_next());
    assert!(!state.has_prev());
  }

  #[test]
  fn page_is_clamped_and_size_change_resets() {
    let mut state = PageState::new(10);
    state.set_total(25);
    state.apply(PageChange::Page(9));
    assert_eq!(state.page, 3);
    assert_eq!(state.row_range(), Some((21, 25)));

    state.apply(PageChange::PageSize(50));
    assert_eq!(state.page, 1);
    assert_eq!(state.query(), PageQuery { page: 1, page_size: 50 });
  }

  #[test]
  fn empty_listing_has_no_rows() {
    let state = PageState::default();
    assert_eq!(state.row_range(), None);
    assert_eq!(PageQuery::default().to_query(), vec![("page", "1".to_string()), ("page_size", "20".to_string())]);
  }
}
