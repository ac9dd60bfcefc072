use std::{cell::Cell, future::Future, rc::Rc, time::Duration};
use dioxus::prelude::spawn;

/// Single replaceable deferred task. Scheduling again supersedes whatever is still pending.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
  generation: Rc<Cell<u64>>,
}

impl PartialEq for Debouncer {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.generation, &other.generation)
  }
}

impl Debouncer {
  pub fn arm(&self) -> u64 {
    let next = self.generation.get() + 1;
    self.generation.set(next);
    next
  }

  pub fn is_current(&self, token: u64) -> bool {
    self.generation.get() == token
  }

  /// Drops the pending task, if any.
  pub fn cancel(&self) {
    self.arm();
  }

  /// Must be called from within a Dioxus scope (event handler or hook).
  pub fn schedule<F, Fut>(&self, delay: Duration, task: F)
  where
    F: FnOnce() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
  {
    let token = self.arm();
    let this = self.clone();
    spawn(async move {
      async_std::task::sleep(delay).await;
      if this.is_current(token) {
        task().await;
      }
    });
  }
}

/// Orders config saves so that only the newest response is applied to the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaveSequence {
  started: u64,
}

impl SaveSequence {
  pub fn begin(&mut self) -> u64 {
    self.started += 1;
    self.started
  }

  pub fn is_latest(&self, seq: u64) -> bool {
    seq == self.started
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rearming_supersedes_pending_token() {
    let debouncer = Debouncer::default();
    let first = debouncer.arm();
    let second = debouncer.arm();
    assert!(!debouncer.is_current(first));
    assert!(debouncer.is_current(second));

    debouncer.cancel();
    assert!(!debouncer.is_current(second));
  }

  #[test]
  fn clones_share_the_timer() {
    let debouncer = Debouncer::default();
    let handle = debouncer.clone();
    let token = debouncer.arm();
    handle.arm();
    assert!(!debouncer.is_current(token));
    assert_eq!(debouncer, handle);
  }

  #[test]
  fn stale_save_responses_are_rejected() {
    let mut seq = SaveSequence::default();
    let slow = seq.begin();
    let fast = seq.begin();
    assert!(seq.is_latest(fast));
    assert!(!seq.is_latest(slow));
  }
}
