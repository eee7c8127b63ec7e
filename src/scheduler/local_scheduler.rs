use super::{Duration, Scheduler, Task};
use crate::subscription::Subscription;

/// Runs tasks on the current tokio `LocalSet` through
/// [`tokio::task::spawn_local`], waiting with [`tokio::time::sleep`].
///
/// Cancelling the returned subscription aborts the tokio task.
///
/// # Panics
///
/// `schedule` panics when called outside of a `LocalSet` context.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalScheduler;

impl Scheduler for LocalScheduler {
  fn schedule(&self, task: Task, delay: Option<Duration>) -> Subscription {
    let handle = tokio::task::spawn_local(async move {
      if let Some(delay) = delay.filter(|d| !d.is_zero()) {
        tokio::time::sleep(delay).await;
      }
      task();
    });
    Subscription::new(move || handle.abort())
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::subscription::SubscriptionLike;

  #[rxlite_macro::test]
  async fn runs_scheduled_task_after_delay() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    LocalScheduler.schedule(
      Box::new(move || c_log.borrow_mut().push("ran")),
      Some(Duration::from_millis(5)),
    );
    assert!(log.borrow().is_empty());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(*log.borrow(), vec!["ran"]);
  }

  #[rxlite_macro::test]
  async fn cancelled_task_does_not_run() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let handle = LocalScheduler.schedule(
      Box::new(move || c_log.borrow_mut().push("ran")),
      Some(Duration::from_millis(5)),
    );
    handle.unsubscribe();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(log.borrow().is_empty());
  }
}
