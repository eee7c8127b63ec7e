//! Schedulers decide when deferred work runs.
//!
//! Nothing in rxlite blocks a thread. Time-based sources and operators
//! (`interval`, `timer`, `debounce`) hand a task to a [`Scheduler`] and keep
//! the returned [`Subscription`] to cancel it.
//!
//! - [`TestScheduler`]: virtual time, driven explicitly from tests.
//! - [`LocalScheduler`] (feature `scheduler`): tokio `spawn_local` timers.

pub use std::time::Duration;

use crate::subscription::Subscription;

#[cfg(feature = "scheduler")]
mod local_scheduler;
pub mod test_scheduler;

#[cfg(feature = "scheduler")]
pub use local_scheduler::LocalScheduler;
pub use test_scheduler::TestScheduler;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// A Scheduler is an object to order task and schedule their execution.
pub trait Scheduler: Clone + 'static {
  /// Runs `task` after `delay` (as soon as possible for `None`).
  ///
  /// Unsubscribing the returned subscription before the task ran cancels it.
  fn schedule(&self, task: Task, delay: Option<Duration>) -> Subscription;
}
