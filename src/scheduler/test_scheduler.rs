//! Test Scheduler for deterministic testing of time-based operators.
//!
//! Provides virtual time that only advances when explicitly instructed,
//! enabling deterministic testing of `debounce`, `interval`, `timer`, etc.
//!
//! # Usage
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxlite::{prelude::*, scheduler::TestScheduler};
//!
//! // Initialize the test scheduler (required before use)
//! TestScheduler::init();
//!
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! observable::timer::<_, ()>(Duration::from_millis(100), TestScheduler)
//!   .subscribe(move |v| c_seen.borrow_mut().push(v));
//!
//! // Advance virtual time to trigger the delayed emission
//! TestScheduler::advance_by(Duration::from_millis(100));
//! assert_eq!(*seen.borrow(), vec![0]);
//! ```
//!
//! # Thread Safety
//!
//! TestScheduler uses thread-local storage, so each thread has its own
//! independent virtual time and task queue. This ensures test isolation when
//! running tests in parallel across different threads.

use std::{
  cell::{Cell, RefCell},
  cmp::Ordering,
  collections::BinaryHeap,
  rc::Rc,
};

use super::{Duration, Scheduler, Task};
use crate::subscription::Subscription;

// ==================== Internal State ====================

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
  initialized: bool,
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: Task,
  cancelled: Rc<Cell<bool>>,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

thread_local! {
  static TEST_SCHEDULER_STATE: RefCell<TestSchedulerState>
    = RefCell::new(TestSchedulerState::default());
}

// ==================== TestScheduler ====================

/// A virtual time scheduler for deterministic testing.
///
/// This is a zero-sized type that accesses thread-local state.
/// All instances in the same thread share the same virtual time and task queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestScheduler;

impl TestScheduler {
  /// Initialize or reset the test scheduler state.
  ///
  /// This method must be called at the start of each test to ensure clean
  /// state. It resets the virtual time to zero and clears the task queue.
  ///
  /// # Panics
  ///
  /// Other methods will panic if `init()` has not been called first.
  pub fn init() {
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      state.virtual_time = Duration::ZERO;
      state.task_queue.clear();
      state.next_task_id = 0;
      state.initialized = true;
    });
  }

  fn ensure_initialized() {
    TEST_SCHEDULER_STATE.with(|state| {
      assert!(
        state.borrow().initialized,
        "TestScheduler::init() must be called before using the scheduler"
      );
    });
  }

  /// Get the current virtual time.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn now() -> Duration {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time)
  }

  /// Get the number of pending, not cancelled tasks.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn pending_count() -> usize {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| {
      state
        .borrow()
        .task_queue
        .iter()
        .filter(|t| !t.cancelled.get())
        .count()
    })
  }

  fn execute_tasks_until(target_time: Option<Duration>) {
    loop {
      let task = TEST_SCHEDULER_STATE.with(|state| {
        let mut state = state.borrow_mut();
        let due = state
          .task_queue
          .peek()
          .is_some_and(|peek| target_time.is_none_or(|limit| peek.scheduled_time <= limit));
        if !due {
          return None;
        }
        let scheduled_task = state.task_queue.pop()?;
        state.virtual_time = scheduled_task.scheduled_time;
        Some(scheduled_task)
      });

      let Some(scheduled_task) = task else {
        break;
      };
      // The state borrow is released: tasks may schedule more tasks.
      if !scheduled_task.cancelled.get() {
        (scheduled_task.task)();
      }
    }
  }

  /// Advance virtual time by the specified duration and execute due tasks.
  ///
  /// Tasks are executed in order of their scheduled time, with FIFO ordering
  /// for tasks scheduled at the same time. Tasks scheduled while advancing
  /// run too if they fall inside the window.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn advance_by(duration: Duration) {
    Self::ensure_initialized();
    let target_time = TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time + duration);

    Self::execute_tasks_until(Some(target_time));

    TEST_SCHEDULER_STATE.with(|state| {
      state.borrow_mut().virtual_time = target_time;
    });
  }

  /// Execute all pending tasks by advancing time to each task's scheduled time.
  ///
  /// A task that keeps rescheduling itself (like `interval`) makes this run
  /// until it is cancelled.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn flush() {
    Self::ensure_initialized();
    Self::execute_tasks_until(None);
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, task: Task, delay: Option<Duration>) -> Subscription {
    TestScheduler::ensure_initialized();
    let cancelled = Rc::new(Cell::new(false));
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      let scheduled_time = state.virtual_time + delay.unwrap_or(Duration::ZERO);
      let task_id = state.next_task_id;
      state.next_task_id += 1;
      state.task_queue.push(ScheduledTask {
        scheduled_time,
        task_id,
        task,
        cancelled: cancelled.clone(),
      });
    });
    Subscription::new(move || cancelled.set(true))
  }
}

#[cfg(test)]
mod tests {
  use std::mem;

  use super::*;
  use crate::subscription::SubscriptionLike;

  fn push_task(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Task {
    let log = log.clone();
    Box::new(move || log.borrow_mut().push(name))
  }

  #[rxlite_macro::test]
  fn test_zero_sized_and_copy() {
    assert_eq!(mem::size_of::<TestScheduler>(), 0);
    let s1 = TestScheduler;
    let _s2 = s1;
    let _s3 = s1;
  }

  #[rxlite_macro::test]
  fn test_init_and_reset() {
    TestScheduler::init();
    assert_eq!(TestScheduler::now(), Duration::ZERO);
    assert_eq!(TestScheduler::pending_count(), 0);

    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(TestScheduler::now(), Duration::from_millis(100));

    TestScheduler::init();
    assert_eq!(TestScheduler::now(), Duration::ZERO);
  }

  #[rxlite_macro::test]
  #[should_panic(expected = "TestScheduler::init() must be called")]
  fn test_panics_without_init() {
    TEST_SCHEDULER_STATE.with(|s| s.borrow_mut().initialized = false);
    TestScheduler::now();
  }

  #[rxlite_macro::test]
  fn tasks_run_in_time_then_fifo_order() {
    TestScheduler::init();
    let log = Rc::new(RefCell::new(vec![]));
    TestScheduler.schedule(push_task(&log, "late"), Some(Duration::from_millis(20)));
    TestScheduler.schedule(push_task(&log, "first"), Some(Duration::from_millis(10)));
    TestScheduler.schedule(push_task(&log, "second"), Some(Duration::from_millis(10)));
    TestScheduler.schedule(push_task(&log, "now"), None);

    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*log.borrow(), vec!["now", "first", "second"]);
    assert_eq!(TestScheduler::pending_count(), 1);

    TestScheduler::flush();
    assert_eq!(*log.borrow(), vec!["now", "first", "second", "late"]);
    assert_eq!(TestScheduler::now(), Duration::from_millis(20));
  }

  #[rxlite_macro::test]
  fn cancelled_tasks_never_run() {
    TestScheduler::init();
    let log = Rc::new(RefCell::new(vec![]));
    let handle = TestScheduler.schedule(push_task(&log, "cancelled"), Some(Duration::from_millis(5)));
    TestScheduler.schedule(push_task(&log, "kept"), Some(Duration::from_millis(5)));

    handle.unsubscribe();
    assert_eq!(TestScheduler::pending_count(), 1);
    TestScheduler::flush();

    assert_eq!(*log.borrow(), vec!["kept"]);
  }

  #[rxlite_macro::test]
  fn tasks_scheduled_while_advancing_run_inside_the_window() {
    TestScheduler::init();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    TestScheduler.schedule(
      Box::new(move || {
        c_log.borrow_mut().push("outer");
        TestScheduler.schedule(push_task(&c_log, "inner"), Some(Duration::from_millis(5)));
      }),
      Some(Duration::from_millis(5)),
    );

    TestScheduler::advance_by(Duration::from_millis(10));

    assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    assert_eq!(TestScheduler::now(), Duration::from_millis(10));
  }
}
