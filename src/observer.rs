//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::fmt::{Debug, Formatter};

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable.
///
/// Observers do not guard against misuse themselves: the
/// [`Subscriber`](crate::subscriber::Subscriber) handed to a producer makes
/// sure that nothing reaches an observer after a terminal signal.
///
/// Any `FnMut(Item)` closure is an observer that only handles values.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable. No more values follow.
  fn error(&mut self, err: Err);

  /// Handle completion of the observable. No more values follow.
  fn complete(&mut self);

  /// Checks if the observer will ignore any further signal.
  ///
  /// This is used by synchronous sources (like `from_iter`) to stop emitting
  /// early, e.g. once a `take` operator downstream is satisfied.
  fn is_closed(&self) -> bool { false }
}

/// Closures are the shorthand for an observer that only handles values.
impl<F, Item, Err> Observer<Item, Err> for F
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) { self(value) }

  #[inline]
  fn error(&mut self, _err: Err) {}

  #[inline]
  fn complete(&mut self) {}
}

/// Boxed observer (single-threaded, no Send bound)
pub type BoxedObserver<Item, Err> = Box<dyn Observer<Item, Err>>;

// ============================================================================
// PartialObserver
// ============================================================================

/// An observer built from any subset of the three callbacks.
///
/// A missing callback means the matching signal is ignored.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let log = Rc::new(RefCell::new(vec![]));
/// let (c_log, c_log2) = (log.clone(), log.clone());
///
/// observable::from_iter::<_, ()>(vec![1, 2]).subscribe(
///   PartialObserver::new()
///     .on_next(move |v: i32| c_log.borrow_mut().push(v.to_string()))
///     .on_complete(move || c_log2.borrow_mut().push("done".to_owned())),
/// );
///
/// assert_eq!(*log.borrow(), ["1", "2", "done"]);
/// ```
pub struct PartialObserver<Item, Err> {
  on_next: Option<Box<dyn FnMut(Item)>>,
  on_error: Option<Box<dyn FnOnce(Err)>>,
  on_complete: Option<Box<dyn FnOnce()>>,
}

impl<Item, Err> Default for PartialObserver<Item, Err> {
  fn default() -> Self { Self { on_next: None, on_error: None, on_complete: None } }
}

impl<Item, Err> PartialObserver<Item, Err> {
  /// An observer that ignores every signal until callbacks are attached.
  pub fn new() -> Self { Self::default() }

  #[must_use]
  pub fn on_next(mut self, f: impl FnMut(Item) + 'static) -> Self {
    self.on_next = Some(Box::new(f));
    self
  }

  #[must_use]
  pub fn on_error(mut self, f: impl FnOnce(Err) + 'static) -> Self {
    self.on_error = Some(Box::new(f));
    self
  }

  #[must_use]
  pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
    self.on_complete = Some(Box::new(f));
    self
  }
}

impl<Item, Err> Debug for PartialObserver<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PartialObserver")
      .field("on_next", &self.on_next.is_some())
      .field("on_error", &self.on_error.is_some())
      .field("on_complete", &self.on_complete.is_some())
      .finish()
  }
}

impl<Item, Err> Observer<Item, Err> for PartialObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if let Some(on_next) = self.on_next.as_mut() {
      on_next(value);
    }
  }

  fn error(&mut self, err: Err) {
    self.on_next = None;
    self.on_complete = None;
    if let Some(on_error) = self.on_error.take() {
      on_error(err);
    }
  }

  fn complete(&mut self) {
    self.on_next = None;
    self.on_error = None;
    if let Some(on_complete) = self.on_complete.take() {
      on_complete();
    }
  }
}

// ============================================================================
// Terminal
// ============================================================================

/// A terminal signal, kept by closed subjects to replay to late subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminal<Err> {
  Error(Err),
  Complete,
}

impl<Err> Terminal<Err> {
  /// Delivers this signal to `observer`.
  pub fn deliver<Item>(self, observer: &mut dyn Observer<Item, Err>) {
    match self {
      Terminal::Error(err) => observer.error(err),
      Terminal::Complete => observer.complete(),
    }
  }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  struct TestObserver {
    values: Vec<i32>,
    completed: bool,
  }

  impl Observer<i32, ()> for TestObserver {
    fn next(&mut self, value: i32) { self.values.push(value); }

    fn error(&mut self, _: ()) {}

    fn complete(&mut self) { self.completed = true; }
  }

  #[rxlite_macro::test]
  fn test_observer_trait() {
    let mut obs = TestObserver { values: vec![], completed: false };
    obs.next(1);
    obs.next(2);
    obs.complete();
    assert_eq!(obs.values, vec![1, 2]);
    assert!(obs.completed);
    assert!(!obs.is_closed());
  }

  #[rxlite_macro::test]
  fn test_closure_as_observer() {
    let mut count = 0;
    {
      let mut closure_obs = |v: i32| count += v;
      Observer::<i32, ()>::next(&mut closure_obs, 10);
      Observer::<i32, ()>::next(&mut closure_obs, 20);
      Observer::<i32, ()>::complete(&mut closure_obs);
    }
    assert_eq!(count, 30);
  }

  #[rxlite_macro::test]
  fn partial_observer_ignores_missing_callbacks() {
    let mut empty = PartialObserver::<i32, &str>::new();
    empty.next(1);
    empty.error("ignored");
    empty.complete();

    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    let mut only_errors =
      PartialObserver::<i32, &str>::new().on_error(move |e| c_errors.borrow_mut().push(e));
    only_errors.next(1);
    only_errors.error("boom");
    assert_eq!(*errors.borrow(), vec!["boom"]);
  }

  #[rxlite_macro::test]
  fn partial_observer_runs_terminal_callback_once() {
    let completed = Rc::new(RefCell::new(0));
    let c_completed = completed.clone();
    let mut observer =
      PartialObserver::<i32, ()>::new().on_complete(move || *c_completed.borrow_mut() += 1);
    observer.complete();
    observer.complete();
    assert_eq!(*completed.borrow(), 1);
  }

  #[rxlite_macro::test]
  fn terminal_delivers_to_observer() {
    let mut obs = TestObserver { values: vec![], completed: false };
    Terminal::Complete.deliver::<i32>(&mut obs);
    assert!(obs.completed);
  }
}
