use std::{cell::RefCell, convert::Infallible, rc::Rc};

use crate::{
  observable::Observable,
  observer::{BoxedObserver, Observer, Terminal},
  subscription::Subscription,
  util::run_isolated,
};

mod behavior_subject;
pub(crate) mod subscribers;

pub use behavior_subject::BehaviorSubject;
use subscribers::{broadcast_terminal, broadcast_value, observer_cell, Entry, Subscribers};

/// Subject: A hot observable that multicasts values to many observers.
///
/// A `Subject` is driven from the outside through [`next`](Subject::next),
/// [`error`](Subject::error) and [`complete`](Subject::complete), and
/// delivers each signal synchronously to every observer registered at that
/// moment, in registration order. Clones are handles to the same subject.
///
/// # Example
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let subject = Subject::<i32>::new();
/// let results = Rc::new(RefCell::new(vec![]));
/// let c_results = results.clone();
///
/// subject.subscribe(move |v| c_results.borrow_mut().push(v));
///
/// subject.next(1);
/// subject.next(2);
/// assert_eq!(*results.borrow(), vec![1, 2]);
/// ```
///
/// # Delivery rules
///
/// - A delivery pass works on a snapshot of the observers taken when it
///   starts. An observer subscribed during the pass does not receive the
///   in-flight signal; an observer unsubscribed during the pass still does.
/// - A panic raised by one observer is caught and logged; the remaining
///   observers are still served.
/// - A re-entrant `next` from inside a callback is delivered right away to
///   every observer that is not itself busy. The busy observer misses that
///   value.
/// - An `error` or `complete` raised from inside a callback reaches the
///   busy observer once its callback returns. Observers that already
///   received it are skipped for the rest of the in-flight `next`.
/// - Once `error` or `complete` ran, the subject is closed: `next` is a
///   no-op, and a late subscriber receives the stored terminal signal
///   immediately together with an already closed subscription.
pub struct Subject<Item, Err = Infallible> {
  inner: Rc<RefCell<SubjectState<Item, Err>>>,
}

struct SubjectState<Item, Err> {
  observers: Subscribers<Item, Err>,
  terminal: Option<Terminal<Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self {
    Self {
      inner: Rc::new(RefCell::new(SubjectState {
        observers: Subscribers::default(),
        terminal: None,
      })),
    }
  }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// True once `error` or `complete` has been called.
  pub fn is_closed(&self) -> bool { self.inner.borrow().terminal.is_some() }

  /// Get the number of current subscribers.
  pub fn observer_count(&self) -> usize { self.inner.borrow().observers.len() }

  fn terminate(&self, terminal: Terminal<Err>)
  where
    Err: Clone,
  {
    let entries = {
      let mut state = self.inner.borrow_mut();
      if state.terminal.is_some() {
        return;
      }
      state.terminal = Some(terminal.clone());
      state.observers.drain()
    };
    tracing::trace!(observers = entries.len(), "subject terminated");
    broadcast_terminal(entries, &terminal);
  }
}

impl<Item: Clone, Err> Subject<Item, Err> {
  /// Delivers `value` to every current observer. A no-op once closed.
  pub fn next(&self, value: Item) {
    let observers = {
      let state = self.inner.borrow();
      if state.terminal.is_some() {
        return;
      }
      state.observers.snapshot()
    };
    broadcast_value(&observers, value);
  }
}

impl<Item, Err: Clone> Subject<Item, Err> {
  /// Errors every current observer and closes the subject.
  pub fn error(&self, err: Err) { self.terminate(Terminal::Error(err)) }

  /// Completes every current observer and closes the subject.
  pub fn complete(&self) { self.terminate(Terminal::Complete) }
}

impl<Item: 'static, Err: Clone + 'static> Subject<Item, Err> {
  /// Registers `observer` for future signals.
  ///
  /// The returned subscription removes the observer again. On a closed
  /// subject the terminal signal is delivered right away, with a panic it
  /// raises caught and logged, and the returned subscription is already
  /// closed.
  pub fn subscribe<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + 'static,
  {
    let replay = self.inner.borrow().terminal.clone();
    if let Some(terminal) = replay {
      let mut observer = observer;
      run_isolated("subject replay", || terminal.deliver::<Item>(&mut observer));
      return Subscription::closed();
    }

    let observer: BoxedObserver<Item, Err> = Box::new(observer);
    let mut state = self.inner.borrow_mut();
    let id = state.observers.reserve_id();
    let weak = Rc::downgrade(&self.inner);
    let subscription = Subscription::new(move || {
      if let Some(inner) = weak.upgrade() {
        let removed = inner.borrow_mut().observers.remove(id);
        drop(removed);
      }
    });
    state.observers.insert(
      id,
      Entry { observer: observer_cell(observer), subscription: subscription.clone() },
    );
    subscription
  }

  /// An observable view of this subject, for use with operators.
  pub fn as_observable(&self) -> Observable<Item, Err> {
    let subject = self.clone();
    Observable::create(move |subscriber| Ok(subject.subscribe(subscriber)))
  }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for Subject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { Subject::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { Subject::error(self, err) }

  #[inline]
  fn complete(&mut self) { Subject::complete(self) }

  #[inline]
  fn is_closed(&self) -> bool { Subject::is_closed(self) }
}
