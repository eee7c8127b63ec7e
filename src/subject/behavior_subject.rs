use std::{cell::RefCell, convert::Infallible, rc::Rc};

use crate::{
  observable::Observable,
  observer::Observer,
  subject::Subject,
  subscription::Subscription,
  util::run_isolated,
};

/// A Subject that holds a current value.
///
/// A new subscriber receives the current value right away, then every later
/// value. `next` updates the current value before delivering it, so
/// [`value`](BehaviorSubject::value) called from inside a callback already
/// sees the new one.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let subject = BehaviorSubject::<i32>::new(0);
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
///
/// subject.subscribe(move |v| c_seen.borrow_mut().push(v));
/// subject.next(5);
///
/// assert_eq!(*seen.borrow(), vec![0, 5]);
/// assert_eq!(subject.value(), 5);
/// ```
pub struct BehaviorSubject<Item, Err = Infallible> {
  subject: Subject<Item, Err>,
  value: Rc<RefCell<Item>>,
}

impl<Item, Err> Clone for BehaviorSubject<Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), value: self.value.clone() } }
}

impl<Item, Err> BehaviorSubject<Item, Err> {
  pub fn new(initial: Item) -> Self {
    Self { subject: Subject::new(), value: Rc::new(RefCell::new(initial)) }
  }

  /// The most recent value, or the initial one if nothing was emitted yet.
  pub fn value(&self) -> Item
  where
    Item: Clone,
  {
    self.value.borrow().clone()
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.subject.is_closed() }

  #[inline]
  pub fn observer_count(&self) -> usize { self.subject.observer_count() }
}

impl<Item: Clone, Err> BehaviorSubject<Item, Err> {
  /// Stores `value` as the current value and delivers it. A no-op once
  /// closed.
  pub fn next(&self, value: Item) {
    if self.subject.is_closed() {
      return;
    }
    *self.value.borrow_mut() = value.clone();
    self.subject.next(value);
  }
}

impl<Item, Err: Clone> BehaviorSubject<Item, Err> {
  #[inline]
  pub fn error(&self, err: Err) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }
}

impl<Item: Clone + 'static, Err: Clone + 'static> BehaviorSubject<Item, Err> {
  /// Delivers the current value to `observer`, then registers it.
  ///
  /// A panic raised while handling the current value is caught and logged,
  /// and the observer is still registered. A closed subject only replays its
  /// terminal signal.
  pub fn subscribe<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + 'static,
  {
    let mut observer = observer;
    if !self.subject.is_closed() {
      let current = self.value();
      run_isolated("subject replay", || observer.next(current));
    }
    self.subject.subscribe(observer)
  }

  pub fn as_observable(&self) -> Observable<Item, Err> {
    let subject = self.clone();
    Observable::create(move |subscriber| Ok(subject.subscribe(subscriber)))
  }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for BehaviorSubject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { BehaviorSubject::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { BehaviorSubject::error(self, err) }

  #[inline]
  fn complete(&mut self) { BehaviorSubject::complete(self) }

  #[inline]
  fn is_closed(&self) -> bool { BehaviorSubject::is_closed(self) }
}
