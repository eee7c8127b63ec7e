use std::{convert::Infallible, rc::Rc};

use crate::{
  observer::Observer,
  subscriber::Subscriber,
  subscription::Subscription,
};

mod from_event;
mod from_iter;
mod interval;
mod of;

pub use from_event::*;
pub use from_iter::*;
pub use interval::*;
pub use of::*;

/// The procedure an [`Observable`] runs once per subscription.
///
/// It receives the [`Subscriber`] to emit into and returns the teardown of
/// the execution it started. Returning `Err` reports a failure to set the
/// execution up; the error is delivered to the observer.
pub type Producer<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> Result<Subscription, Err>;

/// A representation of any set of values over any amount of time. This is the
/// most basic building block of rxlite.
///
/// An observable only holds its producer. Each call to
/// [`subscribe`](Observable::subscribe) runs the producer again, so two
/// subscriptions never share an execution (unicast).
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let ticks = Observable::<i32>::create(|subscriber| {
///   subscriber.next(1);
///   subscriber.next(2);
///   subscriber.complete();
///   Ok(Subscription::empty())
/// });
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// ticks.subscribe(move |v| c_seen.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub struct Observable<Item, Err = Infallible> {
  producer: Rc<Producer<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Self { producer: self.producer.clone() } }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// param `producer`: the function that is called each time the Observable
  /// is subscribed to. It is given a Subscriber, to which new values can be
  /// `next`ed, or an `error` method can be called to raise an error, or
  /// `complete` can be called to notify of a successful completion. It
  /// returns the teardown of the execution, `Subscription::empty()` when
  /// there is nothing to release.
  pub fn create<F>(producer: F) -> Self
  where
    F: Fn(Subscriber<Item, Err>) -> Result<Subscription, Err> + 'static,
  {
    Self { producer: Rc::new(producer) }
  }

  /// Starts a new execution delivering to `observer`.
  ///
  /// The producer runs synchronously before this returns. If the execution
  /// already terminated by then, the returned subscription is closed and the
  /// teardown has run.
  pub fn subscribe<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + 'static,
  {
    let subscription = Subscription::empty();
    let subscriber = Subscriber::new(Box::new(observer), subscription.clone());
    match (self.producer)(subscriber.clone()) {
      Ok(teardown) => subscription.add(teardown),
      Err(err) => subscriber.error(err),
    }
    subscription
  }
}
