//! IntoFuture operator implementation
//!
//! Converts an Observable into a Future that resolves with the single value
//! emitted by the observable.
//!
//! ## Behavior
//!
//! - **Single value**: the future resolves with `Ok(Ok(value))`
//! - **Error from observable**: the future resolves with `Ok(Err(error))`
//! - **Empty observable**: the future resolves with
//!   `Err(IntoFutureError::Empty)`
//! - **Multiple values**: the future resolves with
//!   `Err(IntoFutureError::MultipleValues)` as soon as the second value
//!   arrives
//!
//! Dropping the future unsubscribes from the observable.

use std::{
  cell::RefCell,
  future::Future,
  pin::Pin,
  rc::Rc,
  task::{Context, Poll, Waker},
};

use crate::{
  error::{IntoFutureError, IntoFutureResult},
  observable::Observable,
  observer::Observer,
  subscription::{Subscription, SubscriptionLike},
};

// ============================================================================
// Internal State
// ============================================================================

enum State<Item, Err> {
  /// No value received yet
  Empty,
  /// Exactly one value received
  HasValue(Item),
  MultipleValues,
  Error(Err),
}

struct SharedState<Item, Err> {
  state: State<Item, Err>,
  waker: Option<Waker>,
  completed: bool,
}

// ============================================================================
// ObservableFuture
// ============================================================================

/// A future that resolves with the value emitted by an observable.
///
/// It works for synchronous and asynchronous observables alike: the state is
/// shared with the observer, which wakes the future when it is resolved.
pub struct ObservableFuture<Item, Err> {
  shared: Rc<RefCell<SharedState<Item, Err>>>,
  subscription: Subscription,
}

impl<Item, Err> Future for ObservableFuture<Item, Err> {
  type Output = IntoFutureResult<Item, Err>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut shared = self.shared.borrow_mut();
    if shared.completed {
      let result = match std::mem::replace(&mut shared.state, State::Empty) {
        State::Empty => Err(IntoFutureError::Empty),
        State::HasValue(v) => Ok(Ok(v)),
        State::MultipleValues => Err(IntoFutureError::MultipleValues),
        State::Error(e) => Ok(Err(e)),
      };
      Poll::Ready(result)
    } else {
      shared.waker = Some(cx.waker().clone());
      Poll::Pending
    }
  }
}

impl<Item, Err> Drop for ObservableFuture<Item, Err> {
  fn drop(&mut self) { self.subscription.unsubscribe() }
}

// ============================================================================
// IntoFutureObserver
// ============================================================================

/// Observer that feeds an [`ObservableFuture`].
pub struct IntoFutureObserver<Item, Err> {
  shared: Rc<RefCell<SharedState<Item, Err>>>,
}

impl<Item, Err> IntoFutureObserver<Item, Err> {
  fn resolve(&self, state: Option<State<Item, Err>>) {
    let waker = {
      let mut shared = self.shared.borrow_mut();
      if let Some(state) = state {
        shared.state = state;
      }
      shared.completed = true;
      shared.waker.take()
    };
    if let Some(waker) = waker {
      waker.wake();
    }
  }
}

impl<Item, Err> Observer<Item, Err> for IntoFutureObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let has_value = {
      let mut shared = self.shared.borrow_mut();
      match &shared.state {
        State::Empty => {
          shared.state = State::HasValue(value);
          false
        }
        State::HasValue(_) => true,
        // Already resolved, ignore
        State::MultipleValues | State::Error(_) => false,
      }
    };
    if has_value {
      self.resolve(Some(State::MultipleValues));
    }
  }

  fn error(&mut self, err: Err) { self.resolve(Some(State::Error(err))) }

  fn complete(&mut self) { self.resolve(None) }

  fn is_closed(&self) -> bool { self.shared.borrow().completed }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Subscribes and returns a future of the single value this observable
  /// emits.
  ///
  /// ```rust
  /// use futures::executor::block_on;
  /// use rxlite::prelude::*;
  ///
  /// let value = block_on(observable::of::<_, ()>(42).into_future());
  /// assert_eq!(value, Ok(Ok(42)));
  ///
  /// let empty = block_on(observable::empty::<i32, ()>().into_future());
  /// assert_eq!(empty, Err(IntoFutureError::Empty));
  /// ```
  pub fn into_future(&self) -> ObservableFuture<Item, Err> {
    let shared =
      Rc::new(RefCell::new(SharedState { state: State::Empty, waker: None, completed: false }));
    let subscription = self.subscribe(IntoFutureObserver { shared: shared.clone() });
    ObservableFuture { shared, subscription }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use futures::executor::block_on;

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn single_value() {
    let value = block_on(observable::of::<_, ()>(1).into_future());
    assert_eq!(value, Ok(Ok(1)));
  }

  #[rxlite_macro::test]
  fn stream_error() {
    let value = block_on(observable::throw_err::<i32, _>("fail").into_future());
    assert_eq!(value, Ok(Err("fail")));
  }

  #[rxlite_macro::test]
  fn empty_and_multiple() {
    let empty = block_on(observable::empty::<i32, ()>().into_future());
    assert_eq!(empty, Err(IntoFutureError::Empty));

    let multiple = block_on(observable::from_iter::<_, ()>(vec![1, 2, 3]).into_future());
    assert_eq!(multiple, Err(IntoFutureError::MultipleValues));
  }

  #[rxlite_macro::test]
  fn multiple_values_stop_the_source_early() {
    let emitted = Rc::new(Cell::new(0));
    let c_emitted = emitted.clone();
    let source = observable::from_iter::<_, ()>(0..).map(move |v: u64| {
      c_emitted.set(c_emitted.get() + 1);
      v
    });

    let result = block_on(source.into_future());

    assert_eq!(result, Err(IntoFutureError::MultipleValues));
    assert_eq!(emitted.get(), 2);
  }

  #[rxlite_macro::test]
  fn resolves_from_a_later_emission() {
    let subject = Subject::<&str, ()>::new();
    let future = subject.as_observable().into_future();
    assert_eq!(subject.observer_count(), 1);

    subject.next("ready");
    subject.complete();

    assert_eq!(block_on(future), Ok(Ok("ready")));
  }

  #[rxlite_macro::test]
  fn dropping_the_future_unsubscribes() {
    let subject = Subject::<i32, ()>::new();
    let future = subject.as_observable().into_future();
    assert_eq!(subject.observer_count(), 1);

    drop(future);

    assert_eq!(subject.observer_count(), 0);
  }

  #[cfg(feature = "scheduler")]
  #[rxlite_macro::test]
  async fn awaits_a_scheduled_value() {
    let value = observable::timer::<_, ()>(Duration::from_millis(5), LocalScheduler)
      .into_future()
      .await;
    assert_eq!(value, Ok(Ok(0)));
  }
}
