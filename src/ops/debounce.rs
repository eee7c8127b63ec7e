use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  observer::Observer,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits a value only after `duration` has passed without the source
  /// emitting another one.
  ///
  /// Each value replaces the pending one and restarts the timer, a task on
  /// `scheduler`. When the source completes, a pending value is emitted
  /// before the completion. When the source errors, it is dropped.
  pub fn debounce<S>(&self, duration: Duration, scheduler: S) -> Observable<Item, Err>
  where
    S: Scheduler,
  {
    let source = self.clone();
    Observable::create(move |subscriber| {
      let state = Rc::new(RefCell::new(DebounceState { trailing_value: None, handle: None }));
      let observer = DebounceObserver {
        subscriber,
        scheduler: scheduler.clone(),
        duration,
        state: state.clone(),
      };
      let teardown = Subscription::new(move || {
        cancel_pending(&state);
      });
      teardown.add(source.subscribe(observer));
      Ok(teardown)
    })
  }
}

struct DebounceState<Item> {
  trailing_value: Option<Item>,
  handle: Option<Subscription>,
}

type SharedState<Item> = Rc<RefCell<DebounceState<Item>>>;

/// Drops the pending value and cancels its timer.
fn cancel_pending<Item>(state: &SharedState<Item>) -> Option<Item> {
  let (value, handle) = {
    let mut state = state.borrow_mut();
    (state.trailing_value.take(), state.handle.take())
  };
  if let Some(handle) = handle {
    handle.unsubscribe();
  }
  value
}

pub struct DebounceObserver<Item, Err, S> {
  subscriber: Subscriber<Item, Err>,
  scheduler: S,
  duration: Duration,
  state: SharedState<Item>,
}

impl<Item: 'static, Err: 'static, S: Scheduler> Observer<Item, Err>
  for DebounceObserver<Item, Err, S>
{
  fn next(&mut self, value: Item) {
    cancel_pending(&self.state);
    self.state.borrow_mut().trailing_value = Some(value);

    let state = self.state.clone();
    let subscriber = self.subscriber.clone();
    let handle = self.scheduler.schedule(
      Box::new(move || {
        let value = {
          let mut state = state.borrow_mut();
          state.handle = None;
          state.trailing_value.take()
        };
        if let Some(value) = value {
          subscriber.next(value);
        }
      }),
      Some(self.duration),
    );
    self.state.borrow_mut().handle = Some(handle);
  }

  fn error(&mut self, err: Err) {
    cancel_pending(&self.state);
    self.subscriber.error(err);
  }

  fn complete(&mut self) {
    if let Some(value) = cancel_pending(&self.state) {
      self.subscriber.next(value);
    }
    self.subscriber.complete();
  }

  fn is_closed(&self) -> bool { self.subscriber.is_closed() }
}
