use std::{cell::RefCell, mem, rc::Rc};

use crate::{
  observer::{BoxedObserver, Observer, Terminal},
  subscription::{Subscription, SubscriptionLike},
};

/// The observer a producer emits into.
///
/// A `Subscriber` wraps the observer passed to `subscribe` and enforces the
/// subscription contract on behalf of every producer:
///
/// - nothing is forwarded once the subscription is closed;
/// - at most one terminal signal (`error` or `complete`) is forwarded;
/// - right after forwarding a terminal signal the subscription is closed,
///   which runs the producer's teardown.
///
/// Subscribers are cheap to clone; clones forward to the same observer. A
/// producer that emits asynchronously keeps a clone in its scheduled work.
pub struct Subscriber<Item, Err> {
  slot: Rc<RefCell<Slot<Item, Err>>>,
  subscription: Subscription,
}

enum Slot<Item, Err> {
  Idle(BoxedObserver<Item, Err>),
  /// The observer is out of its slot handling a value. A terminal signal
  /// raised meanwhile is parked here and delivered once it returns.
  Busy(Option<Terminal<Err>>),
  Done,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Self { slot: self.slot.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item: 'static, Err: 'static> Subscriber<Item, Err> {
  /// Binds `observer` to `subscription`. Unsubscribing releases the observer.
  pub(crate) fn new(observer: BoxedObserver<Item, Err>, subscription: Subscription) -> Self {
    let slot = Rc::new(RefCell::new(Slot::Idle(observer)));
    let weak = Rc::downgrade(&slot);
    subscription.add(Subscription::new(move || {
      let Some(slot) = weak.upgrade() else { return };
      let released = match slot.try_borrow_mut() {
        Ok(mut slot) => mem::replace(&mut *slot, Slot::Done),
        Err(_) => return,
      };
      drop(released);
    }));
    Self { slot, subscription }
  }
}

impl<Item, Err> Subscriber<Item, Err> {
  /// The subscription of the execution this subscriber feeds.
  ///
  /// Producers attach resources acquired after setup (timers, inner
  /// subscriptions) here so they are released with the execution.
  #[inline]
  pub fn subscription(&self) -> &Subscription { &self.subscription }

  /// True once the execution is over or the observer stopped accepting
  /// values.
  pub fn is_closed(&self) -> bool {
    if self.subscription.is_closed() {
      return true;
    }
    match self.slot.try_borrow() {
      Ok(slot) => match &*slot {
        Slot::Idle(observer) => observer.is_closed(),
        Slot::Busy(pending) => pending.is_some(),
        Slot::Done => true,
      },
      Err(_) => false,
    }
  }

  pub fn next(&self, value: Item) {
    if self.subscription.is_closed() {
      return;
    }
    let taken = {
      let Ok(mut slot) = self.slot.try_borrow_mut() else { return };
      match mem::replace(&mut *slot, Slot::Busy(None)) {
        Slot::Idle(observer) => observer,
        other => {
          if matches!(other, Slot::Busy(_)) {
            tracing::warn!("re-entrant emission dropped: observer is still handling a value");
          }
          *slot = other;
          return;
        }
      }
    };
    let mut restore = RestoreOnUnwind { slot: &self.slot, observer: Some(taken) };
    if let Some(observer) = restore.observer.as_mut() {
      observer.next(value);
    }
    let Some(mut observer) = restore.observer.take() else { return };

    let parked = {
      let mut slot = self.slot.borrow_mut();
      match mem::replace(&mut *slot, Slot::Done) {
        Slot::Busy(None) => {
          *slot = Slot::Idle(observer);
          return;
        }
        Slot::Busy(Some(terminal)) => terminal,
        // Unsubscribed while the value was being handled.
        Slot::Idle(_) | Slot::Done => return,
      }
    };
    parked.deliver(&mut *observer);
    self.subscription.unsubscribe();
  }

  pub fn error(&self, err: Err) { self.terminate(Terminal::Error(err)) }

  pub fn complete(&self) { self.terminate(Terminal::Complete) }

  fn terminate(&self, terminal: Terminal<Err>) {
    if self.subscription.is_closed() {
      return;
    }
    let mut observer = {
      let Ok(mut slot) = self.slot.try_borrow_mut() else { return };
      match mem::replace(&mut *slot, Slot::Done) {
        Slot::Idle(observer) => observer,
        Slot::Busy(None) => {
          *slot = Slot::Busy(Some(terminal));
          return;
        }
        other => {
          *slot = other;
          return;
        }
      }
    };
    terminal.deliver(&mut *observer);
    self.subscription.unsubscribe();
  }
}

/// Puts a busy observer back into its slot when its callback panics, so a
/// caller that catches the panic can keep emitting.
///
/// A terminal parked by the panicking callback is dropped with the observer.
struct RestoreOnUnwind<'a, Item, Err> {
  slot: &'a RefCell<Slot<Item, Err>>,
  observer: Option<BoxedObserver<Item, Err>>,
}

impl<Item, Err> Drop for RestoreOnUnwind<'_, Item, Err> {
  fn drop(&mut self) {
    let Some(observer) = self.observer.take() else { return };
    let Ok(mut slot) = self.slot.try_borrow_mut() else { return };
    let restored = match &*slot {
      Slot::Busy(None) => Slot::Idle(observer),
      Slot::Busy(Some(_)) => Slot::Done,
      // Unsubscribed while the value was being handled.
      Slot::Idle(_) | Slot::Done => return,
    };
    *slot = restored;
  }
}

impl<Item, Err> Observer<Item, Err> for Subscriber<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { Subscriber::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { Subscriber::error(self, err) }

  #[inline]
  fn complete(&mut self) { Subscriber::complete(self) }

  #[inline]
  fn is_closed(&self) -> bool { Subscriber::is_closed(self) }
}
