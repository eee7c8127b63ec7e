use std::{cell::RefCell, mem, rc::Rc};

use smallvec::SmallVec;

use crate::{
  observer::{BoxedObserver, Observer, Terminal},
  subscription::{Subscription, SubscriptionLike},
  util::run_isolated,
};

/// An observer registered on a subject, shared so that a delivery pass can
/// hold it after it was removed from the list.
pub(crate) type ObserverCell<Item, Err> = Rc<RefCell<Slot<Item, Err>>>;

pub(crate) enum Slot<Item, Err> {
  Idle(BoxedObserver<Item, Err>),
  /// Out of its slot handling a value. A terminal signal raised meanwhile
  /// is parked here and delivered once the callback returns.
  Busy(Option<Terminal<Err>>),
  /// Received its terminal signal.
  Done,
}

pub(crate) fn observer_cell<Item, Err>(observer: BoxedObserver<Item, Err>) -> ObserverCell<Item, Err> {
  Rc::new(RefCell::new(Slot::Idle(observer)))
}

pub(crate) struct Entry<Item, Err> {
  pub(crate) observer: ObserverCell<Item, Err>,
  /// The handle given to the subscriber, closed when the subject terminates.
  pub(crate) subscription: Subscription,
}

/// Subscribers container with ID-based removal.
///
/// Insertion order is delivery order.
pub(crate) struct Subscribers<Item, Err> {
  next_id: usize,
  items: SmallVec<[(usize, Entry<Item, Err>); 2]>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  /// Reserve the next ID without adding an entry.
  ///
  /// The subscription of an entry removes it by ID, so the ID has to exist
  /// before the entry does.
  #[inline]
  pub(crate) fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  #[inline]
  pub(crate) fn insert(&mut self, id: usize, entry: Entry<Item, Err>) { self.items.push((id, entry)); }

  pub(crate) fn remove(&mut self, id: usize) -> Option<Entry<Item, Err>> {
    let pos = self.items.iter().position(|(item_id, _)| *item_id == id)?;
    Some(self.items.remove(pos).1)
  }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.items.len() }

  /// The observers registered right now, in registration order.
  pub(crate) fn snapshot(&self) -> SmallVec<[ObserverCell<Item, Err>; 2]> {
    self
      .items
      .iter()
      .map(|(_, entry)| entry.observer.clone())
      .collect()
  }

  /// Removes every entry, in registration order.
  pub(crate) fn drain(&mut self) -> SmallVec<[Entry<Item, Err>; 2]> {
    std::mem::take(&mut self.items)
      .into_iter()
      .map(|(_, entry)| entry)
      .collect()
  }
}

/// Delivers `value` to one observer, isolating a panic it raises.
///
/// An observer that is still busy with an earlier value (a re-entrant
/// emission) is skipped, as is one that already terminated. A terminal
/// parked while the callback ran is delivered right after it.
fn deliver_value<Item, Err>(cell: &ObserverCell<Item, Err>, value: Item) {
  let mut observer = {
    let mut slot = cell.borrow_mut();
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
  run_isolated("subject delivery", || observer.next(value));

  let parked = {
    let mut slot = cell.borrow_mut();
    match mem::replace(&mut *slot, Slot::Done) {
      Slot::Busy(None) => {
        *slot = Slot::Idle(observer);
        return;
      }
      Slot::Busy(Some(terminal)) => terminal,
      other => {
        *slot = other;
        return;
      }
    }
  };
  run_isolated("subject delivery", || parked.deliver(&mut *observer));
}

/// Delivers `terminal` to one observer, or parks it while the observer is
/// busy.
fn deliver_terminal<Item, Err>(cell: &ObserverCell<Item, Err>, terminal: Terminal<Err>) {
  let mut observer = {
    let mut slot = cell.borrow_mut();
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
  run_isolated("subject delivery", || terminal.deliver(&mut *observer));
}

/// Broadcast value to all observers with optimal cloning.
///
/// The value is cloned for all observers except the last one, which receives
/// the moved value.
pub(crate) fn broadcast_value<Item: Clone, Err>(observers: &[ObserverCell<Item, Err>], value: Item) {
  let mut iter = observers.iter().peekable();
  while let Some(observer) = iter.next() {
    if iter.peek().is_some() {
      deliver_value(observer, value.clone());
    } else {
      deliver_value(observer, value);
      break;
    }
  }
}

/// Broadcast a terminal signal and close every entry's subscription.
pub(crate) fn broadcast_terminal<Item, Err: Clone>(
  entries: SmallVec<[Entry<Item, Err>; 2]>, terminal: &Terminal<Err>,
) {
  for entry in entries {
    deliver_terminal(&entry.observer, terminal.clone());
    entry.subscription.unsubscribe();
  }
}
