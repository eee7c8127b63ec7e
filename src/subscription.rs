use std::{
  any::Any,
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;

use crate::util::run_isolated;

/// Cleanup procedure attached to a [`Subscription`].
pub type Teardown = Box<dyn FnOnce()>;

/// Handle to an active execution that can be cancelled.
pub trait SubscriptionLike {
  /// Cancels the execution. Only the first call has an effect.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;

  /// Activates "RAII" behavior for this subscription. `unsubscribe()` is
  /// called as soon as the returned guard goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard(self)
  }
}

impl Debug for Box<dyn SubscriptionLike> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Box<dyn SubscriptionLike>")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

impl<T: ?Sized + SubscriptionLike> SubscriptionLike for Box<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

// ============================================================================
// Subscription
// ============================================================================

/// A live execution of an observable, or of anything else that needs a
/// cancellation point.
///
/// A subscription owns an optional teardown and a set of child
/// subscriptions. Unsubscribing runs the teardown once and then cascades to
/// every child. Clones share the same state: unsubscribing any clone closes
/// all of them.
///
/// Dropping a subscription never cancels it; use
/// [`SubscriptionLike::unsubscribe_when_dropped`] for scoped cancellation.
///
/// ```rust
/// use std::{cell::Cell, rc::Rc};
///
/// use rxlite::prelude::*;
///
/// let cleaned = Rc::new(Cell::new(0));
/// let c_cleaned = cleaned.clone();
/// let subscription = Subscription::new(move || c_cleaned.set(c_cleaned.get() + 1));
///
/// subscription.unsubscribe();
/// subscription.unsubscribe();
/// assert_eq!(cleaned.get(), 1);
/// assert!(subscription.is_closed());
/// ```
#[derive(Clone, Default)]
pub struct Subscription(Rc<RefCell<Inner>>);

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: Option<Teardown>,
  children: SmallVec<[Box<dyn SubscriptionLike>; 1]>,
}

impl Debug for Inner {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Inner")
      .field("closed", &self.closed)
      .field("has_teardown", &self.teardown.is_some())
      .field("children", &self.children.len())
      .finish()
  }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("Subscription").field(&*self.0.borrow()).finish()
  }
}

impl Subscription {
  /// A subscription whose unsubscription runs `teardown`.
  pub fn new(teardown: impl FnOnce() + 'static) -> Self {
    Self(Rc::new(RefCell::new(Inner {
      closed: false,
      teardown: Some(Box::new(teardown)),
      children: SmallVec::new(),
    })))
  }

  /// An open subscription with no teardown of its own.
  #[inline]
  pub fn empty() -> Self { Self::default() }

  /// A subscription that is already closed.
  pub fn closed() -> Self {
    let subscription = Self::default();
    subscription.0.borrow_mut().closed = true;
    subscription
  }

  /// Registers `child` to be unsubscribed together with this subscription.
  ///
  /// If this subscription is already closed, `child` is unsubscribed right
  /// away. Adding a subscription to itself is ignored.
  pub fn add<S: SubscriptionLike + 'static>(&self, child: S) {
    if self.is_same(&child) {
      return;
    }
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      drop(inner);
      child.unsubscribe();
    } else {
      inner.children.retain(|c| !c.is_closed());
      inner.children.push(Box::new(child));
    }
  }

  /// Number of children still attached.
  pub fn teardown_size(&self) -> usize { self.0.borrow().children.len() }

  fn is_same(&self, other: &dyn Any) -> bool {
    other
      .downcast_ref::<Self>()
      .is_some_and(|other| Rc::ptr_eq(&self.0, &other.0))
  }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&self) {
    let (teardown, children) = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      (inner.teardown.take(), std::mem::take(&mut inner.children))
    };
    if let Some(teardown) = teardown {
      run_isolated("subscription teardown", teardown);
    }
    for child in children {
      child.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

// ============================================================================
// SubscriptionGuard
// ============================================================================

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;

  fn counter() -> (Rc<Cell<usize>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c_count = count.clone();
    (count, move || c_count.set(c_count.get() + 1))
  }

  #[rxlite_macro::test]
  fn unsubscribe_is_idempotent() {
    let (count, teardown) = counter();
    let subscription = Subscription::new(teardown);
    assert!(!subscription.is_closed());

    subscription.unsubscribe();
    subscription.unsubscribe();

    assert_eq!(count.get(), 1);
    assert!(subscription.is_closed());
  }

  #[rxlite_macro::test]
  fn clones_share_state() {
    let (count, teardown) = counter();
    let subscription = Subscription::new(teardown);
    let other = subscription.clone();

    other.unsubscribe();
    assert!(subscription.is_closed());
    subscription.unsubscribe();
    assert_eq!(count.get(), 1);
  }

  #[rxlite_macro::test]
  fn children_cascade_after_teardown() {
    let order = Rc::new(RefCell::new(vec![]));
    let (o1, o2, o3) = (order.clone(), order.clone(), order.clone());
    let parent = Subscription::new(move || o1.borrow_mut().push("parent"));
    parent.add(Subscription::new(move || o2.borrow_mut().push("child 1")));
    parent.add(Subscription::new(move || o3.borrow_mut().push("child 2")));
    assert_eq!(parent.teardown_size(), 2);

    parent.unsubscribe();

    assert_eq!(*order.borrow(), vec!["parent", "child 1", "child 2"]);
  }

  #[rxlite_macro::test]
  fn add_to_closed_parent_unsubscribes_child() {
    let parent = Subscription::closed();
    let (count, teardown) = counter();
    let child = Subscription::new(teardown);

    parent.add(child.clone());

    assert!(child.is_closed());
    assert_eq!(count.get(), 1);
    assert_eq!(parent.teardown_size(), 0);
  }

  #[rxlite_macro::test]
  fn add_prunes_closed_children() {
    let parent = Subscription::empty();
    let closed_child = Subscription::empty();
    parent.add(closed_child.clone());
    closed_child.unsubscribe();

    parent.add(Subscription::empty());
    assert_eq!(parent.teardown_size(), 1);
  }

  #[rxlite_macro::test]
  fn adding_self_is_ignored() {
    let subscription = Subscription::empty();
    subscription.add(subscription.clone());
    assert_eq!(subscription.teardown_size(), 0);
    subscription.unsubscribe();
  }

  #[rxlite_macro::test]
  fn teardown_panic_is_swallowed_and_children_still_run() {
    let (count, teardown) = counter();
    let parent = Subscription::new(|| panic!("teardown failed"));
    parent.add(Subscription::new(teardown));

    parent.unsubscribe();

    assert!(parent.is_closed());
    assert_eq!(count.get(), 1);
  }

  #[rxlite_macro::test]
  fn teardown_may_touch_its_own_subscription() {
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let c_slot = slot.clone();
    let subscription = Subscription::new(move || {
      let me = c_slot.borrow_mut().take();
      assert!(me.is_some_and(|s| s.is_closed()));
    });
    *slot.borrow_mut() = Some(subscription.clone());

    subscription.unsubscribe();
    assert!(slot.borrow().is_none());
  }

  #[rxlite_macro::test]
  fn guard_unsubscribes_on_drop() {
    let (count, teardown) = counter();
    {
      let _guard = Subscription::new(teardown).unsubscribe_when_dropped();
      assert_eq!(count.get(), 0);
    }
    assert_eq!(count.get(), 1);
  }
}
