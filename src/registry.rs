//! Bulk teardown for objects owned by a longer-lived component.
//!
//! A component that creates subjects (and subscribes to other streams) keeps
//! a [`DisposableRegistry`]. When the component goes away it calls
//! [`DisposableRegistry::dispose`] once, which completes every subject it
//! still owns and cancels every tracked subscription.
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let registry = DisposableRegistry::new();
//! let clicks = registry.create_subject::<i32, ()>().unwrap();
//! let size = registry.create_behavior_subject::<_, ()>((640, 480)).unwrap();
//!
//! registry.dispose();
//!
//! assert!(clicks.is_closed());
//! assert!(size.is_closed());
//! assert_eq!(registry.create_subject::<i32, ()>().err(), Some(RegistryError::Disposed));
//! ```

use std::{
  cell::{Cell, RefCell},
  fmt::{Debug, Formatter},
};

use crate::{
  error::RegistryError,
  subject::{BehaviorSubject, Subject},
  subscription::{Subscription, SubscriptionLike},
};

/// Something that a [`DisposableRegistry`] can release.
pub trait Disposable {
  /// Releases the object. Calling it again has no effect.
  fn dispose(&self);

  fn is_disposed(&self) -> bool;
}

impl<Item, Err: Clone> Disposable for Subject<Item, Err> {
  /// Completes the subject if it is still open.
  fn dispose(&self) {
    if !self.is_closed() {
      self.complete();
    }
  }

  fn is_disposed(&self) -> bool { self.is_closed() }
}

impl<Item, Err: Clone> Disposable for BehaviorSubject<Item, Err> {
  fn dispose(&self) {
    if !self.is_closed() {
      self.complete();
    }
  }

  fn is_disposed(&self) -> bool { self.is_closed() }
}

impl Disposable for Subscription {
  fn dispose(&self) { self.unsubscribe() }

  fn is_disposed(&self) -> bool { self.is_closed() }
}

/// Owns subjects and subscriptions on behalf of a component and releases
/// them together.
#[derive(Default)]
pub struct DisposableRegistry {
  owned: RefCell<Vec<Box<dyn Disposable>>>,
  disposed: Cell<bool>,
}

impl Debug for DisposableRegistry {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DisposableRegistry")
      .field("owned", &self.len())
      .field("disposed", &self.disposed.get())
      .finish()
  }
}

impl DisposableRegistry {
  pub fn new() -> Self { Self::default() }

  /// Creates a subject owned by this registry.
  pub fn create_subject<Item: 'static, Err: Clone + 'static>(
    &self,
  ) -> Result<Subject<Item, Err>, RegistryError> {
    let subject = Subject::new();
    self.adopt(subject.clone(), "subject")?;
    Ok(subject)
  }

  /// Creates a behavior subject owned by this registry.
  pub fn create_behavior_subject<Item: 'static, Err: Clone + 'static>(
    &self, initial: Item,
  ) -> Result<BehaviorSubject<Item, Err>, RegistryError> {
    let subject = BehaviorSubject::new(initial);
    self.adopt(subject.clone(), "behavior subject")?;
    Ok(subject)
  }

  /// Hands `disposable` to the registry, so it is released by `dispose`.
  ///
  /// On a disposed registry `disposable` is released right away.
  pub fn track(&self, disposable: impl Disposable + 'static) {
    if self.disposed.get() {
      disposable.dispose();
    } else {
      self.owned.borrow_mut().push(Box::new(disposable));
    }
  }

  fn adopt(
    &self, disposable: impl Disposable + 'static, kind: &'static str,
  ) -> Result<(), RegistryError> {
    if self.disposed.get() {
      tracing::warn!(kind, "create called on a disposed registry");
      return Err(RegistryError::Disposed);
    }
    self.owned.borrow_mut().push(Box::new(disposable));
    Ok(())
  }

  /// Releases everything the registry owns. Only the first call has an
  /// effect.
  pub fn dispose(&self) {
    if self.disposed.replace(true) {
      return;
    }
    let owned = std::mem::take(&mut *self.owned.borrow_mut());
    tracing::debug!(count = owned.len(), "disposing registry");
    for disposable in owned {
      disposable.dispose();
    }
  }

  /// Number of objects currently owned.
  pub fn len(&self) -> usize { self.owned.borrow().len() }

  pub fn is_empty(&self) -> bool { self.owned.borrow().is_empty() }

  pub fn is_disposed(&self) -> bool { self.disposed.get() }
}

impl Disposable for DisposableRegistry {
  fn dispose(&self) { DisposableRegistry::dispose(self) }

  fn is_disposed(&self) -> bool { DisposableRegistry::is_disposed(self) }
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use super::*;
  use crate::observer::PartialObserver;

  #[rxlite_macro::test]
  fn dispose_completes_open_subjects() {
    let registry = DisposableRegistry::new();
    let subject = registry.create_subject::<i32, ()>().unwrap();
    let completed = Rc::new(Cell::new(0));
    let c_completed = completed.clone();
    subject.subscribe(
      PartialObserver::<i32, ()>::new().on_complete(move || c_completed.set(c_completed.get() + 1)),
    );
    assert_eq!(registry.len(), 1);

    registry.dispose();
    registry.dispose();

    assert!(registry.is_disposed());
    assert!(registry.is_empty());
    assert!(subject.is_closed());
    assert_eq!(completed.get(), 1);
  }

  #[rxlite_macro::test]
  fn already_closed_subject_is_left_alone() {
    let registry = DisposableRegistry::new();
    let subject = registry.create_subject::<i32, &str>().unwrap();
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    subject.error("earlier");
    subject.subscribe(
      PartialObserver::<i32, &str>::new().on_error(move |e| c_errors.borrow_mut().push(e)),
    );

    registry.dispose();

    assert_eq!(*errors.borrow(), vec!["earlier"]);
  }

  #[rxlite_macro::test]
  fn create_after_dispose_fails() {
    let registry = DisposableRegistry::new();
    registry.dispose();

    assert_eq!(registry.create_subject::<i32, ()>().err(), Some(RegistryError::Disposed));
    assert_eq!(
      registry.create_behavior_subject::<_, ()>(1).err(),
      Some(RegistryError::Disposed)
    );
    assert!(registry.is_empty());
  }

  #[rxlite_macro::test]
  fn tracked_subscriptions_are_cancelled() {
    let registry = DisposableRegistry::new();
    let subscription = Subscription::empty();
    registry.track(subscription.clone());
    assert!(!subscription.is_disposed());

    registry.dispose();
    assert!(subscription.is_closed());

    let late = Subscription::empty();
    registry.track(late.clone());
    assert!(late.is_closed());
  }

  #[rxlite_macro::test]
  fn nested_registries_dispose_together() {
    let parent = DisposableRegistry::new();
    let child = Rc::new(DisposableRegistry::new());
    let behavior = child.create_behavior_subject::<_, ()>("idle").unwrap();
    parent.track(RcRegistry(child.clone()));

    parent.dispose();

    assert!(child.is_disposed());
    assert!(behavior.is_closed());
    assert_eq!(behavior.value(), "idle");
  }

  struct RcRegistry(Rc<DisposableRegistry>);

  impl Disposable for RcRegistry {
    fn dispose(&self) { self.0.dispose() }

    fn is_disposed(&self) -> bool { self.0.is_disposed() }
  }
}
