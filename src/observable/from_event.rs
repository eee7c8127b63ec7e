use std::rc::Rc;

use crate::{observable::Observable, subscription::Subscription};

/// A push-based event source outside of rxlite, such as a UI widget or a
/// native callback registry.
///
/// [`from_event`] attaches a listener per subscription and detaches it again
/// when the subscription is cancelled. Everything environment specific stays
/// behind this trait.
pub trait EventSource<Event> {
  /// Identifies an attached listener for later removal.
  type Key;

  fn add_listener(&self, listener: Box<dyn FnMut(Event)>) -> Self::Key;

  fn remove_listener(&self, key: Self::Key);
}

impl<Event, T: EventSource<Event> + ?Sized> EventSource<Event> for Rc<T> {
  type Key = T::Key;

  #[inline]
  fn add_listener(&self, listener: Box<dyn FnMut(Event)>) -> Self::Key {
    (**self).add_listener(listener)
  }

  #[inline]
  fn remove_listener(&self, key: Self::Key) { (**self).remove_listener(key) }
}

/// Creates an observable emitting every event `source` fires while
/// subscribed. It never completes on its own.
pub fn from_event<S, Event, Err>(source: S) -> Observable<Event, Err>
where
  S: EventSource<Event> + Clone + 'static,
  S::Key: 'static,
  Event: 'static,
  Err: 'static,
{
  Observable::create(move |subscriber| {
    let key = source.add_listener(Box::new(move |event: Event| subscriber.next(event)));
    let source = source.clone();
    Ok(Subscription::new(move || source.remove_listener(key)))
  })
}
