use crate::{observable::Observable, observer::Observer, subscription::Subscription};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits only the first `count` values, then completes.
  ///
  /// `take(0)` completes right away without subscribing to the source.
  pub fn take(&self, count: usize) -> Observable<Item, Err> {
    let source = self.clone();
    Observable::create(move |subscriber| {
      if count == 0 {
        subscriber.complete();
        return Ok(Subscription::empty());
      }
      Ok(source.subscribe(TakeObserver { observer: subscriber, remaining: count }))
    })
  }
}

pub struct TakeObserver<O> {
  observer: O,
  remaining: usize,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    self.observer.next(value);
    if self.remaining == 0 {
      self.observer.complete();
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.remaining == 0 || self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  fn collect(source: &Observable<u64, ()>) -> (Rc<RefCell<Vec<u64>>>, Rc<Cell<bool>>) {
    let seen = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_seen, c_completed) = (seen.clone(), completed.clone());
    source.subscribe(
      PartialObserver::new()
        .on_next(move |v| c_seen.borrow_mut().push(v))
        .on_complete(move || c_completed.set(true)),
    );
    (seen, completed)
  }

  #[rxlite_macro::test]
  fn base_function() {
    let (seen, completed) = collect(&observable::from_iter(0..100).take(5));
    assert_eq!(*seen.borrow(), vec![0, 1, 2, 3, 4]);
    assert!(completed.get());
  }

  #[rxlite_macro::test]
  fn stops_an_unbounded_source() {
    let (seen, completed) = collect(&observable::from_iter(0..).take(3));
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert!(completed.get());
  }

  #[rxlite_macro::test]
  fn take_zero_completes_without_subscribing() {
    let subscribed = Rc::new(Cell::new(false));
    let c_subscribed = subscribed.clone();
    let source = Observable::<u64, ()>::create(move |subscriber| {
      c_subscribed.set(true);
      subscriber.next(1);
      Ok(Subscription::empty())
    });

    let (seen, completed) = collect(&source.take(0));

    assert!(seen.borrow().is_empty());
    assert!(completed.get());
    assert!(!subscribed.get());
  }

  #[rxlite_macro::test]
  fn source_torn_down_when_count_reached() {
    let subject = Subject::<u64, ()>::new();
    let (seen, completed) = collect(&subject.as_observable().take(2));
    assert_eq!(subject.observer_count(), 1);

    subject.next(1);
    subject.next(2);
    subject.next(3);

    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert!(completed.get());
    assert_eq!(subject.observer_count(), 0);
  }
}
