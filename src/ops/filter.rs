use std::rc::Rc;

use crate::{observable::Observable, observer::Observer};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emit only those items from an Observable that pass a predicate.
  pub fn filter<F>(&self, predicate: F) -> Observable<Item, Err>
  where
    F: Fn(&Item) -> bool + 'static,
  {
    let source = self.clone();
    let predicate = Rc::new(predicate);
    Observable::create(move |subscriber| {
      Ok(source.subscribe(FilterObserver { observer: subscriber, predicate: predicate.clone() }))
    })
  }
}

pub struct FilterObserver<O, F> {
  observer: O,
  predicate: Rc<F>,
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: Fn(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value)
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
