use std::rc::Rc;

use crate::{observable::Observable, observer::Observer};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Creates a new stream which calls a closure on each element and uses its
  /// return as the value.
  pub fn map<B, F>(&self, f: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item) -> B + 'static,
  {
    let source = self.clone();
    let func = Rc::new(f);
    Observable::create(move |subscriber| {
      Ok(source.subscribe(MapObserver { observer: subscriber, func: func.clone() }))
    })
  }
}

/// MapObserver wrapper for transforming values
pub struct MapObserver<O, F> {
  observer: O,
  func: Rc<F>,
}

impl<Item, Err, O, B, F> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: Fn(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn primitive_type() {
    let i = Rc::new(RefCell::new(0));
    let c_i = i.clone();
    observable::from_iter::<_, ()>(100..101)
      .map(|v| v * 2)
      .subscribe(move |v| *c_i.borrow_mut() += v);
    assert_eq!(*i.borrow(), 200);
  }

  #[rxlite_macro::test]
  fn changes_item_type() {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let source: Observable<i32> = of_sequence!(1, 2, 3);
    source
      .map(|v| format!("#{v}"))
      .subscribe(move |v| c_seen.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec!["#1", "#2", "#3"]);
  }

  #[rxlite_macro::test]
  fn passes_error_through() {
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    observable::throw_err::<i32, _>("bad")
      .map(|v| v + 1)
      .subscribe(
        PartialObserver::<i32, &str>::new().on_error(move |e| c_errors.borrow_mut().push(e)),
      );
    assert_eq!(*errors.borrow(), vec!["bad"]);
  }

  #[rxlite_macro::test]
  fn each_subscription_runs_its_own_chain() {
    let calls = Rc::new(RefCell::new(0));
    let c_calls = calls.clone();
    let doubled = observable::from_iter::<_, ()>(vec![1, 2]).map(move |v| {
      *c_calls.borrow_mut() += 1;
      v * 2
    });

    doubled.subscribe(|_| {});
    doubled.subscribe(|_| {});

    assert_eq!(*calls.borrow(), 4);
  }
}
