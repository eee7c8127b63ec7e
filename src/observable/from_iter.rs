use crate::{observable::Observable, subscription::Subscription};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error. The
/// iterator is cloned for every subscription; emission stops early once the
/// subscriber is closed, so unbounded iterators are fine behind `take`.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter::<_, ()>(0..10).subscribe(|v| println!("{},", v));
/// observable::from_iter::<_, ()>(vec![0, 1, 2, 3]).subscribe(|v| println!("{},", v));
/// ```
pub fn from_iter<Iter, Err>(iter: Iter) -> Observable<Iter::Item, Err>
where
  Iter: IntoIterator + Clone + 'static,
  Iter::Item: 'static,
  Err: 'static,
{
  Observable::create(move |subscriber| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        break;
      }
      subscriber.next(v);
    }
    subscriber.complete();
    Ok(Subscription::empty())
  })
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn from_range() {
    let hit_count = Rc::new(Cell::new(0));
    let completed = Rc::new(Cell::new(false));
    let (c_hit, c_completed) = (hit_count.clone(), completed.clone());
    observable::from_iter::<_, ()>(0..100).subscribe(
      PartialObserver::new()
        .on_next(move |_: i32| c_hit.set(c_hit.get() + 1))
        .on_complete(move || c_completed.set(true)),
    );

    assert_eq!(hit_count.get(), 100);
    assert!(completed.get());
  }

  #[rxlite_macro::test]
  fn from_vec_twice() {
    let sum = Rc::new(Cell::new(0));
    let source = observable::from_iter::<_, ()>(vec![1, 2, 3]);
    for _ in 0..2 {
      let c_sum = sum.clone();
      source.subscribe(move |v: i32| c_sum.set(c_sum.get() + v));
    }
    assert_eq!(sum.get(), 12);
  }

  struct FirstThree(Rc<Cell<u64>>);

  impl Observer<u64, ()> for FirstThree {
    fn next(&mut self, _: u64) { self.0.set(self.0.get() + 1); }

    fn error(&mut self, _: ()) {}

    fn complete(&mut self) {}

    fn is_closed(&self) -> bool { self.0.get() >= 3 }
  }

  #[rxlite_macro::test]
  fn unbounded_iterator_stops_once_observer_closes() {
    let seen = Rc::new(Cell::new(0));
    observable::from_iter::<_, ()>(0_u64..).subscribe(FirstThree(seen.clone()));
    assert_eq!(seen.get(), 3);
  }
}
