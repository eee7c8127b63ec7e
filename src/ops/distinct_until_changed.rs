use crate::{observable::Observable, observer::Observer};

impl<Item: PartialEq + Clone + 'static, Err: 'static> Observable<Item, Err> {
  /// Emits a value only if it differs from the previous one.
  pub fn distinct_until_changed(&self) -> Observable<Item, Err> {
    let source = self.clone();
    Observable::create(move |subscriber| {
      Ok(source.subscribe(DistinctUntilChangedObserver { observer: subscriber, last: None }))
    })
  }
}

/// DistinctUntilChangedObserver wrapper for filtering consecutive duplicates
pub struct DistinctUntilChangedObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<O, Item, Err> Observer<Item, Err> for DistinctUntilChangedObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: PartialEq + Clone,
{
  fn next(&mut self, value: Item) {
    if self.last.as_ref() != Some(&value) {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
