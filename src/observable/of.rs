use crate::{observable::Observable, subscription::Subscription};

/// Creates an observable producing a multiple values.
///
/// Completes immediately after emitting the values given. Never emits an error.
///
/// # Examples
///
/// ```
/// use rxlite::{of_sequence, prelude::*};
///
/// let source: Observable<i32> = of_sequence!(1, 2, 3);
/// source.subscribe(|v| println!("{},", v));
///
/// // print log:
/// // 1
/// // 2
/// // 3
/// ```
#[macro_export]
macro_rules! of_sequence {
  ( $( $item:expr ),* $(,)? ) => {
    $crate::observable::from_iter(::std::vec![$( $item ),*])
  };
}

/// Creates an observable producing a single value.
///
/// Completes immediately after emitting the value given. Never emits an error.
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::of::<_, ()>(123).subscribe(|v| println!("{},", v));
/// ```
pub fn of<Item, Err>(v: Item) -> Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  Observable::create(move |subscriber| {
    subscriber.next(v.clone());
    subscriber.complete();
    Ok(Subscription::empty())
  })
}

/// Creates an observable that completes immediately without emitting.
pub fn empty<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  Observable::create(|subscriber| {
    subscriber.complete();
    Ok(Subscription::empty())
  })
}

/// Creates an observable that never emits and never terminates.
pub fn never<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  Observable::create(|_| Ok(Subscription::empty()))
}

/// Creates an observable that errors with `err` immediately.
pub fn throw_err<Item, Err>(err: Err) -> Observable<Item, Err>
where
  Item: 'static,
  Err: Clone + 'static,
{
  Observable::create(move |subscriber| {
    subscriber.error(err.clone());
    Ok(Subscription::empty())
  })
}
