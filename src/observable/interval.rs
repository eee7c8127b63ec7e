use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  scheduler::{Duration, Scheduler},
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Creates an observable which will fire at `period` intervals, emitting
/// `0, 1, 2, ...` until unsubscribed.
///
/// Each tick is a task on `scheduler`; unsubscribing cancels the pending
/// tick.
pub fn interval<S, Err>(period: Duration, scheduler: S) -> Observable<usize, Err>
where
  S: Scheduler,
  Err: 'static,
{
  Observable::create(move |subscriber| {
    let pending = Rc::new(RefCell::new(Subscription::empty()));
    schedule_tick(scheduler.clone(), period, 0, subscriber, pending.clone());
    Ok(Subscription::new(move || pending.borrow().unsubscribe()))
  })
}

fn schedule_tick<S, Err>(
  scheduler: S, period: Duration, tick: usize, subscriber: Subscriber<usize, Err>,
  pending: Rc<RefCell<Subscription>>,
) where
  S: Scheduler,
  Err: 'static,
{
  let next_scheduler = scheduler.clone();
  let next_pending = pending.clone();
  let handle = scheduler.schedule(
    Box::new(move || {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(tick);
      if !subscriber.is_closed() {
        schedule_tick(next_scheduler, period, tick + 1, subscriber, next_pending);
      }
    }),
    Some(period),
  );
  *pending.borrow_mut() = handle;
}

/// Creates an observable that emits `0` after `delay` and then completes.
pub fn timer<S, Err>(delay: Duration, scheduler: S) -> Observable<usize, Err>
where
  S: Scheduler,
  Err: 'static,
{
  Observable::create(move |subscriber| {
    let handle = scheduler.schedule(
      Box::new(move || {
        subscriber.next(0);
        subscriber.complete();
      }),
      Some(delay),
    );
    Ok(handle)
  })
}
