use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
};

/// Runs `f`, catching a panic it raises instead of unwinding into the caller.
///
/// The panic is reported through `tracing` with `context` naming the
/// operation that was running. Returns `false` when `f` panicked.
pub(crate) fn run_isolated(context: &'static str, f: impl FnOnce()) -> bool {
  match panic::catch_unwind(AssertUnwindSafe(f)) {
    Ok(()) => true,
    Err(payload) => {
      tracing::error!(context, panic = %panic_message(&*payload), "callback panicked");
      false
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "<non-string panic payload>"
  }
}
