//! Operators.
//!
//! Every operator is an inherent method on [`Observable`] returning a new
//! observable. Its producer subscribes to the source with a wrapping observer
//! and returns the source subscription as teardown, so each subscription gets
//! its own execution of the whole chain and unsubscribing cascades upstream.
//!
//! [`Observable`]: crate::observable::Observable

pub mod debounce;
pub mod distinct_until_changed;
pub mod filter;
pub mod into_future;
pub mod map;
pub mod take;

pub use debounce::DebounceObserver;
pub use distinct_until_changed::DistinctUntilChangedObserver;
pub use filter::FilterObserver;
pub use into_future::{IntoFutureObserver, ObservableFuture};
pub use map::MapObserver;
pub use take::TakeObserver;
