//! Prelude module for convenient imports
//!
//! `use rxlite::prelude::*;` brings the stream types, the creation functions
//! (as `observable::...`) and the traits needed to call their methods into
//! scope.

// Creation functions, used as `observable::from_iter(..)`
pub use crate::observable;
pub use crate::of_sequence;
// Core types
pub use crate::observable::{EventSource, Observable, Producer};
pub use crate::observer::{BoxedObserver, Observer, PartialObserver, Terminal};
pub use crate::subscriber::Subscriber;
pub use crate::subscription::{Subscription, SubscriptionGuard, SubscriptionLike, Teardown};
// Subjects and their owner
pub use crate::registry::{Disposable, DisposableRegistry};
pub use crate::subject::{BehaviorSubject, Subject};
// Operators
pub use crate::ops::ObservableFuture;
// Schedulers
#[cfg(feature = "scheduler")]
pub use crate::scheduler::LocalScheduler;
pub use crate::scheduler::{Duration, Scheduler, Task, TestScheduler};
// Errors
pub use crate::error::{IntoFutureError, IntoFutureResult, RegistryError};
