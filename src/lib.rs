//! # rxlite: minimal reactive primitives
//!
//! Single-threaded building blocks for push-based streams, meant to be
//! embedded in a host application that owns the event loop.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxlite::prelude::*;
//!
//! let log = Subject::<&str>::new();
//! let lines = Rc::new(RefCell::new(vec![]));
//! let c_lines = lines.clone();
//!
//! log.subscribe(move |line| c_lines.borrow_mut().push(line));
//! log.next("a");
//! log.next("b");
//! log.complete();
//!
//! assert_eq!(*lines.borrow(), vec!["a", "b"]);
//! assert!(log.is_closed());
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A lazy, unicast stream: each subscription runs its producer |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` signals |
//! | [`Subscription`] | Handle to cancel an execution and release its resources |
//! | [`Subject`] | A hot stream multicasting to every current observer |
//! | [`BehaviorSubject`] | A subject that remembers and replays its current value |
//! | [`DisposableRegistry`] | Releases everything an owning component created |
//!
//! ## Feature Flags
//!
//! - **`scheduler`** (default): [`LocalScheduler`], a tokio `spawn_local`
//!   based scheduler for `interval`, `timer` and `debounce`
//!
//! ## Logging
//!
//! rxlite reports swallowed panics and dropped re-entrant emissions through
//! [`tracing`](https://docs.rs/tracing). Install any subscriber to see them.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`BehaviorSubject`]: subject::BehaviorSubject
//! [`DisposableRegistry`]: registry::DisposableRegistry
//! [`LocalScheduler`]: prelude::LocalScheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod registry;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;
mod util;

pub use prelude::*;

// Bring the README into Cargo-driven doctests.
#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
