//! Errors raised by the library itself.
//!
//! Stream errors are not listed here: they are the `Err` type parameter of
//! each observable and travel through [`Observer::error`].
//!
//! [`Observer::error`]: crate::observer::Observer::error

use thiserror::Error;

/// Failure to create an object through a
/// [`DisposableRegistry`](crate::registry::DisposableRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
  /// The registry was disposed together with its owner.
  #[error("registry has already been disposed")]
  Disposed,
}

/// Why an observable could not be turned into a single-value future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntoFutureError {
  #[error("observable completed without emitting a value")]
  Empty,
  #[error("observable emitted more than one value")]
  MultipleValues,
}

/// The output of [`Observable::into_future`](crate::observable::Observable::into_future).
///
/// The outer `Result` reports a shape mismatch, the inner one the stream's
/// own error.
pub type IntoFutureResult<Item, Err> = Result<Result<Item, Err>, IntoFutureError>;
