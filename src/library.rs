//! Native function table the proxies forward into

use crate::{
  error::{GP_ERROR_NO_MEMORY, GP_OK},
  value::{Handle, HandleKind, Value},
  LogLevel, Result,
};
use std::os::raw::c_int;

/// Resolved native function.
///
/// Only meaningful for the [`Library`] that produced it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Symbol(usize);

impl Symbol {
  /// Creates a symbol from the library's own index
  pub fn new(index: usize) -> Self {
    Self(index)
  }

  /// Index of the function inside its library
  pub fn index(self) -> usize {
    self.0
  }
}

/// Raw result of a native function: its status and out-parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
  /// Status, negative on failure
  pub status: c_int,
  /// Out-parameters, only meaningful if the status is not negative
  pub outputs: Vec<Value>,
}

impl Reply {
  /// Reply carrying only a status
  pub fn status(status: c_int) -> Self {
    Self { status, outputs: Vec::new() }
  }

  /// Reply with out-parameters
  pub fn with(status: c_int, outputs: Vec<Value>) -> Self {
    Self { status, outputs }
  }

  /// Reply of a function whose non-negative status is its result (`gp_list_count` and such)
  pub fn count(status: c_int) -> Self {
    if status >= GP_OK {
      Self::with(status, vec![Value::Int(status)])
    } else {
      Self::status(status)
    }
  }

  /// Reply of a constructor returning a pointer, null meaning out of memory
  pub fn handle<T>(kind: HandleKind, ptr: *mut T) -> Self {
    match Handle::new(kind, ptr) {
      Some(handle) => Self::with(GP_OK, vec![Value::Handle(handle)]),
      None => Self::status(GP_ERROR_NO_MEMORY),
    }
  }
}

/// A table of native functions keyed by name.
///
/// Every function follows `gp_family_operation(handle, args..., [context])`
/// and reports its outcome as a [`Reply`].
pub trait Library {
  /// Look up a function by its full native name (`gp_camera_init`)
  fn resolve(&self, name: &str) -> Option<Symbol>;

  /// Call a resolved function with the full argument list.
  ///
  /// Returns an error only if the arguments cannot be passed to the function,
  /// native failures are reported through [`Reply::status`].
  fn call(&self, symbol: Symbol, args: &[Value]) -> Result<Reply>;

  /// Human readable description of a status code
  fn describe(&self, status: c_int) -> String;

  /// Route the library's internal log messages into `tracing`
  fn install_log_bridge(&self, level: LogLevel) -> Result<()>;
}
