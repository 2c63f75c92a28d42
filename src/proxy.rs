//! Shared machinery of the handle-owning proxies

use crate::{
  error::check,
  family::Family,
  library::{Library, Symbol},
  value::{Handle, Output, Value},
  Error, Result,
};
use std::{cell::RefCell, rc::Rc};

/// Resolve, call and check a native function by its full name
pub(crate) fn call(library: &dyn Library, function: &str, args: &[Value]) -> Result<Output> {
  let symbol = library.resolve(function).ok_or_else(|| Error::unknown_operation(function))?;

  check(library, library.call(symbol, args)?)
}

/// Owns one native handle and forwards calls for it
pub(crate) struct Proxy {
  family: Family,
  library: Rc<dyn Library>,
  handle: Handle,
  context: Option<Handle>,
  last_resolved: RefCell<Option<(String, Symbol)>>,
  released: bool,
}

impl Proxy {
  /// Allocate a fresh handle with the family's constructor
  pub(crate) fn acquire(
    family: Family,
    library: Rc<dyn Library>,
    context: Option<Handle>,
  ) -> Result<Self> {
    let constructor = family
      .constructor()
      .ok_or_else(|| Error::unknown_operation(family.function_name("new")))?;
    let handle = call(library.as_ref(), constructor, &[])?.into_handle(family.handle_kind())?;

    tracing::debug!(?handle, "acquired");

    Ok(Self::new(family, library, handle, context))
  }

  /// Take over a handle obtained elsewhere
  pub(crate) fn adopt(
    family: Family,
    library: Rc<dyn Library>,
    handle: Handle,
    context: Option<Handle>,
  ) -> Result<Self> {
    if handle.kind() != family.handle_kind() {
      return Err(Error::argument(
        family.destructor(),
        format!("cannot adopt {handle:?} as a {:?} handle", family.handle_kind()),
      ));
    }

    tracing::debug!(?handle, "adopted");

    Ok(Self::new(family, library, handle, context))
  }

  fn new(
    family: Family,
    library: Rc<dyn Library>,
    handle: Handle,
    context: Option<Handle>,
  ) -> Self {
    Self { family, library, handle, context, last_resolved: RefCell::new(None), released: false }
  }

  pub(crate) fn handle(&self) -> Handle {
    self.handle
  }

  pub(crate) fn library(&self) -> &Rc<dyn Library> {
    &self.library
  }

  fn resolve(&self, operation: &str, function: &str) -> Result<Symbol> {
    let mut last = self.last_resolved.borrow_mut();

    if let Some((last_operation, symbol)) = last.as_ref() {
      if last_operation == operation {
        return Ok(*symbol);
      }
    }

    let symbol = self.library.resolve(function).ok_or_else(|| Error::unknown_operation(function))?;
    *last = Some((operation.to_owned(), symbol));

    Ok(symbol)
  }

  /// Forward `operation` to the native function of this family
  pub(crate) fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Output> {
    let call = self.family.adapt(operation, self.handle, self.context, args);
    let symbol = self.resolve(operation, &call.function)?;

    tracing::trace!(function = %call.function, args = call.args.len(), "forwarding");

    check(self.library.as_ref(), self.library.call(symbol, &call.args)?)
  }

  /// Drop the owned reference, at most once
  pub(crate) fn release(&mut self) -> Result<()> {
    if self.released {
      return Ok(());
    }
    self.released = true;

    let destructor = self.family.destructor();
    let result = call(self.library.as_ref(), destructor, &[Value::Handle(self.handle)]);

    tracing::debug!(handle = ?self.handle, "released");

    match result {
      Err(Error::Native { .. }) if !self.family.checks_release() => Ok(()),
      result => result.map(drop),
    }
  }

  /// Give up ownership without releasing
  pub(crate) fn into_raw(mut self) -> Handle {
    self.released = true;
    self.handle
  }
}

impl Drop for Proxy {
  fn drop(&mut self) {
    if let Err(err) = self.release() {
      tracing::warn!(handle = ?self.handle, "failed to release: {err}");
    }
  }
}
