//! Library context, the root of every other proxy
//!
//! ## Listing cameras
//! ```no_run
//! use gphoto2_proxy::{Context, Result};
//!
//! # fn main() -> Result<()> {
//! let context = Context::new()?;
//! let list = context.new_list()?;
//!
//! context.invoke("camera_autodetect", vec![(&list).into()])?;
//! for i in 0..list.invoke("count", vec![])?.into_int()? {
//!   println!("{}", list.invoke("get_name", vec![i.into()])?.into_string()?);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
  family::Family,
  library::Library,
  proxy::Proxy,
  value::{Handle, Output, Value},
  List, LogLevel, Result, Widget,
};
use std::rc::Rc;

/// Settings applied when creating a [`Context`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
  /// Route libgphoto2's own log messages into `tracing`
  pub log_bridge: bool,
  /// Most verbose libgphoto2 level routed when [`log_bridge`](Self::log_bridge) is on
  pub log_level: LogLevel,
}

impl Default for Options {
  fn default() -> Self {
    Self { log_bridge: true, log_level: LogLevel::Error }
  }
}

impl Options {
  /// Enable or disable the log bridge
  pub fn log_bridge(mut self, enabled: bool) -> Self {
    self.log_bridge = enabled;
    self
  }

  /// Set the most verbose level routed by the log bridge
  pub fn log_level(mut self, level: LogLevel) -> Self {
    self.log_level = level;
    self
  }
}

/// Wraps every `gp_*(..., context)` function.
///
/// `gp_camera_autodetect(list, context)` becomes
/// `context.invoke("camera_autodetect", vec![list])`.
pub struct Context {
  proxy: Proxy,
}

impl Context {
  /// Create a new context over libgphoto2 with the default [`Options`]
  #[cfg(feature = "libgphoto2")]
  pub fn new() -> Result<Self> {
    Self::with_library(Rc::new(crate::Libgphoto2), &Options::default())
  }

  /// Create a new context over the given function table
  pub fn with_library(library: Rc<dyn Library>, options: &Options) -> Result<Self> {
    if options.log_bridge {
      library.install_log_bridge(options.log_level)?;
    }

    Ok(Self { proxy: Proxy::acquire(Family::Context, library, None)? })
  }

  /// Call `gp_{operation}(args..., context)`
  pub fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Output> {
    self.proxy.invoke(operation, args)
  }

  /// Create an empty [`List`] over the same function table
  pub fn new_list(&self) -> Result<List> {
    List::new(self.library())
  }

  /// Adopt a widget handle, usually returned by a camera's `get_config`
  pub fn new_widget(&self, handle: Handle) -> Result<Widget> {
    Widget::new(self.library(), handle)
  }

  /// The native context handle
  pub fn handle(&self) -> Handle {
    self.proxy.handle()
  }

  /// Function table this context forwards into
  pub fn library(&self) -> Rc<dyn Library> {
    self.proxy.library().clone()
  }

  /// Release the context.
  ///
  /// `gp_context_unref` reports no status, so neither does this.
  pub fn close(mut self) {
    if let Err(err) = self.proxy.release() {
      tracing::warn!("failed to release context: {err}");
    }
  }
}

impl From<&Context> for Value {
  fn from(context: &Context) -> Self {
    Value::Handle(context.handle())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{testing::FakeLibrary, HandleKind, Reply};

  fn context(fake: &Rc<FakeLibrary>) -> Context {
    Context::with_library(fake.clone(), &Options::default()).unwrap()
  }

  #[test]
  fn acquires_and_releases_one_context() {
    let fake = Rc::new(FakeLibrary::new());

    let context = context(&fake);
    let handle = context.handle();
    assert_eq!(handle.kind(), HandleKind::Context);
    assert_eq!(fake.calls_to("gp_context_new"), 1);

    context.close();
    assert_eq!(fake.calls_to("gp_context_unref"), 1);
    assert_eq!(fake.last_call().unwrap().args, vec![Value::Handle(handle)]);
  }

  #[test]
  fn appends_itself_to_forwarded_calls() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_camera_autodetect", |_| Reply::count(1));
    let context = context(&fake);
    let list = context.new_list().unwrap();

    let found = context.invoke("camera_autodetect", vec![(&list).into()]).unwrap();

    assert_eq!(found.into_int().unwrap(), 1);
    let call = fake.last_call().unwrap();
    assert_eq!(call.function, "gp_camera_autodetect");
    assert_eq!(call.args, vec![Value::Handle(list.handle()), Value::Handle(context.handle())]);
  }

  #[test]
  fn installs_log_bridge_before_creating_the_context() {
    let fake = Rc::new(FakeLibrary::new());

    let _context =
      Context::with_library(fake.clone(), &Options::default().log_level(LogLevel::Debug)).unwrap();

    let functions: Vec<_> = fake.calls().into_iter().map(|call| call.function).collect();
    assert_eq!(functions, ["gp_log_add_func", "gp_context_new"]);
    assert_eq!(fake.log_bridge(), Some(LogLevel::Debug));
  }

  #[test]
  fn log_bridge_can_be_disabled() {
    let fake = Rc::new(FakeLibrary::new());

    let _context = Context::with_library(fake.clone(), &Options::default().log_bridge(false));

    assert_eq!(fake.log_bridge(), None);
    assert_eq!(fake.calls_to("gp_log_add_func"), 0);
  }

  #[test]
  fn release_status_is_not_checked() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_context_unref", |_| Reply::status(-1));

    let context = context(&fake);
    context.close();

    assert_eq!(fake.calls_to("gp_context_unref"), 1);
  }

  #[test]
  fn released_when_scope_ends() {
    let fake = Rc::new(FakeLibrary::new());

    {
      let _context = context(&fake);
    }

    assert_eq!(fake.calls_to("gp_context_unref"), 1);
  }

  #[test]
  fn default_options() {
    let options = Options::default();
    assert!(options.log_bridge);
    assert_eq!(options.log_level, LogLevel::Error);
  }
}
