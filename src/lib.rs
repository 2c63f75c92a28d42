#![doc = include_str!("../README.md")]
#![deny(unused_must_use)]
#![deny(missing_docs)] // Force documentation on all public API's

pub mod camera;
pub mod context;
pub mod error;
pub mod family;
#[cfg(feature = "libgphoto2")]
pub(crate) mod helper;
pub mod library;
#[cfg(feature = "libgphoto2")]
pub mod libgphoto2;
pub mod list;
pub mod log;
pub(crate) mod proxy;
#[cfg(any(test, feature = "test"))]
pub mod testing;
pub mod value;
pub mod widget;

#[doc(inline)]
pub use crate::{
  camera::Camera,
  context::{Context, Options},
  error::{Error, ErrorKind, Result},
  family::Family,
  library::{Library, Reply, Symbol},
  list::List,
  log::LogLevel,
  value::{FilePath, Handle, HandleKind, Output, Value},
  widget::Widget,
};

#[cfg(feature = "libgphoto2")]
#[doc(inline)]
pub use crate::libgphoto2::Libgphoto2;

/// Raw bindings to libgphoto2.
///
/// Use this at your own risk
#[cfg(feature = "libgphoto2")]
pub use libgphoto2_sys;

/// Get the short version of the libgphoto2 library used
#[cfg(feature = "libgphoto2")]
pub fn library_version() -> Option<&'static str> {
  unsafe {
    std::ffi::CStr::from_ptr(*libgphoto2_sys::gp_library_version(
      libgphoto2_sys::GPVersionVerbosity::GP_VERSION_SHORT,
    ))
    .to_str()
    .ok()
  }
}

#[cfg(test)]
fn init_tracing() {
  use std::sync::Once;
  use tracing_subscriber::EnvFilter;

  static INIT: Once = Once::new();
  INIT.call_once(|| {
    // Hide logs unless a test fails.
    tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::new("gphoto2_proxy=trace"))
      .with_test_writer()
      .init();
  });
}
