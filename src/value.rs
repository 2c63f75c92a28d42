//! Dynamic values passed into and returned from forwarded calls

use crate::{Error, Result};
use std::{
  fmt,
  os::raw::{c_int, c_void},
  ptr::NonNull,
};

/// Which native object a [`Handle`] points to
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandleKind {
  /// `GPContext`
  Context,
  /// `Camera`
  Camera,
  /// `CameraWidget`
  Widget,
  /// `CameraList`
  List,
}

/// Opaque pointer to an object managed by the native library.
///
/// A handle does not own anything by itself, the proxies do.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct Handle {
  kind: HandleKind,
  ptr: NonNull<c_void>,
}

impl Handle {
  /// Wraps a raw native pointer, `None` if it is null
  pub fn new<T>(kind: HandleKind, ptr: *mut T) -> Option<Self> {
    NonNull::new(ptr.cast::<c_void>()).map(|ptr| Self { kind, ptr })
  }

  /// Kind of the native object
  pub fn kind(&self) -> HandleKind {
    self.kind
  }

  /// The raw pointer, cast to the native type
  pub fn as_ptr<T>(&self) -> *mut T {
    self.ptr.as_ptr().cast()
  }
}

impl fmt::Debug for Handle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}({:p})", self.kind, self.ptr)
  }
}

/// Location of a file on the camera
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilePath {
  /// Folder containing the file
  pub folder: String,
  /// Basename of the file
  pub name: String,
}

impl fmt::Display for FilePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.folder.ends_with('/') {
      write!(f, "{}{}", self.folder, self.name)
    } else {
      write!(f, "{}/{}", self.folder, self.name)
    }
  }
}

/// Argument or output value of a native function
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  /// Integer (also used for enums and booleans)
  Int(c_int),
  /// Floating point number
  Float(f32),
  /// String
  Str(String),
  /// Native object
  Handle(Handle),
  /// Path of a file on the camera
  FilePath(FilePath),
}

impl Value {
  /// Short name of the variant, used in error messages
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Int(_) => "int",
      Self::Float(_) => "float",
      Self::Str(_) => "string",
      Self::Handle(_) => "handle",
      Self::FilePath(_) => "file path",
    }
  }
}

impl From<c_int> for Value {
  fn from(value: c_int) -> Self {
    Self::Int(value)
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Self::Int(c_int::from(value))
  }
}

impl From<f32> for Value {
  fn from(value: f32) -> Self {
    Self::Float(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Self::Str(value.to_owned())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Self::Str(value)
  }
}

impl From<Handle> for Value {
  fn from(handle: Handle) -> Self {
    Self::Handle(handle)
  }
}

impl From<FilePath> for Value {
  fn from(path: FilePath) -> Self {
    Self::FilePath(path)
  }
}

/// Values returned by a successful forwarded call.
///
/// Empty when the native function only reports a status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output(Vec<Value>);

impl Output {
  pub(crate) fn new(values: Vec<Value>) -> Self {
    Self(values)
  }

  /// `true` if the function returned nothing but its status
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// All returned values, in the order of the native out-parameters
  pub fn values(&self) -> &[Value] {
    &self.0
  }

  /// Take all returned values
  pub fn into_values(self) -> Vec<Value> {
    self.0
  }

  /// Take the only returned value
  pub fn into_value(self) -> Result<Value> {
    let mut values = self.0;

    if values.len() == 1 {
      Ok(values.remove(0))
    } else {
      Err(Error::UnexpectedOutput { expected: "a single value", found: format!("{values:?}") })
    }
  }

  /// Take the only returned value as an integer
  pub fn into_int(self) -> Result<c_int> {
    match self.into_value()? {
      Value::Int(value) => Ok(value),
      other => Err(unexpected("an int", other)),
    }
  }

  /// Take the only returned value as a float
  pub fn into_float(self) -> Result<f32> {
    match self.into_value()? {
      Value::Float(value) => Ok(value),
      other => Err(unexpected("a float", other)),
    }
  }

  /// Take the only returned value as a string
  pub fn into_string(self) -> Result<String> {
    match self.into_value()? {
      Value::Str(value) => Ok(value),
      other => Err(unexpected("a string", other)),
    }
  }

  /// Take the only returned value as a handle of the given kind
  pub fn into_handle(self, kind: HandleKind) -> Result<Handle> {
    match self.into_value()? {
      Value::Handle(handle) if handle.kind() == kind => Ok(handle),
      other => Err(unexpected(handle_name(kind), other)),
    }
  }

  /// Take the only returned value as a camera file path
  pub fn into_file_path(self) -> Result<FilePath> {
    match self.into_value()? {
      Value::FilePath(path) => Ok(path),
      other => Err(unexpected("a file path", other)),
    }
  }
}

fn unexpected(expected: &'static str, found: Value) -> Error {
  Error::UnexpectedOutput { expected, found: format!("{found:?}") }
}

fn handle_name(kind: HandleKind) -> &'static str {
  match kind {
    HandleKind::Context => "a context handle",
    HandleKind::Camera => "a camera handle",
    HandleKind::Widget => "a widget handle",
    HandleKind::List => "a list handle",
  }
}
