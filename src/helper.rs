use crate::{
  value::{HandleKind, Value},
  Error, Result,
};
use std::{
  ffi::{self, CString},
  mem::MaybeUninit,
  os::raw::{c_char, c_int},
};

/// Copy a C string, empty if the pointer is null
pub fn chars_to_string(chars: *const c_char) -> String {
  if chars.is_null() {
    return String::new();
  }

  unsafe { String::from_utf8_lossy(ffi::CStr::from_ptr(chars).to_bytes()) }.into_owned()
}

/// Zeroed out-parameter.
///
/// # Safety
///
/// All-zero must be a valid `T` (pointers, integers, C structs, enums with a 0 variant).
pub unsafe fn uninit<T>() -> T {
  MaybeUninit::zeroed().assume_init()
}

/// Heap slot for large out-parameters such as `CameraText`
pub struct UninitBox<T> {
  inner: Box<MaybeUninit<T>>,
}

impl<T> UninitBox<T> {
  pub fn uninit() -> Self {
    Self { inner: Box::new(MaybeUninit::uninit()) }
  }

  pub fn as_mut_ptr(&mut self) -> *mut T {
    self.inner.as_mut_ptr().cast()
  }

  pub unsafe fn assume_init(self) -> Box<T> {
    Box::from_raw(Box::into_raw(self.inner).cast())
  }
}

/// Cursor over the dynamic arguments of one native function
pub struct Args<'a> {
  function: &'static str,
  values: &'a [Value],
  position: usize,
}

impl<'a> Args<'a> {
  pub fn new(function: &'static str, values: &'a [Value]) -> Self {
    Self { function, values, position: 0 }
  }

  /// Called right after the offending value was consumed
  fn mismatch(&self, expected: &str, found: &Value) -> Error {
    Error::argument(
      self.function,
      format!("expected {expected} at position {}, got {}", self.position - 1, found.type_name()),
    )
  }

  fn next(&mut self) -> Result<&'a Value> {
    let value = self.values.get(self.position).ok_or_else(|| {
      Error::argument(self.function, format!("missing argument at position {}", self.position))
    })?;
    self.position += 1;

    Ok(value)
  }

  pub fn int(&mut self) -> Result<c_int> {
    match self.next()? {
      Value::Int(value) => Ok(*value),
      other => Err(self.mismatch("int", other)),
    }
  }

  /// Floats also accept ints
  pub fn float(&mut self) -> Result<f32> {
    match self.next()? {
      Value::Float(value) => Ok(*value),
      Value::Int(value) => Ok(*value as f32),
      other => Err(self.mismatch("float", other)),
    }
  }

  pub fn string(&mut self) -> Result<CString> {
    match self.next()? {
      Value::Str(value) => CString::new(value.as_str()).map_err(|err| {
        Error::argument(self.function, format!("{err} at position {}", self.position - 1))
      }),
      other => Err(self.mismatch("string", other)),
    }
  }

  fn handle<T>(&mut self, kind: HandleKind) -> Result<*mut T> {
    match self.next()? {
      Value::Handle(handle) if handle.kind() == kind => Ok(handle.as_ptr()),
      other => Err(self.mismatch(&format!("{kind:?} handle"), other)),
    }
  }

  pub fn context(&mut self) -> Result<*mut libgphoto2_sys::GPContext> {
    self.handle(HandleKind::Context)
  }

  pub fn camera(&mut self) -> Result<*mut libgphoto2_sys::Camera> {
    self.handle(HandleKind::Camera)
  }

  pub fn widget(&mut self) -> Result<*mut libgphoto2_sys::CameraWidget> {
    self.handle(HandleKind::Widget)
  }

  pub fn list(&mut self) -> Result<*mut libgphoto2_sys::CameraList> {
    self.handle(HandleKind::List)
  }
}
