//! Error handling

use crate::{library::Reply, value::Output, Library};
use std::{error, fmt, os::raw::c_int};

/// Result type used in this library
pub type Result<T> = std::result::Result<T, Error>;

/// Success status of every libgphoto2 function
pub const GP_OK: c_int = 0;
/// Generic error
pub const GP_ERROR: c_int = -1;
/// Bad parameters passed
pub const GP_ERROR_BAD_PARAMETERS: c_int = -2;
/// Out of memory
pub const GP_ERROR_NO_MEMORY: c_int = -3;
/// Error in the camera driver
pub const GP_ERROR_LIBRARY: c_int = -4;
/// Unknown libgphoto2 port passed
pub const GP_ERROR_UNKNOWN_PORT: c_int = -5;
/// Functionality not supported
pub const GP_ERROR_NOT_SUPPORTED: c_int = -6;
/// Generic I/O error
pub const GP_ERROR_IO: c_int = -7;
/// Buffer overflow of internal structure
pub const GP_ERROR_FIXED_LIMIT_EXCEEDED: c_int = -8;
/// Operation timed out
pub const GP_ERROR_TIMEOUT: c_int = -10;
/// Corrupted data received
pub const GP_ERROR_CORRUPTED_DATA: c_int = -102;
/// File already exists
pub const GP_ERROR_FILE_EXISTS: c_int = -103;
/// Specified camera model was not found
pub const GP_ERROR_MODEL_NOT_FOUND: c_int = -105;
/// Specified directory was not found
pub const GP_ERROR_DIRECTORY_NOT_FOUND: c_int = -107;
/// Specified file was not found
pub const GP_ERROR_FILE_NOT_FOUND: c_int = -108;
/// Specified directory already exists
pub const GP_ERROR_DIRECTORY_EXISTS: c_int = -109;
/// The camera is already busy
pub const GP_ERROR_CAMERA_BUSY: c_int = -110;
/// Path is not absolute
pub const GP_ERROR_PATH_NOT_ABSOLUTE: c_int = -111;
/// Cancellation successful
pub const GP_ERROR_CANCEL: c_int = -112;
/// Unspecified camera error
pub const GP_ERROR_CAMERA_ERROR: c_int = -113;
/// Unspecified failure of the operating system
pub const GP_ERROR_OS_FAILURE: c_int = -114;
/// Not enough space
pub const GP_ERROR_NO_SPACE: c_int = -115;

/// Error type
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum ErrorKind {
  /// GP_ERROR or something else
  Other,
  /// Bad parameters were used
  BadParameters,
  /// The camera is bsy
  CameraBusy,
  /// The camera returned an error
  CameraError,
  /// The operation was cancelled
  Cancelled,
  /// Corrupted data
  CorruptedData,
  /// The directory already exists
  DirectoryExists,
  /// The directory was not found
  DirectoryNotFound,
  /// The file already exists
  FileExists,
  /// The file was not found
  FileNotFound,
  /// Limit exceeded
  FixedLimitExceeded,
  /// Error inside a camera driver
  Library,
  /// Camera model not found
  ModelNotFound,
  /// Action not supported
  NotSupported,
  /// Memory error
  NoMemory,
  /// Not enough space
  NoSpace,
  /// Io error
  Io,
  /// OS error
  OsFailure,
  /// Path is not absolute
  PathNotAbsolute,
  /// Timeout
  Timeout,
  /// Port is not known
  UnknownPort,
  /// No native function carries the requested name
  UnknownOperation,
  /// A forwarded call returned something other than what the caller asked for
  UnexpectedOutput,
}

/// Error returned by every forwarded call and every checked release
#[derive(Clone, PartialEq)]
pub enum Error {
  /// The native function returned a negative status
  Native {
    /// Raw libgphoto2 status code
    code: c_int,
    /// Description of the code as reported by the library
    description: String,
  },
  /// The requested operation does not resolve to a native function
  UnknownOperation {
    /// Full native function name that was looked up
    name: String,
  },
  /// A dynamic argument does not fit the native signature
  Argument {
    /// Native function the arguments were meant for
    function: String,
    /// What was wrong with the arguments
    message: String,
  },
  /// The output of a successful call has a different shape than requested
  UnexpectedOutput {
    /// Requested output shape
    expected: &'static str,
    /// Rendering of the values actually returned
    found: String,
  },
}

impl Error {
  /// Creates a new error from a libgphoto2 status and its description
  pub fn new(code: c_int, description: impl Into<String>) -> Self {
    Self::Native { code, description: description.into() }
  }

  pub(crate) fn unknown_operation(name: impl Into<String>) -> Self {
    Self::UnknownOperation { name: name.into() }
  }

  pub(crate) fn argument(function: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Argument { function: function.into(), message: message.into() }
  }

  /// Raw libgphoto2 status code, if the error came from the library
  pub fn code(&self) -> Option<c_int> {
    match self {
      Self::Native { code, .. } => Some(*code),
      _ => None,
    }
  }

  /// Map the gphoto type to an [`ErrorKind`]
  pub fn kind(&self) -> ErrorKind {
    let code = match self {
      Self::Native { code, .. } => *code,
      Self::UnknownOperation { .. } => return ErrorKind::UnknownOperation,
      Self::Argument { .. } => return ErrorKind::BadParameters,
      Self::UnexpectedOutput { .. } => return ErrorKind::UnexpectedOutput,
    };

    match code {
      GP_ERROR_BAD_PARAMETERS => ErrorKind::BadParameters,
      GP_ERROR_CAMERA_BUSY => ErrorKind::CameraBusy,
      GP_ERROR_CAMERA_ERROR => ErrorKind::CameraError,
      GP_ERROR_CANCEL => ErrorKind::Cancelled,
      GP_ERROR_CORRUPTED_DATA => ErrorKind::CorruptedData,
      GP_ERROR_DIRECTORY_EXISTS => ErrorKind::DirectoryExists,
      GP_ERROR_DIRECTORY_NOT_FOUND => ErrorKind::DirectoryNotFound,
      GP_ERROR_FILE_EXISTS => ErrorKind::FileExists,
      GP_ERROR_FILE_NOT_FOUND => ErrorKind::FileNotFound,
      GP_ERROR_FIXED_LIMIT_EXCEEDED => ErrorKind::FixedLimitExceeded,
      GP_ERROR_LIBRARY => ErrorKind::Library,
      GP_ERROR_MODEL_NOT_FOUND => ErrorKind::ModelNotFound,
      GP_ERROR_NOT_SUPPORTED => ErrorKind::NotSupported,
      GP_ERROR_NO_MEMORY => ErrorKind::NoMemory,
      GP_ERROR_NO_SPACE => ErrorKind::NoSpace,
      // The port layer reports its specific I/O failures between -20 and -99
      GP_ERROR_IO | -99..=-20 => ErrorKind::Io,
      GP_ERROR_OS_FAILURE => ErrorKind::OsFailure,
      GP_ERROR_PATH_NOT_ABSOLUTE => ErrorKind::PathNotAbsolute,
      GP_ERROR_TIMEOUT => ErrorKind::Timeout,
      GP_ERROR_UNKNOWN_PORT => ErrorKind::UnknownPort,

      _ => ErrorKind::Other,
    }
  }
}

impl From<std::ffi::NulError> for Error {
  fn from(err: std::ffi::NulError) -> Self {
    Self::new(GP_ERROR_BAD_PARAMETERS, format!("FFI: {err}"))
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Native { description, .. } => f.write_str(description),
      Self::UnknownOperation { name } => write!(f, "Unknown operation: {name}"),
      Self::Argument { function, message } => write!(f, "Bad arguments for {function}: {message}"),
      Self::UnexpectedOutput { expected, found } => {
        write!(f, "Expected {expected} but the call returned {found}")
      }
    }
  }
}

impl fmt::Debug for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Native { code, .. } => write!(f, "{self} ({code})"),
      _ => <Self as fmt::Display>::fmt(self, f),
    }
  }
}

impl error::Error for Error {}

/// Check the reply of a native function.
///
/// If the status is less than 0, an error carrying the library's description
/// of the status is returned, otherwise the output values of the function
pub fn check(library: &dyn Library, reply: Reply) -> Result<Output> {
  if reply.status >= GP_OK {
    Ok(Output::new(reply.outputs))
  } else {
    Err(Error::new(reply.status, library.describe(reply.status)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{testing::FakeLibrary, Value};

  #[test]
  fn negative_status_uses_library_description() {
    let library = FakeLibrary::new();
    library.describe_status(-7, "I/O problem");

    let err = check(&library, Reply::with(-7, vec![Value::Int(3)])).unwrap_err();

    assert_eq!(err.code(), Some(-7));
    assert_eq!(err.kind(), ErrorKind::Io);
    insta::assert_snapshot!(err.to_string(), @"I/O problem");
    assert_eq!(format!("{err:?}"), "I/O problem (-7)");
  }

  #[test]
  fn non_negative_status_passes_outputs_through() {
    let library = FakeLibrary::new();

    let output = check(&library, Reply::with(4, vec![Value::Int(4)])).unwrap();
    assert_eq!(output.values(), &[Value::Int(4)]);

    let output = check(&library, Reply::status(GP_OK)).unwrap();
    assert!(output.is_empty());
  }

  #[test]
  fn kinds() {
    assert_eq!(Error::new(GP_ERROR_CAMERA_BUSY, "").kind(), ErrorKind::CameraBusy);
    assert_eq!(Error::new(-53, "").kind(), ErrorKind::Io);
    assert_eq!(Error::new(GP_ERROR, "").kind(), ErrorKind::Other);
    assert_eq!(Error::unknown_operation("gp_nope").kind(), ErrorKind::UnknownOperation);
    assert_eq!(Error::argument("gp_list_count", "").kind(), ErrorKind::BadParameters);
  }

  #[test]
  fn rendering() {
    insta::assert_snapshot!(
      Error::unknown_operation("gp_camera_dance").to_string(),
      @"Unknown operation: gp_camera_dance"
    );
    insta::assert_snapshot!(
      Error::argument("gp_list_append", "expected string at position 1, got int").to_string(),
      @"Bad arguments for gp_list_append: expected string at position 1, got int"
    );
  }
}
