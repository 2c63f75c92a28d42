//! The libgphoto2 function table
//!
//! Every registered function takes its arguments as [`Value`]s in native
//! order and reports out-parameters as values, in native order too.
//! Functions returning widgets that the caller does not own yet (children,
//! parent, root) take an extra reference, so every widget handle handed out
//! carries exactly one reference for the adopting [`Widget`](crate::Widget).

use crate::{
  error::{check, GP_OK},
  helper::{chars_to_string, uninit, Args, UninitBox},
  library::{Library, Reply, Symbol},
  log,
  value::{FilePath, HandleKind, Value},
  Error, LogLevel, Result,
};
use libgphoto2_sys as sys;
use std::{
  os::raw::{c_char, c_int, c_void},
  ptr,
  sync::OnceLock,
};

use sys::CameraWidgetType as WidgetType;

/// libgphoto2 itself, linked through [`libgphoto2_sys`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Libgphoto2;

struct Function {
  name: &'static str,
  arity: usize,
  call: fn(&mut Args<'_>) -> Result<Reply>,
}

macro_rules! functions {
  ($($name:ident / $arity:literal => |$args:ident| $body:expr;)*) => {
    mod entries {
      use super::*;

      $(
        pub(super) fn $name($args: &mut Args<'_>) -> Result<Reply> {
          $body
        }
      )*
    }

    static FUNCTIONS: &[Function] = &[
      $(Function { name: stringify!($name), arity: $arity, call: entries::$name },)*
    ];
  };
}

fn reply(status: c_int, outputs: impl FnOnce() -> Vec<Value>) -> Reply {
  if status < GP_OK {
    Reply::status(status)
  } else {
    Reply::with(status, outputs())
  }
}

fn handle_reply<T>(status: c_int, kind: HandleKind, ptr: *mut T) -> Reply {
  if status < GP_OK {
    Reply::status(status)
  } else {
    Reply::handle(kind, ptr)
  }
}

fn int_reply(status: c_int, value: c_int) -> Reply {
  reply(status, || vec![Value::Int(value)])
}

fn string_reply(status: c_int, chars: *const c_char) -> Reply {
  reply(status, || vec![Value::Str(chars_to_string(chars))])
}

fn text_reply(status: c_int, text: UninitBox<sys::CameraText>) -> Reply {
  reply(status, || {
    let text = unsafe { text.assume_init() };
    vec![Value::Str(chars_to_string(text.text.as_ptr()))]
  })
}

/// `borrowed` widgets belong to their tree and get a reference of their own
fn widget_reply(status: c_int, widget: *mut sys::CameraWidget, borrowed: bool) -> Reply {
  if status < GP_OK {
    return Reply::status(status);
  }

  if borrowed {
    let status = unsafe { sys::gp_widget_ref(widget) };
    if status < GP_OK {
      return Reply::status(status);
    }
  }

  Reply::handle(HandleKind::Widget, widget)
}

fn file_path(path: &sys::CameraFilePath) -> FilePath {
  FilePath { folder: chars_to_string(path.folder.as_ptr()), name: chars_to_string(path.name.as_ptr()) }
}

fn widget_type(widget: *mut sys::CameraWidget) -> std::result::Result<WidgetType, c_int> {
  let mut ty = WidgetType::GP_WIDGET_WINDOW;
  let status = unsafe { sys::gp_widget_get_type(widget, &mut ty) };

  if status < GP_OK {
    Err(status)
  } else {
    Ok(ty)
  }
}

fn no_value(function: &str, ty: WidgetType) -> Error {
  Error::argument(function, format!("{ty:?} widgets have no value"))
}

fn capture_type(args: &mut Args<'_>) -> Result<sys::CameraCaptureType> {
  use sys::CameraCaptureType::*;

  match args.int()? {
    0 => Ok(GP_CAPTURE_IMAGE),
    1 => Ok(GP_CAPTURE_MOVIE),
    2 => Ok(GP_CAPTURE_SOUND),
    other => Err(Error::argument("gp_camera_capture", format!("unknown capture type {other}"))),
  }
}

/// Event type, then the event's file path or message if it has one
fn event_outputs(event: sys::CameraEventType, data: *mut c_void) -> Vec<Value> {
  use sys::CameraEventType as Event;

  let mut outputs = vec![Value::Int(event as c_int)];
  if data.is_null() {
    return outputs;
  }

  match event {
    Event::GP_EVENT_FILE_ADDED | Event::GP_EVENT_FOLDER_ADDED => {
      outputs.push(Value::FilePath(file_path(unsafe { &*data.cast::<sys::CameraFilePath>() })))
    }
    Event::GP_EVENT_UNKNOWN => outputs.push(Value::Str(chars_to_string(data.cast()))),
    _ => {}
  }

  outputs
}

functions! {
  gp_context_new / 0 => |_args| {
    Ok(Reply::handle(HandleKind::Context, unsafe { sys::gp_context_new() }))
  };
  gp_context_unref / 1 => |args| {
    let context = args.context()?;
    unsafe { sys::gp_context_unref(context) };
    Ok(Reply::status(GP_OK))
  };

  gp_camera_autodetect / 2 => |args| {
    let list = args.list()?;
    let context = args.context()?;
    Ok(Reply::count(unsafe { sys::gp_camera_autodetect(list, context) }))
  };

  gp_camera_new / 0 => |_args| {
    let mut camera = ptr::null_mut();
    let status = unsafe { sys::gp_camera_new(&mut camera) };
    Ok(handle_reply(status, HandleKind::Camera, camera))
  };
  gp_camera_unref / 1 => |args| {
    let camera = args.camera()?;
    Ok(Reply::status(unsafe { sys::gp_camera_unref(camera) }))
  };
  gp_camera_init / 2 => |args| {
    let camera = args.camera()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe { sys::gp_camera_init(camera, context) }))
  };
  gp_camera_exit / 2 => |args| {
    let camera = args.camera()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe { sys::gp_camera_exit(camera, context) }))
  };
  gp_camera_get_summary / 2 => |args| {
    let camera = args.camera()?;
    let context = args.context()?;
    let mut text = UninitBox::uninit();
    let status = unsafe { sys::gp_camera_get_summary(camera, text.as_mut_ptr(), context) };
    Ok(text_reply(status, text))
  };
  gp_camera_get_manual / 2 => |args| {
    let camera = args.camera()?;
    let context = args.context()?;
    let mut text = UninitBox::uninit();
    let status = unsafe { sys::gp_camera_get_manual(camera, text.as_mut_ptr(), context) };
    Ok(text_reply(status, text))
  };
  gp_camera_get_about / 2 => |args| {
    let camera = args.camera()?;
    let context = args.context()?;
    let mut text = UninitBox::uninit();
    let status = unsafe { sys::gp_camera_get_about(camera, text.as_mut_ptr(), context) };
    Ok(text_reply(status, text))
  };
  gp_camera_get_config / 2 => |args| {
    let camera = args.camera()?;
    let context = args.context()?;
    let mut widget = ptr::null_mut();
    let status = unsafe { sys::gp_camera_get_config(camera, &mut widget, context) };
    Ok(widget_reply(status, widget, false))
  };
  gp_camera_get_single_config / 3 => |args| {
    let camera = args.camera()?;
    let name = args.string()?;
    let context = args.context()?;
    let mut widget = ptr::null_mut();
    let status =
      unsafe { sys::gp_camera_get_single_config(camera, name.as_ptr(), &mut widget, context) };
    Ok(widget_reply(status, widget, false))
  };
  gp_camera_set_config / 3 => |args| {
    let camera = args.camera()?;
    let widget = args.widget()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe { sys::gp_camera_set_config(camera, widget, context) }))
  };
  gp_camera_set_single_config / 4 => |args| {
    let camera = args.camera()?;
    let name = args.string()?;
    let widget = args.widget()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe {
      sys::gp_camera_set_single_config(camera, name.as_ptr(), widget, context)
    }))
  };
  gp_camera_list_config / 3 => |args| {
    let camera = args.camera()?;
    let list = args.list()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe { sys::gp_camera_list_config(camera, list, context) }))
  };
  gp_camera_capture / 3 => |args| {
    let camera = args.camera()?;
    let ty = capture_type(args)?;
    let context = args.context()?;
    let mut path: sys::CameraFilePath = unsafe { uninit() };
    let status = unsafe { sys::gp_camera_capture(camera, ty, &mut path, context) };
    Ok(reply(status, || vec![Value::FilePath(file_path(&path))]))
  };
  gp_camera_trigger_capture / 2 => |args| {
    let camera = args.camera()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe { sys::gp_camera_trigger_capture(camera, context) }))
  };
  gp_camera_wait_for_event / 3 => |args| {
    let camera = args.camera()?;
    let timeout = args.int()?;
    let context = args.context()?;
    let mut event = sys::CameraEventType::GP_EVENT_UNKNOWN;
    let mut data: *mut c_void = ptr::null_mut();
    let status =
      unsafe { sys::gp_camera_wait_for_event(camera, timeout, &mut event, &mut data, context) };
    let result = reply(status, || event_outputs(event, data));
    // The event payload is malloc'ed by libgphoto2 and owned by the caller
    unsafe { libc::free(data) };
    Ok(result)
  };
  gp_camera_folder_list_files / 4 => |args| {
    let camera = args.camera()?;
    let folder = args.string()?;
    let list = args.list()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe {
      sys::gp_camera_folder_list_files(camera, folder.as_ptr(), list, context)
    }))
  };
  gp_camera_folder_list_folders / 4 => |args| {
    let camera = args.camera()?;
    let folder = args.string()?;
    let list = args.list()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe {
      sys::gp_camera_folder_list_folders(camera, folder.as_ptr(), list, context)
    }))
  };
  gp_camera_folder_delete_all / 3 => |args| {
    let camera = args.camera()?;
    let folder = args.string()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe { sys::gp_camera_folder_delete_all(camera, folder.as_ptr(), context) }))
  };
  gp_camera_folder_make_dir / 4 => |args| {
    let camera = args.camera()?;
    let folder = args.string()?;
    let name = args.string()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe {
      sys::gp_camera_folder_make_dir(camera, folder.as_ptr(), name.as_ptr(), context)
    }))
  };
  gp_camera_folder_remove_dir / 4 => |args| {
    let camera = args.camera()?;
    let folder = args.string()?;
    let name = args.string()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe {
      sys::gp_camera_folder_remove_dir(camera, folder.as_ptr(), name.as_ptr(), context)
    }))
  };
  gp_camera_file_delete / 4 => |args| {
    let camera = args.camera()?;
    let folder = args.string()?;
    let file = args.string()?;
    let context = args.context()?;
    Ok(Reply::status(unsafe {
      sys::gp_camera_file_delete(camera, folder.as_ptr(), file.as_ptr(), context)
    }))
  };

  gp_widget_ref / 1 => |args| {
    let widget = args.widget()?;
    Ok(Reply::status(unsafe { sys::gp_widget_ref(widget) }))
  };
  gp_widget_unref / 1 => |args| {
    let widget = args.widget()?;
    Ok(Reply::status(unsafe { sys::gp_widget_unref(widget) }))
  };
  gp_widget_get_name / 1 => |args| {
    let widget = args.widget()?;
    let mut name = ptr::null();
    let status = unsafe { sys::gp_widget_get_name(widget, &mut name) };
    Ok(string_reply(status, name))
  };
  gp_widget_get_label / 1 => |args| {
    let widget = args.widget()?;
    let mut label = ptr::null();
    let status = unsafe { sys::gp_widget_get_label(widget, &mut label) };
    Ok(string_reply(status, label))
  };
  gp_widget_get_info / 1 => |args| {
    let widget = args.widget()?;
    let mut info = ptr::null();
    let status = unsafe { sys::gp_widget_get_info(widget, &mut info) };
    Ok(string_reply(status, info))
  };
  gp_widget_get_id / 1 => |args| {
    let widget = args.widget()?;
    let mut id = 0;
    let status = unsafe { sys::gp_widget_get_id(widget, &mut id) };
    Ok(int_reply(status, id))
  };
  gp_widget_get_type / 1 => |args| {
    let widget = args.widget()?;
    Ok(match widget_type(widget) {
      Ok(ty) => Reply::with(GP_OK, vec![Value::Int(ty as c_int)]),
      Err(status) => Reply::status(status),
    })
  };
  gp_widget_get_readonly / 1 => |args| {
    let widget = args.widget()?;
    let mut readonly = 0;
    let status = unsafe { sys::gp_widget_get_readonly(widget, &mut readonly) };
    Ok(int_reply(status, readonly))
  };
  gp_widget_set_readonly / 2 => |args| {
    let widget = args.widget()?;
    let readonly = args.int()?;
    Ok(Reply::status(unsafe { sys::gp_widget_set_readonly(widget, readonly) }))
  };
  gp_widget_count_children / 1 => |args| {
    let widget = args.widget()?;
    Ok(Reply::count(unsafe { sys::gp_widget_count_children(widget) }))
  };
  gp_widget_get_child / 2 => |args| {
    let widget = args.widget()?;
    let index = args.int()?;
    let mut child = ptr::null_mut();
    let status = unsafe { sys::gp_widget_get_child(widget, index, &mut child) };
    Ok(widget_reply(status, child, true))
  };
  gp_widget_get_child_by_id / 2 => |args| {
    let widget = args.widget()?;
    let id = args.int()?;
    let mut child = ptr::null_mut();
    let status = unsafe { sys::gp_widget_get_child_by_id(widget, id, &mut child) };
    Ok(widget_reply(status, child, true))
  };
  gp_widget_get_child_by_label / 2 => |args| {
    let widget = args.widget()?;
    let label = args.string()?;
    let mut child = ptr::null_mut();
    let status = unsafe { sys::gp_widget_get_child_by_label(widget, label.as_ptr(), &mut child) };
    Ok(widget_reply(status, child, true))
  };
  gp_widget_get_child_by_name / 2 => |args| {
    let widget = args.widget()?;
    let name = args.string()?;
    let mut child = ptr::null_mut();
    let status = unsafe { sys::gp_widget_get_child_by_name(widget, name.as_ptr(), &mut child) };
    Ok(widget_reply(status, child, true))
  };
  gp_widget_get_root / 1 => |args| {
    let widget = args.widget()?;
    let mut root = ptr::null_mut();
    let status = unsafe { sys::gp_widget_get_root(widget, &mut root) };
    Ok(widget_reply(status, root, true))
  };
  gp_widget_get_parent / 1 => |args| {
    let widget = args.widget()?;
    let mut parent = ptr::null_mut();
    let status = unsafe { sys::gp_widget_get_parent(widget, &mut parent) };
    Ok(widget_reply(status, parent, true))
  };
  gp_widget_count_choices / 1 => |args| {
    let widget = args.widget()?;
    Ok(Reply::count(unsafe { sys::gp_widget_count_choices(widget) }))
  };
  gp_widget_get_choice / 2 => |args| {
    let widget = args.widget()?;
    let index = args.int()?;
    let mut choice = ptr::null();
    let status = unsafe { sys::gp_widget_get_choice(widget, index, &mut choice) };
    Ok(string_reply(status, choice))
  };
  gp_widget_add_choice / 2 => |args| {
    let widget = args.widget()?;
    let choice = args.string()?;
    Ok(Reply::status(unsafe { sys::gp_widget_add_choice(widget, choice.as_ptr()) }))
  };
  gp_widget_get_range / 1 => |args| {
    let widget = args.widget()?;
    let (mut min, mut max, mut step) = (0f32, 0f32, 0f32);
    let status = unsafe { sys::gp_widget_get_range(widget, &mut min, &mut max, &mut step) };
    Ok(reply(status, || vec![Value::Float(min), Value::Float(max), Value::Float(step)]))
  };
  gp_widget_get_value / 1 => |args| {
    let widget = args.widget()?;
    let ty = match widget_type(widget) {
      Ok(ty) => ty,
      Err(status) => return Ok(Reply::status(status)),
    };

    Ok(match ty {
      WidgetType::GP_WIDGET_TEXT | WidgetType::GP_WIDGET_RADIO | WidgetType::GP_WIDGET_MENU => {
        let mut value: *const c_char = ptr::null();
        let status = unsafe { sys::gp_widget_get_value(widget, ptr::addr_of_mut!(value).cast()) };
        string_reply(status, value)
      }
      WidgetType::GP_WIDGET_RANGE => {
        let mut value = 0f32;
        let status = unsafe { sys::gp_widget_get_value(widget, ptr::addr_of_mut!(value).cast()) };
        reply(status, || vec![Value::Float(value)])
      }
      WidgetType::GP_WIDGET_TOGGLE | WidgetType::GP_WIDGET_DATE => {
        let mut value: c_int = 0;
        let status = unsafe { sys::gp_widget_get_value(widget, ptr::addr_of_mut!(value).cast()) };
        int_reply(status, value)
      }
      _ => return Err(no_value("gp_widget_get_value", ty)),
    })
  };
  gp_widget_set_value / 2 => |args| {
    let widget = args.widget()?;
    let ty = match widget_type(widget) {
      Ok(ty) => ty,
      Err(status) => return Ok(Reply::status(status)),
    };

    let status = match ty {
      WidgetType::GP_WIDGET_TEXT | WidgetType::GP_WIDGET_RADIO | WidgetType::GP_WIDGET_MENU => {
        let value = args.string()?;
        unsafe { sys::gp_widget_set_value(widget, value.as_ptr().cast()) }
      }
      WidgetType::GP_WIDGET_RANGE => {
        let value = args.float()?;
        unsafe { sys::gp_widget_set_value(widget, ptr::addr_of!(value).cast()) }
      }
      WidgetType::GP_WIDGET_TOGGLE | WidgetType::GP_WIDGET_DATE => {
        let value = args.int()?;
        unsafe { sys::gp_widget_set_value(widget, ptr::addr_of!(value).cast()) }
      }
      _ => return Err(no_value("gp_widget_set_value", ty)),
    };

    Ok(Reply::status(status))
  };
  gp_widget_changed / 1 => |args| {
    let widget = args.widget()?;
    Ok(Reply::count(unsafe { sys::gp_widget_changed(widget) }))
  };
  gp_widget_set_changed / 2 => |args| {
    let widget = args.widget()?;
    let changed = args.int()?;
    Ok(Reply::status(unsafe { sys::gp_widget_set_changed(widget, changed) }))
  };

  gp_list_new / 0 => |_args| {
    let mut list = ptr::null_mut();
    let status = unsafe { sys::gp_list_new(&mut list) };
    Ok(handle_reply(status, HandleKind::List, list))
  };
  gp_list_unref / 1 => |args| {
    let list = args.list()?;
    Ok(Reply::status(unsafe { sys::gp_list_unref(list) }))
  };
  gp_list_count / 1 => |args| {
    let list = args.list()?;
    Ok(Reply::count(unsafe { sys::gp_list_count(list) }))
  };
  gp_list_get_name / 2 => |args| {
    let list = args.list()?;
    let index = args.int()?;
    let mut name = ptr::null();
    let status = unsafe { sys::gp_list_get_name(list, index, &mut name) };
    Ok(string_reply(status, name))
  };
  gp_list_get_value / 2 => |args| {
    let list = args.list()?;
    let index = args.int()?;
    let mut value = ptr::null();
    let status = unsafe { sys::gp_list_get_value(list, index, &mut value) };
    Ok(string_reply(status, value))
  };
  gp_list_set_name / 3 => |args| {
    let list = args.list()?;
    let index = args.int()?;
    let name = args.string()?;
    Ok(Reply::status(unsafe { sys::gp_list_set_name(list, index, name.as_ptr()) }))
  };
  gp_list_set_value / 3 => |args| {
    let list = args.list()?;
    let index = args.int()?;
    let value = args.string()?;
    Ok(Reply::status(unsafe { sys::gp_list_set_value(list, index, value.as_ptr()) }))
  };
  gp_list_append / 3 => |args| {
    let list = args.list()?;
    let name = args.string()?;
    let value = args.string()?;
    Ok(Reply::status(unsafe { sys::gp_list_append(list, name.as_ptr(), value.as_ptr()) }))
  };
  gp_list_find_by_name / 2 => |args| {
    let list = args.list()?;
    let name = args.string()?;
    let mut index = 0;
    let status = unsafe { sys::gp_list_find_by_name(list, &mut index, name.as_ptr()) };
    Ok(int_reply(status, index))
  };
  gp_list_reset / 1 => |args| {
    let list = args.list()?;
    Ok(Reply::status(unsafe { sys::gp_list_reset(list) }))
  };
  gp_list_sort / 1 => |args| {
    let list = args.list()?;
    Ok(Reply::status(unsafe { sys::gp_list_sort(list) }))
  };
}

fn gp_log_level(level: LogLevel) -> sys::GPLogLevel {
  match level {
    LogLevel::Error => sys::GPLogLevel::GP_LOG_ERROR,
    LogLevel::Verbose => sys::GPLogLevel::GP_LOG_VERBOSE,
    LogLevel::Debug => sys::GPLogLevel::GP_LOG_DEBUG,
    LogLevel::Data => sys::GPLogLevel::GP_LOG_DATA,
  }
}

unsafe extern "C" fn log_function(
  level: sys::GPLogLevel,
  domain: *const c_char,
  message: *const c_char,
  _data: *mut c_void,
) {
  let level = match level {
    sys::GPLogLevel::GP_LOG_ERROR => LogLevel::Error,
    sys::GPLogLevel::GP_LOG_VERBOSE => LogLevel::Verbose,
    sys::GPLogLevel::GP_LOG_DEBUG => LogLevel::Debug,
    sys::GPLogLevel::GP_LOG_DATA => LogLevel::Data,
  };

  log::forward(level, &chars_to_string(domain), &chars_to_string(message));
}

impl Library for Libgphoto2 {
  fn resolve(&self, name: &str) -> Option<Symbol> {
    FUNCTIONS.iter().position(|function| function.name == name).map(Symbol::new)
  }

  fn call(&self, symbol: Symbol, args: &[Value]) -> Result<Reply> {
    let function = FUNCTIONS
      .get(symbol.index())
      .ok_or_else(|| Error::unknown_operation(format!("#{}", symbol.index())))?;

    if args.len() != function.arity {
      return Err(Error::argument(
        function.name,
        format!("expected {} arguments, got {}", function.arity, args.len()),
      ));
    }

    (function.call)(&mut Args::new(function.name, args))
  }

  fn describe(&self, status: c_int) -> String {
    chars_to_string(unsafe { sys::gp_result_as_string(status) })
  }

  /// Registers the bridge once per process, later calls keep the first level
  fn install_log_bridge(&self, level: LogLevel) -> Result<()> {
    static LOG_FUNC: OnceLock<c_int> = OnceLock::new();

    let status = *LOG_FUNC.get_or_init(|| unsafe {
      sys::gp_log_add_func(gp_log_level(level), Some(log_function), ptr::null_mut())
    });

    check(self, Reply::status(status)).map(drop)
  }
}
