//! Function families and the argument layout of each

use crate::value::{Handle, HandleKind, Value};

/// Group of native functions sharing a name prefix and a leading handle
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Family {
  /// `gp_*(..., context)`
  Context,
  /// `gp_camera_*(camera, ..., context)`
  Camera,
  /// `gp_widget_*(widget, ...)`
  Widget,
  /// `gp_list_*(list, ...)`
  List,
}

/// A forwarded call, ready to be resolved and invoked
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
  /// Full native function name
  pub function: String,
  /// Full native argument list
  pub args: Vec<Value>,
}

impl Family {
  /// Prefix that turns an operation name into a native function name
  pub const fn prefix(self) -> &'static str {
    match self {
      Self::Context => "gp_",
      Self::Camera => "gp_camera_",
      Self::Widget => "gp_widget_",
      Self::List => "gp_list_",
    }
  }

  /// Kind of handle owned by proxies of this family
  pub const fn handle_kind(self) -> HandleKind {
    match self {
      Self::Context => HandleKind::Context,
      Self::Camera => HandleKind::Camera,
      Self::Widget => HandleKind::Widget,
      Self::List => HandleKind::List,
    }
  }

  /// Native function allocating a new handle, widgets are only ever adopted
  pub(crate) const fn constructor(self) -> Option<&'static str> {
    match self {
      Self::Context => Some("gp_context_new"),
      Self::Camera => Some("gp_camera_new"),
      Self::Widget => None,
      Self::List => Some("gp_list_new"),
    }
  }

  /// Native function dropping the owned reference
  pub(crate) const fn destructor(self) -> &'static str {
    match self {
      Self::Context => "gp_context_unref",
      Self::Camera => "gp_camera_unref",
      Self::Widget => "gp_widget_unref",
      Self::List => "gp_list_unref",
    }
  }

  /// Whether the destructor's status is checked.
  ///
  /// `gp_context_unref` has no status to check.
  pub(crate) const fn checks_release(self) -> bool {
    !matches!(self, Self::Context)
  }

  /// Native name of an operation of this family
  pub fn function_name(self, operation: &str) -> String {
    format!("{}{}", self.prefix(), operation)
  }

  /// Lay out the native arguments of a forwarded call.
  ///
  /// Context: `args..., context`. Camera: `camera, args..., context`.
  /// Widget and list: `handle, args...`.
  pub fn arguments(self, owned: Handle, context: Option<Handle>, args: Vec<Value>) -> Vec<Value> {
    let mut full = Vec::with_capacity(args.len() + 2);

    match self {
      Self::Context => {
        full.extend(args);
        full.push(Value::Handle(owned));
      }
      Self::Camera => {
        full.push(Value::Handle(owned));
        full.extend(args);
        full.extend(context.map(Value::Handle));
      }
      Self::Widget | Self::List => {
        full.push(Value::Handle(owned));
        full.extend(args);
      }
    }

    full
  }

  /// Map an operation and its caller arguments to the native call
  pub fn adapt(
    self,
    operation: &str,
    owned: Handle,
    context: Option<Handle>,
    args: Vec<Value>,
  ) -> Call {
    Call { function: self.function_name(operation), args: self.arguments(owned, context, args) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::os::raw::c_void;

  fn handle(kind: HandleKind, address: usize) -> Handle {
    Handle::new(kind, address as *mut c_void).unwrap()
  }

  #[test]
  fn camera_calls_wrap_arguments_in_camera_and_context() {
    let camera = handle(HandleKind::Camera, 0x10);
    let context = handle(HandleKind::Context, 0x20);

    let call = Family::Camera.adapt(
      "folder_list_files",
      camera,
      Some(context),
      vec!["/".into(), Value::Int(7)],
    );

    assert_eq!(call.function, "gp_camera_folder_list_files");
    assert_eq!(
      call.args,
      vec![Value::Handle(camera), "/".into(), Value::Int(7), Value::Handle(context)]
    );
  }

  #[test]
  fn context_calls_append_the_context() {
    let context = handle(HandleKind::Context, 0x20);
    let list = handle(HandleKind::List, 0x30);

    let call = Family::Context.adapt("camera_autodetect", context, None, vec![list.into()]);

    assert_eq!(call.function, "gp_camera_autodetect");
    assert_eq!(call.args, vec![Value::Handle(list), Value::Handle(context)]);
  }

  #[test]
  fn widget_and_list_calls_only_lead_with_their_handle() {
    let widget = handle(HandleKind::Widget, 0x40);
    let context = handle(HandleKind::Context, 0x20);

    // A stray context is never threaded into handle-only families.
    let call = Family::Widget.adapt("get_child", widget, Some(context), vec![Value::Int(2)]);
    assert_eq!(call.function, "gp_widget_get_child");
    assert_eq!(call.args, vec![Value::Handle(widget), Value::Int(2)]);

    let list = handle(HandleKind::List, 0x30);
    let call = Family::List.adapt("count", list, None, Vec::new());
    assert_eq!(call.function, "gp_list_count");
    assert_eq!(call.args, vec![Value::Handle(list)]);
  }

  #[test]
  fn lifecycle_functions() {
    assert_eq!(Family::Widget.constructor(), None);
    assert_eq!(Family::List.constructor(), Some("gp_list_new"));
    assert_eq!(Family::Camera.destructor(), "gp_camera_unref");
    assert!(!Family::Context.checks_release());
    assert!(Family::Widget.checks_release());
  }
}
