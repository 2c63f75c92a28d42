//! Camera configuration widgets
//!
//! ## Configuring a camera
//! ```no_run
//! use gphoto2_proxy::{Camera, Context, HandleKind, Result};
//!
//! # fn main() -> Result<()> {
//! let context = Context::new()?;
//! let camera = Camera::new(&context)?;
//! camera.invoke("init", vec![])?;
//!
//! let iso = camera.invoke("get_single_config", vec!["iso".into()])?;
//! let iso = context.new_widget(iso.into_handle(HandleKind::Widget)?)?;
//! iso.invoke("set_value", vec!["100".into()])?; // Set the iso to 100
//! camera.invoke("set_single_config", vec!["iso".into(), (&iso).into()])?; // Apply setting to camera
//! # Ok(())
//! # }
//! ```

use crate::{
  family::Family,
  library::Library,
  proxy::Proxy,
  value::{Handle, HandleKind, Output, Value},
  Result,
};
use std::rc::Rc;

/// Wraps every `gp_widget_*(widget, ...)` function.
///
/// `gp_widget_get_child(widget, child_number)` becomes
/// `widget.invoke("get_child", vec![child_number])`.
pub struct Widget {
  proxy: Proxy,
}

impl Widget {
  /// Adopt a widget handle.
  ///
  /// The handle must carry one reference for this proxy to drop; the
  /// libgphoto2 table hands out widget handles that way.
  pub fn new(library: Rc<dyn Library>, handle: Handle) -> Result<Self> {
    Ok(Self { proxy: Proxy::adopt(Family::Widget, library, handle, None)? })
  }

  /// Call `gp_widget_{operation}(widget, args...)`
  pub fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Output> {
    self.proxy.invoke(operation, args)
  }

  /// Forward a navigation call (`get_child`, `get_root`, ...) and adopt the widget it returns
  pub fn navigate(&self, operation: &str, args: Vec<Value>) -> Result<Widget> {
    let handle = self.invoke(operation, args)?.into_handle(HandleKind::Widget)?;
    Widget::new(self.library(), handle)
  }

  /// The native widget handle
  pub fn handle(&self) -> Handle {
    self.proxy.handle()
  }

  /// Function table this widget forwards into
  pub fn library(&self) -> Rc<dyn Library> {
    self.proxy.library().clone()
  }

  /// Release the widget (`gp_widget_unref`)
  pub fn close(mut self) -> Result<()> {
    self.proxy.release()
  }

  /// Give up ownership of the handle without releasing it
  pub fn into_raw(self) -> Handle {
    self.proxy.into_raw()
  }
}

impl From<&Widget> for Value {
  fn from(widget: &Widget) -> Self {
    Value::Handle(widget.handle())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{testing::FakeLibrary, ErrorKind, Reply};

  #[test]
  fn adopts_without_allocating() {
    let fake = Rc::new(FakeLibrary::new());
    let handle = fake.allocate(HandleKind::Widget);

    let widget = Widget::new(fake.clone(), handle).unwrap();

    assert_eq!(widget.handle(), handle);
    assert!(fake.calls().is_empty());

    widget.close().unwrap();
    assert_eq!(fake.calls_to("gp_widget_unref"), 1);
    assert_eq!(fake.last_call().unwrap().args, vec![Value::Handle(handle)]);
  }

  #[test]
  fn forwards_with_the_widget_first_and_no_context() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_widget_get_choice", |args| match args {
      [_, Value::Int(1)] => Reply::with(0, vec!["200".into()]),
      _ => Reply::status(-2),
    });
    let widget = Widget::new(fake.clone(), fake.allocate(HandleKind::Widget)).unwrap();

    let choice = widget.invoke("get_choice", vec![1.into()]).unwrap();

    assert_eq!(choice.into_string().unwrap(), "200");
    assert_eq!(fake.last_call().unwrap().args, vec![Value::Handle(widget.handle()), Value::Int(1)]);
  }

  #[test]
  fn navigation_adopts_the_child() {
    let fake = Rc::new(FakeLibrary::new());
    let child = fake.allocate(HandleKind::Widget);
    fake.register("gp_widget_get_child_by_name", move |_| Reply::with(0, vec![child.into()]));
    let root = Widget::new(fake.clone(), fake.allocate(HandleKind::Widget)).unwrap();

    let iso = root.navigate("get_child_by_name", vec!["iso".into()]).unwrap();
    assert_eq!(iso.handle(), child);

    drop(iso);
    drop(root);
    assert_eq!(fake.calls_to("gp_widget_unref"), 2);
  }

  #[test]
  fn failing_release_is_reported() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_widget_unref", |_| Reply::status(-2));
    let widget = Widget::new(fake.clone(), fake.allocate(HandleKind::Widget)).unwrap();

    assert_eq!(widget.close().unwrap_err().kind(), ErrorKind::BadParameters);
    assert_eq!(fake.calls_to("gp_widget_unref"), 1);
  }
}
