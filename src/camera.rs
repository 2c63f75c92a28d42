//! Camera proxy

use crate::{
  family::Family,
  library::Library,
  proxy::Proxy,
  value::{Handle, Output, Value},
  Context, Result,
};
use std::{marker::PhantomData, rc::Rc};

/// Wraps every `gp_camera_*(camera, ..., context)` function.
///
/// `gp_camera_folder_list_files(camera, folder, list, context)` becomes
/// `camera.invoke("folder_list_files", vec![folder, list])`.
///
/// The camera borrows the context it was created with for every call, so it
/// cannot outlive it.
pub struct Camera<'a> {
  proxy: Proxy,
  _context: PhantomData<&'a Context>,
}

impl<'a> Camera<'a> {
  /// Create a new camera (`gp_camera_new`) bound to `context`.
  ///
  /// Call `invoke("init", vec![])` to connect to the first detected camera.
  pub fn new(context: &'a Context) -> Result<Self> {
    Ok(Self {
      proxy: Proxy::acquire(Family::Camera, context.library(), Some(context.handle()))?,
      _context: PhantomData,
    })
  }

  /// Call `gp_camera_{operation}(camera, args..., context)`
  pub fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Output> {
    self.proxy.invoke(operation, args)
  }

  /// The native camera handle
  pub fn handle(&self) -> Handle {
    self.proxy.handle()
  }

  /// Function table this camera forwards into
  pub fn library(&self) -> Rc<dyn Library> {
    self.proxy.library().clone()
  }

  /// Release the camera (`gp_camera_unref`)
  pub fn close(mut self) -> Result<()> {
    self.proxy.release()
  }

  /// Give up ownership of the handle without releasing it
  pub fn into_raw(self) -> Handle {
    self.proxy.into_raw()
  }
}

impl From<&Camera<'_>> for Value {
  fn from(camera: &Camera<'_>) -> Self {
    Value::Handle(camera.handle())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{testing::FakeLibrary, ErrorKind, HandleKind, Options, Reply, Widget};
  use std::panic::{catch_unwind, AssertUnwindSafe};

  fn context(fake: &Rc<FakeLibrary>) -> Context {
    Context::with_library(fake.clone(), &Options::default()).unwrap()
  }

  #[test]
  fn init_passes_camera_then_context() {
    crate::init_tracing();
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_camera_init", |_| Reply::status(0));
    let context = context(&fake);
    let camera = Camera::new(&context).unwrap();

    let output = camera.invoke("init", vec![]).unwrap();

    assert!(output.is_empty());
    let call = fake.last_call().unwrap();
    assert_eq!(call.function, "gp_camera_init");
    assert_eq!(call.args, vec![Value::Handle(camera.handle()), Value::Handle(context.handle())]);
  }

  #[test]
  fn caller_arguments_sit_between_camera_and_context() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_camera_folder_list_files", |_| Reply::status(0));
    let context = context(&fake);
    let camera = Camera::new(&context).unwrap();
    let list = context.new_list().unwrap();

    camera.invoke("folder_list_files", vec!["/DCIM".into(), (&list).into()]).unwrap();

    let call = fake.last_call().unwrap();
    assert_eq!(
      call.args,
      vec![
        Value::Handle(camera.handle()),
        "/DCIM".into(),
        Value::Handle(list.handle()),
        Value::Handle(context.handle()),
      ]
    );
  }

  #[test]
  fn failing_exit_reports_the_library_description() {
    let fake = Rc::new(FakeLibrary::new());
    fake.describe_status(-1, "Unspecified error");
    fake.register("gp_camera_exit", |_| Reply::status(-1));
    let context = context(&fake);
    let camera = Camera::new(&context).unwrap();

    let err = camera.invoke("exit", vec![]).unwrap_err();

    assert_eq!(err.code(), Some(-1));
    assert_eq!(err.to_string(), "Unspecified error");
  }

  #[test]
  fn outputs_come_back_unchanged() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_camera_get_summary", |_| Reply::with(0, vec!["Model: Fake".into()]));
    let context = context(&fake);
    let camera = Camera::new(&context).unwrap();

    let summary = camera.invoke("get_summary", vec![]).unwrap();

    assert_eq!(summary.into_string().unwrap(), "Model: Fake");
  }

  #[test]
  fn unknown_operations_never_reach_the_library() {
    let fake = Rc::new(FakeLibrary::new());
    let context = context(&fake);
    let camera = Camera::new(&context).unwrap();
    let calls_before = fake.calls().len();

    let err = camera.invoke("dance", vec![]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownOperation);
    assert_eq!(err.to_string(), "Unknown operation: gp_camera_dance");
    assert_eq!(fake.calls().len(), calls_before);
  }

  #[test]
  fn acquires_and_releases_one_camera() {
    let fake = Rc::new(FakeLibrary::new());
    let context = context(&fake);

    let camera = Camera::new(&context).unwrap();
    let handle = camera.handle();
    assert_eq!(handle.kind(), HandleKind::Camera);
    assert_eq!(fake.calls_to("gp_camera_new"), 1);

    camera.close().unwrap();
    assert_eq!(fake.calls_to("gp_camera_unref"), 1);
    assert_eq!(fake.last_call().unwrap().args, vec![Value::Handle(handle)]);
  }

  #[test]
  fn failing_release_is_reported() {
    let fake = Rc::new(FakeLibrary::new());
    fake.describe_status(-2, "Bad parameters");
    fake.register("gp_camera_unref", |_| Reply::status(-2));
    let context = context(&fake);
    let camera = Camera::new(&context).unwrap();

    let err = camera.close().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BadParameters);
    assert_eq!(fake.calls_to("gp_camera_unref"), 1);
  }

  #[test]
  fn failing_constructor_is_reported() {
    let fake = Rc::new(FakeLibrary::new());
    fake.describe_status(-3, "Out of memory");
    fake.register("gp_camera_new", |_| Reply::status(-3));
    let context = context(&fake);

    let err = Camera::new(&context).err().unwrap();

    assert_eq!(err.kind(), ErrorKind::NoMemory);
    assert_eq!(fake.calls_to("gp_camera_unref"), 0);
  }

  #[test]
  fn released_once_when_scope_panics() {
    let fake = Rc::new(FakeLibrary::new());
    let context = context(&fake);

    let result = catch_unwind(AssertUnwindSafe(|| {
      let _camera = Camera::new(&context).unwrap();
      panic!("dropped the camera");
    }));

    assert!(result.is_err());
    assert_eq!(fake.calls_to("gp_camera_unref"), 1);
  }

  #[test]
  fn released_once_on_early_return() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_camera_init", |_| Reply::status(-7));
    let context = context(&fake);

    let run = || -> Result<()> {
      let camera = Camera::new(&context)?;
      camera.invoke("init", vec![])?;
      camera.close()
    };

    assert!(run().is_err());
    assert_eq!(fake.calls_to("gp_camera_unref"), 1);
  }

  #[test]
  fn config_widget_is_adopted() {
    let fake = Rc::new(FakeLibrary::new());
    let root = fake.allocate(HandleKind::Widget);
    fake.register("gp_camera_get_config", move |_| Reply::with(0, vec![root.into()]));
    let context = context(&fake);
    let camera = Camera::new(&context).unwrap();

    let handle = camera.invoke("get_config", vec![]).unwrap().into_handle(HandleKind::Widget).unwrap();
    let config = Widget::new(camera.library(), handle).unwrap();
    drop(config);

    assert_eq!(fake.calls_to("gp_widget_unref"), 1);
    assert_eq!(fake.last_call().unwrap().args, vec![Value::Handle(root)]);
  }
}
