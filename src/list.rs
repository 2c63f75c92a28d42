//! List of name/value pairs (cameras, ports, files, folders)

use crate::{
  family::Family,
  library::Library,
  proxy::Proxy,
  value::{Handle, Output, Value},
  Result,
};
use std::rc::Rc;

/// Wraps every `gp_list_*(list, ...)` function.
///
/// `gp_list_get_name(list, index)` becomes
/// `list.invoke("get_name", vec![index])`.
pub struct List {
  proxy: Proxy,
}

impl List {
  /// Create an empty list (`gp_list_new`)
  pub fn new(library: Rc<dyn Library>) -> Result<Self> {
    Ok(Self { proxy: Proxy::acquire(Family::List, library, None)? })
  }

  /// Call `gp_list_{operation}(list, args...)`
  pub fn invoke(&self, operation: &str, args: Vec<Value>) -> Result<Output> {
    self.proxy.invoke(operation, args)
  }

  /// Read every name/value pair of the list
  pub fn entries(&self) -> Result<Vec<(String, String)>> {
    let count = self.invoke("count", Vec::new())?.into_int()?;

    (0..count)
      .map(|i| {
        let name = self.invoke("get_name", vec![i.into()])?.into_string()?;
        let value = self.invoke("get_value", vec![i.into()])?.into_string()?;
        Ok((name, value))
      })
      .collect()
  }

  /// The native list handle
  pub fn handle(&self) -> Handle {
    self.proxy.handle()
  }

  /// Function table this list forwards into
  pub fn library(&self) -> Rc<dyn Library> {
    self.proxy.library().clone()
  }

  /// Release the list (`gp_list_unref`)
  pub fn close(mut self) -> Result<()> {
    self.proxy.release()
  }

  /// Give up ownership of the handle without releasing it
  pub fn into_raw(self) -> Handle {
    self.proxy.into_raw()
  }
}

impl From<&List> for Value {
  fn from(list: &List) -> Self {
    Value::Handle(list.handle())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{testing::FakeLibrary, ErrorKind, HandleKind, Reply};

  #[test]
  fn acquires_and_releases_one_list() {
    let fake = Rc::new(FakeLibrary::new());

    let list = List::new(fake.clone()).unwrap();
    assert_eq!(list.handle().kind(), HandleKind::List);
    assert_eq!(fake.calls_to("gp_list_new"), 1);

    list.close().unwrap();
    assert_eq!(fake.calls_to("gp_list_unref"), 1);
  }

  #[test]
  fn entries_reads_names_and_values() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_list_count", |_| Reply::count(2));
    fake.register("gp_list_get_name", |args| match args {
      [_, Value::Int(0)] => Reply::with(0, vec!["Canon EOS 5D".into()]),
      [_, Value::Int(1)] => Reply::with(0, vec!["Nikon D750".into()]),
      _ => Reply::status(-2),
    });
    fake.register("gp_list_get_value", |args| match args {
      [_, Value::Int(i)] => Reply::with(0, vec![format!("usb:001,00{i}").into()]),
      _ => Reply::status(-2),
    });
    let list = List::new(fake.clone()).unwrap();

    let entries = list.entries().unwrap();

    assert_eq!(
      entries,
      vec![
        ("Canon EOS 5D".to_owned(), "usb:001,000".to_owned()),
        ("Nikon D750".to_owned(), "usb:001,001".to_owned()),
      ]
    );
  }

  #[test]
  fn negative_status_becomes_an_error() {
    let fake = Rc::new(FakeLibrary::new());
    fake.describe_status(-2, "Bad parameters");
    fake.register("gp_list_get_name", |_| Reply::status(-2));
    let list = List::new(fake.clone()).unwrap();

    let err = list.invoke("get_name", vec![5.into()]).unwrap_err();

    assert_eq!(err, crate::Error::new(-2, "Bad parameters"));
  }

  #[test]
  fn failing_release_is_reported() {
    let fake = Rc::new(FakeLibrary::new());
    fake.register("gp_list_unref", |_| Reply::status(-1));
    let list = List::new(fake.clone()).unwrap();

    assert_eq!(list.close().unwrap_err().kind(), ErrorKind::Other);
  }
}
