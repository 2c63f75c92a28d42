//! In-memory function table for tests
//!
//! Constructors (`gp_context_new`, `gp_camera_new`, `gp_list_new`) hand out
//! fresh fake handles and destructors succeed, unless a test registers its own
//! function under the same name. Every call is recorded with its full
//! argument list.

use crate::{
  error::GP_OK,
  library::{Library, Reply, Symbol},
  value::{Handle, HandleKind, Value},
  Error, LogLevel, Result,
};
use std::{
  cell::{Cell, RefCell},
  collections::HashMap,
  os::raw::{c_int, c_void},
  rc::Rc,
};

type Function = Rc<dyn Fn(&[Value]) -> Reply>;

/// A native call seen by the [`FakeLibrary`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
  /// Full native function name
  pub function: String,
  /// Arguments exactly as received
  pub args: Vec<Value>,
}

enum Entry {
  New(HandleKind),
  Release,
  Custom(Function),
}

/// Fake [`Library`] recording every call
pub struct FakeLibrary {
  names: RefCell<Vec<String>>,
  entries: RefCell<Vec<Entry>>,
  descriptions: RefCell<HashMap<c_int, String>>,
  calls: RefCell<Vec<RecordedCall>>,
  next_address: Cell<usize>,
  resolutions: Cell<usize>,
  log_bridge: Cell<Option<LogLevel>>,
}

impl Default for FakeLibrary {
  fn default() -> Self {
    Self::new()
  }
}

impl FakeLibrary {
  /// Create a table knowing only the constructors and destructors
  pub fn new() -> Self {
    let library = Self {
      names: RefCell::default(),
      entries: RefCell::default(),
      descriptions: RefCell::default(),
      calls: RefCell::default(),
      next_address: Cell::new(0x1000),
      resolutions: Cell::new(0),
      log_bridge: Cell::new(None),
    };

    library.insert("gp_context_new", Entry::New(HandleKind::Context));
    library.insert("gp_camera_new", Entry::New(HandleKind::Camera));
    library.insert("gp_list_new", Entry::New(HandleKind::List));
    for destructor in ["gp_context_unref", "gp_camera_unref", "gp_widget_unref", "gp_list_unref"] {
      library.insert(destructor, Entry::Release);
    }

    library
  }

  fn insert(&self, name: &str, entry: Entry) {
    let mut names = self.names.borrow_mut();
    let mut entries = self.entries.borrow_mut();

    match names.iter().position(|known| known == name) {
      Some(index) => entries[index] = entry,
      None => {
        names.push(name.to_owned());
        entries.push(entry);
      }
    }
  }

  /// Register (or replace) a function under its full native name
  pub fn register(&self, name: &str, function: impl Fn(&[Value]) -> Reply + 'static) {
    self.insert(name, Entry::Custom(Rc::new(function)));
  }

  /// Set the description returned for a status code
  pub fn describe_status(&self, status: c_int, description: &str) {
    self.descriptions.borrow_mut().insert(status, description.to_owned());
  }

  /// Hand out a fresh handle without going through a constructor
  pub fn allocate(&self, kind: HandleKind) -> Handle {
    let address = self.next_address.get();
    self.next_address.set(address + 0x10);

    Handle::new(kind, address as *mut c_void).expect("fake addresses are never null")
  }

  /// Every call so far, in order
  pub fn calls(&self) -> Vec<RecordedCall> {
    self.calls.borrow().clone()
  }

  /// The most recent call
  pub fn last_call(&self) -> Option<RecordedCall> {
    self.calls.borrow().last().cloned()
  }

  /// How many times a function was called
  pub fn calls_to(&self, name: &str) -> usize {
    self.calls.borrow().iter().filter(|call| call.function == name).count()
  }

  /// How many name lookups were made
  pub fn resolutions(&self) -> usize {
    self.resolutions.get()
  }

  /// Level of the installed log bridge, if any
  pub fn log_bridge(&self) -> Option<LogLevel> {
    self.log_bridge.get()
  }
}

impl Library for FakeLibrary {
  fn resolve(&self, name: &str) -> Option<Symbol> {
    self.resolutions.set(self.resolutions.get() + 1);
    self.names.borrow().iter().position(|known| known == name).map(Symbol::new)
  }

  fn call(&self, symbol: Symbol, args: &[Value]) -> Result<Reply> {
    let function = self
      .names
      .borrow()
      .get(symbol.index())
      .cloned()
      .ok_or_else(|| Error::unknown_operation(format!("#{}", symbol.index())))?;

    self.calls.borrow_mut().push(RecordedCall { function, args: args.to_vec() });

    // Custom functions may call back into the fake, so no borrow is held while they run.
    let entry = match &self.entries.borrow()[symbol.index()] {
      Entry::New(kind) => Entry::New(*kind),
      Entry::Release => Entry::Release,
      Entry::Custom(function) => Entry::Custom(function.clone()),
    };

    Ok(match entry {
      Entry::New(kind) => Reply::with(GP_OK, vec![Value::Handle(self.allocate(kind))]),
      Entry::Release => Reply::status(GP_OK),
      Entry::Custom(function) => function(args),
    })
  }

  fn describe(&self, status: c_int) -> String {
    self
      .descriptions
      .borrow()
      .get(&status)
      .cloned()
      .unwrap_or_else(|| format!("Unknown error {status}"))
  }

  fn install_log_bridge(&self, level: LogLevel) -> Result<()> {
    self.log_bridge.set(Some(level));
    self.calls.borrow_mut().push(RecordedCall {
      function: "gp_log_add_func".to_owned(),
      args: vec![Value::Str(format!("{level:?}"))],
    });
    Ok(())
  }
}
