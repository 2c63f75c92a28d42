//! Recursively list all configuration
//! Warning: Output might be very large

mod logging;

use gphoto2_proxy::{Camera, Context, HandleKind, Result, Value, Widget};

fn print_widget(widget: &Widget, depth: usize) -> Result<()> {
  let name = widget.invoke("get_name", vec![])?.into_string()?;
  let label = widget.invoke("get_label", vec![])?.into_string()?;
  let value = match widget.invoke("get_value", vec![]) {
    Ok(value) => format!("{:?}", value.values()),
    Err(_) => String::new(),
  };
  println!("{:indent$}{name} ({label}) {value}", "", indent = depth * 2);

  let children = widget.invoke("count_children", vec![])?.into_int()?;
  for i in 0..children {
    let child = widget.navigate("get_child", vec![Value::Int(i)])?;
    print_widget(&child, depth + 1)?;
  }

  Ok(())
}

fn main() -> Result<()> {
  logging::setup();

  let context = Context::new()?;
  let camera = Camera::new(&context)?;
  camera.invoke("init", vec![])?;

  let config = camera.invoke("get_config", vec![])?.into_handle(HandleKind::Widget)?;
  let config = context.new_widget(config)?;
  print_widget(&config, 0)?;

  config.close()?;
  camera.invoke("exit", vec![])?;
  camera.close()
}
