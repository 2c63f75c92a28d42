mod logging;

use gphoto2_proxy::{Context, Result};

fn main() -> Result<()> {
  logging::setup();

  let context = Context::new()?;
  let list = context.new_list()?;

  context.invoke("camera_autodetect", vec![(&list).into()])?;

  for (model, port) in list.entries()? {
    println!("{model} on {port}");
  }

  Ok(())
}
