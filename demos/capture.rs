mod logging;

use gphoto2_proxy::{Camera, Context, Result};

fn main() -> Result<()> {
  logging::setup();

  let context = Context::new()?;
  let camera = Camera::new(&context)?;
  camera.invoke("init", vec![])?;

  // 0 is GP_CAPTURE_IMAGE
  let file = camera.invoke("capture", vec![0.into()])?.into_file_path()?;
  println!("Captured image {file}");

  let files = context.new_list()?;
  camera.invoke("folder_list_files", vec![file.folder.clone().into(), (&files).into()])?;
  println!("{} now holds {} files", file.folder, files.invoke("count", vec![])?.into_int()?);

  camera.invoke("exit", vec![])?;
  camera.close()
}
