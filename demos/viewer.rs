//! Interactive viewer demo.
//!
//! Loads any OBJ files given on the command line, or falls back to a cube
//! and a sphere, then opens the editing UI.
//!
//! ```sh
//! cargo run --example viewer -- path/to/model.obj
//! ```

use anyhow::Result;
use cgmath::Vector3;
use meshview::geometry::{unit_cube, uv_sphere};

fn main() -> Result<()> {
    env_logger::init();

    let mut app = meshview::default();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        app.scene_mut().add_model(unit_cube("cube"));

        let mut sphere = uv_sphere("sphere", 0.6, 24, 16);
        sphere.translation = Vector3::new(1.6, 0.0, 0.0);
        app.scene_mut().add_model(sphere);
    } else {
        for path in &paths {
            app.add_model(path)?;
        }
    }

    app.run();
    Ok(())
}
