/// mini3d terminal viewer.
///
/// Renders an OBJ model (or a demo cube) with the CPU rasterizer,
/// drawn as half-block cells. Controls:
///   - WASD / Space / C: move the camera (Shift = fast)
///   - Right-mouse drag: look around; wheel: dolly
///   - Arrow keys: rotate the model
///   - 1 / 2 / 3: toggle wireframe / lighting / texture
///   - g / v: grayscale / edge-detect post filters
///   - n / Tab / x: add / cycle / remove cameras
///   - o: export the transformed model as OBJ
///   - Q / ESC: quit

use std::env;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use simplelog::WriteLogger;

use mini3d_core::{obj, Mesh};
use mini3d_terminal::TerminalApp;

fn main() -> Result<()> {
    // The alternate screen owns stdout, so logs go to a file.
    WriteLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        File::create("mini3d-terminal.log").context("creating log file")?,
    )?;

    let mesh = match env::args().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            info!("loading {}", path.display());
            obj::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => {
            info!("no model given, using the demo cube");
            Mesh::cube(2.0)
        }
    };
    info!(
        "model ready: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    let mut app = TerminalApp::new(mesh)?;
    app.run()?;

    Ok(())
}
