/// Renders one frame without a terminal and writes it as a PPM image.
///
/// Usage: cargo run --example snapshot -- [mesh.obj] [out.ppm]
use anyhow::{Context, Result};
use meshview_core::{
    obj::parse_mesh, prepare_mesh, Color, Mesh, Rasterizer, RenderConfig, Rotation, SceneObject,
    Texture, TextureCache,
};
use meshview_terminal::write_ppm;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mesh_path = args.next();
    let out_path = args.next().unwrap_or_else(|| "snapshot.ppm".to_string());

    let mut mesh = match &mesh_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            parse_mesh(&text).with_context(|| format!("parsing {}", path))?
        }
        None => Mesh::cube(2.0),
    };
    prepare_mesh(&mut mesh)?;

    let mut textures = TextureCache::new();
    textures.insert(
        "checker",
        Texture::checkerboard(64, 8, Color::WHITE, Color::new(200, 60, 40)),
    );

    let mut object = SceneObject::new("snapshot", mesh);
    object.texture = Some("checker".to_string());
    object.transform.rotation = Rotation::new(25.0, 35.0, 0.0);

    let config = RenderConfig {
        width: 320,
        height: 240,
        ..RenderConfig::default()
    };
    let mut rasterizer = Rasterizer::new(config.width, config.height, config.settings);
    let stats = rasterizer.render_scene(std::slice::from_ref(&object), &textures);
    info!(
        triangles = stats.triangles,
        pixels = stats.pixels,
        "rendered snapshot"
    );

    let file = File::create(&out_path).with_context(|| format!("creating {}", out_path))?;
    let mut writer = BufWriter::new(file);
    write_ppm(rasterizer.color_buffer(), &mut writer)?;
    writer.flush()?;
    info!(path = %out_path, "wrote image");
    Ok(())
}
