/// Meshview terminal viewer
///
/// Usage: meshview-terminal [--config render.json] [--texture image.png] [mesh.obj]
///
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - L/T: Toggle lighting / texture
///   - M: Switch texture sampling mode
///   - Space: Pause spinning
///   - Q/ESC: Quit
use anyhow::{bail, Context, Result};
use meshview_core::{
    obj::parse_mesh, prepare_mesh, Color, Mesh, RenderConfig, SceneObject, Texture, TextureCache,
};
use meshview_terminal::TerminalApp;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const TEXTURE_KEY: &str = "model";

#[derive(Debug, Default)]
struct Args {
    mesh: Option<PathBuf>,
    config: Option<PathBuf>,
    texture: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config = Some(iter.next().context("--config expects a path")?.into())
            }
            "--texture" => {
                args.texture = Some(iter.next().context("--texture expects a path")?.into())
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            path => args.mesh = Some(path.into()),
        }
    }
    Ok(args)
}

fn load_mesh(path: Option<&PathBuf>) -> Result<Mesh> {
    let mut mesh = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_mesh(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Mesh::cube(2.0),
    };
    prepare_mesh(&mut mesh).context("preparing mesh")?;
    Ok(mesh)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let mesh = load_mesh(args.mesh.as_ref())?;
    info!(
        vertices = mesh.vertex_count(),
        polygons = mesh.polygon_count(),
        "mesh ready"
    );

    let mut textures = TextureCache::new();
    match &args.texture {
        Some(path) => {
            textures.load(TEXTURE_KEY, path)?;
        }
        None => {
            textures.insert(
                TEXTURE_KEY,
                Texture::checkerboard(64, 8, Color::WHITE, Color::GREY),
            );
        }
    }

    let mut object = SceneObject::new(TEXTURE_KEY, mesh);
    object.texture = Some(TEXTURE_KEY.to_string());

    let mut app = TerminalApp::new(object, textures, config);
    app.run()?;
    Ok(())
}
