/// End-to-end checks: mesh text in, pixels out

use meshview_core::obj::{parse_mesh, write_mesh};
use meshview_core::{
    prepare_mesh, Color, Mesh, Rasterizer, RenderConfig, Rotation, SceneObject, Texture,
    TextureCache, Transform, Vector3,
};

const CONCAVE_PLATE: &str = "\
# L-shaped plate facing the viewer
v -1 -1 0
v 1 -1 0
v 1 0 0
v 0 0 0
v 0 1 0
v -1 1 0
f 1 2 3 4 5 6
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn concave_plate_renders_without_filling_the_notch() -> anyhow::Result<()> {
    init_tracing();
    let mut mesh = parse_mesh(CONCAVE_PLATE)?;
    prepare_mesh(&mut mesh)?;
    assert_eq!(mesh.polygon_count(), 4);
    assert!(mesh.polygons().iter().all(|p| p.normal().is_some()));

    let cfg = RenderConfig::from_json_str(
        r#"{ "width": 60, "height": 60, "lighting": false, "background": { "r": 0, "g": 0, "b": 0 } }"#,
    )?;
    let mut rasterizer = Rasterizer::new(cfg.width, cfg.height, cfg.settings);
    let plate = SceneObject {
        color: Color::new(0, 200, 0),
        ..SceneObject::new("plate", mesh)
    };
    let stats = rasterizer.render_scene(&[plate], &TextureCache::new());
    assert_eq!(stats.triangles, 4);

    let buffer = rasterizer.color_buffer();
    // Lower-left quadrant (screen bottom-left) is solid.
    assert_eq!(buffer.get(25, 35), Some(Color::new(0, 200, 0)));
    // Upper-right quadrant is the notch.
    assert_eq!(buffer.get(35, 25), Some(Color::BLACK));
    Ok(())
}

#[test]
fn cube_round_trips_through_text_and_renders() -> anyhow::Result<()> {
    init_tracing();
    let text = write_mesh(&Mesh::cube(1.5))?;
    let mut mesh = parse_mesh(&text)?;
    prepare_mesh(&mut mesh)?;
    assert_eq!(mesh.polygon_count(), 12);
    assert!(mesh.is_triangulated());

    let mut textures = TextureCache::new();
    textures.insert("checker", Texture::checkerboard(8, 4, Color::WHITE, Color::GREY));

    let mut cube = SceneObject::new("cube", mesh);
    cube.texture = Some("checker".to_string());
    cube.transform = Transform::new(
        Vector3::ZERO,
        Rotation::new(30.0, 45.0, 0.0),
        Vector3::new(1.0, 1.0, 1.0),
    );

    let cfg = RenderConfig::default();
    let mut rasterizer = Rasterizer::new(cfg.width, cfg.height, cfg.settings);
    let first = rasterizer.render_scene(std::slice::from_ref(&cube), &textures);
    assert!(first.pixels > 0);
    let center = rasterizer
        .color_buffer()
        .get(cfg.width / 2, cfg.height / 2)
        .unwrap();
    assert_ne!(center, cfg.settings.background);

    // A second frame starts from clean buffers and reproduces the first.
    let snapshot = rasterizer.color_buffer().clone();
    let second = rasterizer.render_scene(std::slice::from_ref(&cube), &textures);
    assert_eq!(first, second);
    assert_eq!(rasterizer.color_buffer(), &snapshot);
    Ok(())
}
