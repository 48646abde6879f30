/// Terminal front end for the meshview rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use meshview_core::{RenderConfig, Rasterizer, SceneObject, TextureCache, TextureSampling};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod ppm;
pub mod renderer;

pub use ppm::write_ppm;
pub use renderer::TerminalPresenter;

/// Degrees applied per key press.
const ROTATE_STEP: f64 = 5.0;
/// Degrees per frame of idle spin about X and Y.
const SPIN: (f64, f64) = (0.6, 0.9);

/// Interactive viewer: one scene object drawn every frame.
pub struct TerminalApp {
    object: SceneObject,
    textures: TextureCache,
    rasterizer: Rasterizer,
    presenter: TerminalPresenter,
    running: bool,
    spinning: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(object: SceneObject, textures: TextureCache, config: RenderConfig) -> Self {
        Self {
            object,
            textures,
            rasterizer: Rasterizer::new(config.width, config.height, config.settings),
            presenter: TerminalPresenter::new(1),
            running: true,
            spinning: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn object(&self) -> &SceneObject {
        &self.object
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let (cols, rows) = terminal::size()?;
        self.fit_to_terminal(cols, rows);
        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    /// Sizes the framebuffer to two pixel rows per terminal line.
    pub fn fit_to_terminal(&mut self, cols: u16, rows: u16) {
        let (width, height) = self.presenter.framebuffer_size(cols, rows);
        self.rasterizer.resize(width, height);
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(KeyEvent {
                        code,
                        kind: KeyEventKind::Press,
                        ..
                    }) => self.handle_key(code),
                    Event::Resize(cols, rows) => {
                        self.fit_to_terminal(cols, rows);
                        execute!(stdout(), terminal::Clear(ClearType::All))?;
                    }
                    _ => {}
                }
            }

            if self.spinning {
                self.object.transform.rotation.rotate(SPIN.0, SPIN.1, 0.0);
            }
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Applies one key press to the scene or the render settings.
    pub fn handle_key(&mut self, code: KeyCode) {
        let rotation = &mut self.object.transform.rotation;
        let settings = &mut self.rasterizer.settings;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => rotation.rotate(ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => rotation.rotate(-ROTATE_STEP, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => rotation.rotate(0.0, -ROTATE_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => rotation.rotate(0.0, ROTATE_STEP, 0.0),
            KeyCode::Char('e') => rotation.rotate(0.0, 0.0, ROTATE_STEP),
            KeyCode::Char('r') => rotation.rotate(0.0, 0.0, -ROTATE_STEP),
            KeyCode::Char(' ') => self.spinning = !self.spinning,
            KeyCode::Char('l') => settings.lighting = !settings.lighting,
            KeyCode::Char('t') => settings.texture = !settings.texture,
            KeyCode::Char('m') => {
                settings.sampling = match settings.sampling {
                    TextureSampling::Clamp => TextureSampling::Wrap,
                    TextureSampling::Wrap => TextureSampling::Clamp,
                }
            }
            _ => {}
        }
    }

    fn status_line(&self) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" };
        format!(
            "meshview | FPS: {:.1} | light[l]: {} | texture[t]: {} | WASD/Arrows=Rotate E/R=Roll Space=Spin Q=Quit",
            self.fps,
            on_off(self.rasterizer.settings.lighting),
            on_off(self.rasterizer.settings.texture),
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.rasterizer
            .render_scene(std::slice::from_ref(&self.object), &self.textures);

        let mut stdout = stdout();
        self.presenter
            .draw(self.rasterizer.color_buffer(), &mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()
    }
}
