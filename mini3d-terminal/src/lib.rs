/// Terminal front-end for the mini3d software renderer.
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use log::{info, warn};
use std::collections::HashMap;
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use mini3d_core::{
    filter::{self, FilterOptions},
    obj, render, Action, CameraController, Color as Rgb, Framebuffer, InputState, Mesh,
    ModelInstance, RenderSettings, Scene, Texture,
};

pub mod renderer;

pub use renderer::TerminalCanvas;

/// ~60 Hz tick, matching the pipeline's fixed-interval driver.
const TICK: Duration = Duration::from_millis(16);
/// Terminals rarely report key releases; a key counts as held while its
/// last press/repeat is younger than this.
const KEY_DECAY: Duration = Duration::from_millis(250);

/// Interactive model viewer driving the whole pipeline once per tick:
/// drain input, update the active camera, rasterize, present.
pub struct TerminalApp {
    instance: ModelInstance,
    marker_mesh: Rc<Mesh>,
    scene: Scene,
    controller: CameraController,
    input: InputState,
    settings: RenderSettings,
    filters: FilterOptions,
    canvas: TerminalCanvas,
    frame: Framebuffer,
    key_seen: HashMap<Action, Instant>,
    last_mouse: Option<(u16, u16)>,
    export_path: PathBuf,
    running: bool,
    last_tick: Instant,
    fps_window: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let canvas = TerminalCanvas::new(cols as usize, rows as usize);
        let (fw, fh) = canvas.frame_size();
        let frame = Framebuffer::new(fw.max(2), fh.max(2))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        Ok(Self {
            instance: ModelInstance::new(Rc::new(mesh)),
            marker_mesh: Rc::new(Mesh::cube(0.6)),
            scene: Scene::new(),
            controller: CameraController::new(),
            input: InputState::new(),
            settings: RenderSettings::default(),
            filters: FilterOptions::new(),
            canvas,
            frame,
            key_seen: HashMap::new(),
            last_mouse: None,
            export_path: PathBuf::from("export.obj"),
            running: true,
            last_tick: Instant::now(),
            fps_window: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.last_tick = Instant::now();

        while self.running {
            let tick_start = Instant::now();

            // Drain every queued event before updating.
            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(cols, rows) => self.handle_resize(cols, rows),
                    _ => {}
                }
            }

            let dt = self.last_tick.elapsed().as_secs_f64();
            self.last_tick = Instant::now();
            self.update(dt);
            self.present()?;

            self.frame_count += 1;
            let spent = tick_start.elapsed();
            if spent < TICK {
                std::thread::sleep(TICK - spent);
            }
            if self.fps_window.elapsed().as_secs() >= 1 {
                self.fps = self.frame_count as f32 / self.fps_window.elapsed().as_secs_f32();
                self.frame_count = 0;
                self.fps_window = Instant::now();
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            if let Some(action) = key_action(key.code) {
                self.key_seen.remove(&action);
            }
            return;
        }

        let fast = key.modifiers.contains(KeyModifiers::SHIFT);
        self.input.set_action(Action::Fast, fast);

        if let Some(action) = key_action(key.code) {
            self.key_seen.insert(action, Instant::now());
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Char('1') => self.settings.draw_wireframe = !self.settings.draw_wireframe,
            KeyCode::Char('2') => self.settings.use_lighting = !self.settings.use_lighting,
            KeyCode::Char('3') => {
                self.settings.use_texture = !self.settings.use_texture;
                if self.settings.use_texture && self.settings.texture.is_none() {
                    self.settings.texture = Some(Texture::checkerboard(
                        64,
                        64,
                        8,
                        Rgb::new(220, 220, 220),
                        Rgb::new(90, 90, 120),
                    ));
                }
            }
            KeyCode::Char('g') => self.filters.grayscale = !self.filters.grayscale,
            KeyCode::Char('v') => self.filters.edge_detect = !self.filters.edge_detect,
            KeyCode::Char('n') => {
                let camera = self.scene.active_camera().clone();
                self.scene.add_camera(camera);
                self.scene.set_active(self.scene.camera_count() - 1);
            }
            KeyCode::Tab => {
                let next = (self.scene.active_index() + 1) % self.scene.camera_count();
                self.scene.set_active(next);
            }
            KeyCode::Char('x') => self.scene.remove_camera(self.scene.active_index()),
            KeyCode::Char('o') => {
                let baked = self.instance.baked_mesh();
                match obj::save(&baked, &self.export_path) {
                    Ok(()) => info!("exported model to {}", self.export_path.display()),
                    Err(e) => warn!("export failed: {e}"),
                }
            }
            KeyCode::Left => self.instance.transform.rotation.y -= 0.1,
            KeyCode::Right => self.instance.transform.rotation.y += 0.1,
            KeyCode::Up => self.instance.transform.rotation.x -= 0.1,
            KeyCode::Down => self.instance.transform.rotation.x += 0.1,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Right) => {
                self.input.set_look_held(true);
                self.last_mouse = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Up(MouseButton::Right) => {
                self.input.set_look_held(false);
                self.last_mouse = None;
            }
            MouseEventKind::Drag(MouseButton::Right) => {
                if let Some((px, py)) = self.last_mouse {
                    let dx = mouse.column as f64 - px as f64;
                    // A cell is two pixels tall; scale vertical travel to
                    // keep look speed isotropic.
                    let dy = (mouse.row as f64 - py as f64) * 2.0;
                    // Cells are coarse, so amplify over raw pixel deltas.
                    self.input.push_mouse_delta(dx * 8.0, dy * 8.0);
                }
                self.last_mouse = Some((mouse.column, mouse.row));
            }
            MouseEventKind::ScrollUp => self.input.push_wheel(-1.0),
            MouseEventKind::ScrollDown => self.input.push_wheel(1.0),
            _ => {}
        }
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) {
        self.canvas.resize(cols as usize, rows as usize);
        let (fw, fh) = self.canvas.frame_size();
        if let Ok(frame) = Framebuffer::new(fw.max(2), fh.max(2)) {
            self.frame = frame;
        }
    }

    fn update(&mut self, dt: f64) {
        // Refresh held keys from the decay window.
        for action in [
            Action::Forward,
            Action::Back,
            Action::StrafeLeft,
            Action::StrafeRight,
            Action::Up,
            Action::Down,
        ] {
            let held = self
                .key_seen
                .get(&action)
                .is_some_and(|seen| seen.elapsed() < KEY_DECAY);
            self.input.set_action(action, held);
        }

        self.controller
            .update(dt, &mut self.input, self.scene.active_camera_mut());
    }

    fn present(&mut self) -> io::Result<()> {
        // Inactive cameras appear as wireframe markers at their positions.
        let active = self.scene.active_index();
        let markers: Vec<ModelInstance> = self
            .scene
            .cameras()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != active)
            .map(|(_, cam)| {
                let mut m = ModelInstance::new(Rc::clone(&self.marker_mesh));
                m.transform.position = cam.position;
                m
            })
            .collect();

        render(
            &mut self.frame,
            Some(&self.instance),
            &markers,
            Some(self.scene.active_camera()),
            &self.settings,
        );

        if self.filters.grayscale || self.filters.edge_detect {
            if let Ok(filtered) = filter::apply(
                self.frame.width(),
                self.frame.height(),
                self.frame.pixels(),
                &self.filters,
            ) {
                self.frame.pixels_mut().copy_from_slice(&filtered);
            }
        }

        let mut out = stdout();
        self.canvas.draw(&self.frame, &mut out)?;

        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "mini3d | FPS {:.1} | cam {}/{} at ({:.1},{:.1},{:.1}) | WASD move, RMB-drag look, 1/2/3 wire/light/tex, n/Tab/x cameras, o export, q quit",
                self.fps,
                self.scene.active_index() + 1,
                self.scene.camera_count(),
                self.scene.active_camera().position.x,
                self.scene.active_camera().position.y,
                self.scene.active_camera().position.z,
            )),
            ResetColor
        )?;

        out.flush()
    }
}

fn key_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::Forward),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Back),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::StrafeLeft),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::StrafeRight),
        KeyCode::Char(' ') => Some(Action::Up),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Down),
        _ => None,
    }
}
