mod pad;

use anyhow::Result;
use clap::Parser;
use pad::{PadReading, PadSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use strikewing_common::FlightMode;
use strikewing_content::{Catalog, Garage};
use strikewing_input::{GamepadProfile, InputSample, KeyboardSticks, PointerSticks};
use strikewing_kernel::{World, WorldEvent};
use strikewing_render::{DisplaySize, Renderer};
use strikewing_render_wgpu::WgpuBackend;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Longest simulated step; longer stalls are not caught up.
const MAX_DT: f64 = 0.033;

/// Pointer id used for the mouse, outside the range of touch ids.
const MOUSE_POINTER: u64 = u64::MAX;

#[derive(Parser)]
#[command(name = "strikewing-desktop", about = "FPV drone combat, desktop build")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Drone id to fly
    #[arg(long)]
    drone: Option<String>,

    /// Map id to fly on
    #[arg(long)]
    map: Option<String>,

    /// Flight mode: acro or angle (defaults to the saved mode)
    #[arg(long)]
    mode: Option<FlightMode>,

    /// Directory with content table overrides
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Override the saved coin balance
    #[arg(long)]
    coins: Option<u64>,

    /// Own every drone and map
    #[arg(long)]
    unlock_all: bool,

    /// Garage save file, loaded at start and written on exit
    #[arg(long, default_value = "strikewing_save.json")]
    save_file: PathBuf,

    /// Gamepad profile name
    #[arg(long, default_value = "PS4 DualShock (standard)")]
    gamepad_profile: String,
}

/// Simulation side of the app: everything except the window and GPU.
struct Session {
    world: World,
    garage: Garage,
    save_path: Option<PathBuf>,
    keys: KeyboardSticks,
    pointer: PointerSticks,
    cursor: PhysicalPosition<f64>,
    profile: GamepadProfile,
    pad: Option<PadReading>,
    paused: bool,
    pause_held: bool,
    last_frame: Instant,
    title: String,
}

impl Session {
    fn new(world: World, garage: Garage, profile: GamepadProfile) -> Self {
        Self {
            world,
            garage,
            save_path: None,
            keys: KeyboardSticks::default(),
            pointer: PointerSticks::default(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            profile,
            pad: None,
            paused: false,
            pause_held: false,
            last_frame: Instant::now(),
            title: String::new(),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let k = &mut self.keys;
        match key {
            KeyCode::KeyW => k.throttle_up = pressed,
            KeyCode::KeyS => k.throttle_down = pressed,
            KeyCode::KeyA => k.yaw_left = pressed,
            KeyCode::KeyD => k.yaw_right = pressed,
            KeyCode::ArrowUp => k.pitch_forward = pressed,
            KeyCode::ArrowDown => k.pitch_back = pressed,
            KeyCode::ArrowLeft => k.roll_left = pressed,
            KeyCode::ArrowRight => k.roll_right = pressed,
            KeyCode::Space => k.fire = pressed,
            KeyCode::Escape | KeyCode::KeyP => k.pause = pressed,
            _ => {}
        }
    }

    fn handle_touch(&mut self, touch: Touch) {
        let Touch {
            id, phase, location, ..
        } = touch;
        match phase {
            TouchPhase::Started => {
                self.pointer.press(id, location.x, location.y);
            }
            TouchPhase::Moved => self.pointer.moved(id, location.x, location.y),
            TouchPhase::Ended | TouchPhase::Cancelled => self.pointer.release(id),
        }
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        self.pointer.moved(MOUSE_POINTER, position.x, position.y);
    }

    /// The left mouse button drags a stick like a touch does.
    fn handle_mouse(&mut self, button: MouseButton, pressed: bool) {
        if button != MouseButton::Left {
            return;
        }
        if pressed {
            self.pointer.press(MOUSE_POINTER, self.cursor.x, self.cursor.y);
        } else {
            self.pointer.release(MOUSE_POINTER);
        }
    }

    /// Pointer sticks, then held keys on top, then the gamepad fills any
    /// stick neither of them owns.
    fn input(&self) -> InputSample {
        let direct = self.pointer.to_sample().overlay(self.keys.to_sample());
        match &self.pad {
            Some(pad) => self.profile.merge(direct, &pad.axes, &pad.buttons),
            None => direct,
        }
    }

    /// Advance the simulation by the wall-clock time since the last frame.
    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f64().min(MAX_DT);
        self.last_frame = now;

        let input = self.input();
        if input.pause && !self.pause_held {
            self.paused = !self.paused;
            tracing::info!(paused = self.paused, "pause toggled");
        }
        self.pause_held = input.pause;
        if self.paused {
            return;
        }

        self.world.step(dt, &input);
        for event in self.world.drain_events() {
            match event {
                WorldEvent::EnemyKilled { kind, reward, .. } => {
                    tracing::info!(%kind, reward, coins = self.world.coins, "enemy down");
                }
                WorldEvent::WaveSpawned { tier, count } => {
                    tracing::info!(tier, count, "wave incoming");
                }
                other => tracing::debug!(?other, "world event"),
            }
        }
    }

    fn hud(&self) -> String {
        let mut title = format!(
            "Strikewing | {} | {} | {} coins",
            self.world.drone.name,
            self.world.mode.as_str().to_uppercase(),
            self.world.coins
        );
        if self.paused {
            title.push_str(" | PAUSED");
        }
        title
    }

    fn finish(&mut self) {
        self.garage.settle(&self.world);
        tracing::info!(coins = self.garage.coins, "session ended");
        if let Some(path) = &self.save_path {
            if let Err(e) = self.garage.save(path) {
                tracing::error!(error = %e, "failed to save garage");
            }
        }
    }
}

struct GpuApp {
    session: Session,
    pads: Option<PadSource>,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer<WgpuBackend>>,
    error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(session: Session) -> Self {
        Self {
            session,
            pads: PadSource::new(),
            window: None,
            renderer: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Strikewing")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();
        self.session
            .pointer
            .resize(f64::from(size.width), f64::from(size.height));

        let backend = WgpuBackend::new(window.clone(), size.width, size.height)?;
        self.renderer = Some(Renderer::new(backend)?);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e.context("graphics initialisation failed"));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.session.finish();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.session
                    .pointer
                    .resize(f64::from(size.width), f64::from(size.height));
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Focused(false) => self.session.pointer.release_all(),
            WindowEvent::Touch(touch) => self.session.handle_touch(touch),
            WindowEvent::CursorMoved { position, .. } => self.session.handle_cursor(position),
            WindowEvent::MouseInput { state, button, .. } => {
                self.session
                    .handle_mouse(button, state == ElementState::Pressed);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                self.session.handle_key(key, state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                self.session.pad = self.pads.as_mut().and_then(PadSource::poll);
                self.session.update();

                let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer) else {
                    return;
                };

                let title = self.session.hud();
                if title != self.session.title {
                    window.set_title(&title);
                    self.session.title = title;
                }

                let scale_factor = window.scale_factor();
                let logical: LogicalSize<u32> = window.inner_size().to_logical(scale_factor);
                let display = DisplaySize::new(logical.width, logical.height, scale_factor);
                if let Err(e) = renderer.frame(&self.session.world, display) {
                    self.fail(event_loop, e.into());
                    return;
                }
                window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn start_session(cli: &Cli) -> Result<(World, Garage)> {
    let catalog = match &cli.content_dir {
        Some(dir) => Catalog::load(dir)?,
        None => Catalog::bundled()?,
    };

    let mut garage = Garage::load(&cli.save_file);
    if let Some(coins) = cli.coins {
        garage.coins = coins;
    }
    if let Some(mode) = cli.mode {
        garage.mode = mode;
    }
    if cli.unlock_all {
        garage.unlock_all(&catalog);
    }
    if let Some(id) = &cli.drone {
        garage.select_drone(&catalog, id)?;
    }
    if let Some(id) = &cli.map {
        garage.select_map(&catalog, id)?;
    }
    let world = garage.start_session(&catalog)?;
    Ok((world, garage))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("strikewing-desktop starting");

    let (world, garage) = start_session(&cli)?;
    let profile = GamepadProfile::by_name(&cli.gamepad_profile);
    tracing::info!(profile = %profile.name, "gamepad profile");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut session = Session::new(world, garage, profile);
    session.save_path = Some(cli.save_file.clone());
    let mut app = GpuApp::new(session);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
