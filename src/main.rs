use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use raycast_engine::input::{Command, InputState, TurnRates};
use raycast_engine::renderer::{self, Viewport};
use raycast_engine::scaler::{ScaleLut, blit_nearest};
use raycast_engine::{Camera, EngineConfig, FrameConfig, World, WorldBounds, cast_fan};

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    world: World,
    camera: Camera,
    frame: FrameConfig,
    bounds: WorldBounds,
    turn: TurnRates,
    game_mode: bool,

    // HUD
    frame_counter: u32,
    frame_time_ms: f32,
    last_fps_print: Instant,

    // Internal buffer at the configured screen size
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    input: InputState,
}

impl App {
    fn new(config: &EngineConfig) -> Self {
        let [w, h] = config.screen();
        let (fb_w, fb_h) = (w as usize, h as usize);
        Self {
            window: None,
            surface: None,
            world: config.world(),
            camera: config.camera(),
            frame: config.frame_config(),
            bounds: config.bounds(),
            turn: config.turn_rates(),
            game_mode: config.game_mode,

            frame_counter: 0,
            frame_time_ms: 0.0,
            last_fps_print: Instant::now(),

            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            scale_lut: ScaleLut::empty(),

            input: InputState::new(),
        }
    }

    fn command_for(code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::KeyW => Some(Command::Forward),
            KeyCode::KeyS => Some(Command::Backward),
            KeyCode::KeyA => Some(Command::StrafeLeft),
            KeyCode::KeyD => Some(Command::StrafeRight),
            KeyCode::KeyQ => Some(Command::TurnLeft),
            KeyCode::KeyE => Some(Command::TurnRight),
            _ => None,
        }
    }

    fn grab_cursor(window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(e) = grabbed {
            tracing::warn!(error = %e, "cursor grab unavailable");
        }
        window.set_cursor_visible(false);
    }

    /// Casts, projects and rasterises one frame into the internal buffer.
    fn draw(&mut self) -> raycast_engine::Result<()> {
        let hits = cast_fan(&self.camera, &self.world, &self.frame)?;
        let columns = self.frame.projector.project(hits.iter().copied(), &self.camera)?;

        renderer::clear(&mut self.fb, self.fb_w, [0, 0, 0]);
        let view = if self.game_mode {
            Viewport { x0: 0, x1: self.fb_w }
        } else {
            Viewport {
                x0: self.fb_w / 2,
                x1: self.fb_w,
            }
        };
        renderer::draw_columns(&mut self.fb, self.fb_w, view, &columns);
        if !self.game_mode {
            renderer::draw_overhead(
                &mut self.fb,
                self.fb_w,
                &self.world,
                &self.camera,
                &hits,
                self.fb_w / 2,
            );
        }
        Ok(())
    }

    fn present(&mut self, id: WindowId) {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return,
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return; // Minimized window, skip drawing
        };

        if let Err(e) = surface.resize(dw, dh) {
            tracing::warn!(error = %e, "surface resize failed");
            return;
        }
        if self.scale_lut.dst_size() != (dw.get() as usize, dh.get() as usize) {
            self.scale_lut = ScaleLut::new(dw.get() as usize, dh.get() as usize, self.fb_w, self.fb_h);
        }

        match surface.buffer_mut() {
            Ok(mut buf) => {
                blit_nearest(&mut buf, dw.get() as usize, &self.fb, self.fb_w, &self.scale_lut);
                if let Err(e) = buf.present() {
                    tracing::warn!(error = %e, "present failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "surface buffer unavailable"),
        }
    }

    fn report_fps(&mut self, frame_start: Instant) {
        self.frame_time_ms = frame_start.elapsed().as_secs_f32() * 1000.0;
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_counter as f32 / elapsed;
            tracing::info!(
                fps,
                frame_ms = self.frame_time_ms,
                angle = self.camera.angle,
                "frame stats"
            );
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("Raycaster")
            .with_inner_size(PhysicalSize::new(self.fb_w as u32, self.fb_h as u32));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                tracing::error!(error = %e, "could not create window");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(s) => self.surface = Some(s),
            Err(e) => {
                tracing::error!(error = %e, "could not create drawing surface");
                event_loop.exit();
                return;
            }
        }

        if self.game_mode {
            Self::grab_cursor(&window);
        }
        tracing::info!(
            width = self.fb_w,
            height = self.fb_h,
            game_mode = self.game_mode,
            rays = self.camera.ray_count(),
            "window created"
        );

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                if let Some(command) = Self::command_for(code) {
                    match state {
                        ElementState::Pressed => self.input.press(command),
                        ElementState::Released => self.input.release(command),
                    }
                }
            }

            WindowEvent::Focused(false) => self.input.clear(),

            WindowEvent::RedrawRequested => {
                let frame_start = Instant::now();
                self.input.apply(&mut self.camera, self.turn, &self.bounds);

                if let Err(e) = self.draw() {
                    tracing::error!(error = %e, "frame failed");
                    event_loop.exit();
                    return;
                }
                self.present(id);
                self.report_fps(frame_start);

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::Resized(_) => {
                // LUT is rebuilt lazily on the next present.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, _) } = event {
            if self.game_mode {
                self.input.add_pointer_motion(dx);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1);
    let config = match EngineConfig::load_or_default(path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "bad config");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, "could not create event loop");
            std::process::exit(1);
        }
    };

    // Frames are paced by redraw requests.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&config);
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!(error = %e, "event loop terminated");
    }
}
