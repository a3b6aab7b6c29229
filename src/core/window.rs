//! Windowed runner: winit event loop and wgpu presentation

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    monitor::VideoModeHandle,
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::core::app::Application;
use crate::core::config::{Config, WindowMode};
use crate::core::events::AppEvent;
use crate::core::time::FrameLimiter;
use crate::core::{Error, Result};
use crate::renderer::Presenter;

/// Pixels scrolled per wheel line for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f64 = 20.0;

/// Open a window and run `app` until it stops
///
/// Initialises logging unless a logger is set, starts the application and
/// opens the audio output.
///
/// # Errors
///
/// Returns an error if no world was set or the window cannot be created
pub fn run(mut app: Application) -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    app.start()?;
    app.enable_audio();

    let event_loop = EventLoop::new().map_err(|e| Error::Window(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = WindowRunner::new(app);
    event_loop
        .run_app(&mut runner)
        .map_err(|e| Error::Window(e.to_string()))?;

    match runner.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// How the window occupies the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presentation {
    Windowed { resizable: bool },
    Borderless,
    Exclusive,
}

/// Presentation for `mode`; exclusive fullscreen needs a video mode and
/// falls back to borderless without one
fn presentation(mode: WindowMode, has_video_mode: bool) -> Presentation {
    match mode {
        WindowMode::Windowed => Presentation::Windowed { resizable: false },
        WindowMode::Resizable => Presentation::Windowed { resizable: true },
        WindowMode::Borderless => Presentation::Borderless,
        WindowMode::Fullscreen if has_video_mode => Presentation::Exclusive,
        WindowMode::Fullscreen => Presentation::Borderless,
    }
}

/// Largest video mode of the primary monitor, or of the first one found
fn current_video_mode(event_loop: &ActiveEventLoop) -> Option<VideoModeHandle> {
    let monitor = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())?;
    monitor.video_modes().max_by_key(|mode| {
        let size = mode.size();
        (
            u64::from(size.width) * u64::from(size.height),
            mode.refresh_rate_millihertz(),
        )
    })
}

fn window_attributes(
    config: &Config,
    size: (u32, u32),
    video_mode: Option<VideoModeHandle>,
) -> WindowAttributes {
    let mut attrs = Window::default_attributes()
        .with_title(&config.title)
        .with_inner_size(PhysicalSize::new(size.0, size.1));

    if let (Some(x), Some(y)) = (config.window_x, config.window_y) {
        attrs = attrs.with_position(PhysicalPosition::new(x, y));
    }

    match (presentation(config.window_mode, video_mode.is_some()), video_mode) {
        (Presentation::Windowed { resizable }, _) => attrs.with_resizable(resizable),
        (Presentation::Exclusive, Some(video_mode)) => {
            attrs.with_fullscreen(Some(Fullscreen::Exclusive(video_mode)))
        }
        (Presentation::Borderless | Presentation::Exclusive, _) => attrs
            .with_decorations(false)
            .with_fullscreen(Some(Fullscreen::Borderless(None))),
    }
}

fn mouse_button_number(button: MouseButton) -> Option<u8> {
    match button {
        MouseButton::Left => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::Right => Some(3),
        _ => None,
    }
}

struct WindowRunner {
    app: Application,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    limiter: FrameLimiter,
    error: Option<Error>,
}

impl WindowRunner {
    fn new(app: Application) -> Self {
        let limiter = FrameLimiter::new(app.config().frame_interval());
        Self {
            app,
            window: None,
            presenter: None,
            limiter,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.app.update(Instant::now());
        if !self.app.is_running() {
            event_loop.exit();
            return;
        }

        match self.app.compose_frame() {
            Ok(frame) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.present(&frame);
                }
            }
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl ApplicationHandler for WindowRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let video_mode = match self.app.config().window_mode {
            WindowMode::Fullscreen => {
                let mode = current_video_mode(event_loop);
                if mode.is_none() {
                    log::warn!("No video mode for exclusive fullscreen, using borderless");
                }
                mode
            }
            _ => None,
        };
        let attrs = window_attributes(self.app.config(), self.app.window_size(), video_mode);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, Error::Window(e.to_string())),
        };

        match pollster::block_on(Presenter::new(Arc::clone(&window), true)) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(e) => return self.fail(event_loop, e),
        }

        let size = window.inner_size();
        self.app
            .push_event(AppEvent::WindowResized(size.width, size.height));
        self.window = Some(window);
        log::info!("Window opened");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                self.app.push_event(AppEvent::Quit);
                self.app.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    if let Some(presenter) = &mut self.presenter {
                        presenter.resize(new_size.width, new_size.height);
                    }
                    self.app
                        .push_event(AppEvent::WindowResized(new_size.width, new_size.height));
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    let app_event = if event.state.is_pressed() {
                        AppEvent::KeyDown(key_code)
                    } else {
                        AppEvent::KeyUp(key_code)
                    };
                    self.app.push_event(app_event);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(number) = mouse_button_number(button) {
                    let app_event = if state.is_pressed() {
                        AppEvent::MouseDown(number)
                    } else {
                        AppEvent::MouseUp(number)
                    };
                    self.app.push_event(app_event);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.app
                    .push_event(AppEvent::CursorMoved(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorEntered { .. } => self.app.push_event(AppEvent::CursorEntered),
            WindowEvent::CursorLeft { .. } => self.app.push_event(AppEvent::CursorLeft),

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
                };
                self.app.push_event(AppEvent::MouseWheel(lines));
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        if self.limiter.ready(Instant::now()) {
            window.request_redraw();
        }
        match self.limiter.next_frame() {
            Some(next) => event_loop.set_control_flow(ControlFlow::WaitUntil(next)),
            None => event_loop.set_control_flow(ControlFlow::Poll),
        }
    }
}
