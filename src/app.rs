use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    error::RenderError,
    gfx::{camera::ControllerAction, rendering::RenderEngine, scene::Scene},
    time::FrameClock,
};

/// The tabletop viewer application.
pub struct TabletopApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    clock: FrameClock,
    cursor_captured: bool,
    /// First fatal error; stops the event loop.
    error: Option<RenderError>,
}

impl TabletopApp {
    /// Builds the scene and the event loop. No window exists until the loop
    /// starts running.
    pub fn new(config: AppConfig) -> Result<Self, RenderError> {
        let event_loop = EventLoop::new()?;
        let scene = Scene::tabletop(&config)?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                clock: FrameClock::new(),
                cursor_captured: false,
                error: None,
            },
        })
    }

    /// Runs until the window is closed. Returns the error that stopped the
    /// loop, if any.
    pub fn run(mut self) -> Result<(), RenderError> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Builds the app from `config` and runs it to completion.
pub fn run(config: AppConfig) -> Result<(), RenderError> {
    TabletopApp::new(config)?.run()
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RenderError) {
        log::error!("{error}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let window_config = &self.config.window;
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(window_config.title.clone())
                .with_inner_size(PhysicalSize::new(window_config.width, window_config.height)),
        )?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let vsync = window_config.vsync;

        let mut renderer = pollster::block_on(RenderEngine::new(window_handle.clone(), width, height, vsync))?;
        renderer.prepare_scene(&mut self.scene)?;
        self.scene.resize(width, height);

        self.render_engine = Some(renderer);
        self.capture_cursor(true);
        self.clock.reset();
        Ok(())
    }

    /// Hides and grabs the cursor for mouse look, or gives it back.
    fn capture_cursor(&mut self, capture: bool) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if capture {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                log::warn!("cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
            self.scene.controller.activate();
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::debug!("cursor release failed: {e}");
            }
            window.set_cursor_visible(true);
            self.scene.controller.release_all();
        }
        self.cursor_captured = capture;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let frame = self.clock.tick();
        log::trace!("frame {} dt {:.4}s", frame.frame_index, frame.dt);
        render_engine.update(&mut self.scene, frame.dt);

        if let Err(e) = render_engine.render_frame(&self.scene) {
            self.fail(event_loop, e);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_graphics(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.render_engine.is_none() {
            return;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                match self.scene.controller.process_keyboard(&event) {
                    ControllerAction::ToggleProjection => {
                        self.scene.projection.toggle();
                    }
                    ControllerAction::CloseRequested => event_loop.exit(),
                    ControllerAction::None => (),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scene
                    .controller
                    .process_scroll(&delta, &mut self.scene.camera);
            }
            WindowEvent::Focused(focused) => {
                self.capture_cursor(focused);
                if focused {
                    self.clock.reset();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if !self.cursor_captured {
            return;
        }

        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.scene
                .controller
                .process_mouse_motion(dx, dy, &mut self.scene.camera);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
