use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use orrery_core::{SceneState, SceneUpdateLoop};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::OrreryConfig;
use crate::graphics::GraphicsState;
use crate::scene::{self, SceneBodies};

/// Pixels of touchpad travel counted as one wheel line.
const PIXELS_PER_LINE: f32 = 20.0;

struct Runner {
    config: OrreryConfig,
    asset_root: PathBuf,
    state: SceneState,
    bodies: SceneBodies,
    scene: SceneUpdateLoop,
    window: Option<Arc<Window>>,
    graphics: Option<GraphicsState>,
    /// First fatal error; returned from `run_internal` once the loop exits.
    error: Option<anyhow::Error>,
}

impl Runner {
    fn new(config: OrreryConfig, asset_root: PathBuf) -> anyhow::Result<Self> {
        let (state, bodies) = scene::build_state(&config).context("invalid scene")?;
        Ok(Self {
            config,
            asset_root,
            state,
            bodies,
            scene: SceneUpdateLoop::new(),
            window: None,
            graphics: None,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let win = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(&win.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(win.width, win.height));
        let window = Arc::new(event_loop.create_window(attributes).context("failed to create window")?);

        if win.grab_cursor {
            grab_cursor(&window);
        }

        let mut gfx = pollster::block_on(GraphicsState::new(window.clone(), win.vsync))
            .context("failed to initialise graphics")?;
        scene::load_assets(&mut gfx.renderer, &self.config, &self.bodies, &self.asset_root);

        let (width, height) = gfx.size();
        self.state.input.set_framebuffer_size(width, height);
        self.window = Some(window);
        self.graphics = Some(gfx);
        Ok(())
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let input = &mut self.state.input;
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                input.set_framebuffer_size(size.width, size.height);
                if let Some(gfx) = &mut self.graphics {
                    gfx.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    input.update_key(code, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => input.add_scroll(scroll_lines(delta)),
            WindowEvent::Focused(false) => input.release_all(),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.state.input.add_mouse_motion(dx as f32, dy as f32);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.input.should_close() {
            log::info!("exit requested");
            event_loop.exit();
            return;
        }
        let (Some(gfx), Some(window)) = (&mut self.graphics, &self.window) else {
            return;
        };

        let frame = match gfx.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost; reconfiguring");
                gfx.reconfigure();
                window.request_redraw();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                self.error.get_or_insert(anyhow::anyhow!("GPU out of memory"));
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("{e}; skipping frame");
                window.request_redraw();
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let report = self
            .scene
            .frame(&mut self.state, &mut gfx.renderer.target(&view));
        log::trace!(
            "frame dt={:.4} t={:.2} draws={} running={}",
            report.time.delta,
            report.elapsed,
            report.draw_calls,
            report.running
        );
        frame.present();
        window.request_redraw();
    }
}

/// Hide the cursor and pin it to the window for mouse look.
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

/// Wheel travel in lines; positive scrolls up.
fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

pub(crate) fn run_internal(config: OrreryConfig, asset_root: PathBuf) -> anyhow::Result<()> {
    let mut runner = Runner::new(config, asset_root)?;
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    // Poll: render continuously rather than waiting for events.
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut runner).context("event loop failed")?;

    match runner.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn line_and_pixel_scrolls_agree() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let px = MouseScrollDelta::PixelDelta(PhysicalPosition::new(5.0, 40.0));
        assert_eq!(scroll_lines(px), 2.0);
    }

    #[test]
    fn runner_rejects_broken_scene_before_opening_a_window() {
        let mut config = OrreryConfig::default();
        config.earth.orbit.radius = f32::NAN;
        assert!(Runner::new(config, PathBuf::from(".")).is_err());
    }
}
