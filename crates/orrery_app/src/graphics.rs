use std::sync::Arc;

use orrery_render::{ContextError, EngineContext, Renderer};
use winit::window::Window;

/// The window surface and the renderer drawing into it.
pub struct GraphicsState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
    device: Arc<wgpu::Device>,
}

impl GraphicsState {
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, ContextError> {
        let size = window.inner_size();
        let (context, surface) = EngineContext::for_surface(window).await?;
        let caps = surface.get_capabilities(&context.adapter);
        let format = context.surface_format(&surface)?;
        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);
        log::info!(
            "surface {}x{} {format:?} {present_mode:?}",
            config.width,
            config.height
        );

        let renderer = Renderer::new(&context, format, config.width, config.height);

        Ok(Self {
            surface,
            config,
            renderer,
            device: context.device,
        })
    }

    /// Reconfigure for a new size.  Zero-sized (minimised) windows are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(width, height);
        }
    }

    /// Reapply the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}
