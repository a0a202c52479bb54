use std::sync::Arc;

use thiserror::Error;

/// Adapter, device and queue opened for one renderer.
///
/// `Device` and `Queue` are `Arc`-wrapped so the window surface owner and
/// the renderer can both hold them.
pub struct EngineContext {
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("no suitable GPU adapter found")]
    AdapterUnavailable,
    #[error("device request failed: {0}")]
    DeviceRequest(String),
    #[error("window surface unusable: {0}")]
    Surface(String),
}

impl EngineContext {
    /// Context with no surface, for offscreen rendering and tests.
    pub async fn headless() -> Result<Self, ContextError> {
        Self::open(&instance(), None).await
    }

    /// Create a surface for `target` and open a device on an adapter that
    /// can present to it.
    pub async fn for_surface(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
    ) -> Result<(Self, wgpu::Surface<'static>), ContextError> {
        let instance = instance();
        let surface = instance
            .create_surface(target)
            .map_err(|e| ContextError::Surface(e.to_string()))?;
        let context = Self::open(&instance, Some(&surface)).await?;
        Ok((context, surface))
    }

    /// The sRGB format the surface supports, else its first format.
    pub fn surface_format(&self, surface: &wgpu::Surface<'_>) -> Result<wgpu::TextureFormat, ContextError> {
        let caps = surface.get_capabilities(&self.adapter);
        pick_format(&caps.formats).ok_or_else(|| ContextError::Surface("no supported formats".into()))
    }

    async fn open(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, ContextError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ContextError::AdapterUnavailable)?;

        let info = adapter.get_info();
        log::info!("selected adapter: {} ({:?})", info.name, info.backend);

        // the scene needs nothing past downlevel limits
        let limits = wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Orrery Device"),
                    required_limits: limits,
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| ContextError::DeviceRequest(e.to_string()))?;

        Ok(Self {
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }
}

fn instance() -> wgpu::Instance {
    wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

fn pick_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}
