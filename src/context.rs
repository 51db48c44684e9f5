//! The GPU context shared by the render loop and the active sample.

use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{CameraResources, Projection},
    data_structures::texture,
    error::SampleError,
    shader::log_uncaptured_errors,
};

/// Format of the offscreen colour target. Pixels read back as RGBA8.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Everything a sample may use from the GPU.
///
/// The context does not own a surface. The render loop keeps the window and
/// its surface and configures them from `config`; an offscreen context uses
/// the same configuration to describe its colour target.
#[derive(Debug)]
pub struct Context {
    pub(crate) depth_texture: texture::Texture,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub clear_colour: wgpu::Color,
    pub adapter_info: wgpu::AdapterInfo,
    pub downlevel: wgpu::DownlevelCapabilities,
}

impl Context {
    /// Context for a window, returned with the window's surface.
    pub async fn new(window: Arc<Window>) -> anyhow::Result<(Self, wgpu::Surface<'static>)> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| SampleError::Adapter)?;
        log_adapter(&adapter.get_info(), &adapter.get_downlevel_capabilities());

        let (device, queue) = request_device(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are written as-is, without an sRGB encode on store.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "surface {:?} at {}x{}",
            config.format,
            config.width,
            config.height
        );

        Ok((Self::with_device(&adapter, device, queue, config), surface))
    }

    /// Context rendering into a `width` x `height` [`OFFSCREEN_FORMAT`] target.
    pub async fn offscreen(width: u32, height: u32) -> anyhow::Result<Self> {
        let (adapter, device, queue) = headless().await?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: OFFSCREEN_FORMAT,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("offscreen target at {}x{}", config.width, config.height);
        Ok(Self::with_device(&adapter, device, queue, config))
    }

    fn with_device(
        adapter: &wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        let camera = CameraResources::new(&device);
        let projection =
            Projection::new(config.width, config.height, cgmath::Deg(45.0), 0.1, 100.0);
        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Self {
            depth_texture,
            device,
            queue,
            config,
            camera,
            projection,
            clear_colour: wgpu::Color::BLACK,
            adapter_info: adapter.get_info(),
            downlevel: adapter.get_downlevel_capabilities(),
        }
    }

    /// Resizes the target description, projection and depth buffer.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.projection.resize(width, height);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [width, height],
            "depth_texture",
        );
    }
}

/// Opens a device with every limit the adapter offers.
///
/// The adapter's own limits are requested so that downlevel adapters without
/// compute support still produce a device.
pub async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("render-samples device"),
            required_features: wgpu::Features::empty(),
            required_limits: adapter.limits(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")?;
    log_uncaptured_errors(&device);
    Ok((device, queue))
}

/// A device without a window, for offscreen rendering and compute work.
pub async fn headless() -> anyhow::Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|_| SampleError::Adapter)?;
    log_adapter(&adapter.get_info(), &adapter.get_downlevel_capabilities());
    let (device, queue) = request_device(&adapter).await?;
    Ok((adapter, device, queue))
}

fn log_adapter(info: &wgpu::AdapterInfo, downlevel: &wgpu::DownlevelCapabilities) {
    log::info!("GPU adapter: {} ({:?})", info.name, info.backend);
    log::info!("GPU vendor: {:#06x}, device: {:#06x}", info.vendor, info.device);
    log::info!("GPU driver: {} {}", info.driver, info.driver_info);
    log::info!(
        "compute shaders: {}",
        downlevel
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
    );
}
