//! Application loop and the sample lifecycle.
//!
//! A sample is a self-contained renderer. The loop owns the window and the GPU
//! [`Context`], builds exactly one sample and drives it through its lifecycle:
//!
//! 1. the constructor runs once the window exists and may fail; the error is
//!    logged and the app exits
//! 2. `on_init` configures the context (clear colour, camera)
//! 3. `on_resize` follows every surface resize
//! 4. each frame, pending drag deltas go to `on_touch`, then `on_update`,
//!    `on_compute` and `on_render` run in that order
//! 5. dropping the sample releases its GPU resources

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{context::Context, input::TouchDelta, render::Render, samples::SampleKind};

/// A renderer driven by the application loop.
pub trait RenderSample {
    /// Called once after construction. The only place to adjust the context.
    fn on_init(&mut self, ctx: &mut Context) {
        let _ = ctx;
    }

    /// Called after the surface and depth buffer have been resized.
    fn on_resize(&mut self, ctx: &Context, width: u32, height: u32) {
        let _ = (ctx, width, height);
    }

    /// Drag movement accumulated since the previous frame, in pixels.
    fn on_touch(&mut self, dx: f32, dy: f32) {
        let _ = (dx, dy);
    }

    /// Window events not consumed by the loop. Returns true if handled.
    fn on_window_events(&mut self, event: &WindowEvent) -> bool {
        let _ = event;
        false
    }

    /// Per-frame state update, before any GPU work is recorded.
    fn on_update(&mut self, ctx: &mut Context, dt: Duration);

    /// Records work that must run before this frame's render pass.
    fn on_compute(&mut self, ctx: &Context, encoder: &mut wgpu::CommandEncoder) {
        let _ = (ctx, encoder);
    }

    /// What to draw this frame.
    fn on_render<'a>(&'a self, ctx: &'a Context) -> Render<'a>;
}

impl Debug for dyn RenderSample + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RenderSample")
    }
}

pub type SampleFuture<'a> =
    Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn RenderSample>>> + 'a>>;

/// Builds the sample once the context exists.
pub type SampleConstructor = Box<dyn for<'a> FnOnce(&'a Context) -> SampleFuture<'a>>;

/// What the loop should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Reconfigure,
    Skipped,
    Exit,
}

/// Maps a surface error to the loop's response.
pub fn surface_error_outcome(error: &wgpu::SurfaceError) -> FrameOutcome {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => FrameOutcome::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => FrameOutcome::Exit,
        // Timeout and anything the driver reports as Other.
        _ => FrameOutcome::Skipped,
    }
}

/// Records one frame of `sample` into `encoder`, targeting `view`.
///
/// Compute work comes first, then a single render pass that clears colour and
/// depth before encoding the sample's draws.
pub(crate) fn record_frame(
    ctx: &Context,
    sample: &mut dyn RenderSample,
    view: &wgpu::TextureView,
    encoder: &mut wgpu::CommandEncoder,
) {
    sample.on_compute(ctx, encoder);

    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(ctx.clear_colour),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &ctx.depth_texture.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        occlusion_query_set: None,
        timestamp_writes: None,
        multiview_mask: None,
    });

    sample.on_render(ctx).encode(&mut render_pass);
}

/// The window, its surface and the sample drawn into it.
#[derive(Debug)]
pub struct AppState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    pub(crate) ctx: Context,
    sample: Box<dyn RenderSample>,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, constructor: SampleConstructor) -> anyhow::Result<Self> {
        let (mut ctx, surface) = Context::new(window.clone()).await?;
        let mut sample = constructor(&ctx).await?;
        sample.on_init(&mut ctx);
        Ok(Self {
            window,
            surface,
            ctx,
            sample,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.surface.configure(&self.ctx.device, &self.ctx.config);
            self.is_surface_configured = true;
            self.sample.on_resize(&self.ctx, width, height);
        }
    }

    fn update(&mut self, touch: (f32, f32), dt: Duration) {
        if touch != (0.0, 0.0) {
            self.sample.on_touch(touch.0, touch.1);
        }
        self.sample.on_update(&mut self.ctx, dt);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        record_frame(&self.ctx, self.sample.as_mut(), &view, &mut encoder);

        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

/// Renders a sample into a texture instead of a window.
///
/// Frames go through the same [`record_frame`] as the windowed loop and are
/// read back as images, for golden-pixel tests.
#[cfg(feature = "integration-tests")]
#[derive(Debug)]
pub struct Offscreen {
    pub ctx: Context,
    target: wgpu::Texture,
}

#[cfg(feature = "integration-tests")]
impl Offscreen {
    pub async fn new(width: u32, height: u32) -> anyhow::Result<Self> {
        let ctx = Context::offscreen(width, height).await?;
        let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen target"),
            size: wgpu::Extent3d {
                width: ctx.config.width,
                height: ctx.config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.config.format,
            usage: ctx.config.usage,
            view_formats: &[],
        });
        Ok(Self { ctx, target })
    }

    /// Runs the sample's `on_init` and `on_resize` as the windowed loop does.
    pub fn attach(&mut self, sample: &mut dyn RenderSample) {
        sample.on_init(&mut self.ctx);
        sample.on_resize(&self.ctx, self.ctx.config.width, self.ctx.config.height);
    }

    /// Updates the sample by `dt`, renders one frame and reads it back.
    pub async fn render_frame(
        &mut self,
        sample: &mut dyn RenderSample,
        dt: Duration,
    ) -> anyhow::Result<image::RgbaImage> {
        sample.on_update(&mut self.ctx, dt);

        let view = self
            .target
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Encoder"),
            });
        record_frame(&self.ctx, sample, &view, &mut encoder);
        self.ctx.queue.submit(iter::once(encoder.finish()));

        crate::readback::read_texture(&self.ctx.device, &self.ctx.queue, &self.target).await
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    state: Option<AppState>,
    // Taken on first resume.
    constructor: Option<SampleConstructor>,
    touch: TouchDelta,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
    last_time: Instant,
}

impl App {
    fn new(constructor: SampleConstructor) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            state: None,
            constructor: Some(constructor),
            touch: TouchDelta::new(),
            dragging: false,
            last_cursor: None,
            last_time: Instant::now(),
        })
    }

    fn handle_cursor(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *button_state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.last_cursor) {
                    self.touch
                        .push((position.x - last.x) as f32, (position.y - last.y) as f32);
                }
                self.last_cursor = Some(*position);
            }
            WindowEvent::CursorLeft { .. } => self.last_cursor = None,
            _ => (),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructor) = self.constructor.take() else {
            return;
        };
        let window_attributes = Window::default_attributes().with_title("render-samples");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create a window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self
            .async_runtime
            .block_on(AppState::new(window, constructor))
        {
            Ok(mut state) => {
                let size = state.window.inner_size();
                state.resize(size.width, size.height);
                state.window.request_redraw();
                self.last_time = Instant::now();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("sample initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        self.handle_cursor(&event);
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.sample.on_window_events(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                state.update(self.touch.take(), dt);

                let outcome = match state.render() {
                    Ok(()) => FrameOutcome::Presented,
                    Err(e) => {
                        let outcome = surface_error_outcome(&e);
                        log::warn!("frame not presented ({e}), {outcome:?}");
                        outcome
                    }
                };
                match outcome {
                    FrameOutcome::Presented | FrameOutcome::Skipped => (),
                    FrameOutcome::Reconfigure => {
                        let size = state.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    FrameOutcome::Exit => {
                        log::error!("GPU is out of memory, exiting");
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state.take().is_some() {
            log::info!("sample released");
        }
    }
}

/// Runs the named sample until its window is closed.
pub fn run(kind: SampleKind) -> anyhow::Result<()> {
    run_with(kind.constructor())
}

/// Runs a sample built by `constructor` until its window is closed.
pub fn run_with(constructor: SampleConstructor) -> anyhow::Result<()> {
    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
    {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(constructor)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_surfaces_are_reconfigured() {
        assert_eq!(
            surface_error_outcome(&wgpu::SurfaceError::Lost),
            FrameOutcome::Reconfigure
        );
        assert_eq!(
            surface_error_outcome(&wgpu::SurfaceError::Outdated),
            FrameOutcome::Reconfigure
        );
    }

    #[test]
    fn out_of_memory_exits() {
        assert_eq!(
            surface_error_outcome(&wgpu::SurfaceError::OutOfMemory),
            FrameOutcome::Exit
        );
    }

    #[test]
    fn timeout_and_other_skip_the_frame() {
        assert_eq!(
            surface_error_outcome(&wgpu::SurfaceError::Timeout),
            FrameOutcome::Skipped
        );
        assert_eq!(
            surface_error_outcome(&wgpu::SurfaceError::Other),
            FrameOutcome::Skipped
        );
    }
}
