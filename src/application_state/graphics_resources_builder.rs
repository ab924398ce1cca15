//! # Graphics Resources Builder
//!
//! Creates the window, the WGPU device and queue, and loads the on-disk
//! assets before the engine starts. Initialization runs once, off the
//! `resumed` callback, and hands the finished [`Graphics`] bundle back to the
//! event loop as a user event.

use std::future::Future;
use std::sync::Arc;

use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

/// Path of the scene shader, relative to the working directory.
const SHADER_PATH: &str = "assets/shaders/scene.wgsl";
/// Path of the crate diffuse texture.
const TEXTURE_PATH: &str = "assets/textures/crate.png";

/// Everything the engine needs from the platform, bundled for handoff.
pub struct Graphics {
    /// Handle to the application window.
    pub window: Arc<Window>,
    /// The configured rendering surface.
    pub surface: Surface<'static>,
    /// Surface configuration matching the window size.
    pub surface_config: SurfaceConfiguration,
    /// The GPU device.
    pub device: Device,
    /// The GPU command queue.
    pub queue: Queue,
    /// WGSL source of the scene shader.
    pub shader_file_string: String,
    /// PNG bytes of the crate texture.
    pub texture_bytes: Vec<u8>,
}

/// Creates and initializes all required graphics resources.
///
/// The window and surface are created synchronously; adapter and device
/// acquisition are async and awaited by the caller.
fn create_graphics(event_loop: &ActiveEventLoop) -> impl Future<Output = Graphics> + 'static {
    let window = Arc::new(
        event_loop
            .create_window(Window::default_attributes())
            .expect("failed to create the application window"),
    );

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance
        .create_surface(window.clone())
        .expect("failed to create the rendering surface");

    async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("no suitable GPU adapter found");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("failed to acquire a GPU device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let shader_file_string = std::fs::read_to_string(SHADER_PATH)
            .unwrap_or_else(|e| panic!("failed to read {SHADER_PATH}: {e}"));
        let texture_bytes = std::fs::read(TEXTURE_PATH)
            .unwrap_or_else(|e| panic!("failed to read {TEXTURE_PATH}: {e}"));

        Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            shader_file_string,
            texture_bytes,
        }
    }
}

/// One-shot driver of graphics initialization.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<Graphics>>,
}

/// State of the graphics handoff: not yet built, or already consumed by the
/// engine.
pub enum MaybeGraphics {
    /// Waiting for `resumed` to trigger initialization.
    Builder(GraphicsBuilder),
    /// Resources were built and moved into the engine.
    Moved,
}

impl GraphicsBuilder {
    /// Creates a builder that will deliver its result through the proxy.
    pub fn new(event_loop_proxy: EventLoopProxy<Graphics>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Builds the graphics resources and sends them as a user event.
    ///
    /// Subsequent calls are no-ops; `resumed` can fire more than once but the
    /// resources are built exactly once.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            return;
        };

        let gfx = pollster::block_on(create_graphics(event_loop));
        assert!(event_loop_proxy.send_event(gfx).is_ok());
    }
}
