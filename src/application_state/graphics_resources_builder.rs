//! # Graphics Resources Builder
//!
//! This module handles the creation of the window and the WebGPU resources the
//! frame painter draws with.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Builds them once the event loop is running
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::sync::Arc;

use log::{error, info};
use thiserror::Error;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::LogicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

/// Title of the game window.
const WINDOW_TITLE: &str = "Voxel Frontier";
/// Initial window size in logical pixels.
const WINDOW_SIZE: (f64, f64) = (1280.0, 720.0);

/// Failures while setting up the window and the GPU.
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// The window could not be created.
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    /// The window could not be turned into a render surface.
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    /// The adapter refused to open a device.
    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface supports no texture formats on this adapter")]
    UnsupportedSurface,
}

/// Contains all graphics-related resources required by the application.
///
/// Created once the event loop is running and handed to the engine, which
/// takes ownership of the surface, device and queue.
pub struct Graphics {
    /// The game window
    pub window: Arc<Window>,
    /// The window's render surface, already configured
    pub surface: Surface<'static>,
    /// Size and format the surface was configured with
    pub surface_config: SurfaceConfiguration,
    /// The logical GPU device
    pub device: Device,
    /// The device's command queue
    pub queue: Queue,
}

/// Result delivered to the event loop once initialization finishes.
pub type GraphicsResult = Result<Graphics, GraphicsError>;

/// Creates the window and initializes all required graphics resources.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window and surface
///
/// # Returns
/// The initialized `Graphics`, or the step that failed.
fn create_graphics(event_loop: &ActiveEventLoop) -> GraphicsResult {
    let window_attrs = Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1));
    let window = Arc::new(event_loop.create_window(window_attrs)?);

    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone())?;

    pollster::block_on(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                label: Some("Voxel Frontier Device"),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GraphicsError::UnsupportedSurface)?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
        })
    })
}

/// Helper struct for building the graphics resources once the event loop
/// is running.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// Waiting for the event loop to resume
    Builder(GraphicsBuilder),

    /// Resources are ready but not yet handed to the engine
    Graphics(Graphics),

    /// Resources have been moved into the running application
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the event loop
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Builds the graphics resources and sends the result to the event loop.
    ///
    /// Only the first call does anything.
    ///
    /// # Arguments
    /// * `event_loop` - The active event loop used to create the window
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            return;
        };

        let result = create_graphics(event_loop);
        if event_loop_proxy.send_event(result).is_err() {
            error!("Event loop closed before graphics were ready");
        }
    }
}
