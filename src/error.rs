//! Error types for the galaxy viewer.
//!
//! Generation itself cannot fail; everything here comes from parameter
//! validation, color parsing, or bringing up the window and GPU.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("Surface has no supported texture formats")]
    NoSurfaceFormat,
}

/// A color string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color `{0}` must have 3 or 6 hex digits")]
    Length(String),
    #[error("color `{0}` contains a non-hex digit")]
    Digit(String),
}

/// A parameter set that the generator cannot work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("branch count must be at least 1")]
    ZeroBranches,
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("randomness power must be >= 0, got {0}")]
    NegativePower(f32),
}

/// Errors that can occur when running the viewer.
#[derive(Debug, Error)]
pub enum GalaxyError {
    /// Failed to create event loop.
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The configured parameters were rejected before start.
    #[error("Invalid galaxy parameters: {0}")]
    Params(#[from] ParamError),
}
