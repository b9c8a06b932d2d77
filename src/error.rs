//! Error types for morphfield.
//!
//! Each concern gets its own error enum: image sampling, configuration,
//! GPU setup, per-frame rendering, and the windowed host that ties them
//! together.

use std::fmt;

/// Errors that abort a sampling/reconcile cycle.
///
/// When one of these is returned the particle field is left exactly as it
/// was before the cycle started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    /// The source image has no drawable pixels (not decoded yet, or zero-sized).
    NotDrawable { width: u32, height: u32 },
    /// A raw raster did not match the dimensions it claimed.
    InvalidPixelData { expected: usize, actual: usize },
    /// A slide index outside the loaded slide deck.
    SlideOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::NotDrawable { width, height } => {
                write!(f, "Source image is not drawable ({}x{})", width, height)
            }
            SamplingError::InvalidPixelData { expected, actual } => write!(
                f,
                "Invalid pixel data: expected {} bytes of RGBA, got {}",
                expected, actual
            ),
            SamplingError::SlideOutOfRange { index, len } => {
                write!(f, "Slide {} out of range ({} slides loaded)", index, len)
            }
        }
    }
}

impl std::error::Error for SamplingError {}

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    Io(std::io::Error),
    /// The configuration file is not valid JSON for [`RevealConfig`](crate::RevealConfig).
    Parse(serde_json::Error),
    /// The configuration parsed but its values are unusable.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors returned by a [`RenderBackend`](crate::RenderBackend) for a single frame.
///
/// Only [`RenderError::OutOfMemory`] is fatal to the host; everything else
/// is logged and the next frame is drawn as usual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The surface was lost or outdated and has to be reconfigured.
    SurfaceLost,
    /// The backend ran out of memory.
    OutOfMemory,
    /// Any other per-frame failure.
    Other(String),
}

impl RenderError {
    /// Whether the host should stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::OutOfMemory)
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Render surface lost"),
            RenderError::OutOfMemory => write!(f, "Renderer out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(other.to_string()),
        }
    }
}

/// Errors that can occur when running the windowed reveal.
#[derive(Debug)]
pub enum RevealError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// A slide image could not be decoded.
    Image(image::ImageError),
    /// The configuration is unusable.
    Config(ConfigError),
    /// A fatal error while drawing a frame.
    Render(RenderError),
    /// No slides were provided.
    NoSlides,
}

impl fmt::Display for RevealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RevealError::Window(e) => write!(f, "Failed to create window: {}", e),
            RevealError::Gpu(e) => write!(f, "GPU error: {}", e),
            RevealError::Image(e) => write!(f, "Failed to load slide image: {}", e),
            RevealError::Config(e) => write!(f, "{}", e),
            RevealError::Render(e) => write!(f, "Rendering stopped: {}", e),
            RevealError::NoSlides => write!(f, "No slides provided. Use .with_slide() to add one."),
        }
    }
}

impl std::error::Error for RevealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevealError::EventLoop(e) => Some(e),
            RevealError::Window(e) => Some(e),
            RevealError::Gpu(e) => Some(e),
            RevealError::Image(e) => Some(e),
            RevealError::Config(e) => Some(e),
            RevealError::Render(e) => Some(e),
            RevealError::NoSlides => None,
        }
    }
}

impl From<winit::error::EventLoopError> for RevealError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RevealError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RevealError {
    fn from(e: winit::error::OsError) -> Self {
        RevealError::Window(e)
    }
}

impl From<GpuError> for RevealError {
    fn from(e: GpuError) -> Self {
        RevealError::Gpu(e)
    }
}

impl From<image::ImageError> for RevealError {
    fn from(e: image::ImageError) -> Self {
        RevealError::Image(e)
    }
}

impl From<RenderError> for RevealError {
    fn from(e: RenderError) -> Self {
        RevealError::Render(e)
    }
}

impl From<ConfigError> for RevealError {
    fn from(e: ConfigError) -> Self {
        RevealError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_fatality() {
        assert!(RenderError::OutOfMemory.is_fatal());
        assert!(!RenderError::SurfaceLost.is_fatal());
        assert!(!RenderError::Other("timeout".into()).is_fatal());
    }

    #[test]
    fn test_sampling_error_display() {
        let err = SamplingError::InvalidPixelData { expected: 16, actual: 12 };
        assert_eq!(
            err.to_string(),
            "Invalid pixel data: expected 16 bytes of RGBA, got 12"
        );
    }

    #[test]
    fn test_config_error_source() {
        use std::error::Error;
        let err = ConfigError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(err.source().is_some());
        assert!(ConfigError::Invalid("x".into()).source().is_none());
    }

    #[test]
    fn test_fatal_render_error_surfaces_from_host() {
        use std::error::Error;

        let err: RevealError = RenderError::OutOfMemory.into();
        assert!(matches!(err, RevealError::Render(RenderError::OutOfMemory)));
        assert_eq!(err.to_string(), "Rendering stopped: Renderer out of memory");
        assert!(err.source().is_some());
    }
}
