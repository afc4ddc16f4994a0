//! # Error Types (`error.rs`)
//!
//! Fatal failures that can occur while bootstrapping the scene. None of these are recoverable: the
//! application logs them, leaves the event loop, and (on desktop) hands the error back to `main`.
//!
//! Runtime conditions such as an out-of-range slider value or a zero-sized resize are *not* errors;
//! they are clamped or ignored where they happen.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop the scene from coming up.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page has no element with the expected id, or it is not a `<canvas>`.
    #[error("mount point `{0}` is missing or is not a canvas element")]
    MountPoint(&'static str),

    /// The platform refused to create a window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// The event loop could not be created or terminated abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// No graphics context could be attached to the window or canvas.
    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No adapter is compatible with the surface.
    #[error("no compatible graphics adapter found")]
    NoAdapter,

    /// The adapter was found but a device could not be opened on it.
    #[error("failed to request graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The surface is compatible with the adapter but advertises no usable configuration.
    #[error("surface reports no supported {0}")]
    UnsupportedSurface(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_point_message_names_the_element() {
        let message = Error::MountPoint("WebGL-output").to_string();
        assert!(message.contains("WebGL-output"));
    }

    #[test]
    fn no_adapter_is_displayable() {
        assert_eq!(
            Error::NoAdapter.to_string(),
            "no compatible graphics adapter found"
        );
    }

    #[test]
    fn unsupported_surface_names_the_missing_capability() {
        assert_eq!(
            Error::UnsupportedSurface("present modes").to_string(),
            "surface reports no supported present modes"
        );
    }
}
