//! Error types
//!
//! Each concern gets its own error enum. Geometry and shader errors are fatal
//! for the thing being built; texture errors are recovered by the caller with
//! a default texture; initialization errors terminate the application.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while generating procedural meshes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// A shape parameter is outside its valid range (zero facet count,
    /// non-positive or non-finite dimension).
    #[error("invalid {shape} parameter `{name}`: {value}")]
    InvalidParameter {
        shape: &'static str,
        name: &'static str,
        value: String,
    },
}

impl GeometryError {
    pub(crate) fn invalid(shape: &'static str, name: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            shape,
            name,
            value: value.to_string(),
        }
    }
}

/// Errors raised while loading texture images.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {path} has zero size")]
    Empty { path: PathBuf },
}

/// Errors raised by the windowing and GPU layers.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("shader '{name}' failed to compile: {message}")]
    ShaderCompile { name: String, message: String },

    #[error("pipeline '{name}' could not be created: {message}")]
    Pipeline { name: String, message: String },

    #[error("mesh '{label}' has no {what} to upload")]
    EmptyMesh { label: String, what: &'static str },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl RenderError {
    /// Whether this error belongs to window/GPU bring-up.
    pub fn is_initialization_failure(&self) -> bool {
        matches!(
            self,
            RenderError::EventLoop(_)
                | RenderError::Window(_)
                | RenderError::Surface(_)
                | RenderError::Adapter(_)
                | RenderError::Device(_)
                | RenderError::NoSurfaceFormat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_message() {
        let err = GeometryError::invalid("cylinder", "slices", 0);
        assert_eq!(err.to_string(), "invalid cylinder parameter `slices`: 0");
    }

    #[test]
    fn test_initialization_classification() {
        assert!(RenderError::NoSurfaceFormat.is_initialization_failure());
        let shader = RenderError::ShaderCompile {
            name: "scene".into(),
            message: "bad token".into(),
        };
        assert!(!shader.is_initialization_failure());
    }
}
