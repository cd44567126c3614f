//! Tabletop
//!
//! An interactive tabletop scene rendered with wgpu and winit: procedurally
//! generated primitives, a free-fly camera, and Phong lighting with a
//! flickering candle.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod logging;
pub mod time;
pub mod wgpu_utils;

pub use app::TabletopApp;
pub use config::AppConfig;
pub use error::{GeometryError, RenderError, TextureError};
