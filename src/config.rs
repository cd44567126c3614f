//! Application configuration
//!
//! Defaults reproduce the reference tabletop setup. A handful of environment
//! variables can override them; there are no command line flags and nothing
//! is persisted.

use std::path::PathBuf;

use cgmath::{Deg, Vector3};

/// Window settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Present with vsync.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Tabletop".to_string(),
            vsync: true,
        }
    }
}

/// Initial camera pose and input tuning.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub position: Vector3<f32>,
    pub up: Vector3<f32>,
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
    pub sensitivity: f32,
    /// Sensitivity change per scroll line.
    pub sensitivity_step: f32,
    pub sensitivity_min: f32,
    pub sensitivity_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 3.0),
            up: Vector3::unit_y(),
            yaw: Deg(-90.0),
            pitch: Deg(0.0),
            sensitivity: 1.0,
            sensitivity_step: 0.1,
            sensitivity_min: 0.1,
            sensitivity_max: 2.0,
        }
    }
}

/// Projection parameters for both projection modes.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionConfig {
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Half the vertical extent of the orthographic view volume.
    pub ortho_half_extent: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 100.0,
            ortho_half_extent: 5.0,
        }
    }
}

/// Candle flicker tuning.
#[derive(Debug, Clone, Copy)]
pub struct FlickerConfig {
    /// Attenuation coefficients are jittered uniformly within `±bound`.
    pub bound: f32,
    /// Fixed seed for reproducible flicker. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for FlickerConfig {
    fn default() -> Self {
        Self {
            bound: 0.15,
            seed: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub flicker: FlickerConfig,
    /// Directory texture files are resolved against.
    pub asset_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            flicker: FlickerConfig::default(),
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl AppConfig {
    /// Defaults with `TABLETOP_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a key lookup. Unparseable values are logged
    /// and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("TABLETOP_FLICKER_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.flicker.seed = Some(seed),
                Err(e) => log::warn!("ignoring TABLETOP_FLICKER_SEED={raw:?}: {e}"),
            }
        }

        if let Some(dir) = lookup("TABLETOP_ASSET_DIR") {
            self.asset_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("TABLETOP_VSYNC") {
            self.window.vsync = !matches!(raw.trim(), "0" | "false" | "off");
        }

        self
    }

    /// Resolves a texture file name against the asset directory.
    pub fn texture_path(&self, file_name: &str) -> PathBuf {
        self.asset_dir.join("textures").join(file_name)
    }
}
