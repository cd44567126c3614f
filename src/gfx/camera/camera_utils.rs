use cgmath::{ortho, perspective, Matrix4};

use crate::config::ProjectionConfig;

/// Maps OpenGL clip space depth (-1..1) to wgpu's (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }
}

/// Projection state: the active mode plus the viewport aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    mode: ProjectionMode,
    aspect: f32,
    config: ProjectionConfig,
}

impl Projection {
    pub fn new(config: ProjectionConfig, width: u32, height: u32) -> Self {
        let mut projection = Self {
            mode: ProjectionMode::Perspective,
            aspect: 1.0,
            config,
        };
        projection.resize(width, height);
        projection
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn toggle(&mut self) -> ProjectionMode {
        self.mode = self.mode.toggled();
        log::info!("projection switched to {:?}", self.mode);
        self.mode
    }

    /// Zero-sized (minimized) windows keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Clip-space projection for the active mode, already in wgpu depth range.
    pub fn matrix(&self) -> Matrix4<f32> {
        let c = &self.config;
        let proj = match self.mode {
            ProjectionMode::Perspective => perspective(c.fovy, self.aspect, c.znear, c.zfar),
            ProjectionMode::Orthographic => {
                let half_h = c.ortho_half_extent;
                let half_w = half_h * self.aspect;
                ortho(-half_w, half_w, -half_h, half_h, c.znear, c.zfar)
            }
        };
        OPENGL_TO_WGPU_MATRIX * proj
    }
}
