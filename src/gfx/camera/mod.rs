pub mod camera_controller;
pub mod camera_utils;
pub mod fly_camera;

pub use camera_controller::{CameraController, ControllerAction};
pub use camera_utils::{Projection, ProjectionMode, OPENGL_TO_WGPU_MATRIX};
pub use fly_camera::{FlyCamera, Movement, SensitivityChange};
