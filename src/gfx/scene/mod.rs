//! # Scene Management Module
//!
//! Placed primitives, the GPU mesh resource, and the scene that owns the
//! viewer and lights.
//!
//! ## Key Components
//!
//! - [`Scene`] - objects, camera, projection and lights, updated once per frame
//! - [`SceneObject`] - a generated primitive with transform and material
//! - [`Mesh`] - uploaded vertex/index buffers of one generated mesh
//! - [`ColorVertex`] / [`TexturedVertex`] - GPU vertex layouts
//!
//! ## Usage
//!
//! ```no_run
//! use tabletop::{config::AppConfig, gfx::scene::Scene};
//!
//! let scene = Scene::tabletop(&AppConfig::default()).unwrap();
//! println!("{:?}", scene.statistics());
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

pub use object::{DrawObject, Mesh, ModelLayout, SceneObject};
pub use scene::{Scene, SceneStatistics};
pub use vertex::{ColorVertex, TexturedVertex};
