//! # Graphics Module
//!
//! Everything between shape parameters and pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - procedural plane, cube, cylinder, cone and sphere meshes
//! - **Camera System** ([`camera`]) - free-fly camera, input controller and projection
//! - **Scene Management** ([`scene`]) - placed objects, uploaded meshes, per-frame update
//! - **Resource Management** ([`resources`]) - lights, materials, textures, global uniforms
//! - **Rendering Pipeline** ([`rendering`]) - surface, pipelines and the frame draw
//!
//! ## Usage
//!
//! ```no_run
//! use tabletop::{config::AppConfig, gfx::scene::Scene};
//!
//! // The render engine is created by the app once a window exists
//! // let engine = RenderEngine::new(window, width, height, true).await?;
//! let scene = Scene::tabletop(&AppConfig::default()).unwrap();
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
