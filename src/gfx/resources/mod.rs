//! GPU resource management
//!
//! Lights, materials, textures and the global uniform block.

pub mod global_bindings;
pub mod lighting;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, UniformBinder, UniformValue};
pub use lighting::{DirectionalLight, LightSet, PointLight, RandomSource};
pub use material::{MaterialBinding, MaterialLayout, TextureUnit};
pub use texture_resource::{TextureRegistry, TextureResource};
