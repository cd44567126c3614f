//! # Procedural Geometry Generation
//!
//! Turns a small parameter set (position, dimensions, color, facet counts)
//! into interleaved vertex data and a triangle index list, ready for upload.
//!
//! ## Supported Primitives
//!
//! - **Plane**: a single quad at a fixed depth
//! - **Cube**: a rectangular prism extruded from a width × length footprint
//! - **Cylinder**: capped, `slices` facets around the axis
//! - **Cone**: capped, `slices` facets around the axis
//! - **Sphere**: latitude/longitude grid of `slices` × `sectors` cells
//!
//! Curved shapes duplicate their ring vertices per facet instead of sharing
//! them, so every facet can carry its own texture coordinates across the
//! UV seam. All triangles wind counter-clockwise seen from outside.
//!
//! ## Usage
//!
//! ```rust
//! use tabletop::gfx::geometry::{generate, Rgb, Shape, ShapeParams, VertexFormat};
//!
//! let candle = ShapeParams::new(
//!     [0.0, 0.0, 0.0],
//!     Shape::Cylinder { height: 1.0, radius: 0.2, slices: 20 },
//!     Rgb::from_u8(240, 234, 214),
//! );
//! let mesh = generate(&candle, VertexFormat::Textured).unwrap();
//! assert_eq!(mesh.vertex_count(), 6 * 20);
//! ```

pub mod color;
mod primitives;

pub use color::Rgb;

use primitives::{generate_cone, generate_cube, generate_cylinder, generate_plane, generate_sphere};

use crate::error::GeometryError;

/// Interleaved vertex layout produced by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// position (3) + color (3)
    Colored,
    /// position (3) + color (3) + uv (2)
    Textured,
}

impl VertexFormat {
    /// Floats per vertex.
    pub const fn stride(self) -> usize {
        match self {
            VertexFormat::Colored => 6,
            VertexFormat::Textured => 8,
        }
    }
}

/// Shape kind with its size and facet parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Quad spanning `width` along X and `length` along Y at depth `z`.
    Plane { width: f32, length: f32 },
    /// Footprint `width` × `length` in the XY plane, extruded `height`
    /// toward -Z from the front face.
    Cube { width: f32, length: f32, height: f32 },
    /// Axis along +Y from the base center.
    Cylinder { height: f32, radius: f32, slices: u32 },
    /// Axis along +Y from the base center to the apex.
    Cone { height: f32, radius: f32, slices: u32 },
    /// `slices` latitude bands by `sectors` longitude segments.
    Sphere { radius: f32, slices: u32, sectors: u32 },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Plane { .. } => "plane",
            Shape::Cube { .. } => "cube",
            Shape::Cylinder { .. } => "cylinder",
            Shape::Cone { .. } => "cone",
            Shape::Sphere { .. } => "sphere",
        }
    }
}

/// Everything needed to generate one primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    /// Anchor point: center for plane/cube front face/sphere, base center
    /// for cylinder and cone.
    pub position: [f32; 3],
    pub shape: Shape,
    pub color: Rgb,
}

impl ShapeParams {
    pub fn new(position: [f32; 3], shape: Shape, color: Rgb) -> Self {
        Self {
            position,
            shape,
            color,
        }
    }
}

/// Generated geometry ready for GPU upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub format: VertexFormat,
    /// Interleaved per-vertex floats, `format.stride()` per vertex.
    pub vertices: Vec<f32>,
    /// Triangle list (counter-clockwise winding).
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(format: VertexFormat) -> Self {
        Self {
            format,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn stride(&self) -> usize {
        self.format.stride()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.stride()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> [f32; 3] {
        let base = index * self.stride();
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        ]
    }

    /// Texture coordinate of vertex `index`, if this format has one.
    pub fn uv(&self, index: usize) -> Option<[f32; 2]> {
        match self.format {
            VertexFormat::Colored => None,
            VertexFormat::Textured => {
                let base = index * self.stride() + 6;
                Some([self.vertices[base], self.vertices[base + 1]])
            }
        }
    }

    /// Appends one vertex and returns its index. `uv` is dropped for
    /// colored meshes.
    pub(crate) fn push_vertex(&mut self, position: [f32; 3], color: Rgb, uv: [f32; 2]) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&position);
        self.vertices.extend_from_slice(&color.as_array());
        if self.format == VertexFormat::Textured {
            self.vertices.extend_from_slice(&uv);
        }
        index
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

/// Generates the mesh for `params`.
///
/// Deterministic and free of side effects. Fails with
/// [`GeometryError::InvalidParameter`] on zero facet counts or on
/// non-positive/non-finite dimensions.
pub fn generate(params: &ShapeParams, format: VertexFormat) -> Result<MeshData, GeometryError> {
    let [x, y, z] = params.position;
    if ![x, y, z].iter().all(|v| v.is_finite()) {
        return Err(GeometryError::invalid(
            params.shape.name(),
            "position",
            format!("{:?}", params.position),
        ));
    }

    let color = params.color;
    match params.shape {
        Shape::Plane { width, length } => {
            check_dimension("plane", "width", width)?;
            check_dimension("plane", "length", length)?;
            Ok(generate_plane(params.position, width, length, color, format))
        }
        Shape::Cube {
            width,
            length,
            height,
        } => {
            check_dimension("cube", "width", width)?;
            check_dimension("cube", "length", length)?;
            check_dimension("cube", "height", height)?;
            Ok(generate_cube(params.position, width, length, height, color, format))
        }
        Shape::Cylinder {
            height,
            radius,
            slices,
        } => {
            check_dimension("cylinder", "height", height)?;
            check_dimension("cylinder", "radius", radius)?;
            check_facets("cylinder", "slices", slices)?;
            Ok(generate_cylinder(params.position, height, radius, slices, color, format))
        }
        Shape::Cone {
            height,
            radius,
            slices,
        } => {
            check_dimension("cone", "height", height)?;
            check_dimension("cone", "radius", radius)?;
            check_facets("cone", "slices", slices)?;
            Ok(generate_cone(params.position, height, radius, slices, color, format))
        }
        Shape::Sphere {
            radius,
            slices,
            sectors,
        } => {
            check_dimension("sphere", "radius", radius)?;
            check_facets("sphere", "slices", slices)?;
            check_facets("sphere", "sectors", sectors)?;
            Ok(generate_sphere(params.position, radius, slices, sectors, color, format))
        }
    }
}

fn check_dimension(shape: &'static str, name: &'static str, value: f32) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::invalid(shape, name, value))
    }
}

fn check_facets(shape: &'static str, name: &'static str, value: u32) -> Result<(), GeometryError> {
    if value > 0 {
        Ok(())
    } else {
        Err(GeometryError::invalid(shape, name, value))
    }
}
