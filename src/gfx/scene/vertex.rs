//! # Vertex Data Structures
//!
//! GPU-side views of the interleaved float streams produced by
//! [`geometry::generate`](crate::gfx::geometry::generate). The structs are
//! never built one by one on the hot path; they exist to pin down the memory
//! layout and derive the matching [`wgpu::VertexBufferLayout`].

use std::mem;

use crate::gfx::geometry::VertexFormat;

/// Position + color vertex (stride 6 floats).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Position + color + texture coordinate vertex (stride 8 floats).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
];

const TEXTURED_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
];

impl ColorVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COLOR_ATTRIBUTES,
        }
    }
}

impl TexturedVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEXTURED_ATTRIBUTES,
        }
    }
}

/// Buffer layout for a generated vertex format.
///
/// Shader locations: 0 position, 1 color, 2 uv (textured only).
pub fn layout(format: VertexFormat) -> wgpu::VertexBufferLayout<'static> {
    match format {
        VertexFormat::Colored => ColorVertex::desc(),
        VertexFormat::Textured => TexturedVertex::desc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stride_matches_generator() {
        for format in [VertexFormat::Colored, VertexFormat::Textured] {
            let layout = layout(format);
            assert_eq!(
                layout.array_stride as usize,
                format.stride() * mem::size_of::<f32>()
            );
        }
    }

    #[test]
    fn test_uv_follows_color() {
        let uv = TexturedVertex::desc().attributes[2];
        assert_eq!(uv.shader_location, 2);
        assert_eq!(uv.offset, 6 * 4);
    }

    #[test]
    fn test_interleaved_floats_cast_to_vertices() {
        let raw: [f32; 8] = [1.0, 2.0, 3.0, 0.5, 0.5, 0.5, 0.25, 0.75];
        let vertices: &[TexturedVertex] = bytemuck::cast_slice(&raw);
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].uv, [0.25, 0.75]);
    }
}
