//! # Primitive Shape Generation
//!
//! One function per primitive. Parameters are validated by
//! [`generate`](super::generate) before these are called.
//!
//! Angles around the Y axis increase counter-clockwise seen from above,
//! so a ring point is `(r cos θ, _, -r sin θ)` relative to the axis.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::{MeshData, Rgb, VertexFormat};

/// Point on a horizontal ring around the vertical axis through `center`.
fn ring_point(center: [f32; 3], radius: f32, y: f32, angle: f32) -> [f32; 3] {
    [
        center[0] + radius * angle.cos(),
        y,
        center[2] - radius * angle.sin(),
    ]
}

/// Quad at depth `z`, centered on `(x, y)`.
///
/// Corners run counter-clockwise from the bottom-left so the face points
/// toward +Z. UVs cover the unit square.
pub(super) fn generate_plane(
    position: [f32; 3],
    width: f32,
    length: f32,
    color: Rgb,
    format: VertexFormat,
) -> MeshData {
    let mut data = MeshData::new(format);
    let [x, y, z] = position;
    let (hw, hl) = (width * 0.5, length * 0.5);

    data.push_vertex([x - hw, y - hl, z], color, [0.0, 0.0]);
    data.push_vertex([x + hw, y - hl, z], color, [1.0, 0.0]);
    data.push_vertex([x + hw, y + hl, z], color, [1.0, 1.0]);
    data.push_vertex([x - hw, y + hl, z], color, [0.0, 1.0]);

    data.indices = vec![0, 1, 2, 2, 3, 0];
    data
}

/// Index table for the 8-corner prism, two triangles per face.
///
/// Corners 0..4 are the front face (+Z), 4..8 the back face, both ordered
/// bottom-left, bottom-right, top-right, top-left.
#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
    // Front
    0, 1, 2,    2, 3, 0,
    // Back
    4, 6, 5,    6, 4, 7,
    // Right
    1, 5, 6,    6, 2, 1,
    // Left
    0, 3, 7,    7, 4, 0,
    // Top
    3, 2, 6,    6, 7, 3,
    // Bottom
    0, 4, 5,    5, 1, 0,
];

/// Rectangular prism: a `width` × `length` front face at depth `z`,
/// extruded `height` toward -Z.
pub(super) fn generate_cube(
    position: [f32; 3],
    width: f32,
    length: f32,
    height: f32,
    color: Rgb,
    format: VertexFormat,
) -> MeshData {
    let mut data = MeshData::new(format);
    let [x, y, z] = position;
    let (hw, hl) = (width * 0.5, length * 0.5);

    for depth in [z, z - height] {
        data.push_vertex([x - hw, y - hl, depth], color, [0.0, 0.0]);
        data.push_vertex([x + hw, y - hl, depth], color, [1.0, 0.0]);
        data.push_vertex([x + hw, y + hl, depth], color, [1.0, 1.0]);
        data.push_vertex([x - hw, y + hl, depth], color, [0.0, 1.0]);
    }

    data.indices = CUBE_INDICES.to_vec();
    data
}

/// Capped cylinder standing on its base center.
///
/// Each slice emits six vertices (top center, top current, top next,
/// bottom next, bottom current, bottom center) and four triangles: top fan,
/// bottom fan and two for the side wall. Nothing is shared between slices.
pub(super) fn generate_cylinder(
    position: [f32; 3],
    height: f32,
    radius: f32,
    slices: u32,
    color: Rgb,
    format: VertexFormat,
) -> MeshData {
    let mut data = MeshData::new(format);
    let [x, y, z] = position;
    let top = y + height;
    let step = TAU / slices as f32;

    for i in 0..slices {
        let (current, next) = (i as f32 * step, (i + 1) as f32 * step);
        let u_current = i as f32 / slices as f32;
        let u_next = (i + 1) as f32 / slices as f32;
        let u_mid = (u_current + u_next) * 0.5;

        // Rim vertices are shared with the side wall, so the cap fans reuse
        // its edge row; only the centers are cap-only
        let top_center = data.push_vertex([x, top, z], color, [u_mid, 1.0]);
        let top_current = data.push_vertex(ring_point(position, radius, top, current), color, [u_current, 1.0]);
        let top_next = data.push_vertex(ring_point(position, radius, top, next), color, [u_next, 1.0]);
        let bottom_next = data.push_vertex(ring_point(position, radius, y, next), color, [u_next, 0.0]);
        let bottom_current = data.push_vertex(ring_point(position, radius, y, current), color, [u_current, 0.0]);
        let bottom_center = data.push_vertex([x, y, z], color, [u_mid, 0.0]);

        data.push_triangle(top_center, top_current, top_next);
        data.push_triangle(bottom_center, bottom_next, bottom_current);
        data.push_triangle(bottom_current, bottom_next, top_next);
        data.push_triangle(top_next, top_current, bottom_current);
    }

    data
}

/// Capped cone with its base center at `position` and apex `height` above.
///
/// Each slice emits four vertices (apex, base next, base current, base
/// center) and two triangles: one side facet and one base fan triangle.
pub(super) fn generate_cone(
    position: [f32; 3],
    height: f32,
    radius: f32,
    slices: u32,
    color: Rgb,
    format: VertexFormat,
) -> MeshData {
    let mut data = MeshData::new(format);
    let [x, y, z] = position;
    let step = TAU / slices as f32;

    for i in 0..slices {
        let (current, next) = (i as f32 * step, (i + 1) as f32 * step);
        let u_current = i as f32 / slices as f32;
        let u_next = (i + 1) as f32 / slices as f32;

        let apex = data.push_vertex([x, y + height, z], color, [(u_current + u_next) * 0.5, 1.0]);
        let base_next = data.push_vertex(ring_point(position, radius, y, next), color, [u_next, 0.0]);
        let base_current = data.push_vertex(ring_point(position, radius, y, current), color, [u_current, 0.0]);
        let base_center = data.push_vertex([x, y, z], color, [0.5, 0.5]);

        data.push_triangle(apex, base_current, base_next);
        data.push_triangle(base_center, base_next, base_current);
    }

    data
}

/// Latitude/longitude sphere around `position`.
///
/// Every grid cell gets its own four corners (top-left, top-right,
/// bottom-left, bottom-right) and two triangles. Cells touching a pole
/// have one degenerate triangle, which is harmless.
pub(super) fn generate_sphere(
    position: [f32; 3],
    radius: f32,
    slices: u32,
    sectors: u32,
    color: Rgb,
    format: VertexFormat,
) -> MeshData {
    let mut data = MeshData::new(format);
    let [x, y, z] = position;
    let stack_step = PI / slices as f32;
    let sector_step = TAU / sectors as f32;

    let corner = |stack: u32, sector: u32| -> ([f32; 3], [f32; 2]) {
        let phi = FRAC_PI_2 - stack as f32 * stack_step;
        let theta = sector as f32 * sector_step;
        let ring = radius * phi.cos();
        let point = [x + ring * theta.cos(), y + radius * phi.sin(), z - ring * theta.sin()];
        let uv = [
            sector as f32 / sectors as f32,
            1.0 - stack as f32 / slices as f32,
        ];
        (point, uv)
    };

    for stack in 0..slices {
        for sector in 0..sectors {
            let (p, uv) = corner(stack, sector);
            let top_left = data.push_vertex(p, color, uv);
            let (p, uv) = corner(stack, sector + 1);
            let top_right = data.push_vertex(p, color, uv);
            let (p, uv) = corner(stack + 1, sector);
            let bottom_left = data.push_vertex(p, color, uv);
            let (p, uv) = corner(stack + 1, sector + 1);
            let bottom_right = data.push_vertex(p, color, uv);

            data.push_triangle(bottom_left, bottom_right, top_right);
            data.push_triangle(top_right, top_left, bottom_left);
        }
    }

    data
}
