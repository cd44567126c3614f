//! Global uniform bindings for camera and lighting
//!
//! Everything shared by all draws in a frame lives in one uniform block,
//! bound at group 0. [`UniformBinder`] stages the block on the CPU; the
//! render engine flushes it once per frame.

use cgmath::{Matrix4, Vector3};

use crate::{
    gfx::resources::lighting::{DirectionalLight, PointLight, MAX_POINT_LIGHTS},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Directional light as laid out in the shader (vec4 per field).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuDirectionalLight {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

/// Point light as laid out in the shader. `attenuation` holds
/// (constant, linear, quadratic, unused).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
}

/// Global uniform block. MUST match `Globals` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniformContent {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub directional: GpuDirectionalLight,
    pub point_lights: [GpuPointLight; MAX_POINT_LIGHTS],
    pub point_light_count: u32,
    _padding: [u32; 3],
}
// 64 + 64 + 16 + 64 + 4 * 80 + 16 = 544 bytes

impl Default for GlobalUniformContent {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::from_scale(1.0f32).into();
        Self {
            view: identity,
            projection: identity,
            view_position: [0.0, 0.0, 0.0, 1.0],
            directional: GpuDirectionalLight::default(),
            point_lights: [GpuPointLight::default(); MAX_POINT_LIGHTS],
            point_light_count: 0,
            _padding: [0; 3],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniformContent>;

/// Value accepted by [`UniformBinder::set`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Matrix4<f32>),
    Vec3(Vector3<f32>),
    Float(f32),
    Int(i32),
}

fn vec4(v: [f32; 3], w: f32) -> [f32; 4] {
    [v[0], v[1], v[2], w]
}

impl From<&DirectionalLight> for GpuDirectionalLight {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: vec4(light.direction.into(), 0.0),
            ambient: vec4(light.ambient, 1.0),
            diffuse: vec4(light.diffuse, 1.0),
            specular: vec4(light.specular, 1.0),
        }
    }
}

impl From<&PointLight> for GpuPointLight {
    fn from(light: &PointLight) -> Self {
        let a = light.attenuation;
        Self {
            position: vec4(light.position.into(), 1.0),
            ambient: vec4(light.ambient, 1.0),
            diffuse: vec4(light.diffuse, 1.0),
            specular: vec4(light.specular, 1.0),
            attenuation: [a.constant, a.linear, a.quadratic, 0.0],
        }
    }
}

/// Typed staging area for the global uniform block.
///
/// The typed methods cover the render loop. [`set`](Self::set) additionally
/// accepts GLSL-style names (`view`, `viewPos`, `dirLight.diffuse`,
/// `pointLights[1].linear`, ...) and ignores names it does not know.
#[derive(Debug, Clone, Default)]
pub struct UniformBinder {
    content: GlobalUniformContent,
}

impl UniformBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_camera(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>, eye: Vector3<f32>) {
        self.content.view = view.into();
        self.content.projection = projection.into();
        self.content.view_position = vec4(eye.into(), 1.0);
    }

    /// Binds the directional light and the first [`MAX_POINT_LIGHTS`] point
    /// lights. Unused slots are zeroed.
    pub fn bind_lights(&mut self, directional: &DirectionalLight, point_lights: &[PointLight]) {
        if point_lights.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "{} point lights supplied, only {} are shaded",
                point_lights.len(),
                MAX_POINT_LIGHTS
            );
        }

        self.content.directional = directional.into();
        self.content.point_lights = [GpuPointLight::default(); MAX_POINT_LIGHTS];
        for (slot, light) in self.content.point_lights.iter_mut().zip(point_lights) {
            *slot = light.into();
        }
        self.content.point_light_count = point_lights.len().min(MAX_POINT_LIGHTS) as u32;
    }

    /// Sets one uniform by name. Returns `false` (and changes nothing) when
    /// the name is unknown or the value has the wrong type.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        let c = &mut self.content;
        match (name, value) {
            ("view", UniformValue::Mat4(m)) => c.view = m.into(),
            ("projection", UniformValue::Mat4(m)) => c.projection = m.into(),
            ("viewPos", UniformValue::Vec3(v)) => c.view_position = vec4(v.into(), 1.0),
            ("numPointLights", UniformValue::Int(n)) => {
                c.point_light_count = n.clamp(0, MAX_POINT_LIGHTS as i32) as u32
            }
            _ => {
                if let Some(field) = name.strip_prefix("dirLight.") {
                    return set_directional_field(&mut c.directional, field, value);
                }
                if let Some((index, field)) = parse_point_light_name(name) {
                    return set_point_light_field(&mut c.point_lights[index], field, value);
                }
                log::trace!("uniform '{name}' is not active, ignored");
                return false;
            }
        }
        true
    }

    pub fn content(&self) -> &GlobalUniformContent {
        &self.content
    }

    /// Uploads the staged block; skipped when nothing changed.
    pub fn flush(&self, ubo: &mut GlobalUBO, queue: &wgpu::Queue) {
        ubo.update_content(queue, self.content);
    }
}

fn set_directional_field(light: &mut GpuDirectionalLight, field: &str, value: UniformValue) -> bool {
    let UniformValue::Vec3(v) = value else {
        return false;
    };
    let target = match field {
        "direction" => &mut light.direction,
        "ambient" => &mut light.ambient,
        "diffuse" => &mut light.diffuse,
        "specular" => &mut light.specular,
        _ => return false,
    };
    let v: [f32; 3] = v.into();
    target[..3].copy_from_slice(&v);
    true
}

fn set_point_light_field(light: &mut GpuPointLight, field: &str, value: UniformValue) -> bool {
    match (field, value) {
        ("position", UniformValue::Vec3(v)) => light.position = vec4(v.into(), 1.0),
        ("ambient", UniformValue::Vec3(v)) => light.ambient = vec4(v.into(), 1.0),
        ("diffuse", UniformValue::Vec3(v)) => light.diffuse = vec4(v.into(), 1.0),
        ("specular", UniformValue::Vec3(v)) => light.specular = vec4(v.into(), 1.0),
        ("constant", UniformValue::Float(f)) => light.attenuation[0] = f,
        ("linear", UniformValue::Float(f)) => light.attenuation[1] = f,
        ("quadratic", UniformValue::Float(f)) => light.attenuation[2] = f,
        _ => return false,
    }
    true
}

/// Splits `pointLights[i].field` into `(i, field)` for in-range `i`.
fn parse_point_light_name(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix("pointLights[")?;
    let (index, field) = rest.split_once("].")?;
    let index: usize = index.parse().ok()?;
    (index < MAX_POINT_LIGHTS).then_some((index, field))
}

/// Layout and bind group for the global uniform block (group 0).
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::lighting::Attenuation;
    use cgmath::SquareMatrix;

    fn sun() -> DirectionalLight {
        DirectionalLight::new(Vector3::new(0.0, -1.0, 0.0), [0.1; 3], [0.6; 3], [0.3; 3])
    }

    fn lamp(x: f32) -> PointLight {
        PointLight::new(Vector3::new(x, 1.0, 0.0), [1.0; 3], Attenuation::new(1.0, 0.09, 0.032))
    }

    #[test]
    fn test_block_size_is_stable() {
        assert_eq!(std::mem::size_of::<GpuPointLight>(), 80);
        assert_eq!(std::mem::size_of::<GlobalUniformContent>(), 544);
        assert_eq!(std::mem::size_of::<GlobalUniformContent>() % 16, 0);
    }

    #[test]
    fn test_bind_lights_fills_slots() {
        let mut binder = UniformBinder::new();
        binder.bind_lights(&sun(), &[lamp(1.0), lamp(2.0)]);
        let c = binder.content();
        assert_eq!(c.point_light_count, 2);
        assert_eq!(c.point_lights[1].position, [2.0, 1.0, 0.0, 1.0]);
        assert_eq!(c.point_lights[0].attenuation, [1.0, 0.09, 0.032, 0.0]);
        assert_eq!(c.point_lights[2], GpuPointLight::default());
        assert_eq!(c.directional.direction, [0.0, -1.0, 0.0, 0.0]);

        // Rebinding fewer lights clears stale slots
        binder.bind_lights(&sun(), &[lamp(3.0)]);
        assert_eq!(binder.content().point_light_count, 1);
        assert_eq!(binder.content().point_lights[1], GpuPointLight::default());
    }

    #[test]
    fn test_bind_lights_truncates() {
        let mut binder = UniformBinder::new();
        let many: Vec<PointLight> = (0..6).map(|i| lamp(i as f32)).collect();
        binder.bind_lights(&sun(), &many);
        assert_eq!(binder.content().point_light_count, MAX_POINT_LIGHTS as u32);
        assert_eq!(binder.content().point_lights[3].position[0], 3.0);
    }

    #[test]
    fn test_set_by_name() {
        let mut binder = UniformBinder::new();
        assert!(binder.set("viewPos", UniformValue::Vec3(Vector3::new(1.0, 2.0, 3.0))));
        assert!(binder.set("dirLight.ambient", UniformValue::Vec3(Vector3::new(0.2, 0.2, 0.2))));
        assert!(binder.set("pointLights[3].quadratic", UniformValue::Float(0.5)));
        assert!(binder.set("pointLights[0].position", UniformValue::Vec3(Vector3::new(4.0, 5.0, 6.0))));
        assert!(binder.set("projection", UniformValue::Mat4(Matrix4::from_scale(2.0))));

        let c = binder.content();
        assert_eq!(c.view_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(c.directional.ambient, [0.2, 0.2, 0.2, 0.0]);
        assert_eq!(c.point_lights[3].attenuation[2], 0.5);
        assert_eq!(c.point_lights[0].position, [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(c.projection[0][0], 2.0);
    }

    #[test]
    fn test_set_directional_fields_keep_padding() {
        let mut binder = UniformBinder::new();
        assert!(binder.set("dirLight.direction", UniformValue::Vec3(Vector3::new(-0.2, -1.0, -0.3))));
        assert!(binder.set("dirLight.specular", UniformValue::Vec3(Vector3::new(0.5, 0.5, 0.5))));

        let light = binder.content().directional;
        assert_eq!(light.direction[..3], [-0.2, -1.0, -0.3]);
        assert_eq!(light.direction[3], 0.0);
        assert_eq!(light.specular[..3], [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let mut binder = UniformBinder::new();
        let before = *binder.content();

        assert!(!binder.set("material.shininess", UniformValue::Float(32.0)));
        assert!(!binder.set("pointLights[4].linear", UniformValue::Float(1.0)));
        assert!(!binder.set("pointLights[x].linear", UniformValue::Float(1.0)));
        assert!(!binder.set("dirLight.color", UniformValue::Vec3(Vector3::new(1.0, 1.0, 1.0))));
        // Right name, wrong type
        assert!(!binder.set("view", UniformValue::Float(1.0)));
        assert!(!binder.set("pointLights[0].linear", UniformValue::Int(1)));

        assert_eq!(*binder.content(), before);
    }

    #[test]
    fn test_bind_camera() {
        let mut binder = UniformBinder::new();
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -3.0));
        binder.bind_camera(view, Matrix4::identity(), Vector3::new(0.0, 0.0, 3.0));
        let c = binder.content();
        assert_eq!(c.view[3], [0.0, 0.0, -3.0, 1.0]);
        assert_eq!(c.view_position, [0.0, 0.0, 3.0, 1.0]);
    }
}
