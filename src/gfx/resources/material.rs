//! Per-object material bindings
//!
//! A material is two texture units (diffuse, specular) and a shininess
//! exponent. Units index into the scene's
//! [`TextureRegistry`](super::texture_resource::TextureRegistry); unit 0 is
//! always a plain white texture, so an untextured object shades with its
//! vertex color alone.

use crate::{
    gfx::resources::texture_resource::TextureRegistry,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Index of a texture in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureUnit(pub usize);

impl TextureUnit {
    /// The 1×1 white fallback texture.
    pub const DEFAULT: TextureUnit = TextureUnit(0);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialBinding {
    pub diffuse: TextureUnit,
    pub specular: TextureUnit,
    pub shininess: f32,
}

impl MaterialBinding {
    pub const DEFAULT_SHININESS: f32 = 32.0;

    /// Shininess below 1 (or NaN) is raised to 1.
    pub fn new(diffuse: TextureUnit, specular: TextureUnit, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess: shininess.max(1.0),
        }
    }

    pub fn untextured(shininess: f32) -> Self {
        Self::new(TextureUnit::DEFAULT, TextureUnit::DEFAULT, shininess)
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            shininess: self.shininess,
            _padding: [0.0; 3],
        }
    }
}

impl Default for MaterialBinding {
    fn default() -> Self {
        Self::untextured(Self::DEFAULT_SHININESS)
    }
}

/// GPU uniform data for materials. MUST match `Material` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub shininess: f32,
    _padding: [f32; 3],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Bind group layout for group 2: material uniform, diffuse texture +
/// sampler, specular texture + sampler.
pub struct MaterialLayout {
    layout: BindGroupLayoutWithDesc,
}

impl MaterialLayout {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Material Bind Group Layout");
        Self { layout }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    /// Uploads `binding` and builds its bind group against `textures`.
    pub fn create_gpu(
        &self,
        device: &wgpu::Device,
        binding: &MaterialBinding,
        textures: &TextureRegistry,
        label: &str,
    ) -> MaterialGpu {
        let ubo = MaterialUBO::new_with_data(device, &binding.uniform());
        let diffuse = textures.get(binding.diffuse);
        let specular = textures.get(binding.specular);

        let bind_group = BindGroupBuilder::new(&self.layout)
            .resource(ubo.binding_resource())
            .texture(&diffuse.view)
            .sampler(&diffuse.sampler)
            .texture(&specular.view)
            .sampler(&specular.sampler)
            .create(device, &format!("{label} Material"));

        MaterialGpu { _ubo: ubo, bind_group }
    }
}

/// GPU side of one material binding.
pub struct MaterialGpu {
    // Kept alive for the bind group
    _ubo: MaterialUBO,
    pub bind_group: wgpu::BindGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_is_untextured() {
        let m = MaterialBinding::default();
        assert_eq!(m.diffuse, TextureUnit::DEFAULT);
        assert_eq!(m.specular, TextureUnit::DEFAULT);
        assert_eq!(m.shininess, 32.0);
    }

    #[test]
    fn test_shininess_floor() {
        assert_eq!(MaterialBinding::untextured(0.0).shininess, 1.0);
        assert_eq!(MaterialBinding::untextured(f32::NAN).shininess, 1.0);
        assert_eq!(MaterialBinding::untextured(64.0).uniform().shininess, 64.0);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 16);
    }
}
