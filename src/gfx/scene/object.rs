use std::{ops::Range, path::PathBuf};

use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    error::{GeometryError, RenderError},
    gfx::{
        geometry::{self, MeshData, ShapeParams, VertexFormat},
        resources::{
            material::{MaterialBinding, MaterialGpu, MaterialLayout},
            texture_resource::TextureRegistry,
        },
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Uploaded vertex and index buffers of one generated mesh.
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    /// Uploads `data` once. Empty vertex or index data is an error rather
    /// than a mesh that silently draws nothing.
    pub fn upload(device: &wgpu::Device, data: &MeshData, label: &str) -> Result<Self, RenderError> {
        check_uploadable(data, label)?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "uploaded mesh '{label}': {} vertices, {} indices",
            data.vertex_count(),
            data.indices.len()
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        })
    }
}

fn check_uploadable(data: &MeshData, label: &str) -> Result<(), RenderError> {
    let what = if data.vertex_count() == 0 {
        "vertices"
    } else if data.indices.is_empty() {
        "indices"
    } else {
        return Ok(());
    };
    Err(RenderError::EmptyMesh {
        label: label.to_string(),
        what,
    })
}

/// Per-object uniform. MUST match `Model` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl From<Matrix4<f32>> for ModelUniform {
    fn from(m: Matrix4<f32>) -> Self {
        Self { model: m.into() }
    }
}

type ModelUBO = UniformBuffer<ModelUniform>;

/// Bind group layout for group 1: the model matrix.
pub struct ModelLayout {
    layout: BindGroupLayoutWithDesc,
}

impl ModelLayout {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Model Bind Group Layout");
        Self { layout }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }
}

/// GPU resources of one scene object, created by
/// [`SceneObject::init_gpu_resources`].
pub struct ObjectGpu {
    pub mesh: Mesh,
    transform_ubo: ModelUBO,
    pub transform_bind_group: wgpu::BindGroup,
    pub material: MaterialGpu,
}

/// A placed primitive: generated geometry, model matrix and material.
pub struct SceneObject {
    pub name: String,
    pub params: ShapeParams,
    mesh_data: MeshData,
    pub transform: Matrix4<f32>,
    pub material: MaterialBinding,
    diffuse_texture: Option<PathBuf>,
    specular_texture: Option<PathBuf>,
    gpu: Option<ObjectGpu>,
}

impl SceneObject {
    /// Generates the mesh for `params`; invalid parameters fail here, before
    /// anything reaches the GPU.
    pub fn new(name: &str, params: ShapeParams, format: VertexFormat) -> Result<Self, GeometryError> {
        let mesh_data = geometry::generate(&params, format)?;
        Ok(Self {
            name: name.to_string(),
            params,
            mesh_data,
            transform: Matrix4::identity(),
            material: MaterialBinding::default(),
            diffuse_texture: None,
            specular_texture: None,
            gpu: None,
        })
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.material = MaterialBinding::new(self.material.diffuse, self.material.specular, shininess);
        self
    }

    /// Texture files resolved into units at GPU init. `None` keeps the
    /// white default.
    pub fn with_textures(mut self, diffuse: Option<PathBuf>, specular: Option<PathBuf>) -> Self {
        self.diffuse_texture = diffuse;
        self.specular_texture = specular;
        self
    }

    pub fn mesh_data(&self) -> &MeshData {
        &self.mesh_data
    }

    pub fn format(&self) -> VertexFormat {
        self.mesh_data.format
    }

    pub fn gpu(&self) -> Option<&ObjectGpu> {
        self.gpu.as_ref()
    }

    /// Uploads the mesh, loads textures into `textures` and builds the
    /// object's bind groups.
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        model_layout: &ModelLayout,
        material_layout: &MaterialLayout,
        textures: &mut TextureRegistry,
    ) -> Result<(), RenderError> {
        let mesh = Mesh::upload(device, &self.mesh_data, &self.name)?;

        if let Some(path) = &self.diffuse_texture {
            self.material.diffuse = textures.load(device, queue, path);
        }
        if let Some(path) = &self.specular_texture {
            self.material.specular = textures.load(device, queue, path);
        }

        let transform_ubo = ModelUBO::new_with_data(device, &self.transform.into());
        let transform_bind_group = BindGroupBuilder::new(&model_layout.layout)
            .resource(transform_ubo.binding_resource())
            .create(device, &format!("{} Transform", self.name));
        let material = material_layout.create_gpu(device, &self.material, textures, &self.name);

        self.gpu = Some(ObjectGpu {
            mesh,
            transform_ubo,
            transform_bind_group,
            material,
        });
        Ok(())
    }

    /// Writes the model matrix if it changed since the last write.
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        if let Some(gpu) = &mut self.gpu {
            gpu.transform_ubo.update_content(queue, self.transform.into());
        }
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a SceneObject);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    /// Binds groups 1 (model) and 2 (material) and draws. Objects without
    /// GPU resources are skipped.
    fn draw_object(&mut self, object: &'b SceneObject) {
        let Some(gpu) = &object.gpu else {
            return;
        };
        self.set_bind_group(1, &gpu.transform_bind_group, &[]);
        self.set_bind_group(2, &gpu.material.bind_group, &[]);
        self.draw_mesh(&gpu.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{Rgb, Shape};
    use cgmath::Vector3;

    fn cone() -> ShapeParams {
        ShapeParams::new(
            [1.0, 1.0, 1.0],
            Shape::Cone {
                height: 0.2,
                radius: 0.4,
                slices: 20,
            },
            Rgb::from_u8(128, 128, 128),
        )
    }

    #[test]
    fn test_scene_object_generates_mesh() {
        let object = SceneObject::new("cone", cone(), VertexFormat::Colored).unwrap();
        assert_eq!(object.mesh_data().vertex_count(), 80);
        assert_eq!(object.mesh_data().indices.len(), 120);
        assert_eq!(object.format(), VertexFormat::Colored);
        assert!(object.gpu().is_none());
    }

    #[test]
    fn test_invalid_params_fail_before_upload() {
        let mut params = cone();
        params.shape = Shape::Cone {
            height: 0.2,
            radius: 0.4,
            slices: 0,
        };
        assert!(SceneObject::new("cone", params, VertexFormat::Colored).is_err());
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let empty = MeshData::new(VertexFormat::Textured);
        match check_uploadable(&empty, "nothing") {
            Err(RenderError::EmptyMesh { label, what }) => {
                assert_eq!(label, "nothing");
                assert_eq!(what, "vertices");
            }
            other => panic!("expected EmptyMesh, got {other:?}"),
        }

        let object = SceneObject::new("cone", cone(), VertexFormat::Textured).unwrap();
        assert!(check_uploadable(object.mesh_data(), "cone").is_ok());
    }

    #[test]
    fn test_builder_composes_transform_and_material() {
        let object = SceneObject::new("cone", cone(), VertexFormat::Colored)
            .unwrap()
            .with_transform(Matrix4::from_translation(Vector3::new(0.0, 2.0, 0.0)))
            .with_shininess(0.5);
        assert_eq!(object.transform, Matrix4::from_translation(Vector3::new(0.0, 2.0, 0.0)));
        assert_eq!(object.material.shininess, 1.0);

        let uniform: ModelUniform = object.transform.into();
        assert_eq!(uniform.model[3], [0.0, 2.0, 0.0, 1.0]);
    }
}
