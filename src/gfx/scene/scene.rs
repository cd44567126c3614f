use cgmath::{Deg, Matrix4, Vector3};

use crate::{
    config::AppConfig,
    error::{GeometryError, RenderError},
    gfx::{
        camera::{CameraController, FlyCamera, Projection},
        geometry::{Rgb, Shape, ShapeParams, VertexFormat},
        resources::{
            global_bindings::UniformBinder,
            lighting::{Attenuation, DirectionalLight, LightSet, PointLight, RandomSource, StdRandom},
            material::MaterialLayout,
            texture_resource::TextureRegistry,
        },
    },
};

use super::object::{ModelLayout, SceneObject};

/// Counts reported once the scene is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneStatistics {
    pub objects: usize,
    pub vertices: usize,
    pub triangles: usize,
}

/// Main scene containing objects, lights, and the viewer.
pub struct Scene {
    pub camera: FlyCamera,
    pub controller: CameraController,
    pub projection: Projection,
    pub lights: LightSet,
    pub objects: Vec<SceneObject>,
    flicker_bound: f32,
    rng: Box<dyn RandomSource>,
}

impl Scene {
    /// Empty scene lit only by `directional`.
    pub fn new(config: &AppConfig, directional: DirectionalLight) -> Self {
        Self {
            camera: FlyCamera::new(&config.camera),
            controller: CameraController::new(),
            projection: Projection::new(config.projection, config.window.width, config.window.height),
            lights: LightSet::new(directional),
            objects: Vec::new(),
            flicker_bound: config.flicker.bound,
            rng: Box::new(StdRandom::new(config.flicker.seed)),
        }
    }

    /// The candle-lit table: a wooden plane with a candle, a cone, a box and
    /// a ball standing on it.
    pub fn tabletop(config: &AppConfig) -> Result<Self, GeometryError> {
        let window_light = DirectionalLight::new(
            Vector3::new(-0.2, -1.0, -0.3),
            [0.05, 0.05, 0.05],
            [0.4, 0.4, 0.4],
            [0.5, 0.5, 0.5],
        );
        let mut scene = Self::new(config, window_light);

        let candle_base = Vector3::new(1.0, 0.0, -0.5);
        let candle_height = 1.0;

        // Plane is generated in XY; lay it flat with its normal up
        let table = SceneObject::new(
            "table",
            ShapeParams::new(
                [0.0, 0.0, 0.0],
                Shape::Plane {
                    width: 6.0,
                    length: 4.0,
                },
                Rgb::from_u8(139, 69, 19),
            ),
            VertexFormat::Textured,
        )?
        .with_transform(Matrix4::from_angle_x(Deg(-90.0)))
        .with_textures(Some(config.texture_path("wood.png")), None)
        .with_shininess(8.0);

        let candle = SceneObject::new(
            "candle",
            ShapeParams::new(
                candle_base.into(),
                Shape::Cylinder {
                    height: candle_height,
                    radius: 0.2,
                    slices: 20,
                },
                Rgb::from_u8(112, 124, 130),
            ),
            VertexFormat::Colored,
        )?;

        let cone = SceneObject::new(
            "cone",
            ShapeParams::new(
                [-1.5, 0.0, 0.5],
                Shape::Cone {
                    height: 0.6,
                    radius: 0.4,
                    slices: 20,
                },
                Rgb::from_u8(128, 128, 128),
            ),
            VertexFormat::Colored,
        )?;

        // Front face centered at y = 0.3 so the 0.6 tall box rests on the table
        let crate_box = SceneObject::new(
            "box",
            ShapeParams::new(
                [-0.8, 0.3, -0.2],
                Shape::Cube {
                    width: 0.8,
                    length: 0.6,
                    height: 0.8,
                },
                Rgb::new(1.0, 0.0, 0.0),
            ),
            VertexFormat::Textured,
        )?
        .with_textures(
            Some(config.texture_path("box_diffuse.png")),
            Some(config.texture_path("box_specular.png")),
        )
        .with_shininess(64.0);

        let ball = SceneObject::new(
            "ball",
            ShapeParams::new(
                [0.2, 0.3, 0.8],
                Shape::Sphere {
                    radius: 0.3,
                    slices: 20,
                    sectors: 20,
                },
                Rgb::new(0.8, 0.1, 0.1),
            ),
            VertexFormat::Colored,
        )?
        .with_shininess(128.0);

        for object in [table, candle, cone, crate_box, ball] {
            scene.add_object(object);
        }

        let flame = candle_base + Vector3::new(0.0, candle_height + 0.1, 0.0);
        scene.lights.add_point_light(
            PointLight::new(flame, [1.0, 0.6, 0.2], Attenuation::new(1.0, 0.35, 0.44)).with_flicker(),
        );
        scene.lights.add_point_light(PointLight::new(
            Vector3::new(-2.5, 2.0, 2.0),
            [0.2, 0.25, 0.4],
            Attenuation::new(1.0, 0.09, 0.032),
        ));

        Ok(scene)
    }

    /// Replaces the flicker random source, e.g. with a fixed sequence.
    pub fn set_random_source(&mut self, rng: Box<dyn RandomSource>) {
        self.rng = rng;
    }

    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Uploads every object and resolves texture files.
    pub fn init_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        model_layout: &ModelLayout,
        material_layout: &MaterialLayout,
        textures: &mut TextureRegistry,
    ) -> Result<(), RenderError> {
        for object in &mut self.objects {
            object.init_gpu_resources(device, queue, model_layout, material_layout, textures)?;
        }

        let stats = self.statistics();
        log::info!(
            "scene ready: {} objects, {} vertices, {} triangles, {} textures",
            stats.objects,
            stats.vertices,
            stats.triangles,
            textures.unit_count()
        );
        Ok(())
    }

    /// Advances the scene by `dt` seconds and stages this frame's camera and
    /// light uniforms in `binder`.
    pub fn update(&mut self, dt: f32, binder: &mut UniformBinder) {
        self.controller.update(&mut self.camera, dt);

        binder.bind_camera(
            self.camera.view_matrix(),
            self.projection.matrix(),
            self.camera.position,
        );

        let point_lights = self.lights.frame_point_lights(self.rng.as_mut(), self.flicker_bound);
        binder.bind_lights(&self.lights.directional, &point_lights);
    }

    pub fn statistics(&self) -> SceneStatistics {
        self.objects.iter().fold(
            SceneStatistics {
                objects: self.objects.len(),
                ..Default::default()
            },
            |mut stats, object| {
                stats.vertices += object.mesh_data().vertex_count();
                stats.triangles += object.mesh_data().triangle_count();
                stats
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::ProjectionMode,
        resources::lighting::{SequenceRandom, MAX_POINT_LIGHTS},
    };
    use cgmath::InnerSpace;

    fn scene() -> Scene {
        Scene::tabletop(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_tabletop_contents() {
        let scene = scene();
        let names: Vec<&str> = scene.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["table", "candle", "cone", "box", "ball"]);
        assert_eq!(scene.lights.point_lights().len(), 2);
        assert!(scene.lights.point_lights()[0].flicker);
        assert!(scene.lights.point_lights().len() <= MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_statistics_sum_meshes() {
        let stats = scene().statistics();
        // plane 4 + cube 8 + cylinder 120 + cone 80 + sphere 1600
        assert_eq!(stats.objects, 5);
        assert_eq!(stats.vertices, 4 + 8 + 120 + 80 + 1600);
        assert_eq!(stats.triangles, 2 + 12 + 80 + 40 + 800);
    }

    #[test]
    fn test_update_binds_camera_and_lights() {
        let mut scene = scene();
        let mut binder = UniformBinder::new();
        scene.update(0.016, &mut binder);

        let content = binder.content();
        assert_eq!(content.point_light_count, 2);
        assert_eq!(content.view_position, [0.0, 0.0, 3.0, 1.0]);
        let projection: [[f32; 4]; 4] = scene.projection.matrix().into();
        assert_eq!(content.projection, projection);
    }

    #[test]
    fn test_flicker_uses_injected_source() {
        let mut scene = scene();
        // 1.0 maps to the upper jitter bound
        scene.set_random_source(Box::new(SequenceRandom::new(vec![1.0])));
        let mut binder = UniformBinder::new();
        scene.update(0.0, &mut binder);

        let candle = binder.content().point_lights[0].attenuation;
        assert!((candle[1] - (0.35 + 0.15)).abs() < 1e-5);
        assert!((candle[2] - (0.44 + 0.15)).abs() < 1e-5);
        // The fill light does not flicker
        assert!((binder.content().point_lights[1].attenuation[1] - 0.09).abs() < 1e-6);
    }

    #[test]
    fn test_projection_mode_changes_bound_matrix() {
        let mut scene = scene();
        let mut binder = UniformBinder::new();
        scene.update(0.0, &mut binder);
        let perspective = binder.content().projection;

        assert_eq!(scene.projection.toggle(), ProjectionMode::Orthographic);
        scene.update(0.0, &mut binder);
        assert_ne!(binder.content().projection, perspective);
    }

    #[test]
    fn test_table_lies_flat() {
        let scene = scene();
        let table = &scene.objects[0];
        let normal = table.transform * Vector3::unit_z().extend(0.0);
        assert!((normal.truncate() - Vector3::unit_y()).magnitude() < 1e-5);
    }
}
