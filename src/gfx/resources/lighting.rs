//! Scene lights
//!
//! One directional light plus up to [`MAX_POINT_LIGHTS`] point lights. Point
//! lights marked as flickering get their falloff perturbed every frame; the
//! perturbation is drawn from an injected [`RandomSource`] and always applied
//! to the base values, so it never drifts.

use cgmath::{InnerSpace, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Point lights the shader's uniform block has room for.
pub const MAX_POINT_LIGHTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in (normalized on construction).
    pub direction: Vector3<f32>,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3]) -> Self {
        Self {
            direction: direction.normalize(),
            ambient,
            diffuse,
            specular,
        }
    }
}

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub attenuation: Attenuation,
    pub flicker: bool,
}

impl PointLight {
    pub fn new(position: Vector3<f32>, color: [f32; 3], attenuation: Attenuation) -> Self {
        Self {
            position,
            ambient: color.map(|c| c * 0.05),
            diffuse: color,
            specular: color,
            attenuation,
            flicker: false,
        }
    }

    pub fn with_flicker(mut self) -> Self {
        self.flicker = true;
        self
    }

    /// Copy of this light with linear and quadratic falloff jittered
    /// uniformly within `±bound`, never below zero.
    pub fn flickered(&self, rng: &mut dyn RandomSource, bound: f32) -> PointLight {
        let mut jitter = || (rng.next_unit() - 0.5) * 2.0 * bound;
        let mut light = *self;
        light.attenuation.linear = (self.attenuation.linear + jitter()).max(0.0);
        light.attenuation.quadratic = (self.attenuation.quadratic + jitter()).max(0.0);
        light
    }
}

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

/// [`RandomSource`] backed by a seedable standard RNG.
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeded when `seed` is set, OS entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed list of samples in a loop.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// All lights in the scene.
#[derive(Debug, Clone)]
pub struct LightSet {
    pub directional: DirectionalLight,
    point_lights: Vec<PointLight>,
}

impl LightSet {
    pub fn new(directional: DirectionalLight) -> Self {
        Self {
            directional,
            point_lights: Vec::new(),
        }
    }

    /// Adds a point light and returns its slot, or `None` when all
    /// [`MAX_POINT_LIGHTS`] slots are taken.
    pub fn add_point_light(&mut self, light: PointLight) -> Option<usize> {
        if self.point_lights.len() >= MAX_POINT_LIGHTS {
            log::warn!(
                "point light at {:?} dropped: limit of {} reached",
                light.position,
                MAX_POINT_LIGHTS
            );
            return None;
        }
        self.point_lights.push(light);
        Some(self.point_lights.len() - 1)
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    /// Point lights as they should be shaded this frame.
    pub fn frame_point_lights(&self, rng: &mut dyn RandomSource, flicker_bound: f32) -> Vec<PointLight> {
        self.point_lights
            .iter()
            .map(|light| {
                if light.flicker {
                    light.flickered(&mut *rng, flicker_bound)
                } else {
                    *light
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle() -> PointLight {
        PointLight::new(
            Vector3::new(0.0, 1.2, 0.0),
            [1.0, 0.6, 0.2],
            Attenuation::new(1.0, 0.7, 1.8),
        )
        .with_flicker()
    }

    #[test]
    fn test_flicker_stays_within_bound() {
        let light = candle();
        let mut rng = StdRandom::seeded(7);
        for _ in 0..1000 {
            let f = light.flickered(&mut rng, 0.15);
            assert!((f.attenuation.linear - 0.7).abs() <= 0.15 + 1e-6);
            assert!((f.attenuation.quadratic - 1.8).abs() <= 0.15 + 1e-6);
            assert_eq!(f.attenuation.constant, 1.0);
            assert_eq!(f.position, light.position);
        }
    }

    #[test]
    fn test_flicker_is_not_accumulated() {
        let mut lights = LightSet::new(DirectionalLight::new(
            Vector3::new(0.0, -1.0, 0.0),
            [0.1; 3],
            [0.5; 3],
            [0.5; 3],
        ));
        lights.add_point_light(candle());

        // Always push to the upper edge: base must not drift upward
        let mut rng = SequenceRandom::new(vec![1.0]);
        for _ in 0..10 {
            let frame = lights.frame_point_lights(&mut rng, 0.15);
            assert!((frame[0].attenuation.linear - 0.85).abs() < 1e-6);
        }
        assert_eq!(lights.point_lights()[0].attenuation.linear, 0.7);
    }

    #[test]
    fn test_fixed_sequence_is_deterministic() {
        let light = candle();
        let mut rng = SequenceRandom::new(vec![0.0, 0.5]);
        let f = light.flickered(&mut rng, 0.1);
        assert!((f.attenuation.linear - 0.6).abs() < 1e-6);
        assert!((f.attenuation.quadratic - 1.8).abs() < 1e-6);

        let mut a = StdRandom::seeded(42);
        let mut b = StdRandom::seeded(42);
        assert_eq!(light.flickered(&mut a, 0.15), light.flickered(&mut b, 0.15));
    }

    #[test]
    fn test_flicker_never_goes_negative() {
        let light = PointLight::new(Vector3::new(0.0, 0.0, 0.0), [1.0; 3], Attenuation::new(1.0, 0.01, 0.0))
            .with_flicker();
        let f = light.flickered(&mut SequenceRandom::new(vec![0.0]), 0.15);
        assert_eq!(f.attenuation.linear, 0.0);
        assert_eq!(f.attenuation.quadratic, 0.0);
    }

    #[test]
    fn test_steady_lights_are_untouched() {
        let mut lights = LightSet::new(DirectionalLight::new(
            Vector3::new(1.0, -1.0, 0.0),
            [0.1; 3],
            [0.5; 3],
            [0.5; 3],
        ));
        let steady = PointLight::new(Vector3::new(2.0, 2.0, 2.0), [1.0; 3], Attenuation::new(1.0, 0.09, 0.032));
        lights.add_point_light(steady);
        let frame = lights.frame_point_lights(&mut SequenceRandom::new(vec![0.9]), 0.15);
        assert_eq!(frame[0], steady);
        assert!((lights.directional.direction.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_light_limit() {
        let mut lights = LightSet::new(DirectionalLight::new(
            Vector3::new(0.0, -1.0, 0.0),
            [0.0; 3],
            [0.0; 3],
            [0.0; 3],
        ));
        for i in 0..MAX_POINT_LIGHTS {
            assert_eq!(lights.add_point_light(candle()), Some(i));
        }
        assert_eq!(lights.add_point_light(candle()), None);
        assert_eq!(lights.point_lights().len(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_attenuation_factor() {
        let a = Attenuation::new(1.0, 0.0, 0.0);
        assert_eq!(a.factor(10.0), 1.0);
        let b = Attenuation::new(1.0, 1.0, 1.0);
        assert!((b.factor(1.0) - 1.0 / 3.0).abs() < 1e-6);
    }
}
