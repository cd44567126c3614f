//! Vertex color
//!
//! Colors are stored as normalized floats. Integer 0-255 colors are
//! converted once, here, at the boundary.

/// Normalized RGB color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);

    /// Creates a color from normalized channels, clamping each to `0..=1`.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self([clamp_unit(r), clamp_unit(g), clamp_unit(b)])
    }

    /// Creates a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
    }

    pub fn as_array(&self) -> [f32; 3] {
        self.0
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::from_u8(c[0], c[1], c[2])
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

// NaN maps to 0 so a bad channel renders black instead of poisoning the shader
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_normalizes() {
        let c = Rgb::from_u8(255, 0, 51);
        assert_eq!(c.0, [1.0, 0.0, 0.2]);
        assert_eq!(Rgb::from([112u8, 124, 130]), Rgb::from_u8(112, 124, 130));
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Rgb::new(1.5, -0.2, f32::NAN).0, [1.0, 0.0, 0.0]);
    }
}
