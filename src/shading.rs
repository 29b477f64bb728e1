//! Lambertian shading mapped onto a character ramp

use crate::error::{RenderError, Result};
use crate::math::{normalize, Vec3};

/// Single point light plus the ramp used to turn luminance into glyphs
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    light: Vec3,
    ramp: Vec<char>,
}

impl Default for Shader {
    fn default() -> Self {
        Self {
            light: Vec3::new(0.0, 20.0, 30.0),
            ramp: crate::SHADING_RAMP.chars().collect(),
        }
    }
}

impl Shader {
    /// Create a shader; the ramp needs at least one glyph
    pub fn new(light: Vec3, ramp: &str) -> Result<Self> {
        let ramp: Vec<char> = ramp.chars().collect();
        if ramp.is_empty() {
            return Err(RenderError::EmptyRamp);
        }
        Ok(Self { light, ramp })
    }

    pub fn light(&self) -> Vec3 {
        self.light
    }

    pub fn ramp(&self) -> &[char] {
        &self.ramp
    }

    /// Cosine between the surface normal and the direction to the light
    pub fn luminance(&self, point: &Vec3, normal: &Vec3) -> Result<f32> {
        let to_light = normalize(self.light - point)?;
        Ok(normal.dot(&to_light))
    }

    /// Ramp slot for a luminance value, clamped to the ramp
    ///
    /// Negative and NaN luminance land on the first (sparsest) slot.
    pub fn ramp_index(&self, luminance: f32) -> usize {
        let last = self.ramp.len() - 1;
        let scaled = (luminance * self.ramp.len() as f32).floor();
        if !(scaled > 0.0) {
            0
        } else {
            (scaled as usize).min(last)
        }
    }

    pub fn glyph(&self, luminance: f32) -> char {
        self.ramp[self.ramp_index(luminance)]
    }

    /// Glyph for a surface sample
    pub fn shade(&self, point: &Vec3, normal: &Vec3) -> Result<char> {
        Ok(self.glyph(self.luminance(point, normal)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_index_clamps() {
        let shader = Shader::default();
        assert_eq!(shader.ramp_index(-0.7), 0);
        assert_eq!(shader.ramp_index(0.0), 0);
        assert_eq!(shader.ramp_index(0.05), 0);
        assert_eq!(shader.ramp_index(0.1), 1);
        assert_eq!(shader.ramp_index(0.55), 5);
        assert_eq!(shader.ramp_index(0.95), 9);
        assert_eq!(shader.ramp_index(1.0), 9);
        assert_eq!(shader.ramp_index(3.0), 9);
        assert_eq!(shader.ramp_index(f32::NAN), 0);
    }

    #[test]
    fn test_glyphs_follow_ramp() {
        let shader = Shader::default();
        assert_eq!(shader.glyph(-1.0), ' ');
        assert_eq!(shader.glyph(0.25), ':');
        assert_eq!(shader.glyph(1.0), '@');
    }

    #[test]
    fn test_facing_light_is_brightest() {
        let shader = Shader::default();
        let point = Vec3::new(0.0, 0.0, 60.0);
        let normal = normalize(shader.light() - point).unwrap();
        let l = shader.luminance(&point, &normal).unwrap();
        assert!((l - 1.0).abs() < 1e-5);
        assert_eq!(shader.shade(&point, &normal).unwrap(), '@');
    }

    #[test]
    fn test_facing_away_is_sparsest() {
        let shader = Shader::default();
        let point = Vec3::new(0.0, 0.0, 60.0);
        let normal = -normalize(shader.light() - point).unwrap();
        assert_eq!(shader.shade(&point, &normal).unwrap(), ' ');
    }

    #[test]
    fn test_point_at_light_is_degenerate() {
        let shader = Shader::default();
        let result = shader.luminance(&shader.light(), &Vec3::new(0.0, 1.0, 0.0));
        assert!(matches!(result, Err(RenderError::DegenerateVector(_))));
    }

    #[test]
    fn test_custom_ramp() {
        let shader = Shader::new(Vec3::new(0.0, 0.0, 0.0), "ab").unwrap();
        assert_eq!(shader.glyph(0.2), 'a');
        assert_eq!(shader.glyph(0.6), 'b');
        assert_eq!(shader.glyph(1.5), 'b');
    }

    #[test]
    fn test_empty_ramp_is_rejected() {
        let result = Shader::new(Vec3::new(0.0, 0.0, 0.0), "");
        assert!(matches!(result, Err(RenderError::EmptyRamp)));
        assert_eq!(Shader::default().ramp().len(), 10);
    }
}
