//! Perspective projection onto the character grid

use crate::math::Vec3;

/// Pinhole camera at the origin looking down +z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    width: usize,
    height: usize,
    dist: f32,
}

impl Projector {
    pub fn new(width: usize, height: usize, fov_degrees: f32) -> Self {
        let half_fov = fov_degrees.to_radians() / 2.0;
        Self {
            width,
            height,
            dist: width as f32 / (2.0 * half_fov.tan()),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Focal distance in character cells
    pub fn focal_distance(&self) -> f32 {
        self.dist
    }

    /// Truncated screen coordinates of a point, before bounds checking
    ///
    /// Returns `None` for points on or behind the camera plane. The
    /// horizontal offset is doubled because terminal cells are roughly
    /// twice as tall as they are wide.
    pub fn screen_coords(&self, point: &Vec3) -> Option<(i64, i64)> {
        if !(point.z > 0.0) {
            return None;
        }
        let sx = self.width as f32 / 2.0 + 2.0 * point.x * self.dist / point.z;
        let sy = self.height as f32 / 2.0 - point.y * self.dist / point.z;
        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }
        Some((sx as i64, sy as i64))
    }

    /// Linear cell index for in-bounds coordinates
    pub fn cell_index(&self, x: i64, y: i64) -> Option<usize> {
        let in_x = x >= 0 && (x as u64) < self.width as u64;
        let in_y = y >= 0 && (y as u64) < self.height as u64;
        (in_x && in_y).then(|| y as usize * self.width + x as usize)
    }

    /// Cell a world point lands in, or `None` when it is off-screen
    pub fn project(&self, point: &Vec3) -> Option<usize> {
        let (x, y) = self.screen_coords(point)?;
        self.cell_index(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_projector() -> Projector {
        Projector::new(160, 44, 90.0)
    }

    #[test]
    fn test_focal_distance() {
        let p = default_projector();
        assert!((p.focal_distance() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_centre_point_projects_to_centre_cell() {
        let p = default_projector();
        assert_eq!(p.screen_coords(&Vec3::new(0.0, 0.0, 60.0)), Some((80, 22)));
        assert_eq!(p.project(&Vec3::new(0.0, 0.0, 60.0)), Some(22 * 160 + 80));
    }

    #[test]
    fn test_behind_camera_is_off_screen() {
        let p = default_projector();
        assert_eq!(p.project(&Vec3::new(0.0, 0.0, 0.0)), None);
        assert_eq!(p.project(&Vec3::new(0.0, 0.0, -10.0)), None);
        assert_eq!(p.project(&Vec3::new(1.0, 1.0, -0.001)), None);
    }

    #[test]
    fn test_nan_is_off_screen() {
        let p = default_projector();
        assert_eq!(p.project(&Vec3::new(f32::NAN, 0.0, 10.0)), None);
        assert_eq!(p.project(&Vec3::new(0.0, 0.0, f32::NAN)), None);
    }

    #[test]
    fn test_cell_index_bounds() {
        let p = default_projector();
        assert_eq!(p.cell_index(0, 0), Some(0));
        assert_eq!(p.cell_index(159, 0), Some(159));
        assert_eq!(p.cell_index(0, 43), Some(43 * 160));
        assert_eq!(p.cell_index(159, 43), Some(43 * 160 + 159));
        assert_eq!(p.cell_index(160, 0), None);
        assert_eq!(p.cell_index(0, 44), None);
        assert_eq!(p.cell_index(-1, 0), None);
        assert_eq!(p.cell_index(0, -1), None);
    }

    #[test]
    fn test_projected_edges() {
        let p = default_projector();
        // At z = 80 the horizontal offset is 2x and the vertical offset is -y
        assert_eq!(p.screen_coords(&Vec3::new(39.75, 0.0, 80.0)), Some((159, 22)));
        assert!(p.project(&Vec3::new(39.75, 0.0, 80.0)).is_some());
        assert_eq!(p.screen_coords(&Vec3::new(40.25, 0.0, 80.0)), Some((160, 22)));
        assert!(p.project(&Vec3::new(40.25, 0.0, 80.0)).is_none());

        assert_eq!(p.screen_coords(&Vec3::new(0.0, -21.5, 80.0)), Some((80, 43)));
        assert!(p.project(&Vec3::new(0.0, -21.5, 80.0)).is_some());
        assert_eq!(p.screen_coords(&Vec3::new(0.0, -22.5, 80.0)), Some((80, 44)));
        assert!(p.project(&Vec3::new(0.0, -22.5, 80.0)).is_none());
    }

    #[test]
    fn test_truncation_toward_zero() {
        let p = default_projector();
        // 80 - 80.5 = -0.5 truncates to column 0 rather than -1
        assert_eq!(p.screen_coords(&Vec3::new(-40.25, 0.0, 80.0)), Some((0, 22)));
    }
}
