//! Torus surface sampling
//!
//! The torus is swept over two angles: theta around the major circle and phi
//! around the tube. Each grid point yields a world-space position and outward
//! normal after the current rotation and translation are applied.

use crate::math::{Mat3, Vec3};
use std::f32::consts::TAU;
use std::ops::Range;

/// Angular step around the major circle (radians)
pub const THETA_STEP: f32 = 0.01;

/// Angular step around the tube (radians)
pub const PHI_STEP: f32 = 0.03;

/// A point on the transformed surface together with its unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Torus geometry placed in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    /// Tube radius (R1)
    pub minor_radius: f32,
    /// Distance from the torus centre to the tube centre (R2)
    pub major_radius: f32,
    /// World-space centre
    pub position: Vec3,
}

impl Default for Torus {
    fn default() -> Self {
        Self {
            minor_radius: 5.0,
            major_radius: 10.0,
            position: Vec3::new(0.0, 0.0, 60.0),
        }
    }
}

impl Torus {
    pub fn new(minor_radius: f32, major_radius: f32, position: Vec3) -> Self {
        Self {
            minor_radius,
            major_radius,
            position,
        }
    }

    /// Untransformed point and normal for the given angles
    pub fn local_sample(&self, theta: f32, phi: f32) -> SurfaceSample {
        let (st, ct) = theta.sin_cos();
        let (sp, cp) = phi.sin_cos();
        self.sample_from_trig((ct, st), (cp, sp))
    }

    fn sample_from_trig(&self, (ct, st): (f32, f32), (cp, sp): (f32, f32)) -> SurfaceSample {
        let ring = self.major_radius + self.minor_radius * cp;
        SurfaceSample {
            point: Vec3::new(ring * ct, ring * st, self.minor_radius * sp),
            normal: Vec3::new(cp * ct, cp * st, sp),
        }
    }
}

/// Precomputed angle tables for one sampling grid
#[derive(Debug, Clone)]
pub struct SweepGrid {
    theta: Vec<(f32, f32)>,
    phi: Vec<(f32, f32)>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self::new(THETA_STEP, PHI_STEP)
    }
}

impl SweepGrid {
    /// Build cos/sin tables for every angle `i * step` below a full turn
    pub fn new(theta_step: f32, phi_step: f32) -> Self {
        Self {
            theta: trig_table(theta_step),
            phi: trig_table(phi_step),
        }
    }

    pub fn theta_steps(&self) -> usize {
        self.theta.len()
    }

    pub fn phi_steps(&self) -> usize {
        self.phi.len()
    }

    /// Number of samples produced by a full sweep
    pub fn len(&self) -> usize {
        self.theta.len() * self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full sweep of the torus under `rotation`, theta-major
    pub fn sweep<'a>(&'a self, torus: &'a Torus, rotation: &'a Mat3) -> Sweep<'a> {
        self.sweep_rows(torus, rotation, 0..self.theta.len())
    }

    /// Sweep restricted to a contiguous range of theta rows
    pub fn sweep_rows<'a>(
        &'a self,
        torus: &'a Torus,
        rotation: &'a Mat3,
        rows: Range<usize>,
    ) -> Sweep<'a> {
        let end = rows.end.min(self.theta.len());
        let start = rows.start.min(end);
        Sweep {
            grid: self,
            torus,
            rotation,
            row: start,
            row_end: end,
            col: 0,
        }
    }
}

fn trig_table(step: f32) -> Vec<(f32, f32)> {
    (0..)
        .map(|i| i as f32 * step)
        .take_while(|angle| *angle < TAU)
        .map(|angle| (angle.cos(), angle.sin()))
        .collect()
}

/// Lazy iterator over the transformed samples of one sweep
pub struct Sweep<'a> {
    grid: &'a SweepGrid,
    torus: &'a Torus,
    rotation: &'a Mat3,
    row: usize,
    row_end: usize,
    col: usize,
}

impl Iterator for Sweep<'_> {
    type Item = SurfaceSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.row_end || self.grid.phi.is_empty() {
            return None;
        }

        let local = self
            .torus
            .sample_from_trig(self.grid.theta[self.row], self.grid.phi[self.col]);

        self.col += 1;
        if self.col == self.grid.phi.len() {
            self.col = 0;
            self.row += 1;
        }

        Some(SurfaceSample {
            point: self.rotation * local.point + self.torus.position,
            normal: self.rotation * local.normal,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.row >= self.row_end {
            0
        } else {
            (self.row_end - self.row) * self.grid.phi.len() - self.col
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Sweep<'_> {}
