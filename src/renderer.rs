//! Frame renderer
//!
//! Runs the full pipeline for one rotation: sweep the torus, project every
//! sample, resolve visibility and shade the winners into a [`Frame`].
//! Visibility can run as one sequential sweep or split into theta bands that
//! are resolved in parallel and merged back in sweep order. Shading always
//! happens once on the merged owners, so both modes produce the same frame
//! and fail on the same inputs.

use crate::config::DonutConfig;
use crate::error::Result;
use crate::math::{Mat3, Vec3};
use crate::projection::Projector;
use crate::raster::{Frame, Raster, Resolved};
use crate::shading::Shader;
use crate::torus::{SweepGrid, Torus};
use rayon::prelude::*;
use std::ops::{Add, Range};

/// Sample counts for one rendered frame
///
/// `drawn` counts depth-test wins at the time a sample was resolved, so a
/// banded render can report more wins than a sequential one for the same
/// frame: samples hidden by an earlier band only lose during the merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub occluded: usize,
    pub off_screen: usize,
}

impl FrameStats {
    fn record(&mut self, outcome: Resolved) {
        match outcome {
            Resolved::Visible { .. } => self.drawn += 1,
            Resolved::Occluded => self.occluded += 1,
            Resolved::OffScreen => self.off_screen += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.drawn + self.occluded + self.off_screen
    }
}

impl Add for FrameStats {
    type Output = FrameStats;

    fn add(self, other: FrameStats) -> FrameStats {
        FrameStats {
            drawn: self.drawn + other.drawn,
            occluded: self.occluded + other.occluded,
            off_screen: self.off_screen + other.off_screen,
        }
    }
}

/// One contiguous slice of theta rows with its own buffers
struct Band {
    rows: Range<usize>,
    raster: Raster,
    stats: FrameStats,
}

/// Software rasterizer for the torus
pub struct Renderer {
    projector: Projector,
    shader: Shader,
    torus: Torus,
    grid: SweepGrid,
    raster: Raster,
    frame: Frame,
    bands: Vec<Band>,
    band_count: Option<usize>,
    parallel: bool,
    last_stats: FrameStats,
}

impl Renderer {
    /// Renderer with the default geometry, light and ramp
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_parts(
            Projector::new(width, height, crate::FOV_DEGREES),
            Shader::default(),
            Torus::default(),
        )
    }

    pub fn from_config(config: &DonutConfig) -> Result<Self> {
        let mut renderer = Self::with_parts(
            Projector::new(
                config.screen.width,
                config.screen.height,
                config.camera.fov_degrees,
            ),
            Shader::new(Vec3::from(config.light.position), &config.shading.ramp)?,
            Torus::new(
                config.torus.minor_radius,
                config.torus.major_radius,
                Vec3::from(config.torus.position),
            ),
        );
        renderer.set_parallel(config.render.parallel);
        Ok(renderer)
    }

    pub fn with_parts(projector: Projector, shader: Shader, torus: Torus) -> Self {
        Self {
            raster: Raster::new(projector.width(), projector.height()),
            frame: Frame::new(projector.width(), projector.height()),
            projector,
            shader,
            torus,
            grid: SweepGrid::default(),
            bands: Vec::new(),
            band_count: None,
            parallel: false,
            last_stats: FrameStats::default(),
        }
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Fix the number of theta bands used in parallel mode
    ///
    /// `None` uses one band per rayon worker thread.
    pub fn set_band_count(&mut self, count: Option<usize>) {
        self.band_count = count;
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    pub fn torus(&self) -> &Torus {
        &self.torus
    }

    pub fn grid(&self) -> &SweepGrid {
        &self.grid
    }

    /// Most recently completed frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Sample counts from the most recent render
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Render the torus under `rotation` and return the finished frame
    pub fn render(&mut self, rotation: &Mat3) -> Result<&Frame> {
        self.raster.clear();
        self.last_stats = if self.parallel {
            self.resolve_bands(rotation)
        } else {
            self.resolve_sequential(rotation)
        };
        self.raster.shade_into(&self.shader, &mut self.frame)?;
        Ok(&self.frame)
    }

    fn resolve_sequential(&mut self, rotation: &Mat3) -> FrameStats {
        let mut stats = FrameStats::default();
        for sample in self.grid.sweep(&self.torus, rotation) {
            stats.record(self.raster.resolve(&sample, &self.projector));
        }
        stats
    }

    fn resolve_bands(&mut self, rotation: &Mat3) -> FrameStats {
        let count = self.band_count.unwrap_or_else(rayon::current_num_threads);
        self.prepare_bands(count);

        let grid = &self.grid;
        let torus = &self.torus;
        let projector = &self.projector;

        self.bands.par_iter_mut().for_each(|band| {
            band.raster.clear();
            band.stats = FrameStats::default();
            for sample in grid.sweep_rows(torus, rotation, band.rows.clone()) {
                band.stats.record(band.raster.resolve(&sample, projector));
            }
        });

        // Merge in sweep order; a band's own tie-breaks already match the sweep
        let mut stats = FrameStats::default();
        for band in &self.bands {
            self.raster.merge_later(&band.raster);
            stats = stats + band.stats;
        }
        stats
    }

    fn prepare_bands(&mut self, count: usize) {
        let rows = self.grid.theta_steps();
        let count = count.clamp(1, rows.max(1));
        if self.bands.len() == count {
            return;
        }

        let per_band = rows.div_ceil(count);
        let (width, height) = (self.projector.width(), self.projector.height());
        self.bands = (0..count)
            .map(|i| {
                let start = (i * per_band).min(rows);
                let end = ((i + 1) * per_band).min(rows);
                Band {
                    rows: start..end,
                    raster: Raster::new(width, height),
                    stats: FrameStats::default(),
                }
            })
            .collect();
    }
}
