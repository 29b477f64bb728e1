//! Depth-resolved character buffers
//!
//! A [`Raster`] pairs an inverse-depth buffer with the sample owning each
//! cell. Samples are resolved one at a time: a sample claims its cell only
//! when its inverse depth is strictly greater than what the cell already
//! holds, so among equal depths the first sample processed keeps the cell.
//! Glyphs are produced afterwards from the final owners into a [`Frame`].

use crate::error::Result;
use crate::projection::Projector;
use crate::shading::Shader;
use crate::torus::SurfaceSample;
use std::fmt;

/// Character grid for one rendered frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks() panics on zero, and a zero-width frame has no rows anyway
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Number of cells holding something other than a space
    pub fn coverage(&self) -> usize {
        self.cells.iter().filter(|c| **c != ' ').count()
    }
}

impl fmt::Display for Frame {
    /// Rows separated and terminated by line breaks
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row {
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-cell inverse depth; 0 means nothing drawn yet
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    zinv: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            zinv: vec![0.0; len],
        }
    }

    pub fn get(&self, cell: usize) -> f32 {
        self.zinv[cell]
    }

    fn clear(&mut self) {
        self.zinv.fill(0.0);
    }
}

/// Outcome of resolving one sample against the depth buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// Projected outside the grid or behind the camera
    OffScreen,
    /// A nearer or equally near sample already owns the cell
    Occluded,
    /// The sample now owns the cell
    Visible { cell: usize },
}

/// Depth buffer plus the sample owning each cell
///
/// [`Raster::resolve`] only tracks which sample is nearest per cell and
/// [`Raster::shade_into`] turns the final owners into glyphs, so a sample that
/// is later hidden is never shaded.
#[derive(Debug, Clone)]
pub struct Raster {
    depth: DepthBuffer,
    owners: Vec<Option<SurfaceSample>>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depth: DepthBuffer::new(width * height),
            owners: vec![None; width * height],
        }
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Sample currently owning `cell`, if any
    pub fn owner(&self, cell: usize) -> Option<&SurfaceSample> {
        self.owners.get(cell).and_then(Option::as_ref)
    }

    /// Reset every cell to empty and infinitely far
    pub fn clear(&mut self) {
        self.depth.clear();
        self.owners.fill(None);
    }

    /// Depth-test one sample and record it as the cell owner if it wins
    pub fn resolve(&mut self, sample: &SurfaceSample, projector: &Projector) -> Resolved {
        let Some(cell) = projector.project(&sample.point) else {
            return Resolved::OffScreen;
        };

        let zinv = 1.0 / sample.point.z;
        if zinv <= self.depth.zinv[cell] {
            return Resolved::Occluded;
        }

        self.depth.zinv[cell] = zinv;
        self.owners[cell] = Some(*sample);
        Resolved::Visible { cell }
    }

    /// Fold a raster produced by a later part of the sweep into this one
    ///
    /// Cells move over only when strictly nearer, which keeps the earlier
    /// sample on ties exactly as a single sequential pass would.
    pub fn merge_later(&mut self, later: &Raster) {
        let owners = self.owners.iter_mut().zip(&later.owners);
        let depths = self.depth.zinv.iter_mut().zip(&later.depth.zinv);
        for ((owner, later_owner), (zinv, later_zinv)) in owners.zip(depths) {
            if *later_zinv > *zinv {
                *zinv = *later_zinv;
                *owner = *later_owner;
            }
        }
    }

    /// Shade every owned cell into `frame`; cells with no owner are blanked
    pub fn shade_into(&self, shader: &Shader, frame: &mut Frame) -> Result<()> {
        for (glyph, owner) in frame.cells.iter_mut().zip(&self.owners) {
            *glyph = match owner {
                Some(sample) => shader.shade(&sample.point, &sample.normal)?,
                None => ' ',
            };
        }
        Ok(())
    }
}
