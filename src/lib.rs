//! ASCII Donut: a software 3D pipeline that renders a rotating torus to text
//!
//! Each frame samples the torus surface, rotates and translates the samples,
//! projects them onto a character grid, resolves visibility with an
//! inverse-depth buffer and shades the winners against a single point light.

pub mod config;
pub mod driver;
pub mod error;
pub mod math;
pub mod projection;
pub mod raster;
pub mod renderer;
pub mod shading;
pub mod terminal;
pub mod torus;

pub use config::DonutConfig;
pub use driver::{Cadence, FrameDriver, RotationState};
pub use error::RenderError;
pub use raster::Frame;
pub use renderer::Renderer;
pub use terminal::{DisplaySink, FrameDump, TerminalDisplay};

/// Character ramp from sparsest to densest
pub const SHADING_RAMP: &str = " .:-=+*#%@";

/// Default screen width in character cells
pub const SCREEN_WIDTH: usize = 160;

/// Default screen height in character cells
pub const SCREEN_HEIGHT: usize = 44;

/// Default horizontal field of view in degrees
pub const FOV_DEGREES: f32 = 90.0;
