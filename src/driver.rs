//! Animation state and the frame loop

use crate::config::DonutConfig;
use crate::error::Result;
use crate::math::{rotation_from_euler, Mat3, Vec3};
use crate::raster::Frame;
use crate::renderer::Renderer;
use crate::terminal::DisplaySink;
use std::thread;
use std::time::{Duration, Instant};

/// How many frames between timing reports in the log
const STATS_INTERVAL: u64 = 100;

/// Accumulated Euler angles plus the per-tick increments
///
/// Angles grow without bound; only their sine and cosine are ever used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub angles: Vec3,
    pub increments: Vec3,
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(Vec3::new(0.06, 0.09, 0.04))
    }
}

impl RotationState {
    pub fn new(increments: Vec3) -> Self {
        Self {
            angles: Vec3::zeros(),
            increments,
        }
    }

    pub fn advance(&mut self) {
        self.angles += self.increments;
    }

    pub fn matrix(&self) -> Mat3 {
        rotation_from_euler(self.angles)
    }
}

/// Frame pacing policy for [`FrameDriver::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cadence {
    /// Render the next frame as soon as the previous one is shown
    #[default]
    FreeRunning,
    /// Wait until at least this long has passed since the last frame started
    Throttled(Duration),
}

/// Owns the rotation state and drives the renderer once per tick
pub struct FrameDriver {
    rotation: RotationState,
    renderer: Renderer,
    frames: u64,
}

impl FrameDriver {
    pub fn new(renderer: Renderer, rotation: RotationState) -> Self {
        Self {
            rotation,
            renderer,
            frames: 0,
        }
    }

    pub fn from_config(config: &DonutConfig) -> Result<Self> {
        Ok(Self::new(
            Renderer::from_config(config)?,
            RotationState::new(Vec3::from(config.animation.increments)),
        ))
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Frames produced by `tick` so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render the current rotation without advancing it
    pub fn render_current(&mut self) -> Result<&Frame> {
        let matrix = self.rotation.matrix();
        self.renderer.render(&matrix)
    }

    /// Advance the rotation by one step and render the result
    pub fn tick(&mut self) -> Result<&Frame> {
        self.rotation.advance();
        self.frames += 1;
        self.render_current()
    }

    /// Tick and present frames until `limit` is reached or the sink asks to stop
    pub fn run(
        &mut self,
        sink: &mut dyn DisplaySink,
        cadence: Cadence,
        limit: Option<u64>,
    ) -> Result<u64> {
        tracing::info!(
            parallel = self.renderer.is_parallel(),
            samples = self.renderer.grid().len(),
            ?cadence,
            ?limit,
            "Starting frame loop"
        );

        let mut rendered = 0u64;
        let mut window_start = Instant::now();
        let mut window_time = Duration::ZERO;

        while limit.map_or(true, |max| rendered < max) {
            if sink.should_stop() {
                tracing::info!(frames = rendered, "Stop requested");
                break;
            }
            let frame_start = Instant::now();

            let frame = self.tick()?;
            sink.present(frame)?;
            rendered += 1;

            let stats = self.renderer.last_stats();
            tracing::trace!(
                frame = self.frames,
                drawn = stats.drawn,
                occluded = stats.occluded,
                off_screen = stats.off_screen,
                "Frame rendered"
            );

            window_time += frame_start.elapsed();
            if rendered % STATS_INTERVAL == 0 {
                let wall = window_start.elapsed().as_secs_f64();
                tracing::debug!(
                    frames = rendered,
                    fps = %format!("{:.1}", STATS_INTERVAL as f64 / wall.max(f64::EPSILON)),
                    avg_frame_ms = %format!(
                        "{:.2}",
                        window_time.as_secs_f64() * 1000.0 / STATS_INTERVAL as f64
                    ),
                    "Frame timing"
                );
                window_start = Instant::now();
                window_time = Duration::ZERO;
            }

            if let Cadence::Throttled(interval) = cadence {
                let elapsed = frame_start.elapsed();
                if elapsed < interval {
                    thread::sleep(interval - elapsed);
                }
            }
        }

        tracing::info!(frames = rendered, "Frame loop finished");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
    }

    impl DisplaySink for Recorder {
        fn present(&mut self, frame: &Frame) -> io::Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    struct BrokenSink;

    impl DisplaySink for BrokenSink {
        fn present(&mut self, _frame: &Frame) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    /// Accepts a fixed number of frames, then asks the loop to stop
    struct StopAfter {
        remaining: usize,
        shown: usize,
    }

    impl DisplaySink for StopAfter {
        fn present(&mut self, _frame: &Frame) -> io::Result<()> {
            self.shown += 1;
            self.remaining = self.remaining.saturating_sub(1);
            Ok(())
        }

        fn should_stop(&mut self) -> bool {
            self.remaining == 0
        }
    }

    fn driver() -> FrameDriver {
        FrameDriver::from_config(&DonutConfig::default()).unwrap()
    }

    #[test]
    fn test_rotation_state_advances() {
        let mut state = RotationState::default();
        assert_eq!(state.angles, Vec3::zeros());
        state.advance();
        state.advance();
        assert!((state.angles - Vec3::new(0.12, 0.18, 0.08)).norm() < 1e-6);
    }

    #[test]
    fn test_initial_rotation_is_identity() {
        assert_eq!(RotationState::default().matrix(), Mat3::identity());
    }

    #[test]
    fn test_render_current_does_not_advance() {
        let mut driver = driver();
        let first = driver.render_current().unwrap().clone();
        let second = driver.render_current().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(driver.rotation().angles, Vec3::zeros());
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn test_tick_advances_before_rendering() {
        let mut driver = driver();
        let ticked = driver.tick().unwrap().clone();
        assert_eq!(driver.frames(), 1);

        let mut renderer = Renderer::new(160, 44);
        let expected = renderer
            .render(&rotation_from_euler(Vec3::new(0.06, 0.09, 0.04)))
            .unwrap();
        assert_eq!(&ticked, expected);
    }

    #[test]
    fn test_run_presents_limited_frames() {
        let mut driver = driver();
        let mut recorder = Recorder::default();
        let rendered = driver
            .run(&mut recorder, Cadence::FreeRunning, Some(3))
            .unwrap();

        assert_eq!(rendered, 3);
        assert_eq!(recorder.frames.len(), 3);
        assert_ne!(recorder.frames[0], recorder.frames[1]);
        assert!(recorder.frames.iter().all(|f| f.width() == 160 && f.height() == 44));
    }

    #[test]
    fn test_run_throttled_waits() {
        let mut driver = driver();
        let mut recorder = Recorder::default();
        let start = Instant::now();
        driver
            .run(
                &mut recorder,
                Cadence::Throttled(Duration::from_millis(20)),
                Some(2),
            )
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_run_stops_on_sink_error() {
        let mut driver = driver();
        let result = driver.run(&mut BrokenSink, Cadence::FreeRunning, Some(5));
        assert!(matches!(result, Err(crate::RenderError::Io(_))));
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_run_ends_when_sink_requests_stop() {
        let mut driver = driver();
        let mut sink = StopAfter {
            remaining: 2,
            shown: 0,
        };
        let rendered = driver.run(&mut sink, Cadence::FreeRunning, None).unwrap();
        assert_eq!(rendered, 2);
        assert_eq!(sink.shown, 2);
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn test_from_config_propagates_empty_ramp() {
        let mut config = DonutConfig::default();
        config.shading.ramp = String::new();
        assert!(matches!(
            FrameDriver::from_config(&config),
            Err(crate::RenderError::EmptyRamp)
        ));
    }

    #[test]
    fn test_zero_limit_renders_nothing() {
        let mut driver = driver();
        let mut recorder = Recorder::default();
        assert_eq!(driver.run(&mut recorder, Cadence::FreeRunning, Some(0)).unwrap(), 0);
        assert!(recorder.frames.is_empty());
    }
}
