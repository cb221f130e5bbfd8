//! Fixed-step accumulator between variable frame times and sim ticks.

use spire_core::constants::{DT, MAX_FRAME_SECS};

/// Slack when comparing accumulated time against one step, so that a frame
/// of exactly `n * step` seconds yields `n` steps.
const STEP_EPSILON: f64 = 1e-9;

/// Converts wall-clock frame durations into a whole number of ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f64,
    max_frame: f64,
    accumulator: f64,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(DT, MAX_FRAME_SECS)
    }
}

impl FixedStep {
    pub fn new(step: f64, max_frame: f64) -> Self {
        Self {
            step,
            max_frame,
            accumulator: 0.0,
        }
    }

    /// Add a frame's worth of time and return how many ticks to run.
    ///
    /// The frame is clamped to `max_frame` so a long stall (tab in the
    /// background, debugger pause) does not trigger a catch-up spiral.
    pub fn accumulate(&mut self, frame_secs: f64) -> u32 {
        self.accumulator += frame_secs.clamp(0.0, self.max_frame);

        let mut steps = 0;
        while self.accumulator + STEP_EPSILON >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
