//! Per-phase frame timing, collected in debug mode.

use serde::Serialize;

/// Seconds spent in each frame phase, summed over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseStats {
    pub update: f64,
    pub clear: f64,
    pub draw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MsPerFrame {
    pub update: f64,
    pub clear: f64,
    pub draw: f64,
    /// update + clear + draw
    pub anim_ops: f64,
    /// Frame time outside the three phases.
    pub other: f64,
    /// Whole frame.
    pub animate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentOfRun {
    pub update: f64,
    pub clear: f64,
    pub draw: f64,
    pub anim_ops: f64,
    pub other: f64,
}

/// Summary of one animation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub frames: u64,
    /// Seconds spent animating.
    pub elapsed: f64,
    pub ms_per_frame: MsPerFrame,
    pub percent: PercentOfRun,
    pub fps: f64,
}

impl PhaseStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> f64 {
        self.update + self.clear + self.draw
    }

    /// Build a report for `frames` frames over `elapsed` seconds.
    /// `None` until at least one frame ran over a measurable time.
    pub fn report(&self, frames: u64, elapsed: f64) -> Option<FrameReport> {
        if frames == 0 || elapsed <= 0.0 {
            return None;
        }
        let n = frames as f64;
        let sum = self.total();
        let ms = |secs: f64| secs * 1000.0 / n;
        let pct = |secs: f64| secs / elapsed * 100.0;
        Some(FrameReport {
            frames,
            elapsed,
            ms_per_frame: MsPerFrame {
                update: ms(self.update),
                clear: ms(self.clear),
                draw: ms(self.draw),
                anim_ops: ms(sum),
                other: ms(elapsed - sum),
                animate: ms(elapsed),
            },
            percent: PercentOfRun {
                update: pct(self.update),
                clear: pct(self.clear),
                draw: pct(self.draw),
                anim_ops: pct(sum),
                other: pct(elapsed - sum),
            },
            fps: n / elapsed,
        })
    }
}
