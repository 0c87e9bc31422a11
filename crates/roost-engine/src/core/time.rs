use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of wall-clock time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock backed by `std::time::Instant`, measured from its creation.
/// Not usable on `wasm32-unknown-unknown`; roost-web supplies its own clock there.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Stopwatch measuring per-sample deltas and cumulative running time.
///
/// Each instance is independent: the frame loop owns one, gameplay code can
/// create its own for countdowns without disturbing frame pacing.
pub struct Timer {
    clock: Rc<dyn Clock>,
    auto_start: bool,
    running: bool,
    last_start_time: f64,
    last_delta_time: f64,
    /// Seconds accumulated while running.
    elapsed: f64,
}

impl Timer {
    /// Timer on the system clock. Starts immediately when `auto_start` is set.
    pub fn new(auto_start: bool) -> Self {
        Self::with_clock(auto_start, Rc::new(SystemClock::new()))
    }

    pub fn with_clock(auto_start: bool, clock: Rc<dyn Clock>) -> Self {
        let mut timer = Self {
            clock,
            auto_start,
            running: false,
            last_start_time: 0.0,
            last_delta_time: 0.0,
            elapsed: 0.0,
        };
        if auto_start {
            timer.start();
        }
        timer
    }

    /// Start the timer. No-op while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        let now = self.clock.now_ms();
        self.last_start_time = now;
        self.last_delta_time = now;
        self.running = true;
    }

    /// Stop the timer, folding the time since the last sample into `elapsed`.
    /// Safe to call when already stopped.
    pub fn stop(&mut self) {
        if self.running {
            self.sample();
        }
        self.running = false;
    }

    /// Seconds since the previous delta sample (or since start).
    ///
    /// A stopped timer with `auto_start` restarts first, so the result is
    /// measured from the new start point. A stopped timer without it yields 0.
    pub fn delta(&mut self) -> f64 {
        if self.auto_start && !self.running {
            self.start();
        }
        if self.running {
            self.sample()
        } else {
            0.0
        }
    }

    /// Total seconds this timer has been running.
    pub fn elapsed(&mut self) -> f64 {
        if self.running {
            self.sample();
        }
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    /// Clock reading (ms) at the most recent start.
    pub fn last_start_time(&self) -> f64 {
        self.last_start_time
    }

    fn sample(&mut self) -> f64 {
        let now = self.clock.now_ms();
        let diff = ((now - self.last_delta_time) / 1000.0).max(0.0);
        self.last_delta_time = now;
        self.elapsed += diff;
        diff
    }
}
