use std::time::{Duration, Instant};

/// Outcome of a finished frame relative to the pacing budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Finished early; wait `remaining` before starting the next frame.
    Early { remaining: Duration },
    /// Used exactly the budget.
    OnBudget,
    /// Took longer than the budget. Only the first overrun is logged.
    Overrun { elapsed: Duration },
}

impl FrameStatus {
    /// When the next frame should start, given the time this one finished.
    pub fn next_frame_at(self, now: Instant) -> Instant {
        match self {
            FrameStatus::Early { remaining } => now + remaining,
            FrameStatus::OnBudget | FrameStatus::Overrun { .. } => now,
        }
    }
}

/// Coarse fixed-rate pacing at whole-millisecond resolution.
#[derive(Debug, Clone)]
pub struct FramePacer {
    target_fps: u32,
    budget: Duration,
    overrun: bool,
}

impl FramePacer {
    /// A `target_fps` of zero is treated as one frame per second.
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            budget: Duration::from_millis(1000 / target_fps as u64),
            overrun: false,
        }
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Whether any frame has overrun the budget so far.
    pub fn has_overrun(&self) -> bool {
        self.overrun
    }

    /// Classify a frame by its elapsed time, truncated to whole milliseconds.
    pub fn finish(&mut self, elapsed: Duration) -> FrameStatus {
        let elapsed = whole_millis(elapsed);
        if elapsed < self.budget {
            return FrameStatus::Early {
                remaining: self.budget - elapsed,
            };
        }
        if elapsed == self.budget {
            return FrameStatus::OnBudget;
        }
        if !self.overrun {
            self.overrun = true;
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.budget.as_millis() as u64,
                "frame rate has dropped below {} FPS",
                self.target_fps
            );
        }
        FrameStatus::Overrun { elapsed }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(60)
    }
}

fn whole_millis(d: Duration) -> Duration {
    Duration::from_millis(d.as_millis() as u64)
}

/// Rolling window of recent frame times.
#[derive(Debug)]
pub struct FrameStats {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameStats {
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    /// Record a frame time. Returns `true` when the window has just wrapped.
    pub fn record(&mut self, dt: Duration) -> bool {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
            return true;
        }
        false
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }

    fn window(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.window().iter().sum::<Duration>() / count as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Frames in the window that ran past `budget`, measured the way
    /// [`FramePacer::finish`] measures them.
    pub fn over_budget(&self, budget: Duration) -> usize {
        self.window()
            .iter()
            .filter(|&&dt| whole_millis(dt) > budget)
            .count()
    }
}
