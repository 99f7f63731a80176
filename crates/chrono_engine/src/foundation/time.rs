//! Time management utilities

use std::time::Instant;

/// Frame timer producing per-frame delta time for the host loop
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: 0.25,
        }
    }

    /// Clamp reported deltas (e.g. after a debugger pause or a window drag)
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Update the timer (should be called once per frame) and return the delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_time = elapsed.min(self.max_delta);
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed (clamped) time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// One-shot countdown advanced by simulation time.
///
/// Fires exactly once when the remaining time reaches zero. A cancelled
/// countdown never fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
    state: CountdownState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Running,
    Fired,
    Cancelled,
}

impl Countdown {
    /// Start a countdown of `duration` seconds
    pub fn start(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
            state: CountdownState::Running,
        }
    }

    /// Advance by `delta_time`; returns true on the tick that completes it
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.state = CountdownState::Fired;
            return true;
        }
        false
    }

    /// Invalidate the countdown so it can no longer fire
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    /// Seconds left before firing
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whether the countdown is still pending
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// Whether the countdown has fired
    pub fn has_fired(&self) -> bool {
        self.state == CountdownState::Fired
    }

    /// Whether the countdown was cancelled before firing
    pub fn is_cancelled(&self) -> bool {
        self.state == CountdownState::Cancelled
    }
}
