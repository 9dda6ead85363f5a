//=========================================================================
// Time Step
//=========================================================================
//
// Frame clock feeding `Game::step`.
//
// The clock never reads the system time itself: the platform driver (or
// a test) passes the current time in milliseconds to `step`, which
// answers with the `(time, delta)` pair for the frame.
//
// Delta handling:
//   raw delta → clamp to target interval (cool-down / unfocused)
//             → clamp to min-fps interval
//             → average over the history window (smooth_step)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::config::FpsConfig;

//=== TimeStep ============================================================

#[derive(Debug, Clone)]
pub struct TimeStep {
    target_fps: f64,
    min_fps: f64,
    smooth_step: bool,
    history_size: usize,
    panic_max: u32,

    history: VecDeque<f64>,
    cool_down: u32,

    running: bool,
    started: bool,
    resync: bool,
    in_focus: bool,

    start_time: f64,
    last_time: f64,
    now: f64,
    delta: f64,
    raw_delta: f64,
    frame: u64,

    actual_fps: f64,
    next_fps_update: f64,
    frames_this_second: u32,
}

impl TimeStep {
    //--- Construction -----------------------------------------------------

    pub fn new(config: &FpsConfig) -> Self {
        let target_fps = if config.target > 0.0 { config.target } else { 60.0 };
        let min_fps = if config.min > 0.0 { config.min.min(target_fps) } else { 5.0 };

        let mut step = Self {
            target_fps,
            min_fps,
            smooth_step: config.smooth_step,
            history_size: config.delta_history.max(1),
            panic_max: config.panic_max,
            history: VecDeque::new(),
            cool_down: 0,
            running: false,
            started: false,
            resync: false,
            in_focus: true,
            start_time: 0.0,
            last_time: 0.0,
            now: 0.0,
            delta: 0.0,
            raw_delta: 0.0,
            frame: 0,
            actual_fps: target_fps,
            next_fps_update: 0.0,
            frames_this_second: 0,
        };
        step.reset_delta();
        step
    }

    //--- Control ----------------------------------------------------------

    /// Starts ticking; the first `step` only establishes the time base.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.running = true;
        self.resync = true;
        debug!("TimeStep started (target {} fps, min {} fps)", self.target_fps, self.min_fps);
    }

    /// Advances one frame. Returns `None` while not running.
    pub fn step(&mut self, now: f64) -> Option<(f64, f64)> {
        if !self.running {
            return None;
        }

        if !self.started {
            self.started = true;
            self.start_time = now;
            self.last_time = now;
            self.next_fps_update = now + 1000.0;
        } else if self.resync {
            self.last_time = now;
        }
        self.resync = false;

        self.frame += 1;
        let raw = (now - self.last_time).max(0.0);
        self.raw_delta = raw;

        let mut dt = raw;
        if self.cool_down > 0 || !self.in_focus {
            self.cool_down = self.cool_down.saturating_sub(1);
            dt = dt.min(self.target_interval());
        }
        dt = dt.min(self.min_interval());

        self.delta = if self.smooth_step {
            self.history.push_back(dt);
            while self.history.len() > self.history_size {
                self.history.pop_front();
            }
            self.history.iter().sum::<f64>() / self.history.len() as f64
        } else {
            dt
        };

        if now > self.next_fps_update {
            self.actual_fps = 0.25 * f64::from(self.frames_this_second) + 0.75 * self.actual_fps;
            self.next_fps_update = now + 1000.0;
            self.frames_this_second = 0;
        }
        self.frames_this_second += 1;

        self.now = now;
        self.last_time = now;
        trace!("frame {} at {:.2}ms (delta {:.3})", self.frame, now, self.delta);
        Some((now, self.delta))
    }

    /// Stops ticking until `resume`.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Restarts ticking without reporting the paused span as delta.
    pub fn resume(&mut self) {
        self.reset_delta();
        self.wake();
    }

    pub fn sleep(&mut self) {
        self.running = false;
    }

    pub fn wake(&mut self) {
        self.running = true;
        self.resync = true;
    }

    pub fn blur(&mut self) {
        self.in_focus = false;
    }

    pub fn focus(&mut self) {
        self.in_focus = true;
        self.reset_delta();
    }

    /// Refills the delta history with the target interval and enters the
    /// cool-down window.
    pub fn reset_delta(&mut self) {
        let interval = self.target_interval();
        self.history.clear();
        self.history.extend(std::iter::repeat(interval).take(self.history_size));
        self.cool_down = self.panic_max;
    }

    pub fn destroy(&mut self) {
        self.running = false;
        self.started = false;
        self.history.clear();
    }

    //--- Queries ----------------------------------------------------------

    /// Milliseconds per frame at the target rate.
    pub fn target_interval(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// Largest delta ever reported, from the min fps.
    pub fn min_interval(&self) -> f64 {
        1000.0 / self.min_fps
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn in_focus(&self) -> bool {
        self.in_focus
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Time of the latest frame.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Milliseconds since the first frame.
    pub fn elapsed(&self) -> f64 {
        self.now - self.start_time
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn raw_delta(&self) -> f64 {
        self.raw_delta
    }

    pub fn actual_fps(&self) -> f64 {
        self.actual_fps
    }
}

//=========================================================================
// Tests
//=========================================================================
