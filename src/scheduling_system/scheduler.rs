use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{FIXED_TIME_STEP, MAX_FRAME_TIME, MAX_SUB_STEPS, MAX_TIME_SCALE};
use crate::errors::SimulationError;

use super::clock::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub fixed_time_step: f64, // s
    pub max_sub_steps: u32,
    pub time_scale: f64,
    pub paused: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            fixed_time_step: FIXED_TIME_STEP,
            max_sub_steps: MAX_SUB_STEPS,
            time_scale: 1.0,
            paused: false,
        }
    }
}

impl SchedulerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.fixed_time_step.is_finite() || self.fixed_time_step <= 0.0 {
            return Err(SimulationError::InitializationError(format!(
                "fixed_time_step must be a positive number of seconds, got {}",
                self.fixed_time_step
            )));
        }
        if self.max_sub_steps == 0 {
            return Err(SimulationError::InitializationError(
                "max_sub_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn clamp_time_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        0.0
    } else {
        scale.clamp(0.0, MAX_TIME_SCALE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClockState {
    pub delta_time: f64,
    pub total_time: f64,
}

// `None` keeps the current value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClockUpdate {
    pub delta_time: Option<f64>,
    pub total_time: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type StepCallback = Box<dyn FnMut(&SimClockState, f64)>;

/// Stops the loop from anywhere, including from inside a subscriber while a
/// step is being delivered.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Accumulator loop turning irregular frame callbacks into uniform steps.
///
/// Frame time is clamped to [`MAX_FRAME_TIME`] and scaled. At most
/// `max_sub_steps` steps run per frame; whole steps still pending after the
/// cap are dropped and only the sub-step remainder carries over.
pub struct FixedStepScheduler<C: Clock = SystemClock> {
    config: SchedulerConfig,
    clock: C,
    state: SimClockState,
    accumulator: f64,
    last_time: f64,
    running: Arc<AtomicBool>,
    subscribers: Vec<(SubscriptionId, StepCallback)>,
    next_subscription: u64,
    dropped_frames: u64,
    dropped_steps: u64,
}

impl FixedStepScheduler<SystemClock> {
    pub fn with_system_clock(config: SchedulerConfig) -> Result<Self, SimulationError> {
        Self::new(config, SystemClock::new())
    }
}

impl<C: Clock> FixedStepScheduler<C> {
    pub fn new(mut config: SchedulerConfig, clock: C) -> Result<Self, SimulationError> {
        config.validate()?;
        config.time_scale = clamp_time_scale(config.time_scale);

        let last_time = clock.now();
        Ok(FixedStepScheduler {
            config,
            clock,
            state: SimClockState::default(),
            accumulator: 0.0,
            last_time,
            running: Arc::new(AtomicBool::new(false)),
            subscribers: Vec::new(),
            next_subscription: 0,
            dropped_frames: 0,
            dropped_steps: 0,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SimClockState, f64) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription, _)| *subscription != id);
        self.subscribers.len() != before
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: Arc::clone(&self.running),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.config.paused
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);
        self.last_time = self.clock.now();
        log::info!(
            "Scheduler started: dt={:.4}s, max_sub_steps={}, time_scale={}",
            self.config.fixed_time_step,
            self.config.max_sub_steps,
            self.config.time_scale
        );
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("Scheduler stopped at t={:.3}s", self.state.total_time);
        }
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn pause(&mut self) {
        self.config.paused = true;
    }

    pub fn resume(&mut self) {
        self.config.paused = false;
        // Time spent paused is never integrated
        self.last_time = self.clock.now();
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.config.time_scale = clamp_time_scale(scale);
    }

    pub fn time_scale(&self) -> f64 {
        self.config.time_scale
    }

    /// Advances one fixed step even while stopped. Refused while paused.
    pub fn step(&mut self) -> bool {
        if self.config.paused {
            return false;
        }
        self.update(self.config.fixed_time_step);
        true
    }

    pub fn frame(&mut self) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let now = self.clock.now();
        let frame_time = now - self.last_time;
        self.last_time = now;
        self.advance(frame_time)
    }

    pub fn advance(&mut self, frame_time: f64) -> u32 {
        if !self.is_running() || self.config.paused {
            return 0;
        }

        let clamped = if frame_time.is_finite() {
            frame_time.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += clamped * self.config.time_scale;

        let step_size = self.config.fixed_time_step;
        let mut steps = 0;
        while self.accumulator >= step_size && steps < self.config.max_sub_steps {
            if !self.is_running() {
                break;
            }
            self.update(step_size);
            self.accumulator -= step_size;
            steps += 1;
        }

        if self.accumulator >= step_size && self.is_running() {
            let pending = (self.accumulator / step_size).floor();
            self.accumulator = (self.accumulator - pending * step_size).max(0.0);
            self.dropped_frames += 1;
            self.dropped_steps += pending as u64;
            log::debug!(
                "Frame hit the {}-step cap, dropped {} pending steps",
                self.config.max_sub_steps,
                pending
            );
        }

        steps
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn dropped_steps(&self) -> u64 {
        self.dropped_steps
    }

    pub fn state(&self) -> SimClockState {
        self.state
    }

    pub fn set_state(&mut self, update: SimClockUpdate) {
        if let Some(delta_time) = update.delta_time {
            self.state.delta_time = delta_time;
        }
        if let Some(total_time) = update.total_time {
            self.state.total_time = total_time;
        }
    }

    fn update(&mut self, delta_time: f64) {
        self.state.delta_time = delta_time;
        self.state.total_time += delta_time;

        let state = self.state;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&state, delta_time);
        }
    }
}
