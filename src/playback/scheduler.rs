//! Compare-mode playback scheduler
//!
//! Every trajectory advances in lockstep by the same number of samples per
//! tick, derived from wall-clock time so a slow display still reaches the end
//! on time and a fast one never runs ahead of real time:
//!
//! `advance = max(1, floor(elapsed / dt))`, `index = min(index + advance, N - 1)`
//!
//! Each trajectory is bounded by its own sample count.

use crate::model::SimulationResponse;

/// Per-trajectory lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryPhase {
    /// At sample 0, not yet ticked
    Idle,
    /// Ticked, not at the final sample
    Running,
    /// At the final sample
    Completed,
}

/// A trajectory whose index changed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub trajectory: usize,
    pub index: usize,
}

/// What one tick produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickFrame {
    pub advance: usize,
    pub moved: Vec<CursorMove>,
    /// Every trajectory is at its final sample; no further tick is needed
    pub done: bool,
}

/// Absorbs rounding in `elapsed / dt` (0.1 / 0.02 must give 5, not 4)
const STEP_EPSILON: f64 = 1e-9;

/// Sample steps for `elapsed` seconds of wall-clock time
pub fn frame_advance(elapsed: f64, dt: f64) -> usize {
    if !(elapsed.is_finite() && elapsed > 0.0) {
        return 1;
    }
    let steps = (elapsed / dt + STEP_EPSILON).floor();
    if steps >= usize::MAX as f64 {
        usize::MAX
    } else {
        (steps as usize).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    dt: f64,
    lengths: Vec<usize>,
    indices: Vec<usize>,
    ticked: bool,
    finished: bool,
    cancelled: bool,
    last_time: Option<f64>,
}

impl PlaybackScheduler {
    /// `lengths` holds the sample count of each trajectory (each at least 1)
    pub fn new(dt: f64, lengths: Vec<usize>) -> Self {
        let indices = vec![0; lengths.len()];
        Self {
            dt,
            lengths,
            indices,
            ticked: false,
            finished: false,
            cancelled: false,
            last_time: None,
        }
    }

    pub fn from_response(response: &SimulationResponse) -> Self {
        Self::new(response.dt, response.lengths())
    }

    /// Mark the loop start; the first tick measures elapsed time from `now`
    pub fn start(&mut self, now: f64) {
        self.last_time = Some(now);
        self.cancelled = false;
    }

    /// Advance every trajectory. `now` is in seconds.
    ///
    /// Returns `None` once cancelled or finished: ticks past completion are
    /// no-ops.
    pub fn tick(&mut self, now: f64) -> Option<TickFrame> {
        if self.cancelled || self.finished {
            return None;
        }

        let elapsed = self.last_time.map_or(0.0, |last| now - last);
        self.last_time = Some(now);
        let advance = frame_advance(elapsed, self.dt);
        self.ticked = true;

        let mut moved = Vec::new();
        for (trajectory, (index, &len)) in self.indices.iter_mut().zip(&self.lengths).enumerate() {
            let last = len.saturating_sub(1);
            let next = index.saturating_add(advance).min(last);
            if next != *index {
                *index = next;
                moved.push(CursorMove {
                    trajectory,
                    index: next,
                });
            }
        }

        self.finished = self.all_at_end();
        Some(TickFrame {
            advance,
            moved,
            done: self.finished,
        })
    }

    /// Stop advancing. Indices are kept; `reset` rewinds them.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Rewind every trajectory to Idle
    pub fn reset(&mut self) {
        self.indices.iter_mut().for_each(|i| *i = 0);
        self.ticked = false;
        self.finished = false;
        self.cancelled = false;
        self.last_time = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether the final tick has happened
    pub fn is_done(&self) -> bool {
        self.finished
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn index(&self, trajectory: usize) -> Option<usize> {
        self.indices.get(trajectory).copied()
    }

    pub fn phase(&self, trajectory: usize) -> Option<TrajectoryPhase> {
        let index = *self.indices.get(trajectory)?;
        let last = self.lengths[trajectory].saturating_sub(1);
        Some(if !self.ticked {
            TrajectoryPhase::Idle
        } else if index >= last {
            TrajectoryPhase::Completed
        } else {
            TrajectoryPhase::Running
        })
    }

    fn all_at_end(&self) -> bool {
        self.indices
            .iter()
            .zip(&self.lengths)
            .all(|(&i, &len)| i >= len.saturating_sub(1))
    }
}
