//! Playback timing
//!
//! - `scheduler`: per-trajectory sample cursors advanced by wall-clock time
//! - `frame_loop`: handles that keep at most one frame loop live per surface

pub mod frame_loop;
pub mod scheduler;

pub use frame_loop::{FrameLoop, LoopId};
pub use scheduler::{CursorMove, PlaybackScheduler, TickFrame, TrajectoryPhase, frame_advance};
