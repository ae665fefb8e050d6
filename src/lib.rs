//! Trajectory Playback - animated presentation of remotely simulated projectiles
//!
//! Core modules:
//! - `model`: Wire types and invariant checks for simulation responses
//! - `client`: Parameter validation and the remote simulate call
//! - `playback`: Frame-rate independent scheduler and frame loop handles
//! - `render`: Chart traces, the throw scene animator, theme colors
//! - `engine`: `PlaybackEngine`, the context object owning all playback state
//! - `platform`: Browser bindings (wasm32 only)

pub mod client;
pub mod engine;
pub mod error;
pub mod mode;
pub mod model;
pub mod platform;
pub mod playback;
pub mod presenter;
pub mod render;
pub mod settings;
pub mod stats;
pub mod surface;

pub use client::{HttpTransport, SimulationClient, SimulationTransport};
pub use engine::{
    LoopStatus, Playback, PlaybackEngine, SubmissionOutcome, SubmissionTicket, Surfaces,
};
pub use error::{ClientResult, SimulationError, ValidationError};
pub use model::{Mode, SimulationParameters, SimulationResponse, SimulationResult, TrajectoryStats};
pub use presenter::{Field, MemoryPresenter, Presenter};
pub use settings::Settings;

/// Engine configuration constants
pub mod consts {
    /// Simulation timestep requested from the service (seconds)
    pub const DEFAULT_DT: f64 = 0.02;
    /// Path of the simulate endpoint, relative to the service base URL
    pub const SIMULATE_PATH: &str = "/api/simulate";
    /// Generic message when the service fails without a readable reason
    pub const GENERIC_SERVER_ERROR: &str = "Simulation failed";

    /// Upper bound of the velocity slider
    pub const VELOCITY_SLIDER_MAX: f64 = 100.0;

    /// Text shown in summary fields when nothing is adopted
    pub const PLACEHOLDER: &str = "–";

    /// One color per trajectory, indexed modulo length
    pub const PALETTE: [&str; 6] = [
        "#ef4444", "#22c55e", "#3b82f6", "#eab308", "#a855f7", "#06b6d4",
    ];
}

/// Palette color for the trajectory at `index`
#[inline]
pub fn palette_color(palette: &[String], index: usize) -> &str {
    if palette.is_empty() {
        consts::PALETTE[index % consts::PALETTE.len()]
    } else {
        &palette[index % palette.len()]
    }
}
