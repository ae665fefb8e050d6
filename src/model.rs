//! Simulation wire types
//!
//! Field names follow the service's JSON (camelCase). Extra fields the service
//! sends (`t`, `velocity`, `gravity`) are ignored on decode.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DT;
use crate::error::SimulationError;

/// Presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One or more trajectories on a shared chart
    #[default]
    Compare,
    /// A single trajectory thrown by a figure on a raster scene
    Throw,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Compare => "compare",
            Mode::Throw => "throw",
        }
    }

    /// Parse a mode selector value. The page's older values are accepted too.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "compare" | "cartesian" => Some(Mode::Compare),
            "throw" | "boy" => Some(Mode::Throw),
            _ => None,
        }
    }
}

/// Request body for the simulate call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Launch speed (m/s)
    pub velocity: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Launch angles in degrees, in request order
    pub angles: Vec<f64>,
    /// Simulation timestep (s)
    pub dt: f64,
}

impl SimulationParameters {
    pub fn new(velocity: f64, gravity: f64, angles: Vec<f64>) -> Self {
        Self {
            velocity,
            gravity,
            angles,
            dt: DEFAULT_DT,
        }
    }
}

/// Summary values computed by the service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryStats {
    pub max_height: f64,
    pub time_of_flight: f64,
    pub range: f64,
}

/// One trajectory: parallel `x`/`y` samples at multiples of `dt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub angle: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub stats: TrajectoryStats,
}

impl SimulationResult {
    /// Sample count
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Index of the final sample
    pub fn last_index(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Sample at `index`, clamped to the final sample
    pub fn point(&self, index: usize) -> (f64, f64) {
        let i = index.min(self.last_index());
        (self.x[i], self.y[i])
    }

    /// Largest horizontal extent (never negative)
    pub fn max_x(&self) -> f64 {
        self.x.iter().copied().fold(0.0, f64::max)
    }

    /// Largest vertical extent (never negative)
    pub fn max_y(&self) -> f64 {
        self.y.iter().copied().fold(0.0, f64::max)
    }
}

/// Decoded reply of a successful simulate call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub dt: f64,
    pub results: Vec<SimulationResult>,
}

impl SimulationResponse {
    /// Check the invariants playback relies on.
    ///
    /// `expected` is the number of angles in the request; the service answers
    /// with exactly one result per angle.
    pub fn check(&self, expected: usize) -> Result<(), SimulationError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(malformed(format!("dt {} is not positive", self.dt)));
        }
        if self.results.len() != expected {
            return Err(malformed(format!(
                "{} results for {} angles",
                self.results.len(),
                expected
            )));
        }
        for r in &self.results {
            if r.x.len() != r.y.len() {
                return Err(malformed(format!(
                    "angle {}: {} x samples but {} y samples",
                    r.angle,
                    r.x.len(),
                    r.y.len()
                )));
            }
            if r.is_empty() {
                return Err(malformed(format!("angle {}: no samples", r.angle)));
            }
        }
        Ok(())
    }

    /// Sample counts per trajectory, in result order
    pub fn lengths(&self) -> Vec<usize> {
        self.results.iter().map(SimulationResult::len).collect()
    }
}

fn malformed(detail: String) -> SimulationError {
    log::warn!("Rejected simulation response: {}", detail);
    SimulationError::Server("malformed simulation response".to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn result(angle: f64, x: Vec<f64>, y: Vec<f64>) -> SimulationResult {
        SimulationResult {
            angle,
            x,
            y,
            stats: TrajectoryStats {
                max_height: 3.0,
                time_of_flight: 0.06,
                range: 3.0,
            },
        }
    }

    /// Response with one trajectory per `(angle, len)` pair
    pub(crate) fn response(shape: &[(f64, usize)]) -> SimulationResponse {
        SimulationResponse {
            dt: 0.02,
            results: shape
                .iter()
                .map(|&(angle, n)| {
                    let x = (0..n).map(|i| i as f64).collect();
                    let y = (0..n).map(|i| (i * (n - 1 - i)) as f64).collect();
                    result(angle, x, y)
                })
                .collect(),
        }
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let json = r#"{
            "velocity": 20.0, "gravity": 9.8, "dt": 0.02,
            "results": [{
                "angle": 45.0, "t": [0.0, 0.02], "x": [0.0, 0.28], "y": [0.0, 0.28],
                "stats": {"maxHeight": 10.2, "timeOfFlight": 2.88, "range": 40.8}
            }]
        }"#;
        let response: SimulationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].stats.time_of_flight, 2.88);
        assert!(response.check(1).is_ok());
    }

    #[test]
    fn test_check_rejects_length_mismatch() {
        let mut response = response(&[(30.0, 4)]);
        response.results[0].y.pop();
        assert!(matches!(response.check(1), Err(SimulationError::Server(_))));
    }

    #[test]
    fn test_check_rejects_empty_series() {
        let response = response(&[(30.0, 0)]);
        assert!(response.check(1).is_err());
    }

    #[test]
    fn test_check_rejects_wrong_result_count() {
        let response = response(&[(30.0, 4), (45.0, 4)]);
        assert!(response.check(3).is_err());
        assert!(response.check(2).is_ok());
    }

    #[test]
    fn test_check_rejects_bad_dt() {
        let mut response = response(&[(30.0, 4)]);
        response.dt = 0.0;
        assert!(response.check(1).is_err());
    }

    #[test]
    fn test_point_clamps_to_last_sample() {
        let r = result(30.0, vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 2.0, 3.0, 0.0]);
        assert_eq!(r.point(2), (2.0, 3.0));
        assert_eq!(r.point(10), (3.0, 0.0));
        assert_eq!(r.max_x(), 3.0);
        assert_eq!(r.max_y(), 3.0);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("Compare"), Some(Mode::Compare));
        assert_eq!(Mode::from_str("cartesian"), Some(Mode::Compare));
        assert_eq!(Mode::from_str("boy"), Some(Mode::Throw));
        assert_eq!(Mode::from_str("orbit"), None);
    }
}
