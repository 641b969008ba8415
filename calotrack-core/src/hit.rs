//! Calorimeter hit types.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single calorimeter hit: one fired cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaloHit {
    /// Cell centre in detector coordinates (mm).
    pub position: Vector3<f64>,
    /// Deposited energy (MIP-equivalent units).
    pub energy: f64,
    /// Hit time (ns); zero when the detector provides no timing.
    pub time: f64,
}

impl CaloHit {
    /// Creates a new hit.
    #[must_use]
    pub fn new(position: Vector3<f64>, energy: f64, time: f64) -> Self {
        Self {
            position,
            energy,
            time,
        }
    }

    /// Creates a hit with unit energy and no timing information.
    #[must_use]
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(Vector3::new(x, y, z), 1.0, 0.0)
    }
}
