//! Layer cluster types: hits grouped within a single calorimeter layer.

use crate::hit::CaloHit;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a cluster within the event's cluster list.
///
/// The track finder identifies clusters by their position in the caller's
/// slice; tracks carry these indices rather than owning cluster data.
pub type ClusterId = usize;

/// A reconstructed 2D cluster: hits grouped within one layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster2D {
    /// Cluster barycentre in detector coordinates (mm).
    pub position: Vector3<f64>,
    /// Layer the cluster belongs to.
    pub layer: i32,
    /// Constituent hits.
    pub hits: Vec<CaloHit>,
}

impl Cluster2D {
    /// Creates an empty cluster at the given position and layer.
    #[must_use]
    pub fn new(position: Vector3<f64>, layer: i32) -> Self {
        Self {
            position,
            layer,
            hits: Vec::new(),
        }
    }

    /// Creates a cluster with its constituent hits.
    #[must_use]
    pub fn with_hits(position: Vector3<f64>, layer: i32, hits: Vec<CaloHit>) -> Self {
        Self {
            position,
            layer,
            hits,
        }
    }

    /// Adds a hit to the cluster.
    pub fn push(&mut self, hit: CaloHit) {
        self.hits.push(hit);
    }

    /// Returns the number of hits in the cluster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if the cluster has no hits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
