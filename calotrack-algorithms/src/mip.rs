//! Mip-candidate selection.
//!
//! Filters the event's clusters down to the sparse, low-multiplicity
//! subset plausibly left by a minimum-ionizing particle. Only those
//! clusters take part in the Hough vote.

use calotrack_core::{Cluster2D, ClusterId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Same-layer neighbourhood half-width (mm) for the density census.
const NEIGHBOUR_WINDOW: f64 = 50.0;

/// Hit count above which a neighbour counts as a core neighbour.
const CORE_NEIGHBOUR_HITS: usize = 5;

/// Thresholds for mip-candidate selection.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MipConfig {
    /// Maximum hit count for a cluster to qualify as mip-like.
    pub max_cluster_size: usize,
    /// Maximum number of same-layer neighbours within the census window.
    pub max_neighbours: i32,
    /// Maximum number of same-layer core neighbours (above
    /// [`CORE_NEIGHBOUR_HITS`] hits) within the census window.
    pub max_core_neighbours: i32,
}

impl Default for MipConfig {
    fn default() -> Self {
        Self {
            max_cluster_size: 4,
            max_neighbours: 2,
            max_core_neighbours: 0,
        }
    }
}

/// Selects the clusters eligible to seed tracks.
///
/// A cluster qualifies when its hit count does not exceed
/// `max_cluster_size` and its same-layer neighbourhood is sparse enough:
/// either the total neighbour count or the core-neighbour count must stay
/// within its threshold. The two censuses are alternatives; passing
/// either one admits the cluster.
///
/// Quadratic in the cluster count. The selection reads the input only,
/// so repeated calls over an unmodified event yield identical results.
#[must_use]
pub fn select_mip_candidates(clusters: &[Cluster2D], config: &MipConfig) -> Vec<ClusterId> {
    let mut candidates = Vec::new();

    for (id, cluster) in clusters.iter().enumerate() {
        if cluster.hits.len() > config.max_cluster_size {
            continue;
        }

        let mut neighbours = 0_i32;
        let mut core_neighbours = 0_i32;

        for (other_id, other) in clusters.iter().enumerate() {
            if other_id == id || other.layer != cluster.layer {
                continue;
            }
            let dx = (cluster.position.x - other.position.x).abs();
            let dy = (cluster.position.y - other.position.y).abs();
            if dx < NEIGHBOUR_WINDOW && dy < NEIGHBOUR_WINDOW {
                neighbours += 1;
                if other.hits.len() > CORE_NEIGHBOUR_HITS {
                    core_neighbours += 1;
                }
            }
        }

        if neighbours <= config.max_neighbours || core_neighbours <= config.max_core_neighbours {
            candidates.push(id);
        }
    }

    candidates
}
