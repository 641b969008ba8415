//! Track types and the fitting collaborator contract.

use crate::cluster::{Cluster2D, ClusterId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fitted track candidate.
///
/// The four parameters `[x0, dx/dz, y0, dy/dz]` describe the straight line
/// `x = x0 + (dx/dz) z`, `y = y0 + (dy/dz) z` in detector coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaloTrack {
    /// Indices of the clusters assigned to this track, in fit order.
    pub clusters: Vec<ClusterId>,
    /// Track parameters `[x0, dx/dz, y0, dy/dz]`.
    pub parameters: [f64; 4],
}

impl CaloTrack {
    /// Creates a track from its cluster list and fitted parameters.
    #[must_use]
    pub fn new(clusters: Vec<ClusterId>, parameters: [f64; 4]) -> Self {
        Self {
            clusters,
            parameters,
        }
    }

    /// Returns the number of clusters assigned to the track.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns true if no cluster is assigned to the track.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Returns true if the given cluster is assigned to the track.
    #[must_use]
    pub fn contains(&self, id: ClusterId) -> bool {
        self.clusters.contains(&id)
    }
}

/// External track-fitting collaborator.
///
/// The Hough track finder delegates fitting, incremental cluster
/// attachment and track splitting to an implementation of this trait.
pub trait TrackFitter {
    /// Attempts to fit a track through the candidate clusters.
    ///
    /// Returns `None` when no acceptable fit exists.
    fn run(&mut self, clusters: &[Cluster2D], candidates: &[ClusterId]) -> Option<CaloTrack>;

    /// Offers one more cluster to an existing track.
    ///
    /// Returns true when the cluster was accepted; the track's cluster
    /// list is extended in place.
    fn try_add_cluster(
        &mut self,
        clusters: &[Cluster2D],
        id: ClusterId,
        track: &mut CaloTrack,
    ) -> bool;

    /// Post-processes a fitted track, potentially splitting off outlying
    /// sections. The track is modified in place.
    fn split_track(&mut self, clusters: &[Cluster2D], track: &mut CaloTrack);
}
