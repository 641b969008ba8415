//! calotrack-algorithms: Track-finding algorithms for calorimeter
//! reconstruction.
//!
//! This crate provides:
//! - **Hough** - parameter-space track finding over layer clusters
//! - **Mip selection** - seed-cluster filtering by local density
//! - **Distance** - point-to-track line distance
//!
#![warn(missing_docs)]

mod distance;
mod hough;
mod mip;

pub use distance::distance_to_track;
pub use hough::{HoughBin, HoughConfig, HoughObject, HoughTag, HoughTrackFinder};
pub use mip::{select_mip_candidates, MipConfig};

// Re-export the core contract the finder is driven through.
pub use calotrack_core::{CaloTrack, Cluster2D, ClusterId, TrackFitter};
