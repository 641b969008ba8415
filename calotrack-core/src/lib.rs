//! calotrack-core: Core types and traits for calorimeter track reconstruction.
//!
//! This crate provides the foundational abstractions shared by the
//! reconstruction algorithms: calorimeter hits, layer clusters, fitted
//! tracks and the track-fitting collaborator contract.

pub mod cluster;
pub mod error;
pub mod hit;
pub mod track;

pub use cluster::{Cluster2D, ClusterId};
pub use error::{Error, Result};
pub use hit::CaloHit;
pub use track::{CaloTrack, TrackFitter};
