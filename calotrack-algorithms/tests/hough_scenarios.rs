//! End-to-end scenarios for the Hough track finder.

use calotrack_algorithms::{distance_to_track, HoughConfig, HoughTrackFinder};
use calotrack_core::{CaloHit, CaloTrack, Cluster2D, ClusterId, Error, TrackFitter};
use nalgebra::Vector3;

/// Straight-line least-squares fitter standing in for the external
/// tracking collaborator.
struct LineFitter {
    /// Maximum accepted per-cluster residual (mm).
    max_residual: f64,
}

impl LineFitter {
    fn fit(clusters: &[Cluster2D], ids: &[ClusterId]) -> Option<[f64; 4]> {
        if ids.len() < 2 {
            return None;
        }
        let n = ids.len() as f64;
        let (mut sz, mut szz) = (0.0, 0.0);
        let (mut sx, mut sxz) = (0.0, 0.0);
        let (mut sy, mut syz) = (0.0, 0.0);
        for &id in ids {
            let p = clusters[id].position;
            sz += p.z;
            szz += p.z * p.z;
            sx += p.x;
            sxz += p.x * p.z;
            sy += p.y;
            syz += p.y * p.z;
        }
        let det = n * szz - sz * sz;
        if det.abs() < 1e-9 {
            return None;
        }
        let dxdz = (n * sxz - sz * sx) / det;
        let dydz = (n * syz - sz * sy) / det;
        let x0 = (sx - dxdz * sz) / n;
        let y0 = (sy - dydz * sz) / n;
        Some([x0, dxdz, y0, dydz])
    }

    fn accepts(&self, clusters: &[Cluster2D], id: ClusterId, track: &CaloTrack) -> bool {
        distance_to_track(&clusters[id].position, track)
            .map(|d| d <= self.max_residual)
            .unwrap_or(false)
    }
}

impl TrackFitter for LineFitter {
    fn run(&mut self, clusters: &[Cluster2D], candidates: &[ClusterId]) -> Option<CaloTrack> {
        let parameters = Self::fit(clusters, candidates)?;
        let track = CaloTrack::new(candidates.to_vec(), parameters);
        candidates
            .iter()
            .all(|&id| self.accepts(clusters, id, &track))
            .then_some(track)
    }

    fn try_add_cluster(
        &mut self,
        clusters: &[Cluster2D],
        id: ClusterId,
        track: &mut CaloTrack,
    ) -> bool {
        if track.contains(id) {
            return false;
        }
        if self.accepts(clusters, id, track) {
            track.clusters.push(id);
            return true;
        }
        false
    }

    fn split_track(&mut self, _clusters: &[Cluster2D], _track: &mut CaloTrack) {}
}

/// Fitter that accepts everything but always returns an undersized track.
struct StubShortFitter;

impl TrackFitter for StubShortFitter {
    fn run(&mut self, _clusters: &[Cluster2D], candidates: &[ClusterId]) -> Option<CaloTrack> {
        let take = candidates.len().min(3);
        Some(CaloTrack::new(
            candidates[..take].to_vec(),
            [0.0, 0.0, 0.0, 0.0],
        ))
    }

    fn try_add_cluster(
        &mut self,
        _clusters: &[Cluster2D],
        _id: ClusterId,
        _track: &mut CaloTrack,
    ) -> bool {
        false
    }

    fn split_track(&mut self, _clusters: &[Cluster2D], _track: &mut CaloTrack) {}
}

/// Fitter that never produces a track.
struct RejectingFitter;

impl TrackFitter for RejectingFitter {
    fn run(&mut self, _clusters: &[Cluster2D], _candidates: &[ClusterId]) -> Option<CaloTrack> {
        None
    }

    fn try_add_cluster(
        &mut self,
        _clusters: &[Cluster2D],
        _id: ClusterId,
        _track: &mut CaloTrack,
    ) -> bool {
        false
    }

    fn split_track(&mut self, _clusters: &[Cluster2D], _track: &mut CaloTrack) {}
}

fn cluster(x: f64, y: f64, z: f64, layer: i32) -> Cluster2D {
    Cluster2D::with_hits(Vector3::new(x, y, z), layer, vec![CaloHit::at(x, y, z)])
}

/// A vertical mip trace: one cluster per layer at fixed (x, y), 30 mm
/// layer spacing.
fn vertical_line(x: f64, y: f64, layers: i32) -> Vec<Cluster2D> {
    (0..layers)
        .map(|layer| cluster(x, y, f64::from(layer) * 30.0, layer))
        .collect()
}

#[test]
fn finds_single_track_among_noise() {
    let mut clusters = vertical_line(42.0, 57.0, 8);
    let noise_from = clusters.len();
    clusters.push(cluster(250.0, -180.0, 45.0, 1));
    clusters.push(cluster(-300.0, 220.0, 105.0, 3));
    clusters.push(cluster(400.0, -90.0, 195.0, 6));

    let mut finder = HoughTrackFinder::new(HoughConfig::default())
        .with_fitter(LineFitter { max_residual: 5.0 });
    let tracks = finder.run(&clusters).unwrap();

    assert_eq!(tracks.len(), 1);
    let track = &tracks[0];
    assert_eq!(track.len(), 8);
    for id in 0..noise_from {
        assert!(track.contains(id), "line cluster {id} missing from track");
    }
    for id in noise_from..clusters.len() {
        assert!(!track.contains(id), "noise cluster {id} ended up in track");
    }
}

#[test]
fn emitted_tracks_always_exceed_four_clusters() {
    let mut clusters = vertical_line(42.0, 57.0, 8);
    clusters.extend(vertical_line(-200.0, 10.0, 8));
    clusters.push(cluster(400.0, -90.0, 195.0, 6));

    let mut finder = HoughTrackFinder::new(HoughConfig::default())
        .with_fitter(LineFitter { max_residual: 5.0 });
    let tracks = finder.run(&clusters).unwrap();

    assert_eq!(tracks.len(), 2);
    for track in &tracks {
        assert!(track.len() > 4);
    }
}

#[test]
fn short_line_yields_no_track() {
    // Five collinear clusters: below both the bin-size predicate and the
    // refined-bin minimum.
    let clusters = vertical_line(42.0, 57.0, 5);

    let mut finder = HoughTrackFinder::new(HoughConfig::default())
        .with_fitter(LineFitter { max_residual: 5.0 });
    let tracks = finder.run(&clusters).unwrap();
    assert!(tracks.is_empty());
}

#[test]
fn undersized_fits_are_discarded() {
    let clusters = vertical_line(42.0, 57.0, 8);

    let mut finder = HoughTrackFinder::new(HoughConfig::default()).with_fitter(StubShortFitter);
    let tracks = finder.run(&clusters).unwrap();
    assert!(tracks.is_empty());
}

#[test]
fn fit_failures_terminate_without_tracks() {
    let clusters = vertical_line(42.0, 57.0, 8);

    let mut finder = HoughTrackFinder::new(HoughConfig::default()).with_fitter(RejectingFitter);
    let tracks = finder.run(&clusters).unwrap();
    assert!(tracks.is_empty());
}

#[test]
fn missing_fitter_is_a_configuration_error() {
    let clusters = vertical_line(42.0, 57.0, 8);

    let mut finder = HoughTrackFinder::<LineFitter>::new(HoughConfig::default());
    match finder.run(&clusters) {
        Err(Error::MissingFitter) => {}
        other => panic!("expected MissingFitter, got {other:?}"),
    }
}

#[test]
fn empty_event_produces_no_tracks() {
    let mut finder = HoughTrackFinder::new(HoughConfig::default())
        .with_fitter(LineFitter { max_residual: 5.0 });
    let tracks = finder.run(&[]).unwrap();
    assert!(tracks.is_empty());
}

#[test]
fn run_is_repeatable_over_unmodified_input() {
    let mut clusters = vertical_line(42.0, 57.0, 8);
    clusters.push(cluster(250.0, -180.0, 45.0, 1));

    let mut finder = HoughTrackFinder::new(HoughConfig::default())
        .with_fitter(LineFitter { max_residual: 5.0 });
    let first = finder.run(&clusters).unwrap();
    let second = finder.run(&clusters).unwrap();
    assert_eq!(first.len(), second.len());
    assert_eq!(first[0].clusters, second[0].clusters);
}
