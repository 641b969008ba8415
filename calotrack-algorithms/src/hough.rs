//! Hough-transform track finding.
//!
//! Each mip-candidate cluster is mapped into (theta, rho) parameter space
//! for the ZX and ZY projections, one rho per discretized angle step.
//! Objects voting for the same (theta, rho-within-tolerance) pair
//! accumulate in bins; the largest bins are refined and greedily grown
//! into tracks through the external [`TrackFitter`] collaborator.

use crate::mip::{self, MipConfig};
use calotrack_core::{CaloTrack, Cluster2D, ClusterId, Error, Result, TrackFitter};
use log::debug;
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum member count a refined bin needs before fitting is attempted.
const MIN_REFINED_BIN_SIZE: usize = 7;

/// Tracks with this many clusters or fewer are discarded as noise.
const SHORT_TRACK_CLUSTERS: usize = 4;

/// Configuration for the Hough track finder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HoughConfig {
    /// Number of discrete angle steps over [0, pi).
    pub theta_steps: u32,
    /// Detector pixel pitch (mm); sets the base rho binning scale.
    pub pixel_size: f64,
    /// Fractional widening of the rho acceptance on top of one pixel.
    pub rho_tolerance: f64,
    /// Maximum layer gap for two bin members to count as adjacent.
    pub isolation_distance: i32,
    /// Minimum member count for a bin to survive a selection round.
    pub minimum_bin_size: usize,
    /// Mip-candidate selection thresholds.
    pub mip: MipConfig,
    /// Dump per-object details at debug level.
    pub print_debug: bool,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            theta_steps: 100,
            pixel_size: 10.0,
            rho_tolerance: 0.35,
            isolation_distance: 2,
            minimum_bin_size: 6,
            mip: MipConfig::default(),
            print_debug: false,
        }
    }
}

impl HoughConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of angle steps.
    #[must_use]
    pub fn with_theta_steps(mut self, steps: u32) -> Self {
        self.theta_steps = steps;
        self
    }

    /// Sets the detector pixel pitch.
    #[must_use]
    pub fn with_pixel_size(mut self, size: f64) -> Self {
        self.pixel_size = size;
        self
    }

    /// Sets the fractional rho tolerance.
    #[must_use]
    pub fn with_rho_tolerance(mut self, tolerance: f64) -> Self {
        self.rho_tolerance = tolerance;
        self
    }

    /// Sets the isolation distance in layers.
    #[must_use]
    pub fn with_isolation_distance(mut self, distance: i32) -> Self {
        self.isolation_distance = distance;
        self
    }

    /// Sets the minimum surviving bin size.
    #[must_use]
    pub fn with_minimum_bin_size(mut self, size: usize) -> Self {
        self.minimum_bin_size = size;
        self
    }

    /// Sets the mip-candidate selection thresholds.
    #[must_use]
    pub fn with_mip(mut self, mip: MipConfig) -> Self {
        self.mip = mip;
        self
    }

    /// Half-width of the rho acceptance window around a bin representative.
    fn rho_window(&self) -> f64 {
        self.pixel_size * (1.0 + self.rho_tolerance)
    }
}

/// Lifecycle tag of a Hough object within one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoughTag {
    /// Not yet classified.
    Untagged,
    /// Selected as a mip candidate, available for track seeding.
    Mip,
    /// Consumed by a fitted track.
    Track,
}

/// Projection plane a rho sequence refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Projection {
    Zx,
    Zy,
}

/// One candidate cluster mapped into Hough parameter space.
#[derive(Clone, Debug)]
pub struct HoughObject {
    /// Index of the wrapped cluster in the event's cluster list.
    pub cluster: ClusterId,
    /// Layer of the wrapped cluster.
    pub layer: i32,
    /// rho per angle step, ZX projection.
    pub rho_zx: Vec<f64>,
    /// rho per angle step, ZY projection.
    pub rho_zy: Vec<f64>,
    /// Lifecycle tag.
    pub tag: HoughTag,
}

impl HoughObject {
    /// Maps a cluster into (theta, rho) space for both projections.
    ///
    /// For angle step i, `theta_i = i * pi / theta_steps` and
    /// `rho = z cos(theta) + u sin(theta)` with u the x (ZX) or y (ZY)
    /// coordinate of the cluster position. Both sequences have exactly
    /// `theta_steps` entries, indexed by step.
    #[must_use]
    pub fn from_cluster(id: ClusterId, cluster: &Cluster2D, theta_steps: u32) -> Self {
        let mut rho_zx = Vec::with_capacity(theta_steps as usize);
        let mut rho_zy = Vec::with_capacity(theta_steps as usize);
        let (x, y, z) = (cluster.position.x, cluster.position.y, cluster.position.z);
        for step in 0..theta_steps {
            let theta = f64::from(step) * PI / f64::from(theta_steps);
            let (sin, cos) = theta.sin_cos();
            rho_zx.push(z * cos + x * sin);
            rho_zy.push(z * cos + y * sin);
        }
        Self {
            cluster: id,
            layer: cluster.layer,
            rho_zx,
            rho_zy,
            tag: HoughTag::Mip,
        }
    }

    fn rho(&self, plane: Projection, step: usize) -> f64 {
        match plane {
            Projection::Zx => self.rho_zx[step],
            Projection::Zy => self.rho_zy[step],
        }
    }
}

/// One vote bucket: objects sharing an angle step whose rho falls within
/// the acceptance window of the bin representative.
#[derive(Clone, Debug)]
pub struct HoughBin {
    /// Shared angle step.
    pub theta: u32,
    /// Representative rho: the rho of the first object placed in the bin.
    /// Never recomputed as members accumulate.
    pub rho: f64,
    /// Pool indices of member objects.
    pub objects: Vec<usize>,
}

impl HoughBin {
    /// Returns the number of member objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the bin has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Hough-transform track finder.
///
/// Generic over the fitting collaborator; a fitter must be attached with
/// [`HoughTrackFinder::with_fitter`] before [`HoughTrackFinder::run`] is
/// called.
pub struct HoughTrackFinder<F> {
    config: HoughConfig,
    fitter: Option<F>,
}

impl<F: TrackFitter> HoughTrackFinder<F> {
    /// Creates a finder with the given configuration and no fitter.
    #[must_use]
    pub fn new(config: HoughConfig) -> Self {
        Self {
            config,
            fitter: None,
        }
    }

    /// Attaches the fitting collaborator.
    #[must_use]
    pub fn with_fitter(mut self, fitter: F) -> Self {
        self.fitter = Some(fitter);
        self
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &HoughConfig {
        &self.config
    }

    /// Runs track finding over the event's clusters.
    ///
    /// Returns the fitted tracks, each with more than four clusters.
    /// Clusters are only read; track membership is reported through the
    /// returned tracks' cluster indices.
    ///
    /// # Errors
    ///
    /// [`Error::MissingFitter`] when no fitter was attached; nothing is
    /// allocated on that path.
    pub fn run(&mut self, clusters: &[Cluster2D]) -> Result<Vec<CaloTrack>> {
        let config = &self.config;
        let fitter = self.fitter.as_mut().ok_or(Error::MissingFitter)?;

        let mut pool = create_hough_objects(clusters, config);
        let mut bins = bins_from_zx(&pool, config);
        let mut tracks: Vec<CaloTrack> = Vec::new();

        while !bins.is_empty() {
            // The working set is sorted by descending size, so the head
            // is the current best candidate.
            let Some(mut best) = best_bin_from_zy(&pool, &bins[0], config) else {
                bins.remove(0);
                continue;
            };
            remove_isolated(&pool, &mut best, config);

            if best.len() < MIN_REFINED_BIN_SIZE {
                bins.remove(0);
                continue;
            }

            let candidates: Vec<ClusterId> =
                best.objects.iter().map(|&idx| pool[idx].cluster).collect();

            if let Some(mut track) = fitter.run(clusters, &candidates) {
                // Offer every remaining candidate to the fitter; only
                // clusters already in this track are skipped.
                for object in &pool {
                    if track.contains(object.cluster) {
                        continue;
                    }
                    fitter.try_add_cluster(clusters, object.cluster, &mut track);
                }

                if track.len() <= SHORT_TRACK_CLUSTERS {
                    bins.remove(0);
                    continue;
                }

                fitter.split_track(clusters, &mut track);
                debug!(
                    "accepted track with {} clusters at theta step {}",
                    track.len(),
                    best.theta
                );
                for object in &mut pool {
                    if track.contains(object.cluster) {
                        object.tag = HoughTag::Track;
                    }
                }
                remove_tracked(&pool, &mut bins);
                tracks.push(track);
            } else {
                bins.remove(0);
            }

            bins.retain(|bin| bin.len() >= config.minimum_bin_size);
            sort_bins_by_size(&mut bins);
        }

        // split_track may have shortened a recorded track below the
        // minimum.
        tracks.retain(|track| track.len() >= SHORT_TRACK_CLUSTERS);

        debug!("track finding produced {} tracks", tracks.len());
        Ok(tracks)
    }
}

/// Builds the run's object pool from the mip-candidate subset.
fn create_hough_objects(clusters: &[Cluster2D], config: &HoughConfig) -> Vec<HoughObject> {
    let candidates = mip::select_mip_candidates(clusters, &config.mip);
    debug!(
        "selected {} mip candidates out of {} clusters",
        candidates.len(),
        clusters.len()
    );

    let mut pool = Vec::with_capacity(candidates.len());
    for id in candidates {
        let cluster = &clusters[id];
        if config.print_debug {
            debug!(
                "mip candidate {id} at ({:.1}, {:.1}, {:.1}) layer {}",
                cluster.position.x, cluster.position.y, cluster.position.z, cluster.layer
            );
        }
        pool.push(HoughObject::from_cluster(id, cluster, config.theta_steps));
    }
    pool
}

/// Accumulates votes into bins for one projection.
///
/// For every (member, angle step) pair the first bin with matching theta
/// and rho within the acceptance window receives the vote; otherwise a
/// new bin opens with that rho as representative.
fn collect_bins(
    pool: &[HoughObject],
    members: &[usize],
    plane: Projection,
    config: &HoughConfig,
) -> Vec<HoughBin> {
    let window = config.rho_window();
    let mut bins: Vec<HoughBin> = Vec::new();

    for &idx in members {
        let object = &pool[idx];
        for step in 0..config.theta_steps {
            let rho = object.rho(plane, step as usize);
            match bins
                .iter_mut()
                .find(|bin| bin.theta == step && (rho - bin.rho).abs() < window)
            {
                Some(bin) => bin.objects.push(idx),
                None => bins.push(HoughBin {
                    theta: step,
                    rho,
                    objects: vec![idx],
                }),
            }
        }
    }
    bins
}

/// Builds the ZX-projection working set: votes from the whole pool,
/// under-sized bins dropped, remainder sorted by descending size.
fn bins_from_zx(pool: &[HoughObject], config: &HoughConfig) -> Vec<HoughBin> {
    let all: Vec<usize> = (0..pool.len()).collect();
    let mut bins = collect_bins(pool, &all, Projection::Zx, config);
    bins.retain(|bin| bin.len() >= config.minimum_bin_size);
    sort_bins_by_size(&mut bins);
    bins
}

/// Re-bins one ZX bin's members in the ZY projection and returns the
/// largest sub-bin, or `None` when the input bin has no members.
fn best_bin_from_zy(
    pool: &[HoughObject],
    input: &HoughBin,
    config: &HoughConfig,
) -> Option<HoughBin> {
    let mut bins = collect_bins(pool, &input.objects, Projection::Zy, config);
    sort_bins_by_size(&mut bins);
    bins.into_iter().next()
}

/// Drops bin members with no other member within the isolation distance
/// in layers.
///
/// Single forward pass over the live membership: a removal shrinks the
/// set later members are checked against, but never re-admits an earlier
/// removal.
fn remove_isolated(pool: &[HoughObject], bin: &mut HoughBin, config: &HoughConfig) {
    let mut i = 0;
    while i < bin.objects.len() {
        let layer = pool[bin.objects[i]].layer;
        let has_neighbour = bin.objects.iter().enumerate().any(|(j, &other)| {
            j != i && (pool[other].layer - layer).abs() <= config.isolation_distance
        });
        if has_neighbour {
            i += 1;
        } else {
            if config.print_debug {
                debug!(
                    "removing isolated cluster {} at layer {layer}",
                    pool[bin.objects[i]].cluster
                );
            }
            bin.objects.remove(i);
        }
    }
}

/// Purges objects consumed by a fitted track from every remaining bin.
fn remove_tracked(pool: &[HoughObject], bins: &mut [HoughBin]) {
    for bin in bins.iter_mut() {
        bin.objects.retain(|&idx| pool[idx].tag != HoughTag::Track);
    }
}

fn sort_bins_by_size(bins: &mut [HoughBin]) {
    bins.sort_by(|a, b| b.len().cmp(&a.len()));
}
