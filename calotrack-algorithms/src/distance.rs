//! Point-to-track distance.

use calotrack_core::{CaloTrack, Error, Result};
use log::warn;
use nalgebra::Vector3;

/// Distance from a point to the 3D line described by a track.
///
/// The track is the intersection of the planes `x = x0 + (dx/dz) z`
/// (normal `Nx = (-1, 0, dx/dz)`) and `y = y0 + (dy/dz) z` (normal
/// `Ny = (0, -1, dy/dz)`). With the line direction `u = Nx x Ny` and a
/// line point `B = (x0, y0, 0)`, the distance is `|(B - H) x u| / |u|`.
///
/// # Errors
///
/// [`Error::DegenerateTrack`] when the orientation vector has zero
/// length and no distance is defined.
pub fn distance_to_track(point: &Vector3<f64>, track: &CaloTrack) -> Result<f64> {
    let [x0, dxdz, y0, dydz] = track.parameters;

    let nx = Vector3::new(-1.0, 0.0, dxdz);
    let ny = Vector3::new(0.0, -1.0, dydz);
    let u = nx.cross(&ny);

    if u.norm() <= 0.0 {
        warn!("track orientation vector is null, cannot compute distance");
        return Err(Error::DegenerateTrack);
    }

    let b = Vector3::new(x0, y0, 0.0);
    Ok((b - point).cross(&u).norm() / u.norm())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_on_track_has_zero_distance() {
        // x = 1 + 2z, y = -3 + 0.5z; the point at z = 4 lies on the line.
        let track = CaloTrack::new(vec![0], [1.0, 2.0, -3.0, 0.5]);
        let point = Vector3::new(9.0, -1.0, 4.0);
        let d = distance_to_track(&point, &track).unwrap();
        assert_relative_eq!(d, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transverse_offset_from_vertical_track() {
        // A track along the z axis; a unit offset in x is a unit distance.
        let track = CaloTrack::new(vec![0], [0.0, 0.0, 0.0, 0.0]);
        let point = Vector3::new(1.0, 0.0, 57.0);
        let d = distance_to_track(&point, &track).unwrap();
        assert_relative_eq!(d, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_is_symmetric_around_track() {
        let track = CaloTrack::new(vec![0], [10.0, 0.0, 20.0, 0.0]);
        let left = distance_to_track(&Vector3::new(7.0, 20.0, 5.0), &track).unwrap();
        let right = distance_to_track(&Vector3::new(13.0, 20.0, -5.0), &track).unwrap();
        assert_relative_eq!(left, right, epsilon = 1e-12);
        assert_relative_eq!(left, 3.0, epsilon = 1e-12);
    }
}
