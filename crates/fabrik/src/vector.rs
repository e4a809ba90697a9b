//! Dimension-agnostic point arithmetic.
//!
//! Points are `nalgebra` column vectors with the dimension as a const
//! parameter, so 2D and 3D chains share one code path and a dimension mismatch
//! inside a solve is a type error rather than a runtime branch.

use nalgebra::SVector;

/// A joint position or target in `D` dimensions.
pub type Point<const D: usize> = SVector<f64, D>;
pub type Point2 = Point<2>;
pub type Point3 = Point<3>;

/// Euclidean distance between `a` and `b`.
#[inline]
pub fn distance<const D: usize>(a: &Point<D>, b: &Point<D>) -> f64 {
    (b - a).norm()
}

#[inline]
pub fn scale<const D: usize>(p: &Point<D>, k: f64) -> Point<D> {
    p * k
}

#[inline]
pub fn add<const D: usize>(p: &Point<D>, q: &Point<D>) -> Point<D> {
    p + q
}

/// Sum of bone lengths, i.e. the reach of a fully stretched chain.
#[inline]
pub fn total_length(bones: &[f64]) -> f64 {
    bones.iter().sum()
}

/// Point at exactly `distance_wanted` from `anchor`, on the ray from `anchor`
/// through `away`.
///
/// Computes `anchor + (distance_wanted / |away - anchor|) * (away - anchor)`.
/// Returns `None` when `anchor` and `away` coincide (or their distance is not
/// finite), since the direction is then undefined.
#[inline]
pub fn point_toward_at<const D: usize>(
    distance_wanted: f64,
    anchor: &Point<D>,
    away: &Point<D>,
) -> Option<Point<D>> {
    let delta = away - anchor;
    let len = delta.norm();
    if !len.is_finite() || len <= 0.0 {
        return None;
    }
    Some(add(anchor, &scale(&delta, distance_wanted / len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn distance_2d_and_3d() {
        assert!((distance(&vector![0.0, 0.0], &vector![3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert!((distance(&vector![1.0, 2.0, 2.0], &vector![0.0, 0.0, 0.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn toward_lands_at_requested_distance() {
        let anchor = vector![1.0, -2.0, 0.5];
        let away = vector![4.0, 2.0, -1.0];
        let p = point_toward_at(2.5, &anchor, &away).unwrap();
        assert!((distance(&anchor, &p) - 2.5).abs() < 1e-12);
        // same direction as `away`
        let d0 = (away - anchor).normalize();
        let d1 = (p - anchor).normalize();
        assert!((d0 - d1).norm() < 1e-12);
    }

    #[test]
    fn toward_can_overshoot_past_away() {
        let p = point_toward_at(5.0, &vector![0.0, 0.0], &vector![10.0, 0.0]).unwrap();
        assert_eq!(p, vector![5.0, 0.0]);
        let q = point_toward_at(20.0, &vector![0.0, 0.0], &vector![10.0, 0.0]).unwrap();
        assert_eq!(q, vector![20.0, 0.0]);
    }

    #[test]
    fn toward_rejects_coincident_points() {
        let a = vector![2.0, 2.0];
        assert!(point_toward_at(1.0, &a, &a).is_none());
        let nan = vector![f64::NAN, 0.0];
        assert!(point_toward_at(1.0, &a, &nan).is_none());
    }

    #[test]
    fn total_length_sums_bones() {
        assert_eq!(total_length(&[]), 0.0);
        assert_eq!(total_length(&[1.0, 2.5, 0.5]), 4.0);
    }
}
