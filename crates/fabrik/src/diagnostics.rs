//! Read-only chain inspection.
//!
//! Nothing here feeds back into the solver; joint angles are reported, never
//! limited.

use crate::vector::{distance, Point};

/// Signed bend at every interior joint, in degrees within (-180, 180].
///
/// Measured in the x/y plane as the heading change from the incoming bone to
/// the outgoing one (positive = clockwise in a y-up frame). Chains with fewer
/// than three joints, or points with fewer than two coordinates, give an
/// empty vector.
pub fn bend_angles<const D: usize>(chain: &[Point<D>]) -> Vec<f64> {
    if D < 2 {
        return Vec::new();
    }
    chain
        .windows(3)
        .map(|w| {
            let incoming = w[1] - w[0];
            let outgoing = w[2] - w[1];
            let turn = incoming[1].atan2(incoming[0]) - outgoing[1].atan2(outgoing[0]);
            wrap_degrees(turn.to_degrees())
        })
        .collect()
}

fn wrap_degrees(deg: f64) -> f64 {
    let w = deg.rem_euclid(360.0);
    if w > 180.0 {
        w - 360.0
    } else {
        w
    }
}

/// Largest absolute deviation between joint spacing and required bone length.
pub fn max_bone_error<const D: usize>(chain: &[Point<D>], bones: &[f64]) -> f64 {
    chain
        .windows(2)
        .zip(bones)
        .map(|(w, &b)| (distance(&w[0], &w[1]) - b).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn straight_and_right_angles() {
        let straight = [vector![0.0, 0.0], vector![1.0, 0.0], vector![2.0, 0.0]];
        assert_eq!(bend_angles(&straight), vec![0.0]);
        let left = [vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 1.0]];
        assert!((bend_angles(&left)[0] + 90.0).abs() < 1e-12);
        let right = [vector![0.0, 0.0, 5.0], vector![1.0, 0.0, 5.0], vector![1.0, -1.0, 0.0]];
        assert!((bend_angles(&right)[0] - 90.0).abs() < 1e-12);
        assert!(bend_angles(&straight[..2]).is_empty());
    }

    #[test]
    fn angles_wrap_into_half_turn() {
        // heading 170° then -170°: a 20° turn, not 340°
        let a = 170f64.to_radians();
        let b = (-170f64).to_radians();
        let chain = [
            vector![0.0, 0.0],
            vector![a.cos(), a.sin()],
            vector![a.cos() + b.cos(), a.sin() + b.sin()],
        ];
        let bend = bend_angles(&chain)[0];
        assert!((bend + 20.0).abs() < 1e-9, "bend {bend}");
    }

    #[test]
    fn bone_error_reports_worst_bone() {
        let chain = [vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 3.0]];
        assert!((max_bone_error(&chain, &[1.0, 2.0]) - 1.0).abs() < 1e-12);
        assert_eq!(max_bone_error(&chain, &[1.0, 3.0]), 0.0);
    }
}
