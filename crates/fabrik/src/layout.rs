//! Chain builders: bone-length profiles and straight initial poses.

use crate::vector::{distance, Point};

/// `count` bone lengths tapering from `first` to `last` on a square-root scale.
///
/// Bone `k` (1-based) gets `first + (√k − 1) / (√count − 1) · (last − first)`,
/// so lengths fall off quickly near the root and flatten toward the tip.
pub fn tapered_bones(count: usize, first: f64, last: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![first],
        n => {
            let span = (n as f64).sqrt() - 1.0;
            (1..=n)
                .map(|k| first + ((k as f64).sqrt() - 1.0) / span * (last - first))
                .collect()
        }
    }
}

/// Chain starting at `root` with the bones stacked along `direction`.
///
/// Returns `None` for a zero or non-finite direction.
pub fn stacked_chain<const D: usize>(
    root: Point<D>,
    bones: &[f64],
    direction: Point<D>,
) -> Option<Vec<Point<D>>> {
    let norm = direction.norm();
    if !norm.is_finite() || norm <= 0.0 {
        return None;
    }
    let dir = direction / norm;
    let mut chain = Vec::with_capacity(bones.len() + 1);
    chain.push(root);
    let mut along = 0.0;
    for &b in bones {
        along += b;
        chain.push(root + dir * along);
    }
    Some(chain)
}

/// Distances between consecutive joints.
pub fn bone_lengths<const D: usize>(chain: &[Point<D>]) -> Vec<f64> {
    chain.windows(2).map(|w| distance(&w[0], &w[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn taper_hits_both_ends() {
        let b = tapered_bones(24, 100.0, 5.0);
        assert_eq!(b.len(), 24);
        assert!((b[0] - 100.0).abs() < 1e-12);
        assert!((b[23] - 5.0).abs() < 1e-12);
        assert!(b.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(tapered_bones(1, 3.0, 1.0), vec![3.0]);
        assert!(tapered_bones(0, 3.0, 1.0).is_empty());
    }

    #[test]
    fn stacked_chain_points_up() {
        let bones = [2.0, 1.0, 0.5];
        let chain = stacked_chain(vector![10.0, 20.0], &bones, vector![0.0, -3.0]).unwrap();
        assert_eq!(
            chain,
            vec![
                vector![10.0, 20.0],
                vector![10.0, 18.0],
                vector![10.0, 17.0],
                vector![10.0, 16.5]
            ]
        );
        assert_eq!(bone_lengths(&chain), bones.to_vec());
        assert!(stacked_chain(vector![0.0, 0.0], &bones, vector![0.0, 0.0]).is_none());
    }
}
