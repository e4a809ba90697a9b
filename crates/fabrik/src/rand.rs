//! Seeded random chains (random walk of bones + target at a chosen reach).
//!
//! Purpose
//! - Deterministic fixtures for property tests and benchmarks: the same
//!   `(cfg, token)` always produces the same chain, bones, and target.
//!
//! Model
//! - Root at the origin. Each bone length is uniform in
//!   `[bone_min, bone_max]`; each bone direction is a uniformly random unit
//!   vector. The target sits at `reach * total_length` from the root in a
//!   random direction, so `reach > 1` gives an out-of-reach target for a
//!   fixed root.

use nalgebra::SVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::vector::{total_length, Point};

/// Random chain configuration.
#[derive(Clone, Copy, Debug)]
pub struct ChainCfg {
    /// Number of joints (bones = joints - 1). Clamped to at least 1.
    pub joints: usize,
    pub bone_min: f64,
    pub bone_max: f64,
    /// Target distance from the root as a fraction of the total bone length.
    pub reach: f64,
}

impl Default for ChainCfg {
    fn default() -> Self {
        Self {
            joints: 8,
            bone_min: 0.5,
            bone_max: 2.0,
            reach: 0.7,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer so neighbouring (seed, index) pairs decorrelate.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// One random problem instance.
#[derive(Clone, Debug)]
pub struct ChainSample<const D: usize> {
    pub chain: Vec<Point<D>>,
    pub bones: Vec<f64>,
    pub target: Point<D>,
}

/// Uniform direction on the unit sphere (rejection sampling in the cube).
pub fn unit_direction<const D: usize, R: Rng>(rng: &mut R) -> Point<D> {
    loop {
        let v: Point<D> = SVector::from_fn(|_, _| rng.gen_range(-1.0..=1.0));
        let n = v.norm();
        if n > 1e-3 && n <= 1.0 {
            return v / n;
        }
    }
}

/// Draw a random chain and target.
pub fn draw_chain<const D: usize>(cfg: ChainCfg, tok: ReplayToken) -> ChainSample<D> {
    let mut rng = tok.to_std_rng();
    let joints = cfg.joints.max(1);
    let lo = cfg.bone_min.max(1e-6);
    let hi = cfg.bone_max.max(lo);

    let bones: Vec<f64> = (1..joints)
        .map(|_| if hi > lo { rng.gen_range(lo..=hi) } else { lo })
        .collect();
    let mut chain: Vec<Point<D>> = Vec::with_capacity(joints);
    chain.push(Point::<D>::zeros());
    for &b in &bones {
        let dir = unit_direction::<D, _>(&mut rng);
        let prev = chain[chain.len() - 1];
        chain.push(prev + dir * b);
    }
    let target = unit_direction::<D, _>(&mut rng) * (cfg.reach.max(0.0) * total_length(&bones));
    ChainSample {
        chain,
        bones,
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::distance;

    #[test]
    fn reproducible_draw() {
        let tok = ReplayToken { seed: 42, index: 7 };
        let a = draw_chain::<3>(ChainCfg::default(), tok);
        let b = draw_chain::<3>(ChainCfg::default(), tok);
        assert_eq!(a.chain, b.chain);
        assert_eq!(a.bones, b.bones);
        assert_eq!(a.target, b.target);
        let c = draw_chain::<3>(ChainCfg::default(), ReplayToken { seed: 42, index: 8 });
        assert_ne!(a.bones, c.bones);
    }

    #[test]
    fn bones_match_joint_spacing() {
        let cfg = ChainCfg {
            joints: 12,
            ..ChainCfg::default()
        };
        let s = draw_chain::<2>(cfg, ReplayToken { seed: 3, index: 0 });
        assert_eq!(s.chain.len(), 12);
        assert_eq!(s.bones.len(), 11);
        for (w, &b) in s.chain.windows(2).zip(&s.bones) {
            assert!((distance(&w[0], &w[1]) - b).abs() < 1e-9);
            assert!((cfg.bone_min..=cfg.bone_max).contains(&b));
        }
        let reach = total_length(&s.bones) * cfg.reach;
        assert!((s.target.norm() - reach).abs() < 1e-9);
    }
}
