//! Curated API for drivers (CLI, benches, demos).
//!
//! Re-exports the pieces a caller usually needs in one place, plus a
//! convenience entry point for the common "tapered arm reaching for a point"
//! setup.

// Solver
pub use crate::solver::{
    solve, solve_in_place, solve_steps, solve_with, Phase, Report, Snapshot, SolveError,
    Solution, SolverCfg, Status, Steps, Update,
};
// Runtime dimension
pub use crate::dynamic::{
    solve_dyn, solve_steps_dyn, DynChain, DynPoint, DynSnapshot, DynSolution, DynSteps,
};
// Builders and inspection
pub use crate::diagnostics::{bend_angles, max_bone_error};
pub use crate::layout::{bone_lengths, stacked_chain, tapered_bones};
pub use crate::rand::{draw_chain, ChainCfg, ChainSample, ReplayToken};
pub use crate::vector::{distance, point_toward_at, total_length, Point, Point2, Point3};

/// Pre: `joints >= 1`, `first > 0`, `last > 0`.
/// Post: a planar chain of `joints` joints rooted at `root`, bones tapering
/// from `first` to `last`, stacked straight along `direction`.
/// Returns `None` for a zero `direction`.
pub fn tapered_arm(
    root: Point2,
    direction: Point2,
    joints: usize,
    first: f64,
    last: f64,
) -> Option<(Vec<Point2>, Vec<f64>)> {
    let bones = tapered_bones(joints.saturating_sub(1), first, last);
    let chain = stacked_chain(root, &bones, direction)?;
    Some((chain, bones))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn tapered_arm_reaches_overhead_target() {
        let (chain, bones) =
            tapered_arm(vector![400.0, 600.0], vector![0.0, -1.0], 25, 100.0, 5.0).unwrap();
        assert_eq!(chain.len(), 25);
        assert_eq!(bones.len(), 24);
        let target = vector![250.0, 150.0];
        let cfg = SolverCfg::default()
            .with_tolerance(1.0)
            .with_max_iterations(Some(500));
        let sol = solve(cfg, &chain, &bones, target).unwrap();
        assert!(sol.converged());
        assert_eq!(sol.chain[0], chain[0]);
        assert!(max_bone_error(&sol.chain, &bones) < 1e-9);
        assert_eq!(bend_angles(&sol.chain).len(), 23);
    }

    #[test]
    fn tapered_arm_rejects_zero_direction() {
        assert!(tapered_arm(vector![0.0, 0.0], vector![0.0, 0.0], 4, 2.0, 1.0).is_none());
    }
}
