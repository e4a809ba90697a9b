//! Run-to-completion entry points.

use crate::vector::Point;

use super::engine::Relaxation;
use super::error::SolveError;
use super::types::{Report, Solution, SolverCfg, Update};

/// Solve the chain for `target` and return the final configuration.
///
/// Pre: `bones.len() == chain.len() - 1`, all bones > 0, `cfg.tolerance > 0`,
/// no two consecutive joints coincide.
/// Post: every bone keeps its length; with `cfg.root_fixed` the root is
/// unchanged. Hitting the iteration cap is reported through
/// `Report::status`, not as an error.
pub fn solve<const D: usize>(
    cfg: SolverCfg,
    chain: &[Point<D>],
    bones: &[f64],
    target: Point<D>,
) -> Result<Solution<D>, SolveError> {
    Relaxation::new(cfg, chain, bones, target)?.finish()
}

/// Like [`solve`], calling `observer` after every single point update with the
/// update and the chain state right after it.
pub fn solve_with<const D: usize, F>(
    cfg: SolverCfg,
    chain: &[Point<D>],
    bones: &[f64],
    target: Point<D>,
    mut observer: F,
) -> Result<Solution<D>, SolveError>
where
    F: FnMut(&Update, &[Point<D>]),
{
    let mut relax = Relaxation::new(cfg, chain, bones, target)?;
    while let Some(update) = relax.advance()? {
        observer(&update, relax.chain());
    }
    relax.finish()
}

/// Solve and write the result back into `chain`.
///
/// `chain` is only overwritten when the solve succeeds.
pub fn solve_in_place<const D: usize>(
    cfg: SolverCfg,
    chain: &mut [Point<D>],
    bones: &[f64],
    target: Point<D>,
) -> Result<Report, SolveError> {
    let solution = solve(cfg, chain, bones, target)?;
    chain.copy_from_slice(&solution.chain);
    Ok(solution.report)
}
