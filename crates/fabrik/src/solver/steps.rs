//! Streaming solver: one owned snapshot per point update.

use std::iter::FusedIterator;

use crate::vector::Point;

use super::engine::Relaxation;
use super::error::SolveError;
use super::types::{Solution, SolverCfg, Update};

/// Chain state right after one point update.
///
/// The chain is an independent copy; later updates never change it.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<const D: usize> {
    pub update: Update,
    pub chain: Vec<Point<D>>,
}

/// Lazy, single-use sequence of snapshots.
///
/// Work happens only when the next item is pulled. Dropping the iterator
/// stops the solve. The sequence ends after the last update, or right after
/// yielding an error.
pub struct Steps<'a, const D: usize> {
    relax: Relaxation<'a, D>,
    fused: bool,
}

/// Validate the inputs and return the snapshot stream for the solve.
///
/// The last snapshot equals the chain [`solve`](super::solve) returns for the
/// same inputs. A stream can be empty when no update is needed (effector
/// already within tolerance, or a lone fixed joint).
pub fn solve_steps<'a, const D: usize>(
    cfg: SolverCfg,
    chain: &[Point<D>],
    bones: &'a [f64],
    target: Point<D>,
) -> Result<Steps<'a, D>, SolveError> {
    Ok(Steps {
        relax: Relaxation::new(cfg, chain, bones, target)?,
        fused: false,
    })
}

impl<'a, const D: usize> Steps<'a, D> {
    /// Upper bound on the snapshots of a full run: `bones + max_iterations * 2 * bones`
    /// (one per sweep for a lone joint). `None` for unbounded iteration counts,
    /// or when the bound overflows `usize`.
    pub fn bound(&self) -> Option<usize> {
        self.relax.update_bound()
    }

    /// Current chain state (the last snapshot, or the input before any).
    pub fn current(&self) -> &[Point<D>] {
        self.relax.chain()
    }

    /// Run the remaining updates without copying and return the solution.
    pub fn into_solution(self) -> Result<Solution<D>, SolveError> {
        self.relax.finish()
    }
}

impl<'a, const D: usize> Iterator for Steps<'a, D> {
    type Item = Result<Snapshot<D>, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        match self.relax.advance() {
            Ok(Some(update)) => Some(Ok(Snapshot {
                update,
                chain: self.relax.chain().to_vec(),
            })),
            Ok(None) => {
                self.fused = true;
                None
            }
            Err(err) => {
                self.fused = true;
                Some(Err(err))
            }
        }
    }
}

impl<'a, const D: usize> FusedIterator for Steps<'a, D> {}
