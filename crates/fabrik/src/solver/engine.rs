//! Relaxation engine: one point update per `advance()`.
//!
//! Deferred mutations (pinning the effector at the start of a forward sweep,
//! re-pinning the root at the start of a backward sweep) run at the beginning
//! of the next `advance()`, never at the end of the previous one, so the state
//! visible between calls is exactly the state after the last reported update.

use tracing::{debug, trace};

use crate::vector::{distance, point_toward_at, total_length, Point};

use super::error::SolveError;
use super::types::{Phase, Report, Solution, SolverCfg, Status, Update};

#[derive(Clone, Copy, Debug)]
enum Cursor {
    /// Next bone to lay along the root→target line.
    Stretch { bone: usize },
    /// Pin the effector to the target, then continue with the forward sweep.
    BeginForward,
    /// Next joint to pull toward its already-placed successor.
    Forward { joint: usize },
    /// Re-pin the root if fixed, then continue with the backward sweep.
    BeginBackward,
    /// Next joint to pull toward its already-placed predecessor.
    Backward { joint: usize },
    Done(Status),
}

pub(crate) struct Relaxation<'a, const D: usize> {
    cfg: SolverCfg,
    bones: &'a [f64],
    target: Point<D>,
    chain: Vec<Point<D>>,
    initial_root: Point<D>,
    iterations: usize,
    residual: f64,
    cursor: Cursor,
    failure: Option<SolveError>,
}

/// Check every precondition without touching the inputs.
pub(crate) fn validate<const D: usize>(
    cfg: &SolverCfg,
    chain: &[Point<D>],
    bones: &[f64],
    target: &Point<D>,
) -> Result<(), SolveError> {
    cfg.validate()?;
    if chain.is_empty() {
        return Err(SolveError::EmptyChain);
    }
    if bones.len() + 1 != chain.len() {
        return Err(SolveError::MismatchedLengths {
            joints: chain.len(),
            bones: bones.len(),
        });
    }
    if let Some((index, &length)) = bones
        .iter()
        .enumerate()
        .find(|(_, b)| !(b.is_finite() && **b > 0.0))
    {
        return Err(SolveError::InvalidBoneLength { index, length });
    }
    if let Some(index) = chain.iter().position(|p| !p.iter().all(|c| c.is_finite())) {
        return Err(SolveError::NonFinite { index: Some(index) });
    }
    if !target.iter().all(|c| c.is_finite()) {
        return Err(SolveError::NonFinite { index: None });
    }
    if let Some(bone) = chain.windows(2).position(|w| distance(&w[0], &w[1]) <= 0.0) {
        return Err(SolveError::DegenerateSegment { bone });
    }
    Ok(())
}

impl<'a, const D: usize> Relaxation<'a, D> {
    pub(crate) fn new(
        cfg: SolverCfg,
        chain: &[Point<D>],
        bones: &'a [f64],
        target: Point<D>,
    ) -> Result<Self, SolveError> {
        validate(&cfg, chain, bones, &target)?;

        let total_reach = total_length(bones);
        let root_to_target = distance(&chain[0], &target);
        let mut relax = Self {
            cfg,
            bones,
            target,
            chain: chain.to_vec(),
            initial_root: chain[0],
            iterations: 0,
            residual: distance(&chain[chain.len() - 1], &target),
            cursor: Cursor::Done(Status::Converged),
            failure: None,
        };

        relax.cursor = if cfg.root_fixed && root_to_target > total_reach {
            debug!(
                joints = chain.len(),
                root_to_target, total_reach, "target out of reach; stretching chain"
            );
            if bones.is_empty() {
                Cursor::Done(Status::Stretched)
            } else {
                Cursor::Stretch { bone: 0 }
            }
        } else {
            debug!(
                joints = chain.len(),
                root_to_target,
                total_reach,
                root_fixed = cfg.root_fixed,
                "relaxing toward target"
            );
            relax.next_sweep()
        };
        Ok(relax)
    }

    #[inline]
    pub(crate) fn chain(&self) -> &[Point<D>] {
        &self.chain
    }

    #[inline]
    fn last(&self) -> usize {
        self.chain.len() - 1
    }

    #[inline]
    fn update(&self, phase: Phase, joint: usize) -> Update {
        Update {
            phase,
            joint,
            iteration: self.iterations,
        }
    }

    /// Upper bound on the number of updates a full run can perform.
    ///
    /// `None` when the iteration count is unbounded or the bound does not fit
    /// in a `usize`.
    pub(crate) fn update_bound(&self) -> Option<usize> {
        let bones = self.bones.len();
        let per_iteration = bones.checked_mul(2)?.max(1);
        self.cfg
            .max_iterations?
            .checked_mul(per_iteration)?
            .checked_add(bones)
    }

    fn next_sweep(&self) -> Cursor {
        if self.residual <= self.cfg.tolerance {
            Cursor::Done(Status::Converged)
        } else if self.cfg.allows_iteration(self.iterations) {
            Cursor::BeginForward
        } else {
            Cursor::Done(Status::IterationCap)
        }
    }

    fn finish_iteration(&mut self) -> Cursor {
        self.residual = distance(&self.chain[self.last()], &self.target);
        self.iterations += 1;
        trace!(iteration = self.iterations, residual = self.residual, "sweep pair done");
        self.next_sweep()
    }

    /// Move `chain[joint]` to sit exactly `bones[bone]` away from `chain[anchor]`.
    fn pull(&mut self, joint: usize, anchor: usize, bone: usize) -> Result<(), SolveError> {
        let next = point_toward_at(self.bones[bone], &self.chain[anchor], &self.chain[joint])
            .ok_or(SolveError::DegenerateSegment { bone })?;
        self.chain[joint] = next;
        Ok(())
    }

    fn step(&mut self) -> Result<Option<Update>, SolveError> {
        loop {
            match self.cursor {
                Cursor::Done(_) => return Ok(None),
                Cursor::Stretch { bone } => {
                    let joint = bone + 1;
                    let next = point_toward_at(self.bones[bone], &self.chain[bone], &self.target)
                        .ok_or(SolveError::DegenerateSegment { bone })?;
                    self.chain[joint] = next;
                    let update = self.update(Phase::Stretch, joint);
                    self.cursor = if joint < self.last() {
                        Cursor::Stretch { bone: joint }
                    } else {
                        self.residual = distance(&self.chain[joint], &self.target);
                        Cursor::Done(Status::Stretched)
                    };
                    return Ok(Some(update));
                }
                Cursor::BeginForward => {
                    let last = self.last();
                    self.chain[last] = self.target;
                    if last == 0 {
                        // a lone joint: pinning it is the whole sweep
                        let update = self.update(Phase::Forward, 0);
                        self.cursor = Cursor::BeginBackward;
                        return Ok(Some(update));
                    }
                    self.cursor = Cursor::Forward { joint: last - 1 };
                }
                Cursor::Forward { joint } => {
                    self.pull(joint, joint + 1, joint)?;
                    let update = self.update(Phase::Forward, joint);
                    self.cursor = if joint == 0 {
                        Cursor::BeginBackward
                    } else {
                        Cursor::Forward { joint: joint - 1 }
                    };
                    return Ok(Some(update));
                }
                Cursor::BeginBackward => {
                    if self.cfg.root_fixed {
                        self.chain[0] = self.initial_root;
                    }
                    self.cursor = if self.last() == 0 {
                        self.finish_iteration()
                    } else {
                        Cursor::Backward { joint: 1 }
                    };
                }
                Cursor::Backward { joint } => {
                    self.pull(joint, joint - 1, joint - 1)?;
                    let update = self.update(Phase::Backward, joint);
                    self.cursor = if joint == self.last() {
                        self.finish_iteration()
                    } else {
                        Cursor::Backward { joint: joint + 1 }
                    };
                    return Ok(Some(update));
                }
            }
        }
    }

    /// Perform the next point update. `Ok(None)` once the run is over.
    ///
    /// After an error the engine stays failed and keeps returning that error.
    pub(crate) fn advance(&mut self) -> Result<Option<Update>, SolveError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.step().inspect_err(|err| {
            debug!(%err, iteration = self.iterations, "relaxation failed");
            self.failure = Some(err.clone());
        })
    }

    pub(crate) fn report(&self) -> Option<Report> {
        match self.cursor {
            Cursor::Done(status) => Some(Report {
                status,
                iterations: self.iterations,
                residual: self.residual,
            }),
            _ => None,
        }
    }

    /// Drive the remaining updates and return the final chain.
    pub(crate) fn finish(mut self) -> Result<Solution<D>, SolveError> {
        while self.advance()?.is_some() {}
        let Some(report) = self.report() else {
            unreachable!("advance() returned None before a terminal state");
        };
        debug!(
            status = ?report.status,
            iterations = report.iterations,
            residual = report.residual,
            "solve finished"
        );
        Ok(Solution {
            chain: self.chain,
            report,
        })
    }
}
