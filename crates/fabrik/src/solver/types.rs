//! Solver configuration and result types.

use std::fmt;

use crate::vector::Point;

use super::error::SolveError;

/// Solver configuration.
///
/// Plain immutable value: the solver takes it by copy and never changes it,
/// so one `SolverCfg` can drive any number of independent solves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverCfg {
    /// Maximum accepted distance between end effector and target.
    pub tolerance: f64,
    /// Cap on forward/backward sweep pairs. `None` means unbounded; the caller
    /// must then be sure the target is reachable within `tolerance`.
    pub max_iterations: Option<usize>,
    /// Pin the root to its starting position.
    pub root_fixed: bool,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: Some(64),
            root_fixed: true,
        }
    }
}

impl SolverCfg {
    /// Unbounded iteration count with the given tolerance and a fixed root.
    pub fn unbounded(tolerance: f64) -> Self {
        Self {
            tolerance,
            max_iterations: None,
            root_fixed: true,
        }
    }

    #[must_use]
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    #[must_use]
    pub fn with_max_iterations(self, max_iterations: Option<usize>) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    #[must_use]
    pub fn with_root_fixed(self, root_fixed: bool) -> Self {
        Self { root_fixed, ..self }
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolveError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        if self.max_iterations == Some(0) {
            return Err(SolveError::InvalidMaxIterations);
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn allows_iteration(&self, done: usize) -> bool {
        self.max_iterations.is_none_or(|cap| done < cap)
    }
}

/// How a solve ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Fixed root, target out of reach: chain stretched straight toward it.
    Stretched,
    /// End effector within tolerance of the target.
    Converged,
    /// Iteration cap hit before reaching tolerance. Advisory, not an error.
    IterationCap,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stretched => "stretched",
            Self::Converged => "converged",
            Self::IterationCap => "iteration_cap",
        })
    }
}

/// Which sweep produced a point update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Stretch,
    Forward,
    Backward,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stretch => "stretch",
            Self::Forward => "forward",
            Self::Backward => "backward",
        })
    }
}

/// A single point update performed by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Update {
    pub phase: Phase,
    /// Index of the joint that moved.
    pub joint: usize,
    /// Zero-based sweep pair the update belongs to (always 0 for `Stretch`).
    pub iteration: usize,
}

/// Outcome metadata of a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    pub status: Status,
    /// Completed forward/backward sweep pairs.
    pub iterations: usize,
    /// Final distance between end effector and target.
    pub residual: f64,
}

impl Report {
    pub fn converged(&self) -> bool {
        self.status == Status::Converged
    }
}

/// Final chain plus outcome metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<const D: usize> {
    pub chain: Vec<Point<D>>,
    pub report: Report,
}

impl<const D: usize> Solution<D> {
    pub fn converged(&self) -> bool {
        self.report.converged()
    }

    pub fn end_effector(&self) -> &Point<D> {
        // chains are validated non-empty
        &self.chain[self.chain.len() - 1]
    }

    pub fn into_chain(self) -> Vec<Point<D>> {
        self.chain
    }
}
