//! Runtime 2D/3D dispatch.
//!
//! Parsed data (JSON rows, CSV columns) only reveals its dimension at runtime.
//! `DynChain` and `DynPoint` decide it once from the row lengths; after that
//! every solve runs on the const-generic code path.

use crate::solver::{
    solve, solve_steps, Report, Snapshot, SolveError, SolverCfg, Steps, Update,
};
use crate::vector::{Point, Point2, Point3};

/// A point whose dimension is known at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DynPoint {
    Planar(Point2),
    Spatial(Point3),
}

/// A chain whose dimension is known at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum DynChain {
    Planar(Vec<Point2>),
    Spatial(Vec<Point3>),
}

fn point_from<const D: usize>(row: &[f64], expected: usize) -> Result<Point<D>, SolveError> {
    if row.len() != expected {
        return Err(SolveError::DimensionMismatch {
            expected,
            found: row.len(),
        });
    }
    Ok(Point::<D>::from_column_slice(row))
}

impl DynPoint {
    pub fn from_slice(coords: &[f64]) -> Result<Self, SolveError> {
        match coords.len() {
            2 => Ok(Self::Planar(point_from::<2>(coords, 2)?)),
            3 => Ok(Self::Spatial(point_from::<3>(coords, 3)?)),
            found => Err(SolveError::UnsupportedDimension { found }),
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Self::Planar(_) => 2,
            Self::Spatial(_) => 3,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Self::Planar(p) => p.iter().copied().collect(),
            Self::Spatial(p) => p.iter().copied().collect(),
        }
    }
}

impl DynChain {
    /// Build from coordinate rows; the first row fixes the dimension.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, SolveError> {
        let first = rows.first().ok_or(SolveError::EmptyChain)?;
        match first.as_ref().len() {
            2 => rows
                .iter()
                .map(|r| point_from::<2>(r.as_ref(), 2))
                .collect::<Result<_, _>>()
                .map(Self::Planar),
            3 => rows
                .iter()
                .map(|r| point_from::<3>(r.as_ref(), 3))
                .collect::<Result<_, _>>()
                .map(Self::Spatial),
            found => Err(SolveError::UnsupportedDimension { found }),
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Self::Planar(_) => 2,
            Self::Spatial(_) => 3,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Planar(c) => c.len(),
            Self::Spatial(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        match self {
            Self::Planar(c) => c.iter().map(|p| p.iter().copied().collect()).collect(),
            Self::Spatial(c) => c.iter().map(|p| p.iter().copied().collect()).collect(),
        }
    }

    /// Distances between consecutive joints.
    pub fn bone_lengths(&self) -> Vec<f64> {
        match self {
            Self::Planar(c) => crate::layout::bone_lengths(c),
            Self::Spatial(c) => crate::layout::bone_lengths(c),
        }
    }
}

/// Solution of a runtime-dimension solve.
#[derive(Clone, Debug, PartialEq)]
pub struct DynSolution {
    pub chain: DynChain,
    pub report: Report,
}

/// Snapshot of a runtime-dimension stream.
#[derive(Clone, Debug, PartialEq)]
pub struct DynSnapshot {
    pub update: Update,
    pub chain: DynChain,
}

/// Solve a runtime-dimension chain. Chain and target must share a dimension.
pub fn solve_dyn(
    cfg: SolverCfg,
    chain: &DynChain,
    bones: &[f64],
    target: &DynPoint,
) -> Result<DynSolution, SolveError> {
    match (chain, target) {
        (DynChain::Planar(c), DynPoint::Planar(t)) => {
            solve(cfg, c, bones, *t).map(|s| DynSolution {
                chain: DynChain::Planar(s.chain),
                report: s.report,
            })
        }
        (DynChain::Spatial(c), DynPoint::Spatial(t)) => {
            solve(cfg, c, bones, *t).map(|s| DynSolution {
                chain: DynChain::Spatial(s.chain),
                report: s.report,
            })
        }
        _ => Err(SolveError::DimensionMismatch {
            expected: chain.dim(),
            found: target.dim(),
        }),
    }
}

/// Snapshot stream of a runtime-dimension solve.
pub enum DynSteps<'a> {
    Planar(Steps<'a, 2>),
    Spatial(Steps<'a, 3>),
}

/// Streaming counterpart of [`solve_dyn`].
pub fn solve_steps_dyn<'a>(
    cfg: SolverCfg,
    chain: &DynChain,
    bones: &'a [f64],
    target: &DynPoint,
) -> Result<DynSteps<'a>, SolveError> {
    match (chain, target) {
        (DynChain::Planar(c), DynPoint::Planar(t)) => {
            solve_steps(cfg, c, bones, *t).map(DynSteps::Planar)
        }
        (DynChain::Spatial(c), DynPoint::Spatial(t)) => {
            solve_steps(cfg, c, bones, *t).map(DynSteps::Spatial)
        }
        _ => Err(SolveError::DimensionMismatch {
            expected: chain.dim(),
            found: target.dim(),
        }),
    }
}

impl DynSteps<'_> {
    pub fn bound(&self) -> Option<usize> {
        match self {
            Self::Planar(s) => s.bound(),
            Self::Spatial(s) => s.bound(),
        }
    }
}

fn lift<const D: usize>(
    item: Result<Snapshot<D>, SolveError>,
    wrap: fn(Vec<Point<D>>) -> DynChain,
) -> Result<DynSnapshot, SolveError> {
    item.map(|s| DynSnapshot {
        update: s.update,
        chain: wrap(s.chain),
    })
}

impl Iterator for DynSteps<'_> {
    type Item = Result<DynSnapshot, SolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Planar(s) => s.next().map(|item| lift(item, DynChain::Planar)),
            Self::Spatial(s) => s.next().map(|item| lift(item, DynChain::Spatial)),
        }
    }
}
