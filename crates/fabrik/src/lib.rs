//! Position-only inverse kinematics for open chains (FABRIK).
//!
//! A chain is a sequence of joints joined by rigid bones. The solver drags the
//! last joint (end effector) toward a target with alternating forward and
//! backward reaching sweeps, keeping every bone at its exact length and,
//! optionally, the root pinned in place.
//!
//! Layout
//! - `vector`: point aliases and the segment primitive every update goes through.
//! - `solver`: configuration, errors, the relaxation engine, and both solver
//!   entry points (`solve` runs to completion, `solve_steps` streams snapshots).
//! - `dynamic`: runtime 2D/3D dispatch for data whose dimension is only known
//!   after parsing.
//! - `layout`, `diagnostics`, `rand`: chain builders, inspection helpers, and
//!   seeded random chains for tests and benchmarks.

pub mod api;
pub mod diagnostics;
pub mod dynamic;
pub mod layout;
pub mod rand;
pub mod solver;
pub mod vector;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use solver::{
    solve, solve_in_place, solve_steps, solve_with, Phase, Report, Snapshot, SolveError,
    Solution, SolverCfg, Status, Steps, Update,
};
pub use vector::{Point, Point2, Point3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::dynamic::{solve_dyn, solve_steps_dyn, DynChain, DynPoint};
    pub use crate::solver::{
        solve, solve_in_place, solve_steps, solve_with, Report, SolveError, Solution, SolverCfg,
        Status,
    };
    pub use crate::vector::{distance, point_toward_at, Point, Point2, Point3};
}
