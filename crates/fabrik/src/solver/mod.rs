//! FABRIK solver: reachability check, forward/backward relaxation, streaming.
//!
//! Purpose
//! - Move the end effector of a chain onto (or as close as possible to) a
//!   target while every bone keeps its exact length.
//! - Offer the same computation either run to completion (`solve`) or as a
//!   lazy sequence of per-update snapshots (`solve_steps`).
//!
//! Model
//! - Fixed root and target beyond total reach: stretch the chain in a straight
//!   line toward the target, one bone at a time. No iteration.
//! - Otherwise: repeat forward sweep (pin effector to target, walk to root) and
//!   backward sweep (re-pin root if fixed, walk to effector) until the
//!   effector is within `tolerance` or `max_iterations` sweeps ran.
//!
//! Why this design
//! - A single engine (`engine::Relaxation`) performs exactly one point update
//!   per `advance()`. `solve` drains it, `solve_with` hands each state to an
//!   observer, and `Steps` copies the chain after each update. All three share
//!   one implementation of the sweeps.
//! - Inputs are validated before any work and the engine owns a copy of the
//!   chain, so a rejected call never touches caller data.
//!
//! Code cross-refs: `vector::point_toward_at`, `types::{SolverCfg,Solution}`.

mod engine;
mod error;
mod run;
mod steps;
mod types;

pub use error::SolveError;
pub use run::{solve, solve_in_place, solve_with};
pub use steps::{solve_steps, Snapshot, Steps};
pub use types::{Phase, Report, Solution, SolverCfg, Status, Update};
