//! Tentacle convergence probe.
//!
//! Purpose
//! - Reproducible data point for "how many sweeps and how long does a
//!   25-joint tapered arm need to reach a point overhead?"
//!
//! Setup
//! - Root at the bottom centre of an 800×600 frame, bones tapering from 100
//!   to 5 on a square-root scale, stacked straight up.
//! - Targets walk along a circle so every solve starts from the previous pose.

use std::time::Instant;

use fabrik::api::{bend_angles, max_bone_error, tapered_arm};
use fabrik::{solve, Point2, SolverCfg};
use nalgebra::vector;

fn main() {
    let (mut chain, bones) = tapered_arm(vector![400.0, 600.0], vector![0.0, -1.0], 25, 100.0, 5.0)
        .expect("non-zero direction");
    let cfg = SolverCfg::default()
        .with_tolerance(1.0)
        .with_max_iterations(Some(200));

    let mut total_iterations = 0;
    let start = Instant::now();
    for k in 0..360 {
        let theta = (k as f64).to_radians();
        let target: Point2 = vector![400.0 + 250.0 * theta.cos(), 300.0 + 200.0 * theta.sin()];
        let sol = solve(cfg, &chain, &bones, target).expect("valid chain");
        total_iterations += sol.report.iterations;
        chain = sol.chain;
    }
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;

    let bends = bend_angles(&chain);
    let sharpest = bends.iter().map(|a| a.abs()).fold(0.0, f64::max);
    println!("joints={} solves=360", chain.len());
    println!("total_iterations={total_iterations} time_ms={elapsed_ms:.3}");
    println!(
        "max_bone_error={:.3e} sharpest_bend_deg={sharpest:.2}",
        max_bone_error(&chain, &bones)
    );
}
