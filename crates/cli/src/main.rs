use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fabrik::api::tapered_arm;
use fabrik::diagnostics::{bend_angles, max_bone_error};
use fabrik::dynamic::{solve_dyn, solve_steps_dyn, DynChain};
use fabrik::vector::distance;
use fabrik::{Point2, SolverCfg};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod follow;
mod problem;
mod provenance;
mod trace;

use follow::{orbit, FollowCfg, FollowLog, Follower};
use problem::{Overrides, Problem};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "fabrik")]
#[command(about = "FABRIK inverse kinematics: solve, trace, and simulate chains")]
struct Cmd {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve a JSON problem and write the final chain as JSON
    Solve {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Stream every point update of a solve into a CSV or Parquet table
    Trace {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Simulate a tapered arm following a target around an ellipse
    Follow {
        #[arg(long, default_value_t = 25)]
        joints: usize,
        #[arg(long, default_value_t = 240)]
        ticks: usize,
        #[arg(long, default_value_t = 0.5)]
        strength: f64,
        #[arg(long, default_value_t = 0.8)]
        velocity_decay: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Solve {
            input,
            out,
            overrides,
        } => solve(&input, &out, &overrides),
        Action::Trace {
            input,
            out,
            overrides,
        } => trace(&input, &out, &overrides),
        Action::Follow {
            joints,
            ticks,
            strength,
            velocity_decay,
            out,
        } => follow(joints, ticks, strength, velocity_decay, &out),
        Action::Report => report(),
    }
}

fn cfg_params(cfg: &SolverCfg) -> serde_json::Value {
    json!({
        "tolerance": cfg.tolerance,
        "max_iterations": cfg.max_iterations,
        "root_fixed": cfg.root_fixed,
    })
}

fn chain_diagnostics(chain: &DynChain, bones: &[f64]) -> (f64, Vec<f64>) {
    match chain {
        DynChain::Planar(c) => (max_bone_error(c, bones), bend_angles(c)),
        DynChain::Spatial(c) => (max_bone_error(c, bones), bend_angles(c)),
    }
}

fn ensure_parent(out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn solve(input: &Path, out: &Path, overrides: &Overrides) -> Result<()> {
    let problem = Problem::load(input)?;
    let resolved = problem.resolve(overrides)?;
    tracing::info!(
        input = %input.display(),
        joints = resolved.chain.len(),
        dim = resolved.chain.dim(),
        "solve"
    );
    let solution = solve_dyn(resolved.cfg, &resolved.chain, &resolved.bones, &resolved.target)
        .context("solving")?;
    let report = solution.report;
    let (bone_error, bends) = chain_diagnostics(&solution.chain, &resolved.bones);
    tracing::info!(
        status = %report.status,
        iterations = report.iterations,
        residual = report.residual,
        "solved"
    );

    let doc = json!({
        "chain": solution.chain.to_rows(),
        "status": report.status.to_string(),
        "iterations": report.iterations,
        "residual": report.residual,
        "max_bone_error": bone_error,
        "bend_angles": bends,
    });
    ensure_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    write_sidecar(out, Payload::new(cfg_params(&resolved.cfg)).with_input(input))?;
    Ok(())
}

fn trace(input: &Path, out: &Path, overrides: &Overrides) -> Result<()> {
    let problem = Problem::load(input)?;
    let resolved = problem.resolve(overrides)?;
    let steps = solve_steps_dyn(resolved.cfg, &resolved.chain, &resolved.bones, &resolved.target)
        .context("starting solve")?;
    tracing::info!(
        input = %input.display(),
        bound = ?steps.bound(),
        "trace"
    );
    let mut df = trace::collect(steps, &resolved.chain)?;
    trace::write_frame(&mut df, out)?;
    tracing::info!(rows = df.height(), out = %out.display(), "trace written");
    write_sidecar(out, Payload::new(cfg_params(&resolved.cfg)).with_input(input))?;
    Ok(())
}

fn follow(
    joints: usize,
    ticks: usize,
    strength: f64,
    velocity_decay: f64,
    out: &Path,
) -> Result<()> {
    anyhow::ensure!(joints >= 2, "a follower needs at least two joints");
    let root = Point2::new(0.0, 0.0);
    let (chain, bones) = tapered_arm(root, Point2::new(0.0, 1.0), joints, 30.0, 5.0)
        .context("building arm")?;
    let reach: f64 = bones.iter().sum();
    let cfg = FollowCfg {
        strength,
        velocity_decay,
        ..FollowCfg::default()
    };
    cfg.solver.validate()?;
    tracing::info!(joints, ticks, reach, "follow");

    let center = Point2::new(0.0, 0.5 * reach);
    let radii = (0.6 * reach, 0.3 * reach);
    let mut sim = Follower::new(cfg, chain, bones);
    let mut log = FollowLog::default();
    for t in 0..ticks {
        let target = orbit(center, radii, t, ticks);
        let report = sim
            .tick(target)
            .with_context(|| format!("tick {t}"))?;
        let tip = sim.nodes()[sim.nodes().len() - 1].pos;
        let lag = distance(&tip, &sim.pose()[sim.pose().len() - 1]);
        tracing::trace!(tick = t, residual = report.residual, lag, "tick");
        log.push(t, &target, &report, lag);
    }
    let mut df = log.into_frame()?;
    trace::write_frame(&mut df, out)?;
    tracing::info!(rows = df.height(), out = %out.display(), "follow written");
    let params = json!({
        "joints": joints,
        "ticks": ticks,
        "strength": strength,
        "velocity_decay": velocity_decay,
        "solver": cfg_params(&cfg.solver),
    });
    write_sidecar(out, Payload::new(params))?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "fabrik_version": fabrik::VERSION,
        "defaults": cfg_params(&SolverCfg::default()),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
