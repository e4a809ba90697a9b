//! Headless "tentacle follows the pointer" simulation.
//!
//! Every tick the solver runs once on a persistent pose buffer toward the
//! current target; each simulated node is then pulled toward its solved
//! joint with `strength * alpha`, damped by `velocity_decay`, and integrated.
//! The nodes lag behind the IK pose, which smooths the motion.

use fabrik::{solve_in_place, Point, Report, SolveError, SolverCfg};
use polars::prelude::*;

/// One simulated joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node<const D: usize> {
    pub pos: Point<D>,
    pub vel: Point<D>,
}

/// Follower parameters.
#[derive(Clone, Copy, Debug)]
pub struct FollowCfg {
    pub solver: SolverCfg,
    /// Pull toward the solved pose per tick, scaled by alpha.
    pub strength: f64,
    /// Fraction of velocity removed per tick, in [0, 1].
    pub velocity_decay: f64,
    /// Global force scale; constant 1.0 keeps the simulation awake.
    pub alpha: f64,
}

impl Default for FollowCfg {
    fn default() -> Self {
        Self {
            solver: SolverCfg::default().with_tolerance(1.0),
            strength: 0.5,
            velocity_decay: 0.8,
            alpha: 1.0,
        }
    }
}

pub struct Follower<const D: usize> {
    cfg: FollowCfg,
    pose: Vec<Point<D>>,
    bones: Vec<f64>,
    nodes: Vec<Node<D>>,
}

impl<const D: usize> Follower<D> {
    pub fn new(cfg: FollowCfg, chain: Vec<Point<D>>, bones: Vec<f64>) -> Self {
        let nodes = chain
            .iter()
            .map(|&pos| Node {
                pos,
                vel: Point::<D>::zeros(),
            })
            .collect();
        Self {
            cfg,
            pose: chain,
            bones,
            nodes,
        }
    }

    pub fn nodes(&self) -> &[Node<D>] {
        &self.nodes
    }

    pub fn pose(&self) -> &[Point<D>] {
        &self.pose
    }

    /// Advance one tick toward `target`.
    pub fn tick(&mut self, target: Point<D>) -> Result<Report, SolveError> {
        let report = solve_in_place(self.cfg.solver, &mut self.pose, &self.bones, target)?;
        let keep = 1.0 - self.cfg.velocity_decay.clamp(0.0, 1.0);
        let pull = self.cfg.alpha * self.cfg.strength;
        for (node, goal) in self.nodes.iter_mut().zip(&self.pose) {
            node.vel += (goal - node.pos) * pull;
            node.vel *= keep;
            node.pos += node.vel;
        }
        Ok(report)
    }
}

/// Per-tick summary rows.
#[derive(Default)]
pub struct FollowLog {
    tick: Vec<u64>,
    target_x: Vec<f64>,
    target_y: Vec<f64>,
    iterations: Vec<u64>,
    residual: Vec<f64>,
    lag: Vec<f64>,
}

impl FollowLog {
    pub fn push(&mut self, tick: usize, target: &Point<2>, report: &Report, lag: f64) {
        self.tick.push(tick as u64);
        self.target_x.push(target.x);
        self.target_y.push(target.y);
        self.iterations.push(report.iterations as u64);
        self.residual.push(report.residual);
        self.lag.push(lag);
    }

    pub fn into_frame(self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Series::new("tick".into(), self.tick),
            Series::new("target_x".into(), self.target_x),
            Series::new("target_y".into(), self.target_y),
            Series::new("iterations".into(), self.iterations),
            Series::new("residual".into(), self.residual),
            Series::new("lag".into(), self.lag),
        ])
    }
}

/// Target on an ellipse above the root, one full lap over `ticks`.
pub fn orbit(center: Point<2>, radii: (f64, f64), tick: usize, ticks: usize) -> Point<2> {
    let theta = std::f64::consts::TAU * tick as f64 / ticks.max(1) as f64;
    Point::<2>::new(
        center.x + radii.0 * theta.cos(),
        center.y + radii.1 * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabrik::api::tapered_arm;
    use fabrik::vector::distance;

    #[test]
    fn nodes_settle_on_a_still_target() {
        let (chain, bones) =
            tapered_arm(Point::<2>::new(0.0, 0.0), Point::<2>::new(0.0, 1.0), 6, 3.0, 1.0)
                .unwrap();
        let reach: f64 = bones.iter().sum();
        let target = Point::<2>::new(reach * 0.5, reach * 0.5);
        let mut f = Follower::new(FollowCfg::default(), chain, bones);
        let mut last = f64::INFINITY;
        for _ in 0..200 {
            f.tick(target).unwrap();
            let tip = f.nodes()[f.nodes().len() - 1].pos;
            last = distance(&tip, &target);
        }
        assert!(last < 1.5, "tip still {last} away");
        // the solved pose keeps the root pinned
        assert_eq!(f.pose()[0], Point::<2>::new(0.0, 0.0));
    }

    #[test]
    fn damping_slows_nodes_down() {
        let chain = vec![Point::<2>::new(0.0, 0.0), Point::<2>::new(0.0, 1.0)];
        let mut f = Follower::new(FollowCfg::default(), chain, vec![1.0]);
        f.tick(Point::<2>::new(5.0, 0.0)).unwrap();
        // pose jumps to (1, 0); node 1 moves pull * keep of the way there
        let n = f.nodes()[1];
        let start = Point::<2>::new(0.0, 1.0);
        let expected = start + (Point::<2>::new(1.0, 0.0) - start) * 0.5 * 0.2;
        assert!((n.pos - expected).norm() < 1e-12);
    }

    #[test]
    fn log_frame_has_one_row_per_tick() {
        let mut log = FollowLog::default();
        let report = Report {
            status: fabrik::Status::Converged,
            iterations: 2,
            residual: 0.1,
        };
        for t in 0..5 {
            let target = orbit(Point::<2>::new(0.0, 0.0), (2.0, 1.0), t, 5);
            log.push(t, &target, &report, 0.0);
        }
        let df = log.into_frame().unwrap();
        assert_eq!(df.height(), 5);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn long_runs_keep_full_tick_numbers() {
        let mut log = FollowLog::default();
        let report = Report {
            status: fabrik::Status::IterationCap,
            iterations: u32::MAX as usize + 1,
            residual: 2.0,
        };
        let tick = u32::MAX as usize + 3;
        log.push(tick, &Point::<2>::new(1.0, 1.0), &report, 0.5);
        let df = log.into_frame().unwrap();
        let ticks = df.column("tick").unwrap().u64().unwrap().get(0);
        let iterations = df.column("iterations").unwrap().u64().unwrap().get(0);
        assert_eq!(ticks, Some(tick as u64));
        assert_eq!(iterations, Some(u32::MAX as u64 + 1));
    }
}
