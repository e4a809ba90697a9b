//! Problem files (JSON) and command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use clap::Args;
use fabrik::dynamic::{DynChain, DynPoint};
use fabrik::SolverCfg;
use serde::{Deserialize, Serialize};

/// On-disk problem description.
///
/// ```json
/// { "chain": [[0, 0], [0, 5], [0, 10]], "target": [5, 5], "tolerance": 0.001 }
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    /// Joint positions, root first; every row has 2 or 3 coordinates.
    pub chain: Vec<Vec<f64>>,
    /// Bone lengths; measured from `chain` when absent.
    #[serde(default)]
    pub bones: Option<Vec<f64>>,
    pub target: Vec<f64>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
    /// Drop the iteration cap. Only safe for targets known to be reachable.
    #[serde(default)]
    pub unbounded: bool,
    #[serde(default)]
    pub root_fixed: Option<bool>,
}

/// Flags that take precedence over the problem file.
#[derive(Args, Clone, Debug, Default)]
pub struct Overrides {
    /// Convergence tolerance (distance from end effector to target)
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Cap on forward/backward sweep pairs
    #[arg(long, conflicts_with = "unbounded")]
    pub max_iterations: Option<usize>,
    /// Run until the tolerance is met, however long it takes
    #[arg(long)]
    pub unbounded: bool,
    /// Let the root move with the chain
    #[arg(long)]
    pub free_root: bool,
}

/// A problem with every default filled in and the dimension decided.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub cfg: SolverCfg,
    pub chain: DynChain,
    pub bones: Vec<f64>,
    pub target: DynPoint,
}

impl Problem {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn cfg(&self, overrides: &Overrides) -> SolverCfg {
        let base = SolverCfg::default();
        let unbounded =
            overrides.unbounded || (self.unbounded && overrides.max_iterations.is_none());
        let max_iterations = if unbounded {
            None
        } else {
            overrides
                .max_iterations
                .or(self.max_iterations)
                .or(base.max_iterations)
        };
        let root_fixed = !overrides.free_root && self.root_fixed.unwrap_or(base.root_fixed);
        SolverCfg {
            tolerance: overrides
                .tolerance
                .or(self.tolerance)
                .unwrap_or(base.tolerance),
            max_iterations,
            root_fixed,
        }
    }

    pub fn resolve(&self, overrides: &Overrides) -> Result<Resolved> {
        let cfg = self.cfg(overrides);
        cfg.validate().context("solver configuration")?;
        let chain = DynChain::from_rows(self.chain.as_slice()).context("chain")?;
        let target = DynPoint::from_slice(&self.target).context("target")?;
        ensure!(
            chain.dim() == target.dim(),
            "target has {} coordinates but the chain is {}D",
            target.dim(),
            chain.dim()
        );
        let bones = match &self.bones {
            Some(b) => b.clone(),
            None => chain.bone_lengths(),
        };
        Ok(Resolved {
            cfg,
            chain,
            bones,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn planar() -> Problem {
        Problem {
            chain: vec![vec![0.0, 0.0], vec![0.0, 5.0], vec![0.0, 10.0]],
            target: vec![5.0, 5.0],
            ..Problem::default()
        }
    }

    #[test]
    fn defaults_fill_in() {
        let r = planar().resolve(&Overrides::default()).unwrap();
        assert_eq!(r.cfg, SolverCfg::default());
        assert_eq!(r.bones, vec![5.0, 5.0]);
        assert_eq!(r.chain.dim(), 2);
    }

    #[test]
    fn flags_beat_file() {
        let p = Problem {
            tolerance: Some(0.5),
            max_iterations: Some(7),
            root_fixed: Some(true),
            ..planar()
        };
        let cfg = p.cfg(&Overrides {
            tolerance: Some(0.25),
            free_root: true,
            ..Overrides::default()
        });
        assert_eq!(cfg.tolerance, 0.25);
        assert_eq!(cfg.max_iterations, Some(7));
        assert!(!cfg.root_fixed);

        let unbounded = p.cfg(&Overrides {
            unbounded: true,
            ..Overrides::default()
        });
        assert_eq!(unbounded.max_iterations, None);

        let file_unbounded = Problem {
            unbounded: true,
            ..planar()
        };
        assert_eq!(file_unbounded.cfg(&Overrides::default()).max_iterations, None);
        let capped = file_unbounded.cfg(&Overrides {
            max_iterations: Some(3),
            ..Overrides::default()
        });
        assert_eq!(capped.max_iterations, Some(3));
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let p = Problem {
            target: vec![1.0, 2.0, 3.0],
            ..planar()
        };
        let err = p.resolve(&Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("coordinates"), "{err:#}");
        let bad_tol = Problem {
            tolerance: Some(-1.0),
            ..planar()
        };
        assert!(bad_tol.resolve(&Overrides::default()).is_err());
    }

    #[test]
    fn load_from_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");
        fs::write(
            &path,
            r#"{"chain": [[0,0,0],[0,0,1]], "bones": [1.0], "target": [3,0,0], "root_fixed": false}"#,
        )
        .unwrap();
        let p = Problem::load(&path).unwrap();
        assert_eq!(p.bones, Some(vec![1.0]));
        assert_eq!(p.root_fixed, Some(false));
        let r = p.resolve(&Overrides::default()).unwrap();
        assert_eq!(r.chain.dim(), 3);
        assert!(!r.cfg.root_fixed);

        fs::write(&path, r#"{"chain": [[0,0]], "target": [1,1], "tolerence": 1}"#).unwrap();
        assert!(Problem::load(&path).is_err());
    }
}
