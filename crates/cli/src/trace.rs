//! Snapshot streams as tables: one row per (snapshot, joint).

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fabrik::dynamic::{DynChain, DynSnapshot};
use polars::prelude::*;

/// Column buffers for a trace table.
#[derive(Default)]
pub struct TraceTable {
    step: Vec<u64>,
    iteration: Vec<u64>,
    phase: Vec<String>,
    moved: Vec<u64>,
    joint: Vec<u64>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<Option<f64>>,
}

impl TraceTable {
    pub fn push(&mut self, step: usize, snap: &DynSnapshot) {
        let rows = snap.chain.to_rows();
        for (j, row) in rows.iter().enumerate() {
            self.step.push(step as u64);
            self.iteration.push(snap.update.iteration as u64);
            self.phase.push(snap.update.phase.to_string());
            self.moved.push(snap.update.joint as u64);
            self.joint.push(j as u64);
            self.x.push(row[0]);
            self.y.push(row[1]);
            self.z.push(row.get(2).copied());
        }
    }

    pub fn height(&self) -> usize {
        self.step.len()
    }

    pub fn into_frame(self, dim: usize) -> PolarsResult<DataFrame> {
        let mut columns = vec![
            Series::new("step".into(), self.step),
            Series::new("iteration".into(), self.iteration),
            Series::new("phase".into(), self.phase),
            Series::new("moved".into(), self.moved),
            Series::new("joint".into(), self.joint),
            Series::new("x".into(), self.x),
            Series::new("y".into(), self.y),
        ];
        if dim == 3 {
            columns.push(Series::new("z".into(), self.z));
        }
        DataFrame::new(columns)
    }
}

/// Build the trace table for a stream, failing on the first solver error.
pub fn collect<I>(snapshots: I, chain: &DynChain) -> Result<DataFrame>
where
    I: IntoIterator<Item = Result<DynSnapshot, fabrik::SolveError>>,
{
    let mut table = TraceTable::default();
    for (step, snap) in snapshots.into_iter().enumerate() {
        let snap = snap.with_context(|| format!("solver failed at step {step}"))?;
        table.push(step, &snap);
    }
    tracing::debug!(rows = table.height(), "trace collected");
    Ok(table.into_frame(chain.dim())?)
}

/// Write `df` as CSV or Parquet, chosen by the file extension.
pub fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let ext = out
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    match ext.as_str() {
        "csv" => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("writing {}", out.display()))?,
        "parquet" => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("writing {}", out.display()))?;
        }
        other => bail!("unsupported table format {other:?} (use .csv or .parquet)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabrik::dynamic::{solve_steps_dyn, DynPoint};
    use fabrik::SolverCfg;
    use tempfile::tempdir;

    #[test]
    fn planar_trace_has_one_row_per_joint() {
        let chain = DynChain::from_rows(&[[0.0, 0.0], [0.0, 5.0], [0.0, 10.0]]).unwrap();
        let target = DynPoint::from_slice(&[6.0, 2.0]).unwrap();
        let bones = [5.0, 5.0];
        let cfg = SolverCfg::default().with_max_iterations(Some(2));
        let steps = solve_steps_dyn(cfg, &chain, &bones, &target).unwrap();
        let df = collect(steps, &chain).unwrap();
        // two sweep pairs, four updates each, three joints per snapshot
        assert_eq!(df.height(), 2 * 4 * 3);
        assert_eq!(df.width(), 7);
    }

    #[test]
    fn step_counters_past_u32_are_kept() {
        let chain = DynChain::from_rows(&[[0.0, 0.0], [0.0, 1.0]]).unwrap();
        let target = DynPoint::from_slice(&[3.0, 0.0]).unwrap();
        let mut steps = solve_steps_dyn(SolverCfg::default(), &chain, &[1.0], &target).unwrap();
        let snap = steps.next().unwrap().unwrap();
        let far = u32::MAX as usize + 7;
        let mut table = TraceTable::default();
        table.push(far, &snap);
        let df = table.into_frame(2).unwrap();
        let step = df.column("step").unwrap().u64().unwrap().get(0);
        assert_eq!(step, Some(far as u64));
    }

    #[test]
    fn spatial_trace_writes_csv() {
        let chain = DynChain::from_rows(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
        let target = DynPoint::from_slice(&[0.0, 0.0, 5.0]).unwrap();
        let steps = solve_steps_dyn(SolverCfg::default(), &chain, &[1.0], &target).unwrap();
        let mut df = collect(steps, &chain).unwrap();
        assert_eq!(df.width(), 8);

        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/trace.csv");
        write_frame(&mut df, &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("step,iteration,phase,moved,joint,x,y,z"));
        assert_eq!(lines.count(), 2);

        let bad = dir.path().join("trace.txt");
        assert!(write_frame(&mut df, &bad).is_err());
    }
}
