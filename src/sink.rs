//! CSV sink for the per-run result table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::{Error, RunOutcome, RunSink};

/// Writes the per-run table as a CSV file, header plus one row per run.
///
/// The file is created (or truncated) on the first `persist` call; the sink
/// runs once per batch, after all simulation completes.
#[derive(Debug, Clone)]
pub struct CsvRunSink {
    path: PathBuf,
}

impl CsvRunSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl RunSink for CsvRunSink {
    fn persist(&mut self, rows: &[RunOutcome]) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(&self.path)?);
        writeln!(
            w,
            "run,total_reward,steps_taken,cut_count,hold_count,raise_count"
        )?;
        for r in rows {
            writeln!(
                w,
                "{},{},{},{},{},{}",
                r.run, r.total_reward, r.steps_taken, r.cut_count, r.hold_count, r.raise_count
            )?;
        }
        w.flush()?;
        Ok(())
    }
}
