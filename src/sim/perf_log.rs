use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::cpu::CoreStats;
use crate::dram::DramStats;
use crate::sim::top::SimSummary;

/// End-of-run statistics, written as one JSON document.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SimReport {
    pub summary: SimSummary,
    pub ipc: f64,
    pub core: CoreStats,
    pub dram: DramStats,
    pub dram_row_hit_rate: f64,
}

impl SimReport {
    pub fn new(summary: SimSummary, core: CoreStats, dram: DramStats) -> Self {
        Self {
            summary,
            ipc: summary.ipc(),
            core,
            dram,
            dram_row_hit_rate: dram.row_hit_rate(),
        }
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("cannot create stats file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).context("cannot serialize stats")?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
