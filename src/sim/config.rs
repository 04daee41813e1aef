use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{ensure, Context};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::{Table, Value};

use crate::cpu::config::CoreConfig;
use crate::dram::config::DramConfig;
use crate::traffic::config::TrafficConfig;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrontendMode {
    #[default]
    Trace,
    Traffic,
}

impl FromStr for FrontendMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "trace" => Ok(Self::Trace),
            "traffic" => Ok(Self::Traffic),
            _ => Err(format!(
                "unsupported frontend mode '{}', expected one of: trace, traffic",
                value
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimConfig {
    pub trace: Option<PathBuf>,
    pub cycles: u64,
    pub log_level: Option<u64>,
    pub frontend_mode: FrontendMode,
    pub stop_on_drain: bool,
    pub stats_json: Option<PathBuf>,
}

pub trait Config: DeserializeOwned + Default {
    fn from_section(section: Option<&Value>) -> anyhow::Result<Self> {
        match section {
            Some(value) => value
                .clone()
                .try_into()
                .context("cannot deserialize config section"),
            None => {
                warn!("config section not found");
                Ok(Self::default())
            }
        }
    }
}

impl Config for SimConfig {}

// Largest accepted cycle budget.  Leaves headroom above `now` for DRAM completion times.
pub const MAX_CYCLES: u64 = 1 << 62;

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trace: None,
            cycles: 100_000_000,
            log_level: None,
            frontend_mode: FrontendMode::Trace,
            stop_on_drain: true,
            stats_json: None,
        }
    }
}

/// Every section of a run configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub sim: SimConfig,
    pub core: CoreConfig,
    pub dram: DramConfig,
    pub traffic: TrafficConfig,
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let table: Table = toml::from_str(text).context("cannot parse config toml")?;
        Ok(Self {
            sim: SimConfig::from_section(table.get("sim")).context("in [sim]")?,
            core: CoreConfig::from_section(table.get("core")).context("in [core]")?,
            dram: DramConfig::from_section(table.get("dram")).context("in [dram]")?,
            traffic: TrafficConfig::from_section(table.get("traffic")).context("in [traffic]")?,
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.sim.cycles <= MAX_CYCLES,
            "cycles = {} exceeds the supported maximum {}",
            self.sim.cycles,
            MAX_CYCLES
        );
        self.core.validate()?;
        self.dram.validate()?;
        if self.sim.frontend_mode == FrontendMode::Trace {
            ensure!(
                self.sim.trace.is_some(),
                "frontend mode 'trace' needs a trace file (sim.trace or --trace)"
            );
        }
        Ok(())
    }
}
