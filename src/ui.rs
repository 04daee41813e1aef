use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::sim::config::{FrontendMode, RunConfig};
use crate::sim::top::Sim;
use crate::sim::trace::{TraceSource, UsimmTraceReader};
use crate::traffic::TrafficSource;

#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct NijikawaArgs {
    #[arg(help = "Path to config.toml")]
    pub config_path: Option<PathBuf>,
    #[arg(long, help = "Override trace file path (selects the trace frontend)")]
    pub trace: Option<PathBuf>,
    #[arg(long, help = "Override cycle budget")]
    pub cycles: Option<u64>,
    #[arg(long, help = "Override instructions issued/retired per cycle")]
    pub superscalar_width: Option<usize>,
    #[arg(long, help = "Override reorder buffer size")]
    pub rob_size: Option<usize>,
    #[arg(long, help = "Enable log at level (0:none, 1:info, 2:debug)")]
    pub log: Option<u64>,
    #[arg(long, help = "Write end-of-run statistics as JSON")]
    pub stats_json: Option<PathBuf>,
    #[arg(long, help = "Stop as soon as every instruction has retired")]
    pub stop_on_drain: Option<bool>,
}

/// Parse the TOML configuration and validate it.
/// If `cli_args` is given, override TOML options with CLI arguments.
pub fn load_config(toml_string: &str, cli_args: Option<&NijikawaArgs>) -> anyhow::Result<RunConfig> {
    let mut config = RunConfig::from_toml_str(toml_string)?;

    // override toml configs with CLI args
    if let Some(args) = cli_args {
        if let Some(trace) = &args.trace {
            config.sim.trace = Some(trace.clone());
            config.sim.frontend_mode = FrontendMode::Trace;
        }
        config.sim.cycles = args.cycles.unwrap_or(config.sim.cycles);
        config.sim.log_level = args.log.or(config.sim.log_level);
        config.sim.stop_on_drain = args.stop_on_drain.unwrap_or(config.sim.stop_on_drain);
        if let Some(path) = &args.stats_json {
            config.sim.stats_json = Some(path.clone());
        }
        config.core.superscalar_width = args
            .superscalar_width
            .unwrap_or(config.core.superscalar_width);
        config.core.rob_size = args.rob_size.unwrap_or(config.core.rob_size);
    }

    config.validate()?;
    Ok(config)
}

pub fn make_frontend(config: &RunConfig) -> anyhow::Result<Box<dyn TraceSource>> {
    match config.sim.frontend_mode {
        FrontendMode::Trace => {
            let path = config
                .sim
                .trace
                .as_ref()
                .context("no trace file configured")?;
            let reader = UsimmTraceReader::open(path)
                .with_context(|| format!("cannot open trace {}", path.display()))?;
            Ok(Box::new(reader))
        }
        FrontendMode::Traffic => Ok(Box::new(TrafficSource::new(&config.traffic)?)),
    }
}

/// Make a Sim object from a validated configuration.
pub fn make_sim(config: &RunConfig) -> anyhow::Result<Sim> {
    let frontend = make_frontend(config)?;
    let sim = Sim::new(config.sim.clone(), &config.core, &config.dram, frontend)
        .context("cannot read the first trace record")?;
    Ok(sim)
}
