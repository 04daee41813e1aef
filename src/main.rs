use std::fs;

use anyhow::Context;
use clap::Parser;
use nijikawa::sim::log::init_logger;
use nijikawa::ui::{load_config, make_sim, NijikawaArgs};

pub fn main() -> anyhow::Result<()> {
    let argv = NijikawaArgs::parse();
    let toml_string = match &argv.config_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?,
        None => String::new(),
    };
    let config = load_config(&toml_string, Some(&argv))?;
    init_logger(config.sim.log_level);

    let mut sim = make_sim(&config)?;
    if let Err(err) = sim.simulate() {
        eprintln!("{}", sim.summary());
        return Err(err).context(format!("simulation aborted at cycle {}", sim.now()));
    }

    println!("{}", sim.summary());
    if let Some(path) = &config.sim.stats_json {
        sim.report().write_json(path)?;
    }
    Ok(())
}
