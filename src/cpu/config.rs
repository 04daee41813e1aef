use anyhow::ensure;
use serde::Deserialize;

use crate::sim::config::Config;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CoreConfig {
    pub superscalar_width: usize,
    pub rob_size: usize,
}

impl Config for CoreConfig {}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            superscalar_width: 4,
            rob_size: 192,
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.superscalar_width > 0, "superscalar_width must be > 0");
        ensure!(self.rob_size > 0, "rob_size must be > 0");
        Ok(())
    }
}
