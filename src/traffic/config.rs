use serde::Deserialize;

use crate::sim::config::Config;

/// Synthetic request streams fed to the core in place of a trace file.  Patterns run back to
/// back in the order they are listed.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TrafficConfig {
    pub patterns: Vec<TrafficPatternSpec>,
}

impl Config for TrafficConfig {}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TrafficPatternSpec {
    pub name: String,
    /// `sequential`, `strided` or `random`
    pub kind: String,
    /// `read` or `write`
    pub op: String,
    pub count: u64,
    pub base: u64,
    pub stride: u64,
    // non-memory instructions ahead of every access
    pub precursor: u64,
    pub seed: u64,
    pub span: u64,
    pub align: u64,
}

impl Default for TrafficPatternSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            op: "read".to_string(),
            count: 1024,
            base: 0,
            stride: 64,
            precursor: 0,
            seed: 0,
            span: 1 << 20,
            align: 64,
        }
    }
}
