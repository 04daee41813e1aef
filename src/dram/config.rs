use anyhow::ensure;
use serde::Deserialize;

use crate::dram::address::AddressMap;
use crate::sim::config::Config;

/// Upper bound for the clock divider and every timing parameter.
pub const MAX_TIMING: u64 = 1 << 16;

/// DRAM geometry and timing.  Timing parameters are in controller cycles; one controller cycle
/// is `clock_divider` core cycles.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct DramConfig {
    pub offset_bits: u32,
    pub channel_bits: u32,
    pub column_bits: u32,
    pub bank_bits: u32,
    pub clock_divider: u64,
    // RD/WR to RD/WR (channel)
    pub t_ccd: u64,
    // RD/WR to first data
    pub t_cl: u64,
    // ACT to RD/WR (bank)
    pub t_rcd: u64,
    // PRE to ACT (bank)
    pub t_rp: u64,
    // ACT to PRE (bank)
    pub t_ras: u64,
    /// Never precharge a bank before tRAS has elapsed, even when nothing else is schedulable.
    pub strict_tras: bool,
}

impl Config for DramConfig {}

impl Default for DramConfig {
    fn default() -> Self {
        Self {
            offset_bits: 6,
            channel_bits: 1, // 2 channels
            column_bits: 0,
            bank_bits: 4, // 16 banks/channel
            clock_divider: 4,
            t_ccd: 4,
            t_cl: 11,
            t_rcd: 11,
            t_rp: 11,
            t_ras: 28,
            strict_tras: false,
        }
    }
}

impl DramConfig {
    pub fn address_map(&self) -> AddressMap {
        AddressMap::new(
            self.offset_bits,
            self.channel_bits,
            self.column_bits,
            self.bank_bits,
        )
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.clock_divider > 0, "clock_divider must be > 0");
        ensure!(self.t_ccd > 0, "t_ccd must be > 0");
        let timings = [
            ("clock_divider", self.clock_divider),
            ("t_ccd", self.t_ccd),
            ("t_cl", self.t_cl),
            ("t_rcd", self.t_rcd),
            ("t_rp", self.t_rp),
            ("t_ras", self.t_ras),
        ];
        for (name, value) in timings {
            ensure!(
                value <= MAX_TIMING,
                "{} = {} exceeds the supported maximum {}",
                name,
                value,
                MAX_TIMING
            );
        }
        ensure!(
            self.channel_bits <= 16 && self.bank_bits <= 16,
            "at most 16 channel bits and 16 bank bits are supported"
        );
        ensure!(
            self.offset_bits < 64 && self.column_bits < 64,
            "offset_bits and column_bits must be < 64"
        );
        // each field is < 64, so the sum cannot overflow
        let low_bits = self.offset_bits + self.channel_bits + self.column_bits + self.bank_bits;
        ensure!(
            low_bits < 64,
            "offset, channel, column and bank bits ({}) leave no row bits",
            low_bits
        );
        Ok(())
    }
}
