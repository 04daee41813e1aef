pub mod address;
pub mod config;
pub mod controller;
pub mod stats;

#[cfg(test)]
mod tests;

pub use address::AddressMap;
pub use config::DramConfig;
pub use controller::{BankState, Dram, RowState};
pub use stats::DramStats;
