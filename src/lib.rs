pub mod base;
pub mod builtin;
pub mod cpu;
pub mod dram;
pub mod sim;
pub mod timeq;
pub mod traffic;
pub mod ui;
