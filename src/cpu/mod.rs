pub mod config;
pub mod core;
pub mod mshr;
pub mod rob;
pub mod stats;


pub use self::config::CoreConfig;
pub use self::core::Core;
pub use self::stats::CoreStats;
