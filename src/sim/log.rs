use env_logger::{Builder, Env};
use log::LevelFilter;

#[derive(PartialEq, PartialOrd, Debug, Default, Clone, Copy)]
pub enum LogLevel {
    #[default]
    NONE,
    INFO,
    DEBUG,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::NONE => LevelFilter::Warn,
            LogLevel::INFO => LevelFilter::Info,
            LogLevel::DEBUG => LevelFilter::Debug,
        }
    }
}

pub fn to_loglevel(ulevel: u64) -> LogLevel {
    match ulevel {
        0 => LogLevel::NONE,
        1 => LogLevel::INFO,
        2 => LogLevel::DEBUG,
        _ => LogLevel::DEBUG,
    }
}

/// Install the process logger.  An explicit level (0: warnings only, 1: info, 2: debug) wins over
/// `RUST_LOG`; without one, `RUST_LOG` is honored and defaults to warnings.
pub fn init_logger(ulevel: Option<u64>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = ulevel {
        builder.filter_level(to_loglevel(level).filter());
    }
    // a second init (tests, embedding) keeps the first logger
    let _ = builder.format_timestamp(None).try_init();
}
