pub mod mem;
pub mod port;
