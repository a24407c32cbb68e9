pub mod format;
pub use format::LoggerFormat;

pub mod filter;
pub use filter::LoggerFilter;
