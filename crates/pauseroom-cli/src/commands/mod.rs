pub mod config;
pub mod format;
pub mod timer;
pub mod validate;
