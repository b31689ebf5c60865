pub mod common;
pub mod completions;
pub mod config;
pub mod sessions;
pub mod settings;
pub mod timer;
