pub mod config;
pub mod gelfetch_toml;
pub mod logger;

pub use config::*;
pub use gelfetch_toml::{GelfetchToml, apply_file_to_opts, load_gelfetch_toml};
pub use logger::setup_logging;
