#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod error;
pub mod server;
pub mod version;

pub use config::Config;
pub use error::Error;
pub use server::{
    bind, find_config_file, load_config, FileServerConfig, Overrides, ServerConfig,
    WatchExclusions,
};
pub use version::VERSION;
