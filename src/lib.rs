pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::toml_config::NetworkConfig;
pub use core::{etl::EtlEngine, pipeline::NetworkPipeline};
pub use utils::error::{EtlError, Result};
