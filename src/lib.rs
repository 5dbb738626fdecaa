pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{sanity::SanityStore, source::HttpSource};
pub use config::toml_config::TomlConfig;
pub use crate::core::importer::{ImportOptions, Importer};
pub use crate::core::report::ImportReport;
pub use utils::error::{ImportError, Result};
