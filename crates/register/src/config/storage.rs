//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where the sale in progress is kept between runs.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the register's local data
    #[arg(long, env = "TILL_DATA_DIR", default_value = ".till")]
    pub data_dir: PathBuf,
}
