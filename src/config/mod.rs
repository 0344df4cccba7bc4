//! `.bigo.toml` configuration

mod core;
mod loader;

pub use self::core::{
    AnalysisSettings, BigoConfig, CallsConfig, FilesConfig, OutputConfig, DEFAULT_CONFIG,
};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
