//! Configuration store for PST: loading and persistence.
//!
//! The store is a flat JSON object of string keys to scalar values. It is
//! created once at startup (from the bundled template on first run) and
//! passed by reference to whatever needs it.

mod paths;
mod store;

pub use paths::{CONFIG_ENV_VAR, config_path, pst_dir};
pub use store::{ConfigError, ConfigStore};

/// Default contents written on first run.
pub const BASE_CONFIG: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/base_config.json"));

/// Schema version this build writes and expects.
pub const SCHEMA_VERSION: &str = "1";

/// Well-known keys.
pub mod keys {
    pub const SCHEMA_VERSION: &str = "schema_version";
    /// Name of the view the config editor returns to.
    pub const MAIN_FRAME_NAME: &str = "main_frame_name";
    pub const ASCII_ONLY: &str = "ascii_only";
    pub const HIGH_CONTRAST: &str = "high_contrast";
    pub const MAX_FRAME_WIDTH: &str = "max_frame_width";
}

pub const DEFAULT_MAIN_FRAME: &str = "main";
