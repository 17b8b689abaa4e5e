use std::env;
use std::path::PathBuf;

/// Overrides the working config location.
pub const CONFIG_ENV_VAR: &str = "PST_CONFIG";

const CONFIG_FILE_NAME: &str = "current_config.json";

/// `~/.pst`, if a home directory can be determined.
#[must_use]
pub fn pst_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pst"))
}

/// Working config file: `$PST_CONFIG`, else `~/.pst/current_config.json`,
/// else `./.pst/current_config.json`.
#[must_use]
pub fn config_path() -> PathBuf {
    if let Some(raw) = env::var_os(CONFIG_ENV_VAR)
        && !raw.is_empty()
    {
        return PathBuf::from(raw);
    }

    pst_dir()
        .unwrap_or_else(|| PathBuf::from(".pst"))
        .join(CONFIG_FILE_NAME)
}
