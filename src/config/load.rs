use std::collections::HashSet;
use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `SONG_CATALOG__`) and falls back to struct defaults.
impl Settings {
    /// Load settings from the optional config file and environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SONG_CATALOG")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let selection = &self.selection;
        if selection.decades.is_empty() {
            return Err("selection.decades must list at least one decade".to_string());
        }
        if selection.catalog_size == 0 {
            return Err("selection.catalog_size must be >= 1".to_string());
        }

        let mut seen = HashSet::new();
        for d in &selection.decades {
            if d.decade % 10 != 0 {
                return Err(format!(
                    "selection.decades: {} is not the first year of a decade",
                    d.decade
                ));
            }
            if d.quota == 0 {
                return Err(format!("selection.decades: quota for {} must be >= 1", d.decade));
            }
            if !seen.insert(d.decade) {
                return Err(format!("selection.decades: {} is listed twice", d.decade));
            }
        }

        if self.enrichment.clip_duration_seconds == 0 {
            return Err("enrichment.clip_duration_seconds must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SONG_CATALOG_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SONG_CATALOG_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/song-catalog/config.toml`
/// or `~/.config/song-catalog/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("song-catalog").join("config.toml"))
}
