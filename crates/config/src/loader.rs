use std::path::{Path, PathBuf};

use {secrecy::Secret, tracing::debug};

use crate::{
    env_subst::substitute_env,
    error::{ConfigError, Result},
    schema::BistroConfig,
    validate::validate,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["bistro.toml", "bistro.yaml", "bistro.yml", "bistro.json"];

/// Load, override and validate the process configuration.
///
/// With an explicit `path` the file must exist. Otherwise the standard
/// locations are searched and, when nothing is found, configuration comes from
/// the environment alone.
pub fn load(path: Option<&Path>) -> Result<BistroConfig> {
    let mut config = match path {
        Some(path) => load_from_path(path)?,
        None => match find_config_file() {
            Some(found) => {
                debug!(path = %found.display(), "loading config");
                load_from_path(&found)?
            },
            None => {
                debug!("no config file found, using environment only");
                BistroConfig::default()
            },
        },
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Read and parse a config file, without overrides or validation.
pub fn load_from_path(path: &Path) -> Result<BistroConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dirs = directories::ProjectDirs::from("", "", "bistro")?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dirs.config_dir().join(name))
        .find(|p| p.exists())
}

/// Apply environment variable overrides on top of file values.
pub fn apply_env_overrides(config: &mut BistroConfig) {
    apply_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_overrides_with(config: &mut BistroConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("MESSENGER_APP_SECRET") {
        config.messenger.app_secret = Secret::new(v);
    }
    if let Some(v) = get("MESSENGER_VALIDATION_TOKEN") {
        config.messenger.verify_token = Secret::new(v);
    }
    if let Some(v) = get("MESSENGER_PAGE_ACCESS_TOKEN") {
        config.messenger.page_access_token = Secret::new(v);
    }
    if let Some(v) = get("SERVER_URL") {
        config.server.server_url = v;
    }
    if let Some(v) = get("BISTRO_GRAPH_API_URL") {
        config.messenger.graph_api_url = v;
    }
    if let Some(v) = get("BISTRO_BIND") {
        config.server.bind = v;
    }
    if let Some(v) = get("BISTRO_PORT") {
        match v.parse() {
            Ok(port) => config.server.port = port,
            Err(e) => tracing::warn!(value = %v, error = %e, "ignoring invalid BISTRO_PORT"),
        }
    }
    if let Some(v) = get("BISTRO_MISSING_SIGNATURE") {
        match v.parse() {
            Ok(policy) => config.messenger.missing_signature = policy,
            Err(e) => tracing::warn!(error = %e, "ignoring invalid BISTRO_MISSING_SIGNATURE"),
        }
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<BistroConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let parse_err = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string())),
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        other => Err(ConfigError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}
