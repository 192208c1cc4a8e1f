//! Configuration loading and validation for the bistro bot.
//!
//! Config files: `bistro.toml`, `bistro.yaml`, or `bistro.json`
//! Searched in `./` then `~/.config/bistro/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values, and the
//! `MESSENGER_*` / `SERVER_URL` environment variables override file values.
//! The resulting [`BistroConfig`] is loaded once at startup and never mutated.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{ConfigError, Result},
    loader::{apply_env_overrides, find_config_file, load, load_from_path},
    schema::{BistroConfig, MessengerConfig, MissingSignaturePolicy, RepliesConfig, ServerConfig},
    validate::validate,
};
