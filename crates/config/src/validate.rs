//! Startup validation: every credential must be present before the server binds.

use secrecy::{ExposeSecret, Secret};

use crate::{
    error::{ConfigError, Result},
    schema::BistroConfig,
};

/// Check that the configuration is complete enough to serve webhooks.
///
/// Required values are reported one at a time, in a fixed order, so the
/// operator sees the first missing variable.
pub fn validate(config: &BistroConfig) -> Result<()> {
    require_secret(
        &config.messenger.app_secret,
        "messenger.app_secret",
        "MESSENGER_APP_SECRET",
    )?;
    require_secret(
        &config.messenger.verify_token,
        "messenger.verify_token",
        "MESSENGER_VALIDATION_TOKEN",
    )?;
    require_secret(
        &config.messenger.page_access_token,
        "messenger.page_access_token",
        "MESSENGER_PAGE_ACCESS_TOKEN",
    )?;

    if config.server.server_url.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "server.server_url",
            env_var: "SERVER_URL",
        });
    }
    let parsed = url::Url::parse(&config.server.server_url)
        .map_err(|e| ConfigError::invalid("server.server_url", e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "server.server_url",
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    url::Url::parse(&config.messenger.graph_api_url)
        .map_err(|e| ConfigError::invalid("messenger.graph_api_url", e))?;

    if config.messenger.send_timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "messenger.send_timeout_secs",
            "must be greater than zero",
        ));
    }

    Ok(())
}

fn require_secret(
    secret: &Secret<String>,
    field: &'static str,
    env_var: &'static str,
) -> Result<()> {
    if secret.expose_secret().trim().is_empty() {
        return Err(ConfigError::Missing { field, env_var });
    }
    Ok(())
}
