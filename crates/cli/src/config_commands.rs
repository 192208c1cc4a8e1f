use std::path::Path;

use {anyhow::Result, secrecy::ExposeSecret};

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Validate the configuration and print a summary. Exits non-zero on error.
pub fn check(path: Option<&Path>) -> Result<()> {
    match path.map(Path::to_path_buf).or_else(bistro_config::find_config_file) {
        Some(found) => eprintln!("Checking {}\n", found.display()),
        None => eprintln!("No config file found; checking environment only.\n"),
    }

    let config = match bistro_config::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  {RED}{BOLD}error{RESET}: {e}");
            anyhow::bail!("configuration is not valid");
        },
    };

    let messenger = &config.messenger;
    eprintln!("  listen            {}:{}", config.server.bind, config.server.port);
    eprintln!("  server url        {}", config.server.server_url);
    eprintln!("  assets            {}", config.server.assets_dir);
    eprintln!("  graph api         {}", messenger.graph_api_url);
    eprintln!("  missing signature {}", messenger.missing_signature);
    eprintln!(
        "  page token        {}",
        mask(messenger.page_access_token.expose_secret())
    );
    eprintln!("  follow-up delay   {}ms", config.replies.follow_up_delay_ms);
    eprintln!("\n{GREEN}{BOLD}ok{RESET}");
    Ok(())
}

/// Keep only the last four characters of a secret.
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".into();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}
