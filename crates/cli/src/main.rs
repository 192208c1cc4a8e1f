mod config_commands;
mod messenger_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "bistro", about = "Bistro Lumiere Messenger bot", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to bistro.{toml,yaml,json} in ./ or ~/.config/bistro/).
    #[arg(long, global = true, env = "BISTRO_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server (default when no subcommand is provided).
    Serve,
    /// Publish the Get Started button, greeting and persistent menu.
    Profile,
    /// Send a text message to a user.
    Send {
        /// Page-scoped id of the recipient.
        #[arg(long)]
        to: String,
        #[arg(short, long)]
        message: String,
    },
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        None | Some(Commands::Serve) => {
            let mut config = bistro_config::load(cli.config.as_deref())
                .context("cannot start without a complete configuration")?;
            // CLI args override config values
            if let Some(bind) = cli.bind {
                config.server.bind = bind;
            }
            if let Some(port) = cli.port {
                config.server.port = port;
            }

            info!(version = env!("CARGO_PKG_VERSION"), "bistro starting");
            bistro_gateway::start(config).await?;
            Ok(())
        },
        Some(Commands::Profile) => {
            let config = bistro_config::load(cli.config.as_deref())?;
            messenger_commands::publish_profile(&config).await
        },
        Some(Commands::Send { to, message }) => {
            let config = bistro_config::load(cli.config.as_deref())?;
            messenger_commands::send_text(&config, &to, &message).await
        },
        Some(Commands::CheckConfig) => config_commands::check(cli.config.as_deref()),
    }
}
