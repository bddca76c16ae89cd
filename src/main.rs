use anyhow::Context;
use clap::{Parser, Subcommand};
use sharelink::admin::{self, AdminCommands};
use sharelink::config::Config;
use sharelink::server;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// sharelink - trackable short links with click analytics
#[derive(Parser, Debug)]
#[command(name = "sharelink")]
#[command(version)]
#[command(about = "Trackable short links with click analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// Run migrations on startup
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        migrate: bool,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        admin_command: AdminCommands,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env before the subscriber reads RUST_LOG / LOG_FORMAT
    dotenvy::dotenv().ok();
    init_tracing();

    let mut config = Config::from_env().context("failed to load configuration")?;

    match cli.command {
        Commands::Server {
            host,
            port,
            migrate,
        } => {
            let explicit_base_url = std::env::var("BASE_URL").is_ok();
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            // Re-compute base_url after CLI overrides unless it was set explicitly
            if !explicit_base_url {
                config.links.base_url =
                    format!("http://{}:{}", config.server.host, config.server.port);
            }

            let addr = config.server.addr();
            server::run_server(config, addr, migrate)
                .await
                .context("server failed")?;
        }
        Commands::Admin { admin_command } => {
            admin::run(config, admin_command)
                .await
                .context("admin command failed")?;
        }
    }

    Ok(())
}
