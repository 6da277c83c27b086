use anyhow::Result;
use clap::Parser;
use inframe_backend::app::App;
use inframe_backend::models::Config;
use inframe_backend::server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "inframe-backend")]
#[command(about = "Serve the frame upload and AI frame API")]
struct CliArgs {
    /// Bind address; overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Listen port; overrides PORT.
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file; overrides DATABASE_PATH.
    #[arg(long, value_name = "PATH")]
    database: Option<String>,
}

impl CliArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database) = self.database {
            config.database_path = database;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inframe_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env().inspect_err(|e| error!("Invalid configuration: {}", e))?;
    args.apply(&mut config);

    info!("Starting inframe-backend on {}:{}", config.host, config.port);

    let app = App::new(&config)
        .await
        .inspect_err(|e| error!("Failed to initialize application: {}", e))?;

    server::start_server(&config, app).await?;
    Ok(())
}
