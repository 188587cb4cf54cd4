use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use linkboard::db;
use linkboard::server::config::ServerConfig;
use linkboard::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Overrides the DATABASE_URL environment variable
    #[arg(long)]
    database_url: Option<String>,

    /// Overrides the LISTEN_ADDR environment variable
    #[arg(long)]
    listen: Option<String>,
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    init_logging();

    let args = Args::parse();

    let mut config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load server configuration: {}", e);
            return Err(e.into());
        }
    };
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    let pool = db::connect(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;
    info!("Database ready at {}", config.database_url);

    let listen_addr: SocketAddr = config.listen_addr.parse()?;
    let app = create_axum_router(pool, Arc::new(config));

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("Listening on {}", listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
