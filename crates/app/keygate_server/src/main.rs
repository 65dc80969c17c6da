//! Keygate authentication server binary.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use keygate_api::config::ApiConfig;
use keygate_core::auth::store::PgCredentialStore;

/// CLI arguments for the auth server.
#[derive(Parser, Debug)]
#[command(name = "keygate_server", about = "Keygate authentication server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3400")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/keygate"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,keygate_api=debug,keygate_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(bind_addr = %args.bind_addr, "starting keygate_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    keygate_api::migrate(&pool).await?;

    let config = ApiConfig {
        bind_addr: args.bind_addr,
        database_url: args.database_url,
        ..ApiConfig::from_env()
    };

    let state = keygate_api::AppState {
        store: Arc::new(PgCredentialStore::new(pool)),
        config: config.clone(),
    };

    let app = keygate_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "auth API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
