use std::net::SocketAddr;

use interview_manager::{
    config::Config,
    database::{create_pool, run_migrations},
    routes::build_router,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    info!("Database ready");

    let addr: SocketAddr = config.server_address.parse()?;
    let app = build_router(AppState::new(config, pool));

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
