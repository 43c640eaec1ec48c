use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use member_auth_backend::{
    config::{Settings, DEFAULT_CONFIG_FILE},
    routes,
    seed::seed_members,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Member authentication server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Seed the configured development members, overriding `seed.enabled`
    #[arg(long)]
    seed: bool,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    if args.seed {
        settings.seed.enabled = true;
    }

    init_tracing(&settings);

    let bind_addr = settings.bind_addr;
    let seed = settings.seed.clone();

    // Token and hasher misconfiguration surfaces here, before serving
    let state = AppState::from_settings(settings).context("building application state")?;

    seed_members(state.auth.as_ref(), &seed)
        .await
        .context("seeding members")?;

    let app = routes::create_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(%bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
