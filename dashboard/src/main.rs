use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vram_view::build_router;
use vram_view::config::{DashboardConfig, DEFAULT_CONFIG_PATH};
use vram_view::state::AppState;
use vram_view::system::cluster::KubeCluster;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Port to serve the dashboard on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = DashboardConfig::load(&args.config);
    if let Some(port) = args.port {
        config.port = port;
    }
    info!(
        config = %args.config,
        namespace = %config.namespace,
        selector = %config.label_selector,
        total_vram_gib = config.total_vram_gib,
        "configuration loaded"
    );

    // Kubeconfig first, then in-cluster service account.
    let client = kube::Client::try_default()
        .await
        .context("failed to create Kubernetes client")?;
    let cluster = Arc::new(KubeCluster::new(client));

    let port = config.port;
    let app = build_router(AppState::new(config, cluster));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("dashboard available at http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
