//! Experiment server entry point

use std::sync::Arc;

use clap::Parser;
use shared::logging;
use tokio::signal;

use experiment_server::{
    Args, ExperimentServer, ServerResult, ServerState,
    core::GroupBalancer,
    services::{RealArtifactStore, RealWebSocketManager},
};

#[tokio::main]
async fn main() -> ServerResult<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let config = Args::parse().into_config()?;
    logging::init_tracing(Some(&config.log_level));
    logging::log_startup(&format!("experiment server on {}", config.bind_address));

    let artifact_store = RealArtifactStore::new(&config.data_dir);
    if artifact_store.ensure_root().await? {
        logging::log_success(&format!("Created data directory {}", config.data_dir.display()));
    }

    let group_names: Vec<&str> = config.groups.labels().iter().map(|label| label.as_str()).collect();
    logging::log_success(&format!("Balancing across groups: {}", group_names.join(", ")));

    let state = Arc::new(ServerState::new(
        config.bind_address,
        config.data_dir.clone(),
        config.static_dir.clone(),
    ));
    let balancer = GroupBalancer::new(config.groups);
    let server = ExperimentServer::new(state, balancer, artifact_store, RealWebSocketManager::new());

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => logging::log_shutdown("Received Ctrl+C signal"),
            Err(err) => logging::log_error("Signal handling", &err),
        }
    };

    if let Err(e) = server.run(shutdown).await {
        logging::log_error("Experiment server", &e);
        return Err(e);
    }

    logging::log_success("Experiment server stopped gracefully");
    Ok(())
}
