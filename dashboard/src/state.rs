use std::sync::Arc;

use crate::aggregate::Aggregator;
use crate::config::DashboardConfig;
use crate::system::cluster::ClusterApi;

/// Read-only after startup. Each request opens its own exec stream.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(config: DashboardConfig, cluster: Arc<dyn ClusterApi>) -> Self {
        let aggregator = Aggregator::new(cluster, config.clone());
        AppState {
            config: Arc::new(config),
            aggregator: Arc::new(aggregator),
        }
    }
}
