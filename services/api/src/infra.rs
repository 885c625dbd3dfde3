use leave_desk::config::AppConfig;
use leave_desk::leave::{JsonFileStorage, LeaveStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type FileLeaveStore = LeaveStore<JsonFileStorage>;

/// Open the store over the configured data file; never fails.
pub(crate) fn open_store(config: &AppConfig) -> Arc<FileLeaveStore> {
    let storage = Arc::new(JsonFileStorage::new(config.storage.data_path.clone()));
    info!(path = %storage.path().display(), "opening leave store");
    Arc::new(LeaveStore::open(storage))
}
