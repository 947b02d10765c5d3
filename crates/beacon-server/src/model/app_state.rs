//! Shared application state handed to every handler

use std::sync::Arc;

use beacon_persistence::PersistenceService;
use beacon_release::{ArtifactStore, VersionService};

use crate::service::{feedback::FeedbackService, report::ReportService};

use super::config::Configuration;

#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    pub persistence: Arc<dyn PersistenceService>,
    pub artifact_store: Arc<ArtifactStore>,
    pub report_service: Arc<ReportService>,
    pub feedback_service: Arc<FeedbackService>,
    pub version_service: Arc<VersionService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("persistence", &"<dyn PersistenceService>")
            .field("artifact_dir", &self.artifact_store.dir())
            .finish()
    }
}

impl AppState {
    pub fn new(
        configuration: Configuration,
        persistence: Arc<dyn PersistenceService>,
        artifact_store: Arc<ArtifactStore>,
    ) -> Self {
        Self {
            report_service: Arc::new(ReportService::new(persistence.clone())),
            feedback_service: Arc::new(FeedbackService::new(persistence.clone())),
            version_service: Arc::new(VersionService::new(
                persistence.clone(),
                artifact_store.clone(),
            )),
            configuration,
            persistence,
            artifact_store,
        }
    }
}
