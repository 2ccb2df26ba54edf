use std::sync::Arc;
use sy_mediation::MediationContext;
use sy_model::ArtifactGraph;

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<ArtifactGraph>,
    pub mediation: MediationContext,
}
