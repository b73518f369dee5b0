use crate::analysis::InterviewAnalyzer;
use crate::backend::InterviewBackend;
use crate::session::InterviewSession;
use crate::store::RecordStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Live interview sessions (session_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<InterviewSession>>>>,

    /// Remote interview/analysis service
    pub backend: Arc<dyn InterviewBackend>,

    pub store: RecordStore,

    pub analyzer: InterviewAnalyzer,

    /// Bound on each remote call
    pub call_timeout: Duration,
}

impl AppState {
    pub fn new(backend: Arc<dyn InterviewBackend>, store: RecordStore, call_timeout: Duration) -> Self {
        let analyzer = InterviewAnalyzer::new(Arc::clone(&backend), store.clone(), call_timeout);

        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            backend,
            store,
            analyzer,
            call_timeout,
        }
    }

    pub async fn session(&self, session_id: &str) -> Option<Arc<InterviewSession>> {
        self.sessions.read().await.get(session_id).cloned()
    }
}
