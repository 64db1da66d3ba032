use std::sync::Arc;

use crate::config::Config;
use crate::routes::export::ExportGuard;
use crate::services::credits::CreditService;
use crate::services::drafts::DraftStore;
use crate::services::optimizer::ResumeOptimizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable optimizer client. Default: HttpResumeOptimizer.
    pub optimizer: Arc<dyn ResumeOptimizer>,
    /// Pluggable credit/subscription client.
    pub credits: Arc<dyn CreditService>,
    /// Redis-backed draft snapshot store with write debouncing.
    pub drafts: DraftStore,
    /// Per-(user, kind) duplicate-export suppression. Lives here, not in the
    /// layout core: every render run already owns its state.
    pub exports: ExportGuard,
    pub config: Config,
}
