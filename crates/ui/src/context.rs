use std::sync::Arc;

use services::{ExamCatalog, SessionService};

/// What the composition root hands the UI: the session engine and the
/// exam catalog, already wired to storage and identity.
pub trait UiApp: Send + Sync {
    fn session_service(&self) -> Arc<SessionService>;
    fn catalog(&self) -> Arc<ExamCatalog>;
}

#[derive(Clone)]
pub struct AppContext {
    session_service: Arc<SessionService>,
    catalog: Arc<ExamCatalog>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session_service: app.session_service(),
            catalog: app.catalog(),
        }
    }

    #[must_use]
    pub fn session_service(&self) -> Arc<SessionService> {
        Arc::clone(&self.session_service)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<ExamCatalog> {
        Arc::clone(&self.catalog)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
