use std::path::PathBuf;
use std::sync::Arc;

use exam_core::time::Clock;
use storage::local::LocalResumeStore;
use storage::repository::Storage;

use crate::catalog::ExamCatalog;
use crate::error::AppServicesError;
use crate::identity::IdentityProvider;
use crate::service::SessionService;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    session_service: Arc<SessionService>,
    catalog: Arc<ExamCatalog>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, with resume snapshots
    /// written under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if connecting to or migrating the
    /// database fails.
    pub async fn new_sqlite(
        db_url: &str,
        data_dir: impl Into<PathBuf>,
        clock: Clock,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let resume = Arc::new(LocalResumeStore::new(data_dir));
        let session_service = Arc::new(SessionService::new(
            clock,
            storage.clone(),
            resume,
            identity,
        ));
        let catalog = Arc::new(ExamCatalog::new(storage));

        Ok(Self {
            session_service,
            catalog,
        })
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
