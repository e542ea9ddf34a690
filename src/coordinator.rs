// Issues the fetches a session asks for and hands the results back to it

use crate::{
    catalog::CatalogBackend,
    error::FetchError,
    models::{FilterOptions, ResultPage},
    session::{Completion, DiscoverySession, FetchRequest},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

/// A view session shared between concurrent requests. The lock is only held for
/// synchronous transitions, never across a fetch.
pub type SharedSession = Arc<Mutex<DiscoverySession>>;

pub struct FetchCoordinator {
    backend: Arc<dyn CatalogBackend>,
    timeout: Duration,
}

impl FetchCoordinator {
    pub fn new(backend: Arc<dyn CatalogBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Runs one backend call under the fetch timeout. A timeout is a network error.
    pub async fn execute(&self, request: &FetchRequest) -> Result<ResultPage, FetchError> {
        fetch_page(self.backend.as_ref(), self.timeout, request).await
    }

    /// Executes `request` and applies the outcome to `session`. Both happen on a
    /// spawned task, so the session settles even if the caller is dropped mid-fetch.
    pub async fn run(&self, session: &SharedSession, request: FetchRequest) -> Completion {
        let backend = self.backend.clone();
        let timeout = self.timeout;
        let session = session.clone();
        let epoch = request.epoch;

        let task = tokio::spawn(async move {
            let result = fetch_page(backend.as_ref(), timeout, &request).await;
            session.lock().await.complete(&request, result)
        });

        match task.await {
            Ok(completion) => {
                if completion != Completion::Applied {
                    tracing::debug!(epoch, ?completion, "Fetch result not applied");
                }
                completion
            }
            Err(e) => {
                tracing::error!(epoch, error = %e, "Fetch task did not complete");
                Completion::Stale
            }
        }
    }

    /// Applies a user action under the lock, then issues the fetch it produced (if any).
    /// Returns `None` when the action was a no-op.
    pub async fn dispatch<F>(&self, session: &SharedSession, action: F) -> Option<Completion>
    where
        F: FnOnce(&mut DiscoverySession) -> Option<FetchRequest>,
    {
        let request = {
            let mut guard = session.lock().await;
            action(&mut *guard)
        }?;
        Some(self.run(session, request).await)
    }

    pub async fn filter_options(&self, category: Option<&str>) -> Result<FilterOptions, FetchError> {
        tokio::time::timeout(self.timeout, self.backend.fetch_filter_options(category))
            .await
            .unwrap_or_else(|_| Err(FetchError::Network(format!("timed out after {:?}", self.timeout))))
    }
}

async fn fetch_page(
    backend: &dyn CatalogBackend,
    timeout: Duration,
    request: &FetchRequest,
) -> Result<ResultPage, FetchError> {
    let query = &request.query;
    match tokio::time::timeout(timeout, backend.fetch_products(query)).await {
        Ok(Ok(items)) => Ok(ResultPage::new(items, query.page, query.limit)),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            tracing::warn!(epoch = request.epoch, page = query.page, "Product fetch timed out");
            Err(FetchError::Network(format!("timed out after {:?}", timeout)))
        }
    }
}
