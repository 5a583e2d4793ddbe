//! Catalog service: orchestrates batch creation and listing over a
//! [`ShowRepository`].

use std::sync::Arc;

use catalog_core::show::{validate_request_envelope, CreateShowsRequest, Show, ShowSummary};
use catalog_core::storage::{RepositoryError, ShowRepository};

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn ShowRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ShowRepository>) -> Self {
        Self { repository }
    }

    /// Stores every show in the payload, in order, stopping at the first
    /// failure. Shows stored before the failure stay stored.
    ///
    /// Returns the number of shows created.
    pub async fn create(&self, request: &CreateShowsRequest) -> Result<usize, RepositoryError> {
        validate_request_envelope(request)?;

        for (index, show) in request.payload.iter().enumerate() {
            self.repository
                .put_show(show)
                .await
                .map_err(|e| e.at_index(index))
                .inspect_err(|e| {
                    tracing::warn!(index, slug = %show.slug, error = %e, "Batch create aborted");
                })?;
        }

        tracing::info!(count = request.payload.len(), "Created shows");
        Ok(request.payload.len())
    }

    /// Listable shows as summaries, in repository order.
    pub async fn list(&self) -> Result<Vec<ShowSummary>, RepositoryError> {
        let shows = self.repository.list_shows().await?;
        Ok(shows.iter().map(ShowSummary::from).collect())
    }

    /// A single show as a summary.
    pub async fn get(&self, slug: &str) -> Result<Option<ShowSummary>, RepositoryError> {
        let show = self.repository.get_show(slug).await?;
        Ok(show.as_ref().map(ShowSummary::from))
    }

    /// Every stored show, listable or not.
    pub async fn export(&self) -> Result<Vec<Show>, RepositoryError> {
        self.repository.all_shows().await
    }
}
