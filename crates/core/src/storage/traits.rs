use async_trait::async_trait;

use crate::show::Show;

use super::Result;

/// Repository for show operations.
#[async_trait]
pub trait ShowRepository: Send + Sync {
    /// Validates and stores a new show. Fails with
    /// [`RepositoryError::AlreadyExists`](super::RepositoryError::AlreadyExists)
    /// when the slug is taken; an existing record is never overwritten.
    async fn put_show(&self, show: &Show) -> Result<()>;

    /// Lists DRM-protected shows with at least one episode, in index order.
    async fn list_shows(&self) -> Result<Vec<Show>>;

    /// Gets a show by its slug.
    async fn get_show(&self, slug: &str) -> Result<Option<Show>>;

    /// Reads every stored show. Intended for bulk export only.
    async fn all_shows(&self) -> Result<Vec<Show>>;
}
