//! Show repository over a storage gateway.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::show::{validate_show, Show};
use catalog_core::storage::{RepositoryError, Result, ShowRepository};

use super::gateway::{GatewayError, PutCondition, QueryParams, StorageGateway};
use super::keys;
use super::records::{item_to_show, show_to_item};

/// Map a gateway error to RepositoryError. A failed put condition means the
/// slug is already taken.
fn map_gateway_error(err: GatewayError, slug: Option<&str>) -> RepositoryError {
    match err {
        GatewayError::ConditionFailed => RepositoryError::AlreadyExists {
            entity_type: keys::ENTITY_TYPE_SHOW,
            id: slug.unwrap_or_default().to_string(),
        },
        GatewayError::Connection(message) => RepositoryError::ConnectionFailed(message),
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}

/// [`ShowRepository`] backed by any [`StorageGateway`].
#[derive(Clone)]
pub struct GatewayShowRepository {
    gateway: Arc<dyn StorageGateway>,
}

impl GatewayShowRepository {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    fn table_name(&self) -> &str {
        self.gateway.table_name()
    }
}

#[async_trait]
impl ShowRepository for GatewayShowRepository {
    async fn put_show(&self, show: &Show) -> Result<()> {
        validate_show(show)?;

        let mut stored = show.clone();
        stored.episode_count.get_or_insert(0);
        let item = show_to_item(&stored, keys::drm_key(show.drm));

        self.gateway
            .put(
                self.table_name(),
                item,
                Some(&PutCondition::attribute_not_exists(keys::SLUG)),
            )
            .await
            .map_err(|e| map_gateway_error(e, Some(&show.slug)))?;

        tracing::debug!(slug = %show.slug, "Stored show");
        Ok(())
    }

    async fn list_shows(&self) -> Result<Vec<Show>> {
        let items = self
            .gateway
            .query(
                self.table_name(),
                Some(keys::GSI_DRM_EPISODE),
                &keys::listable_shows(),
                &QueryParams::default(),
            )
            .await
            .map_err(|e| map_gateway_error(e, None))?;

        items.iter().map(item_to_show).collect()
    }

    async fn get_show(&self, slug: &str) -> Result<Option<Show>> {
        let items = self
            .gateway
            .query(
                self.table_name(),
                None,
                &keys::show_by_slug(slug),
                &QueryParams::default().with_limit(1),
            )
            .await
            .map_err(|e| map_gateway_error(e, Some(slug)))?;

        items.first().map(item_to_show).transpose()
    }

    async fn all_shows(&self) -> Result<Vec<Show>> {
        let items = self
            .gateway
            .scan(self.table_name())
            .await
            .map_err(|e| map_gateway_error(e, None))?;

        items.iter().map(item_to_show).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::gateway::{Item, KeyCondition};
    use crate::storage::inmemory::InMemoryGateway;
    use catalog_core::show::{Season, ValidationError};

    fn memory_gateway() -> InMemoryGateway {
        InMemoryGateway::new("shows-test", keys::SLUG).with_index(
            keys::GSI_DRM_EPISODE,
            keys::DRM_KEY,
            Some(keys::EPISODE_COUNT),
        )
    }

    fn repository() -> (GatewayShowRepository, InMemoryGateway) {
        let gateway = memory_gateway();
        (
            GatewayShowRepository::new(Arc::new(gateway.clone())),
            gateway,
        )
    }

    fn listable(slug: &str, title: &str, episodes: i64) -> Show {
        Show::new(slug, title)
            .with_drm(true)
            .with_episode_count(episodes)
    }

    /// Gateway that fails every call with the given error.
    struct FailingGateway(GatewayError);

    #[async_trait]
    impl StorageGateway for FailingGateway {
        async fn put(
            &self,
            _table_name: &str,
            _item: Item,
            _condition: Option<&PutCondition>,
        ) -> std::result::Result<(), GatewayError> {
            Err(self.0.clone())
        }

        async fn query(
            &self,
            _table_name: &str,
            _index_name: Option<&str>,
            _key_condition: &KeyCondition,
            _params: &QueryParams,
        ) -> std::result::Result<Vec<Item>, GatewayError> {
            Err(self.0.clone())
        }

        async fn scan(&self, _table_name: &str) -> std::result::Result<Vec<Item>, GatewayError> {
            Err(self.0.clone())
        }

        fn table_name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_put_then_list() {
        let (repo, _) = repository();
        let show = listable("show/test", "Test", 3).with_image("http://example.com/test.jpg");

        repo.put_show(&show).await.unwrap();
        let shows = repo.list_shows().await.unwrap();

        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].slug, "show/test");
        assert_eq!(shows[0].title, "Test");
        assert_eq!(shows[0].image_url(), "http://example.com/test.jpg");
    }

    #[tokio::test]
    async fn test_list_excludes_non_drm_and_empty_shows() {
        let (repo, _) = repository();
        repo.put_show(&listable("show/listed", "Listed", 1))
            .await
            .unwrap();
        repo.put_show(&Show::new("show/nodrm", "No DRM").with_drm(false).with_episode_count(5))
            .await
            .unwrap();
        repo.put_show(&Show::new("show/unset", "DRM unset").with_episode_count(5))
            .await
            .unwrap();
        repo.put_show(&listable("show/zero", "Zero episodes", 0))
            .await
            .unwrap();
        repo.put_show(&Show::new("show/nocount", "No count").with_drm(true))
            .await
            .unwrap();

        let slugs: Vec<_> = repo
            .list_shows()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();

        assert_eq!(slugs, vec!["show/listed"]);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_episode_count() {
        let (repo, _) = repository();
        repo.put_show(&listable("show/ten", "Ten", 10)).await.unwrap();
        repo.put_show(&listable("show/two", "Two", 2)).await.unwrap();
        repo.put_show(&listable("show/five", "Five", 5)).await.unwrap();

        let slugs: Vec<_> = repo
            .list_shows()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();

        assert_eq!(slugs, vec!["show/two", "show/five", "show/ten"]);
    }

    #[tokio::test]
    async fn test_put_derives_drm_key_and_defaults_episode_count() {
        let (repo, gateway) = repository();
        repo.put_show(&Show::new("show/plain", "Plain")).await.unwrap();
        repo.put_show(&Show::new("show/drm", "DRM").with_drm(true))
            .await
            .unwrap();

        let plain = gateway.get("show/plain").await.unwrap();
        assert_eq!(plain["drmKey"].as_n().unwrap(), "0");
        assert_eq!(plain["episodeCount"].as_n().unwrap(), "0");

        let drm = gateway.get("show/drm").await.unwrap();
        assert_eq!(drm["drmKey"].as_n().unwrap(), "1");
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected_and_original_kept() {
        let (repo, _) = repository();
        repo.put_show(&listable("show/dup", "Original", 1))
            .await
            .unwrap();

        let err = repo
            .put_show(&listable("show/dup", "Replacement", 9))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RepositoryError::AlreadyExists {
                entity_type: "Show",
                id: "show/dup".to_string(),
            }
        );
        let stored = repo.get_show("show/dup").await.unwrap().unwrap();
        assert_eq!(stored.title, "Original");
        assert_eq!(stored.episode_count, Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_create_slug_once() {
        let (repo, gateway) = repository();
        let contenders: i64 = 32;

        let handles: Vec<_> = (0..contenders)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let show = listable("show/race", &format!("Contender {i}"), i + 1);
                    repo.put_show(&show).await
                })
            })
            .collect();

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(RepositoryError::AlreadyExists { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, contenders - 1);
        assert_eq!(gateway.len().await, 1);

        let stored = repo.get_show("show/race").await.unwrap().unwrap();
        let winner: i64 = stored
            .title
            .strip_prefix("Contender ")
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!((0..contenders).contains(&winner));
        assert_eq!(stored.episode_count, Some(winner + 1));
    }

    #[tokio::test]
    async fn test_invalid_show_is_not_written() {
        let (repo, gateway) = repository();
        let err = repo
            .put_show(&Show::new("invalid-slug", "Bad"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Validation(ValidationError::FieldFormat { .. })
        ));
        assert_eq!(gateway.len().await, 0);
    }

    #[tokio::test]
    async fn test_get_show() {
        let (repo, _) = repository();
        let show = Show::new("show/full", "Full")
            .with_seasons(vec![Season::new("show/full/season/1")]);
        repo.put_show(&show).await.unwrap();

        let found = repo.get_show("show/full").await.unwrap().unwrap();
        assert_eq!(found.seasons, show.seasons);
        assert_eq!(found.episode_count, Some(0));

        assert_eq!(repo.get_show("show/missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_all_shows_includes_unlisted() {
        let (repo, _) = repository();
        repo.put_show(&listable("show/a", "A", 1)).await.unwrap();
        repo.put_show(&Show::new("show/b", "B")).await.unwrap();

        let mut slugs: Vec<_> = repo
            .all_shows()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();
        slugs.sort();

        assert_eq!(slugs, vec!["show/a", "show/b"]);
    }

    #[tokio::test]
    async fn test_gateway_errors_are_mapped() {
        let connection = GatewayShowRepository::new(Arc::new(FailingGateway(
            GatewayError::Connection("Request to DynamoDB timed out".to_string()),
        )));
        assert_eq!(
            connection.list_shows().await.unwrap_err(),
            RepositoryError::ConnectionFailed("Request to DynamoDB timed out".to_string())
        );

        let throttled = GatewayShowRepository::new(Arc::new(FailingGateway(
            GatewayError::Throttled("Throughput exceeded, please retry".to_string()),
        )));
        assert!(matches!(
            throttled.put_show(&Show::new("show/a", "A")).await,
            Err(RepositoryError::QueryFailed(_))
        ));
    }

    #[test]
    fn test_condition_failed_maps_to_already_exists() {
        assert_eq!(
            map_gateway_error(GatewayError::ConditionFailed, Some("show/a")),
            RepositoryError::AlreadyExists {
                entity_type: "Show",
                id: "show/a".to_string(),
            }
        );
    }
}
