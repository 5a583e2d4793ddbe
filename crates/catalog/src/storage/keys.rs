//! Table key layout.
//!
//! The table is keyed on the show slug. A single sparse secondary index
//! serves the listing query.

use aws_sdk_dynamodb::types::AttributeValue;

use super::gateway::{KeyCondition, SortKeyCondition};

/// Partition key of the base table.
pub const SLUG: &str = "slug";

/// Derived attribute: `1` when the show is DRM protected, `0` otherwise.
pub const DRM_KEY: &str = "drmKey";

pub const EPISODE_COUNT: &str = "episodeCount";

/// Secondary index keyed on `drmKey` (partition) and `episodeCount` (sort).
pub const GSI_DRM_EPISODE: &str = "gsi_drm_episode";

/// Entity name used in repository errors.
pub const ENTITY_TYPE_SHOW: &str = "Show";

/// `drmKey` value for a show's `drm` flag.
pub fn drm_key(drm: Option<bool>) -> i64 {
    if drm == Some(true) {
        1
    } else {
        0
    }
}

/// Base table lookup of a single show.
pub fn show_by_slug(slug: &str) -> KeyCondition {
    KeyCondition::partition(SLUG, AttributeValue::S(slug.to_string()))
}

/// `drmKey = 1 AND episodeCount > 0` on [`GSI_DRM_EPISODE`].
pub fn listable_shows() -> KeyCondition {
    KeyCondition::partition(DRM_KEY, AttributeValue::N("1".to_string())).with_sort(
        SortKeyCondition::GreaterThan(EPISODE_COUNT.to_string(), AttributeValue::N("0".to_string())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drm_key_is_one_only_for_true() {
        assert_eq!(drm_key(Some(true)), 1);
        assert_eq!(drm_key(Some(false)), 0);
        assert_eq!(drm_key(None), 0);
    }

    #[test]
    fn listable_shows_condition() {
        let expr = listable_shows().to_expression();
        assert_eq!(expr.expression, "#pk = :pk AND #sk > :sk");
        assert_eq!(expr.names.get("#pk").map(String::as_str), Some("drmKey"));
        assert_eq!(expr.names.get("#sk").map(String::as_str), Some("episodeCount"));
        assert_eq!(expr.values.get(":pk"), Some(&AttributeValue::N("1".to_string())));
        assert_eq!(expr.values.get(":sk"), Some(&AttributeValue::N("0".to_string())));
    }

    #[test]
    fn show_by_slug_condition() {
        let condition = show_by_slug("show/test");
        assert_eq!(condition.partition_key, "slug");
        assert!(condition.sort.is_none());
    }
}
