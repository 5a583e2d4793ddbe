//! Record conversion functions.
//!
//! Pure functions for converting between stored items and [`Show`]. Every
//! field is stored under its camelCase name; absent optional fields are
//! omitted from the record.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use catalog_core::show::{Image, NextEpisode, Season, Show};
use catalog_core::storage::RepositoryError;

use super::gateway::Item;
use super::keys;

// ============================================================================
// Show -> item
// ============================================================================

/// Convert a Show to a stored item, adding the derived `drmKey`.
pub fn show_to_item(show: &Show, drm_key: i64) -> Item {
    let mut item = HashMap::new();

    item.insert(keys::SLUG.to_string(), AttributeValue::S(show.slug.clone()));
    item.insert("title".to_string(), AttributeValue::S(show.title.clone()));
    item.insert(
        keys::DRM_KEY.to_string(),
        AttributeValue::N(drm_key.to_string()),
    );

    insert_optional_string(&mut item, "country", &show.country);
    insert_optional_string(&mut item, "description", &show.description);
    insert_optional_string(&mut item, "genre", &show.genre);
    insert_optional_string(&mut item, "language", &show.language);
    insert_optional_string(&mut item, "primaryColour", &show.primary_colour);
    insert_optional_string(&mut item, "tvChannel", &show.tv_channel);

    if let Some(drm) = show.drm {
        item.insert("drm".to_string(), AttributeValue::Bool(drm));
    }
    if let Some(count) = show.episode_count {
        item.insert(
            keys::EPISODE_COUNT.to_string(),
            AttributeValue::N(count.to_string()),
        );
    }
    if let Some(image) = &show.image {
        item.insert("image".to_string(), AttributeValue::M(image_to_map(image)));
    }
    if let Some(next_episode) = &show.next_episode {
        item.insert(
            "nextEpisode".to_string(),
            AttributeValue::M(next_episode_to_map(next_episode)),
        );
    }
    if let Some(seasons) = &show.seasons {
        let list = seasons
            .iter()
            .map(|season| AttributeValue::M(season_to_map(season)))
            .collect();
        item.insert("seasons".to_string(), AttributeValue::L(list));
    }

    item
}

fn image_to_map(image: &Image) -> HashMap<String, AttributeValue> {
    HashMap::from([(
        "showImage".to_string(),
        AttributeValue::S(image.show_image.clone()),
    )])
}

fn next_episode_to_map(next_episode: &NextEpisode) -> HashMap<String, AttributeValue> {
    let mut map = HashMap::new();
    insert_optional_string(&mut map, "channel", &next_episode.channel);
    map.insert(
        "channelLogo".to_string(),
        AttributeValue::S(next_episode.channel_logo.clone()),
    );
    insert_optional_string(&mut map, "date", &next_episode.date);
    map.insert(
        "html".to_string(),
        AttributeValue::S(next_episode.html.clone()),
    );
    map.insert("url".to_string(), AttributeValue::S(next_episode.url.clone()));
    map
}

fn season_to_map(season: &Season) -> HashMap<String, AttributeValue> {
    HashMap::from([("slug".to_string(), AttributeValue::S(season.slug.clone()))])
}

fn insert_optional_string(
    item: &mut HashMap<String, AttributeValue>,
    key: &str,
    value: &Option<String>,
) {
    if let Some(value) = value {
        item.insert(key.to_string(), AttributeValue::S(value.clone()));
    }
}

// ============================================================================
// Item -> Show
// ============================================================================

/// Convert a stored item to a Show. `drmKey` is dropped.
pub fn item_to_show(item: &Item) -> Result<Show, RepositoryError> {
    let image = get_optional_map(item, "image")?
        .map(|map| -> Result<Image, RepositoryError> {
            Ok(Image {
                show_image: get_string(map, "showImage")?,
            })
        })
        .transpose()?;

    let next_episode = get_optional_map(item, "nextEpisode")?
        .map(map_to_next_episode)
        .transpose()?;

    let seasons = match item.get("seasons") {
        None => None,
        Some(value) => {
            let list = value.as_l().map_err(|_| invalid_field("seasons"))?;
            let seasons = list
                .iter()
                .map(|entry| -> Result<Season, RepositoryError> {
                    let map = entry.as_m().map_err(|_| invalid_field("seasons"))?;
                    Ok(Season {
                        slug: get_string(map, "slug")?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(seasons)
        }
    };

    Ok(Show {
        country: get_optional_string(item, "country"),
        description: get_optional_string(item, "description"),
        drm: get_optional_bool(item, "drm"),
        episode_count: get_optional_number(item, keys::EPISODE_COUNT)?,
        genre: get_optional_string(item, "genre"),
        image,
        language: get_optional_string(item, "language"),
        next_episode,
        primary_colour: get_optional_string(item, "primaryColour"),
        seasons,
        slug: get_string(item, keys::SLUG)?,
        title: get_string(item, "title")?,
        tv_channel: get_optional_string(item, "tvChannel"),
    })
}

fn map_to_next_episode(
    map: &HashMap<String, AttributeValue>,
) -> Result<NextEpisode, RepositoryError> {
    Ok(NextEpisode {
        channel: get_optional_string(map, "channel"),
        channel_logo: get_string(map, "channelLogo")?,
        date: get_optional_string(map, "date"),
        html: get_string(map, "html")?,
        url: get_string(map, "url")?,
    })
}

// ============================================================================
// Attribute helpers
// ============================================================================

fn invalid_field(key: &str) -> RepositoryError {
    RepositoryError::InvalidData(format!("Missing or invalid field: {}", key))
}

/// Get a required string attribute.
fn get_string(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| invalid_field(key))
}

/// Get an optional string attribute.
fn get_optional_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

fn get_optional_bool(item: &HashMap<String, AttributeValue>, key: &str) -> Option<bool> {
    item.get(key).and_then(|v| v.as_bool().ok()).copied()
}

/// Get an optional integer attribute. A present but unparseable number is an error.
fn get_optional_number(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Option<i64>, RepositoryError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => {
            let raw = value.as_n().map_err(|_| invalid_field(key))?;
            raw.parse::<i64>().map(Some).map_err(|e| {
                RepositoryError::Serialization(format!("Invalid number {}: {}", key, e))
            })
        }
    }
}

fn get_optional_map<'a>(
    item: &'a HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Option<&'a HashMap<String, AttributeValue>>, RepositoryError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => value.as_m().map(Some).map_err(|_| invalid_field(key)),
    }
}
