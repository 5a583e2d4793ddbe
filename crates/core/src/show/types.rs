use serde::{Deserialize, Serialize};

/// Artwork attached to a show.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub show_image: String,
}

impl Image {
    pub fn new(show_image: impl Into<String>) -> Self {
        Self {
            show_image: show_image.into(),
        }
    }
}

/// Teaser for the next episode to air.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextEpisode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_logo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub url: String,
}

/// A season reference. Only the slug is carried.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(default)]
    pub slug: String,
}

impl Season {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}

/// A show in the catalog.
///
/// Optional fields stay `None` when the client omitted them, so an absent
/// `episode_count` can be told apart from an explicit zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_episode: Option<NextEpisode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_colour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<Season>>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_channel: Option<String>,
}

impl Show {
    /// Creates a show with only the required fields set.
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the DRM flag.
    pub fn with_drm(mut self, drm: bool) -> Self {
        self.drm = Some(drm);
        self
    }

    /// Builder method to set the episode count.
    pub fn with_episode_count(mut self, count: i64) -> Self {
        self.episode_count = Some(count);
        self
    }

    /// Builder method to set the show image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(Image::new(url));
        self
    }

    /// Builder method to set the primary colour.
    pub fn with_primary_colour(mut self, colour: impl Into<String>) -> Self {
        self.primary_colour = Some(colour.into());
        self
    }

    /// Builder method to set the seasons.
    pub fn with_seasons(mut self, seasons: Vec<Season>) -> Self {
        self.seasons = Some(seasons);
        self
    }

    /// URL of the show image, or the empty string when none was set.
    pub fn image_url(&self) -> &str {
        self.image
            .as_ref()
            .map(|image| image.show_image.as_str())
            .unwrap_or_default()
    }
}

/// Batch create envelope accepted by `POST /shows`.
///
/// Missing numeric fields decode as zero and a missing payload as empty, so
/// omissions surface as validation failures instead of decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShowsRequest {
    #[serde(default)]
    pub payload: Vec<Show>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub take: i64,
    #[serde(default)]
    pub total_records: i64,
}

impl CreateShowsRequest {
    /// Creates an envelope for the given shows with `skip = 0`, `take = 10`
    /// and `totalRecords` set to the payload length.
    pub fn new(payload: Vec<Show>) -> Self {
        let total_records = payload.len() as i64;
        Self {
            payload,
            skip: 0,
            take: 10,
            total_records,
        }
    }
}

/// Projection of a show returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSummary {
    pub image: String,
    pub slug: String,
    pub title: String,
}

impl From<&Show> for ShowSummary {
    fn from(show: &Show) -> Self {
        Self {
            image: show.image_url().to_string(),
            slug: show.slug.clone(),
            title: show.title.clone(),
        }
    }
}

/// Body of `GET /shows`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShowListResponse {
    pub response: Vec<ShowSummary>,
}
