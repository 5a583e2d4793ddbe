//! Validation rules for shows and the batch create envelope.
//!
//! Every function here is pure: it inspects its input and returns the first
//! rule violation found, or `Ok(())`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::error::{FormatRule, ValidationError};
use super::types::{CreateShowsRequest, Image, NextEpisode, Season, Show};

pub const TITLE_MAX_LEN: usize = 120;
pub const SHORT_TEXT_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 500;

pub const PAYLOAD_MIN: usize = 1;
pub const PAYLOAD_MAX: usize = 1000;
pub const TAKE_MIN: i64 = 1;
pub const TAKE_MAX: i64 = 100;

static SHOW_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^show/[a-z0-9][a-z0-9-]*$").expect("valid show slug regex"));

static SEASON_SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^show/[a-z0-9][a-z0-9-]*/season/[1-9][0-9]*$").expect("valid season slug regex")
});

/// Returns true if `slug` has the form `show/<handle>`.
pub fn is_show_slug(slug: &str) -> bool {
    SHOW_SLUG.is_match(slug)
}

/// Returns true if `slug` has the form `show/<handle>/season/<n>` with `n >= 1`.
pub fn is_season_slug(slug: &str) -> bool {
    SEASON_SLUG.is_match(slug)
}

/// Returns true if `colour` is `#` followed by exactly six hex digits.
pub fn is_hex_colour(colour: &str) -> bool {
    colour
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Validates an absolute `http`/`https` URL.
///
/// The authority must be present and carry a non-empty host. Whitespace and
/// backslashes are rejected anywhere in the raw string; percent-encoded
/// spaces are fine.
pub fn validate_url(field: &str, raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::required(field));
    }

    let invalid = || ValidationError::format(field, FormatRule::HttpUrl);

    if raw.chars().any(|c| c.is_whitespace() || c == '\\') {
        return Err(invalid());
    }

    // The WHATWG parser silently drops extra slashes after the scheme, so
    // `http:///host` would otherwise parse with `host` as the host.
    let (_, rest) = raw.split_once("://").ok_or_else(invalid)?;
    if rest.starts_with('/') {
        return Err(invalid());
    }

    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a show image.
pub fn validate_image(image: &Image) -> Result<(), ValidationError> {
    validate_url("showImage", &image.show_image)
}

/// Validates the next-episode teaser.
pub fn validate_next_episode(next_episode: &NextEpisode) -> Result<(), ValidationError> {
    require("channelLogo", &next_episode.channel_logo)?;
    require("html", &next_episode.html)?;
    validate_url("url", &next_episode.url)
}

/// Validates a season. The slug may name the show itself or one of its seasons.
pub fn validate_season(season: &Season) -> Result<(), ValidationError> {
    require("slug", &season.slug)?;
    if !is_show_slug(&season.slug) && !is_season_slug(&season.slug) {
        return Err(ValidationError::format("slug", FormatRule::SeasonSlug));
    }
    Ok(())
}

/// Validates a single show, including nested entities.
pub fn validate_show(show: &Show) -> Result<(), ValidationError> {
    require("slug", &show.slug)?;
    if !is_show_slug(&show.slug) {
        return Err(ValidationError::format("slug", FormatRule::ShowSlug));
    }

    require("title", &show.title)?;
    check_length("title", &show.title, 1, TITLE_MAX_LEN)?;

    check_optional_length("country", show.country.as_deref(), SHORT_TEXT_MAX_LEN)?;
    check_optional_length(
        "description",
        show.description.as_deref(),
        DESCRIPTION_MAX_LEN,
    )?;
    check_optional_length("genre", show.genre.as_deref(), SHORT_TEXT_MAX_LEN)?;
    check_optional_length("language", show.language.as_deref(), SHORT_TEXT_MAX_LEN)?;
    check_optional_length("tvChannel", show.tv_channel.as_deref(), SHORT_TEXT_MAX_LEN)?;

    if let Some(colour) = &show.primary_colour {
        if !is_hex_colour(colour) {
            return Err(ValidationError::format(
                "primaryColour",
                FormatRule::HexColour,
            ));
        }
    }

    if let Some(count) = show.episode_count {
        if count < 0 {
            return Err(ValidationError::FieldRange {
                field: "episodeCount".to_string(),
                min: 0,
            });
        }
    }

    if let Some(image) = &show.image {
        validate_image(image).map_err(|e| e.within("image"))?;
    }

    if let Some(next_episode) = &show.next_episode {
        validate_next_episode(next_episode).map_err(|e| e.within("nextEpisode"))?;
    }

    if let Some(seasons) = &show.seasons {
        for (i, season) in seasons.iter().enumerate() {
            validate_season(season).map_err(|e| e.within(&format!("seasons[{i}]")))?;
        }
    }

    Ok(())
}

/// Checks the envelope bounds only, without looking at payload items.
pub fn validate_request_envelope(request: &CreateShowsRequest) -> Result<(), ValidationError> {
    let size = request.payload.len();
    if !(PAYLOAD_MIN..=PAYLOAD_MAX).contains(&size) {
        return Err(ValidationError::PayloadSize {
            min: PAYLOAD_MIN,
            max: PAYLOAD_MAX,
            actual: size,
        });
    }
    if request.skip < 0 {
        return Err(ValidationError::Skip {
            actual: request.skip,
        });
    }
    if !(TAKE_MIN..=TAKE_MAX).contains(&request.take) {
        return Err(ValidationError::Take {
            min: TAKE_MIN,
            max: TAKE_MAX,
            actual: request.take,
        });
    }
    if request.total_records < 0 {
        return Err(ValidationError::TotalRecords {
            actual: request.total_records,
        });
    }
    Ok(())
}

/// Validates the whole envelope: bounds first, then every payload item.
///
/// The first failing item is reported with its zero-based index.
pub fn validate_request(request: &CreateShowsRequest) -> Result<(), ValidationError> {
    validate_request_envelope(request)?;
    for (index, show) in request.payload.iter().enumerate() {
        validate_show(show).map_err(|e| e.at_index(index))?;
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::FieldLength {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn check_optional_length(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => check_length(field, value, 0, max),
        None => Ok(()),
    }
}
