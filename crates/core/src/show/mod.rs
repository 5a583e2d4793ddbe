mod error;
mod types;
mod validation;

pub use error::{FormatRule, ValidationError};
pub use types::{CreateShowsRequest, Image, NextEpisode, Season, Show, ShowListResponse, ShowSummary};
pub use validation::{
    is_hex_colour, is_season_slug, is_show_slug, validate_image, validate_next_episode,
    validate_request, validate_request_envelope, validate_season, validate_show, validate_url,
    DESCRIPTION_MAX_LEN, PAYLOAD_MAX, PAYLOAD_MIN, SHORT_TEXT_MAX_LEN, TAKE_MAX, TAKE_MIN,
    TITLE_MAX_LEN,
};
