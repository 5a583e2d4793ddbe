use std::fmt;

use thiserror::Error;

/// Pattern a field failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    /// `show/<handle>`
    ShowSlug,
    /// `show/<handle>` or `show/<handle>/season/<n>`
    SeasonSlug,
    /// `#RRGGBB`
    HexColour,
    /// Absolute `http`/`https` URL with a host and no whitespace.
    HttpUrl,
}

impl fmt::Display for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowSlug | Self::SeasonSlug => f.write_str("must be in a valid format."),
            Self::HexColour => f.write_str("must be a valid hex colour (#RRGGBB)"),
            Self::HttpUrl => f.write_str("must be a valid http(s) URL"),
        }
    }
}

/// Errors produced by the validation engine.
///
/// `field` holds the full path of the offending field, e.g. `title`,
/// `image.showImage` or `seasons[2].slug`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field}: {}", length_message(.min, .max))]
    FieldLength {
        field: String,
        min: usize,
        max: usize,
    },

    #[error("{field}: {rule}")]
    FieldFormat { field: String, rule: FormatRule },

    #[error("{field}: must be no less than {min}")]
    FieldRange { field: String, min: i64 },

    #[error("payload must contain between {min} and {max} items")]
    PayloadSize { min: usize, max: usize, actual: usize },

    #[error("skip must be greater than or equal to 0")]
    Skip { actual: i64 },

    #[error("take must be between {min} and {max}")]
    Take { min: i64, max: i64, actual: i64 },

    #[error("totalRecords must be greater than or equal to 0")]
    TotalRecords { actual: i64 },

    #[error("payload[{index}]: {source}")]
    Item {
        index: usize,
        source: Box<ValidationError>,
    },
}

fn length_message(min: &usize, max: &usize) -> String {
    if *min == 0 {
        format!("must be at most {max} characters")
    } else {
        format!("must be between {min} and {max} characters")
    }
}

impl ValidationError {
    pub(crate) fn required(field: impl Into<String>) -> Self {
        Self::Required {
            field: field.into(),
        }
    }

    pub(crate) fn format(field: impl Into<String>, rule: FormatRule) -> Self {
        Self::FieldFormat {
            field: field.into(),
            rule,
        }
    }

    /// Wraps an item-level failure with its zero-based payload index.
    pub fn at_index(self, index: usize) -> Self {
        Self::Item {
            index,
            source: Box::new(self),
        }
    }

    /// Prefixes the field path of a nested failure, e.g. `showImage` under
    /// `image` becomes `image.showImage`.
    pub(crate) fn within(self, parent: &str) -> Self {
        let nest = |field: String| format!("{parent}.{field}");
        match self {
            Self::Required { field } => Self::Required { field: nest(field) },
            Self::FieldLength { field, min, max } => Self::FieldLength {
                field: nest(field),
                min,
                max,
            },
            Self::FieldFormat { field, rule } => Self::FieldFormat {
                field: nest(field),
                rule,
            },
            Self::FieldRange { field, min } => Self::FieldRange {
                field: nest(field),
                min,
            },
            other => other,
        }
    }

    /// The field path this error refers to, if it is field-level.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Required { field }
            | Self::FieldLength { field, .. }
            | Self::FieldFormat { field, .. }
            | Self::FieldRange { field, .. } => Some(field),
            Self::Item { source, .. } => source.field(),
            _ => None,
        }
    }
}
