use thiserror::Error;

/// Malformed or missing caller input, reported before any request is built.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("`{field}` must be an integer, got `{value}`")]
    NotAnInteger { field: &'static str, value: String },
    #[error("`{field}` must be in range {min}..={max}, got {value}")]
    OutOfRange { field: &'static str, value: i64, min: i64, max: i64 },
    #[error("the `{field}` parameter is required and cannot be empty")]
    MissingRequired { field: &'static str },
}

impl ArgumentError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotAnInteger { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::MissingRequired { field } => field,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::NotAnInteger { field, .. } => {
                format!("`{field}` has to be a whole number. Check the value and try again.")
            }
            Self::OutOfRange { field, min, max, .. } => {
                format!("`{field}` has to be between {min} and {max}.")
            }
            Self::MissingRequired { field } => format!("`{field}` is required."),
        }
    }
}

/// Rejects an empty or whitespace-only required identifier.
pub fn require_non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ArgumentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ArgumentError::MissingRequired { field });
    }
    Ok(trimmed)
}
