use crate::generator::MIN_LENGTH;
use thiserror::Error;

/// Errors returned by password derivation.
///
/// Both kinds are caused by the input alone, so retrying with the same
/// input always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The site name is missing or blank.
    #[error("the site name must not be empty")]
    EmptyPhrase,

    /// The maximum length is not an integer or is below the minimum.
    #[error("invalid maximum length \"{0}\" (expected an integer of at least {min})", min = MIN_LENGTH)]
    InvalidLength(String),
}

pub type Result<T> = std::result::Result<T, Error>;
