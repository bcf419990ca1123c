use thiserror::Error;

/// Errors surfaced to the user as transient notifications. Every variant
/// is recoverable; the app returns to an interactive state after any of
/// them.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Business-rule violation caught before any network call
    #[error("invalid listing: {0}")]
    Validation(String),

    /// A query or read failed; prior state is left intact
    #[error("could not fetch listings: {0}")]
    Fetch(String),

    /// An image upload failed; the whole submission is aborted
    #[error("image upload failed: {0}")]
    Upload(String),

    /// The address could not be resolved to coordinates
    #[error("could not resolve address: {0}")]
    Geocode(String),

    /// An auth operation (sign-in, profile update, password reset) failed
    #[error("auth operation failed: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, MarketError>;
