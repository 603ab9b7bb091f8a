use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Everything that can go wrong while talking to 5ch.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure: connection, timeout or body read.
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// The underlying HTTP client could not be built.
    #[error("could not start up the client: {0}")]
    ClientFormation(#[source] reqwest::Error),

    /// A configured or derived value is not a legal header value.
    #[error("{0}")]
    Header(#[from] InvalidHeaderValue),

    /// The text is not a `read.cgi` URL on 5ch.
    #[error("`{0}` is not a 5ch thread url")]
    InvalidUrl(String),

    /// A request was attempted before a target thread was set.
    #[error("no target thread has been set on the client")]
    NoTarget,

    /// [`Client::post`] was called with an empty message.
    ///
    /// [`Client::post`]: crate::Client::post
    #[error("cannot post an empty message")]
    EmptyMessage,

    /// The text contains a character the codec cannot encode.
    #[error("{character:?} cannot be represented in {encoding}")]
    Unmappable {
        /// Name of the target encoding.
        encoding: &'static str,
        /// First character that failed to encode.
        character: char,
    },
}
