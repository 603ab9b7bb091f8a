/// Contains [`ThreadUrl`] and the endpoints derived from it.
///
/// [`ThreadUrl`]: crate::location::ThreadUrl
pub mod location;

/// Contains [`Subject`], a board's thread index.
///
/// [`Subject`]: crate::subject::Subject
pub mod subject;
