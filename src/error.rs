use thiserror::Error;

/// Errors raised at the typed boundaries of this crate.
///
/// Evaluating a sequence never fails on its own. These only come up when
/// converting between Rust types and the dynamic [`Value`](serde_json::Value)
/// model the engine works on.
#[derive(Debug, Error)]
pub enum Error {
    /// A typed source could not be turned into a [`Value`](serde_json::Value).
    #[error("cannot wrap source: {0}")]
    Wrap(#[source] serde_json::Error),

    /// The evaluated result does not have the shape of the requested type.
    #[error("cannot convert sequence result: {0}")]
    Convert(#[source] serde_json::Error),

    /// Settings could not be parsed.
    #[error("invalid settings: {0}")]
    Settings(#[source] serde_json::Error),
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
