use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inputs this long or longer use a hashed membership cache in set operations.
pub const LARGE_ARRAY_SIZE: usize = 200;

/// How a wrapped sequence runs its pending steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Fuse consecutive steps into one pass and stop pulling as soon as the
    /// result is known.
    #[default]
    Lazy,
    /// Run every step as its own pass over a materialized intermediate.
    ///
    /// Produces the same values as [`Lazy`](Evaluation::Lazy), only with more
    /// callback invocations and allocations.
    Eager,
}

/// Configuration threaded through a wrapped sequence.
///
/// There is no process-wide default to mutate: every wrapper carries the
/// settings it was created with.
///
/// # Examples
///
/// ```
/// use lazyseq::{Evaluation, Settings};
///
/// let mut settings = Settings::from_json(r#"{ "evaluation": "eager" }"#).unwrap();
/// assert_eq!(settings.evaluation, Evaluation::Eager);
/// assert_eq!(settings.large_array_size, 200);
///
/// settings.reset();
/// assert_eq!(settings, Settings::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub evaluation: Evaluation,
    pub large_array_size: usize,
}

impl Settings {
    /// Settings that force every step to run as a separate pass.
    pub fn eager() -> Self {
        Self {
            evaluation: Evaluation::Eager,
            ..Self::default()
        }
    }

    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Settings)
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            evaluation: Evaluation::Lazy,
            large_array_size: LARGE_ARRAY_SIZE,
        }
    }
}
