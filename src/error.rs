//! Crate errors
//!
//! Only construction can fail. Once a `World` exists, ticks never return errors.

use thiserror::Error;

use crate::anim::Field;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Data-authoring errors caught at construction time
#[derive(Debug, Error)]
pub enum Error {
    #[error("tween snapshots disagree on fields: start {start:?}, end {end:?}")]
    SnapshotMismatch { start: Vec<Field>, end: Vec<Field> },

    #[error("sprite sheet `{sheet}` has no clip for `{key}`")]
    MissingClip { sheet: &'static str, key: String },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
