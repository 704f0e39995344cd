//! Error types for motion-photo-io

use std::io;

/// Result type for motion-photo-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a motion photo
///
/// Heuristic misses (a pattern not found, an inconclusive box scan, a size
/// variance too large) are not errors; they surface as `None` at each stage
/// boundary so "not found" and "could not read file" stay distinguishable
/// all the way up to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Neither the filename convention nor the embedded metadata markers
    /// identify the file as a motion photo
    #[error("not a motion photo")]
    NotMotionPhoto,

    /// No JPEG end-of-image marker anywhere in the file, so no still image
    /// can be extracted
    #[error("no JPEG end-of-image marker found")]
    NoImageBoundary,
}
