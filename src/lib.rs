//! Split motion photos into their still and video parts.
//!
//! A motion photo is a hybrid media file: a JPEG that carries a short MP4
//! clip, either appended to the same file or stored as a sibling file linked
//! only by naming convention. The video may be embedded with no reliable
//! marker, embedded with XMP metadata hints, or missing entirely, so this
//! crate applies a chain of heuristics to find it: metadata-guided location,
//! canonical header match, box-signature scans, and finally a filesystem
//! search for a companion file.
//!
//! # Quick Start
//!
//! ```no_run
//! use motion_photo_io::{MotionPhoto, VideoSource};
//!
//! # fn main() -> motion_photo_io::Result<()> {
//! let photo = MotionPhoto::parse("IMG_0001.MP.COVER.jpg")?;
//!
//! println!("still: {} bytes", photo.still_image.len());
//! if photo.has_video {
//!     println!("video: {} bytes ({:?})", photo.video.len(), photo.video_source);
//! }
//!
//! // Write `{stem}-still.jpg` and `{stem}-motion.mp4` next to each other
//! photo.write_parts("out/")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Outcomes
//!
//! A parse ends one of four ways, and callers can tell them apart:
//!
//! - [`Error::NotMotionPhoto`]: neither heuristic matched; the file is
//!   simply not a motion photo
//! - [`Error::NoImageBoundary`]: no JPEG end marker, so nothing displayable
//!   can be extracted
//! - a result with `has_video == false`: the still image is usable, the
//!   video could not be located ([`VideoSource`] says what was attempted)
//! - a fully populated result
//!
//! I/O failures (unreadable file, failed directory listing) surface as
//! [`Error::Io`]; no partial results are ever returned.
//!
//! The lower-level heuristics are public for batch tools that want to run a
//! single stage, e.g. [`detect::is_motion_photo`] to filter a directory
//! before parsing, or [`locate::locate`] over bytes already in memory.

pub mod bmff;
pub mod companion;
pub mod detect;
mod error;
pub mod jpeg;
pub mod locate;
mod parser;
pub mod scan;
pub mod xmp;

pub use error::{Error, Result};
pub use locate::{Located, Strategy};
pub use parser::{MotionPhoto, VideoSource};
pub use xmp::VideoHint;

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
