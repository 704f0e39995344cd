//! Companion video file resolution
//!
//! When no usable video is embedded, the clip may exist as a sibling file
//! linked to the still image purely by filename convention. The candidate
//! patterns below are a de facto protocol with camera and export tooling;
//! they must be preserved exactly for interoperability with existing photo
//! libraries.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use crate::error::Result;

/// Companion files at or below this size are not usable video. Looser than
/// the embedded floor: a real file on disk is not subject to the mis-located
/// offset noise problem.
pub const MIN_COMPANION_VIDEO_LEN: usize = 1000;

/// Find a companion video file for the given still-image path.
///
/// Checks the conventional candidate names in literal order (first existing
/// file wins), then falls back to a case-insensitive prefix search over the
/// `*.mp4` files in the same directory. Returns `Ok(None)` when nothing
/// matches; a failed directory listing is an I/O error, not a miss.
pub fn find_companion(path: &Path) -> Result<Option<PathBuf>> {
    let Some(dir) = path.parent() else {
        return Ok(None);
    };
    let Some(base) = path.file_stem().and_then(OsStr::to_str) else {
        return Ok(None);
    };

    for candidate in candidate_names(base) {
        let candidate_path = dir.join(&candidate);
        if candidate_path.is_file() {
            debug!(candidate = %candidate_path.display(), "companion file matched by pattern");
            return Ok(Some(candidate_path));
        }
        trace!(candidate = %candidate_path.display(), "companion candidate absent");
    }

    search_by_prefix(dir, base)
}

/// Conventional companion names derived from the image's base filename
/// (extension already stripped). Order matters.
fn candidate_names(base: &str) -> [String; 6] {
    [
        format!("{base}.mp4"),
        format!("{base}_video.mp4"),
        format!("{base}-video.mp4"),
        format!("{base}.MP4"),
        base.replace(".MP.COVER", ".mp4"),
        base.replace(".MP.COVER", ""),
    ]
}

/// Fallback: first `*.mp4`/`*.MP4` sibling whose stem starts with the part
/// of the base filename before the first underscore, case-insensitively.
fn search_by_prefix(dir: &Path, base: &str) -> Result<Option<PathBuf>> {
    let prefix = base.split('_').next().unwrap_or(base).to_lowercase();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_mp4_extension(&path) {
            continue;
        }

        let stem_matches = path
            .file_stem()
            .and_then(OsStr::to_str)
            .is_some_and(|stem| stem.to_lowercase().starts_with(&prefix));

        if stem_matches {
            debug!(candidate = %path.display(), prefix, "companion file matched by prefix search");
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn has_mp4_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"))
}
