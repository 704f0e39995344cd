//! Motion-photo assembly
//!
//! Top-level entry point tying the heuristics together: detection gates the
//! parse, the JPEG boundary splits the buffer, embedded location is tried
//! first, and the companion resolver is the fallback. The result is built in
//! one pass over one read of the file and never partially populated.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    companion::{self, MIN_COMPANION_VIDEO_LEN},
    detect,
    error::{Error, Result},
    jpeg, locate,
    locate::MIN_EMBEDDED_VIDEO_LEN,
    xmp,
};

/// Where a result's video bytes came from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VideoSource {
    /// No video was located anywhere
    #[default]
    None,
    /// Video extracted from the file itself
    Embedded,
    /// An embedded offset was found but the slice is too small to be
    /// playable video; kept for diagnostics
    EmbeddedUndersized,
    /// Video read from a sibling file matched by naming convention
    CompanionFile,
}

/// A parsed motion photo
///
/// `still_image` and `video` are independent copies; neither aliases the
/// original file buffer. Constructed entirely within one parse call and
/// owned exclusively by the caller afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionPhoto {
    /// JPEG bytes from the start of the file through the end-of-image
    /// marker, inclusive
    pub still_image: Vec<u8>,
    /// MP4 bytes if located, else empty
    pub video: Vec<u8>,
    /// Original file path, kept for diagnostics and filename fallbacks
    pub source_path: PathBuf,
    /// True only when `video` exceeds the plausibility floor for its source
    pub has_video: bool,
    /// How the video bytes were obtained
    pub video_source: VideoSource,
    /// Set only when `video_source` is [`VideoSource::CompanionFile`]
    pub companion_path: Option<PathBuf>,
}

impl MotionPhoto {
    /// Parse a motion photo from a file.
    ///
    /// Reads the file once. Returns [`Error::NotMotionPhoto`] when neither
    /// detection heuristic matches, [`Error::NoImageBoundary`] when no JPEG
    /// end marker exists, and [`Error::Io`] for genuine read failures. A
    /// missing video is not an error; the result then carries an empty
    /// `video` with `video_source` explaining what was attempted.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        Self::from_bytes(path, &data)
    }

    /// Parse from bytes already in memory.
    ///
    /// `path` still participates in filename-based detection and companion
    /// resolution, so it should be the real location of the bytes.
    pub fn from_bytes(path: &Path, data: &[u8]) -> Result<Self> {
        if !detect::is_motion_photo(path, data) {
            return Err(Error::NotMotionPhoto);
        }

        let eoi = jpeg::find_jpeg_end(data).ok_or(Error::NoImageBoundary)?;
        let still_image = data[..=eoi + 1].to_vec();

        let mut photo = Self {
            still_image,
            video: Vec::new(),
            source_path: path.to_path_buf(),
            has_video: false,
            video_source: VideoSource::None,
            companion_path: None,
        };
        photo.attach_embedded_video(data, eoi + 2);

        if !photo.has_video {
            photo.attach_companion_video()?;
        }

        debug!(
            path = %photo.source_path.display(),
            still_len = photo.still_image.len(),
            video_len = photo.video.len(),
            source = ?photo.video_source,
            "motion photo parsed"
        );
        Ok(photo)
    }

    /// Try to extract an embedded video starting after the image boundary.
    fn attach_embedded_video(&mut self, data: &[u8], search_from: usize) {
        let hint = xmp::parse_video_hint(data);
        let Some(found) = locate::locate(data, search_from, &hint) else {
            return;
        };

        let video = data[found.offset..].to_vec();
        if video.len() > MIN_EMBEDDED_VIDEO_LEN {
            self.has_video = true;
            self.video_source = VideoSource::Embedded;
        } else {
            // Found an offset, but the slice is noise from a mis-located
            // marker; record the provenance instead of discarding it
            self.video_source = VideoSource::EmbeddedUndersized;
        }
        self.video = video;
    }

    /// Fall back to a companion sibling file. A found companion replaces
    /// any undersized embedded bytes outright; the two are never combined.
    fn attach_companion_video(&mut self) -> Result<()> {
        let Some(companion) = companion::find_companion(&self.source_path)? else {
            return Ok(());
        };

        let video = fs::read(&companion)?;
        if !crate::bmff::looks_like_mp4(&video) {
            debug!(
                companion = %companion.display(),
                "companion file does not coarsely scan as MP4"
            );
        }

        self.has_video = video.len() > MIN_COMPANION_VIDEO_LEN;
        self.video = video;
        self.video_source = VideoSource::CompanionFile;
        self.companion_path = Some(companion);
        Ok(())
    }

    /// Write the still image to `path`.
    pub fn write_still_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, &self.still_image)?;
        Ok(())
    }

    /// Write the video bytes to `path`. Writes whatever was located, even
    /// an undersized slice; check `has_video` first if that matters.
    pub fn write_video_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, &self.video)?;
        Ok(())
    }

    /// Write both parts into `dir` as `{stem}-still.jpg` and, when a usable
    /// video exists, `{stem}-motion.mp4`. Returns the paths written.
    pub fn write_parts(&self, dir: impl AsRef<Path>) -> Result<(PathBuf, Option<PathBuf>)> {
        let dir = dir.as_ref();
        let stem = self
            .source_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "motion-photo".to_string());

        let still_path = dir.join(format!("{stem}-still.jpg"));
        self.write_still_to(&still_path)?;

        let video_path = if self.has_video {
            let video_path = dir.join(format!("{stem}-motion.mp4"));
            self.write_video_to(&video_path)?;
            Some(video_path)
        } else {
            None
        };

        Ok((still_path, video_path))
    }
}
