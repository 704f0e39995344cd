//! Bounded MP4/ISO-BMFF box scanning
//!
//! This is not a container parser. It walks `(4-byte big-endian size,
//! 4-byte ASCII type)` box headers just far enough to corroborate that a
//! guessed offset really points at video data, and records which of the
//! top-level `ftyp`/`mdat`/`moov` boxes were seen along the way.

use byteorder::{BigEndian, ByteOrder};

/// Header bytes examined when coarsely classifying a buffer.
pub const COARSE_SCAN_WINDOW: usize = 10_000;

/// Header bytes examined when corroborating a candidate video offset.
pub const DEEP_SCAN_WINDOW: usize = 50_000;

/// Which of the essential top-level boxes a scan observed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoxScan {
    pub ftyp: bool,
    pub mdat: bool,
    pub moov: bool,
}

impl BoxScan {
    /// All three essential boxes present.
    pub fn essential(&self) -> bool {
        self.ftyp && self.mdat && self.moov
    }

    /// A file-type box plus at least one of the media boxes; enough to call
    /// a buffer "probably MP4" without full validation.
    pub fn plausible(&self) -> bool {
        self.ftyp && (self.mdat || self.moov)
    }
}

/// Read a 32-bit big-endian box size at `pos`, if four bytes are available.
pub fn read_box_size(data: &[u8], pos: usize) -> Option<u32> {
    data.get(pos..pos + 4).map(BigEndian::read_u32)
}

/// Walk box headers starting at `start`, never looking past
/// `start + window` or the end of the buffer.
///
/// The walk stops at the first malformed header: a size of 8 or less, or a
/// size that would step past the end of the buffer. Truncation is not an
/// error here; the scan simply reports whatever it saw up to that point.
pub fn scan_boxes(data: &[u8], start: usize, window: usize) -> BoxScan {
    let end = data.len().min(start.saturating_add(window));
    let mut scan = BoxScan::default();
    let mut pos = start;

    while pos + 8 < end {
        let size = match read_box_size(data, pos) {
            Some(size) => size as usize,
            None => break,
        };
        if size <= 8 || size > data.len() - pos {
            break;
        }

        match &data[pos + 4..pos + 8] {
            b"ftyp" => scan.ftyp = true,
            b"mdat" => scan.mdat = true,
            b"moov" => scan.moov = true,
            _ => {}
        }

        pos += size;
    }

    scan
}

/// Coarse check that a standalone buffer holds an MP4-like container.
///
/// Used for diagnostics on companion files; a negative answer is logged,
/// never acted on.
pub fn looks_like_mp4(data: &[u8]) -> bool {
    if data.len() < 32 {
        return false;
    }
    scan_boxes(data, 0, COARSE_SCAN_WINDOW).plausible()
}
