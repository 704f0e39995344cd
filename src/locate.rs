//! Embedded video location
//!
//! The video payload may be appended with no reliable marker, so location is
//! a chain of strategies sharing one signature, tried in a fixed priority
//! order. The first strategy to produce an offset wins; every miss is a
//! silent continuation to the next strategy.

use tracing::{debug, trace};

use crate::{
    bmff::{self, DEEP_SCAN_WINDOW},
    scan,
    xmp::VideoHint,
};

/// Canonical ISO-BMFF `ftyp` header with size 0x18, as written by most
/// motion-photo capture pipelines. Matched literally, not parsed.
const CANONICAL_FTYP_HEADER: [u8; 8] = [0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p'];

/// Box tags accepted when scanning forward from the image boundary.
const ALTERNATIVE_TAGS: [&[u8]; 3] = [b"ftyp", b"moov", b"mdat"];

/// Box tags accepted in the whole-buffer last-resort scan, in priority order.
const GENERIC_TAGS: [&[u8]; 5] = [b"ftyp", b"moov", b"mdat", b"mvhd", b"trak"];

/// Located slices at or below this many bytes are noise from a mis-located
/// offset, not playable video.
pub const MIN_EMBEDDED_VIDEO_LEN: usize = 50;

// Tunable corroboration thresholds for the metadata-guided strategy. These
// values are empirical; they are compatibility constants, not derived truths.
const HINT_VARIANCE_MAX: f64 = 0.1;
const LARGE_BOX_MIN: usize = 1_000_000;
const LARGE_BOX_REMAINDER_TOLERANCE: usize = 100;
const SUBSTANTIAL_REMAINDER_MIN: usize = 1_000_000;

/// How an embedded video offset was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// XMP-declared length corroborated an `ftyp` candidate
    MetadataGuided,
    /// Literal eight-byte `ftyp` header match after the image boundary
    CanonicalHeader,
    /// Bare `ftyp`/`moov`/`mdat` tag after the image boundary
    AlternativeSignature,
    /// Whole-buffer tag scan, including `mvhd`/`trak`
    GenericSignature,
}

/// A located embedded video start offset and the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub offset: usize,
    pub strategy: Strategy,
}

/// Locate the start of an embedded video payload.
///
/// `search_from` is the first byte after the JPEG end-of-image marker; the
/// metadata-guided and generic strategies deliberately ignore it and scan
/// the whole buffer. Returns `None` when every strategy misses.
pub fn locate(data: &[u8], search_from: usize, hint: &VideoHint) -> Option<Located> {
    let located = metadata_guided(data, hint)
        .map(|offset| Located {
            offset,
            strategy: Strategy::MetadataGuided,
        })
        .or_else(|| {
            canonical_header(data, search_from).map(|offset| Located {
                offset,
                strategy: Strategy::CanonicalHeader,
            })
        })
        .or_else(|| {
            alternative_signature(data, search_from).map(|offset| Located {
                offset,
                strategy: Strategy::AlternativeSignature,
            })
        })
        .or_else(|| {
            generic_signature(data).map(|offset| Located {
                offset,
                strategy: Strategy::GenericSignature,
            })
        });

    match located {
        Some(found) => debug!(offset = found.offset, strategy = ?found.strategy, "embedded video located"),
        None => debug!("no embedded video signature found"),
    }

    located
}

/// Strategy 1: scan the whole buffer for `ftyp` tags and accept the first
/// candidate the metadata hint corroborates.
fn metadata_guided(data: &[u8], hint: &VideoHint) -> Option<usize> {
    if !hint.declared {
        return None;
    }

    let mut search = 0;
    while let Some(pos) = scan::find_pattern(data, search, b"ftyp") {
        search = pos + 1;
        if pos < 4 {
            // No room for a size field before the tag
            continue;
        }

        let candidate = pos - 4;
        if is_corroborated_start(data, candidate, hint) {
            return Some(candidate);
        }
        trace!(candidate, "ftyp candidate rejected by corroboration");
    }

    None
}

/// Validate a candidate start offset against the box structure and the
/// declared length. Accepts on the first of:
/// - remaining-bytes variance against the declared length under 10%
/// - a box size over 1 MB within 100 bytes of the remaining length
/// - over 1 MB remaining and a deep box scan finding ftyp, mdat, and moov
fn is_corroborated_start(data: &[u8], start: usize, hint: &VideoHint) -> bool {
    let box_size = match bmff::read_box_size(data, start) {
        Some(size) => size as usize,
        None => return false,
    };
    if box_size == 0 || box_size >= data.len() {
        return false;
    }

    let remaining = data.len() - start;

    if hint.declared_length > 0 {
        let declared = hint.declared_length as f64;
        let variance = (remaining as f64 - declared).abs() / declared;
        if variance < HINT_VARIANCE_MAX {
            return true;
        }
    }

    if box_size > LARGE_BOX_MIN && box_size.abs_diff(remaining) < LARGE_BOX_REMAINDER_TOLERANCE {
        return true;
    }

    remaining > SUBSTANTIAL_REMAINDER_MIN
        && bmff::scan_boxes(data, start, DEEP_SCAN_WINDOW).essential()
}

/// Strategy 2: literal match of the canonical `ftyp` header.
fn canonical_header(data: &[u8], search_from: usize) -> Option<usize> {
    scan::find_pattern(data, search_from, &CANONICAL_FTYP_HEADER)
}

/// Strategy 3: first bare box tag after the image boundary, position-major
/// (every tag is checked at each position before moving on).
fn alternative_signature(data: &[u8], search_from: usize) -> Option<usize> {
    if data.len() < 4 {
        return None;
    }

    for pos in search_from..=data.len() - 4 {
        let window = &data[pos..pos + 4];
        if ALTERNATIVE_TAGS.iter().any(|tag| *tag == window) {
            return Some(include_size_field(pos));
        }
    }

    None
}

/// Strategy 4: whole-buffer scan, tag-major (each tag fully scanned before
/// the next), with the wider tag set.
fn generic_signature(data: &[u8]) -> Option<usize> {
    for tag in GENERIC_TAGS {
        if let Some(pos) = scan::find_pattern(data, 0, tag) {
            return Some(include_size_field(pos));
        }
    }

    None
}

/// Back up over the 4-byte size field preceding a tag when there is room.
fn include_size_field(pos: usize) -> usize {
    if pos >= 4 {
        pos - 4
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(length: u64) -> VideoHint {
        VideoHint {
            declared: true,
            declared_length: length,
        }
    }

    #[test]
    fn test_canonical_header_match() {
        let mut data = vec![0u8; 20];
        data.extend_from_slice(&CANONICAL_FTYP_HEADER);
        data.extend_from_slice(&[0u8; 100]);

        let found = locate(&data, 0, &VideoHint::default()).unwrap();
        assert_eq!(found.offset, 20);
        assert_eq!(found.strategy, Strategy::CanonicalHeader);
    }

    #[test]
    fn test_canonical_header_respects_search_start() {
        let mut data = Vec::new();
        data.extend_from_slice(&CANONICAL_FTYP_HEADER);
        data.extend_from_slice(&[0u8; 16]);
        assert_eq!(canonical_header(&data, 0), Some(0));
        assert_eq!(canonical_header(&data, 1), None);
    }

    #[test]
    fn test_alternative_signature_backs_up_over_size_field() {
        let mut data = vec![0xAA; 10];
        data.extend_from_slice(&0x200u32.to_be_bytes());
        data.extend_from_slice(b"moov");
        data.extend_from_slice(&[0u8; 8]);

        // Tag at 14, candidate backs up to the size field at 10
        assert_eq!(alternative_signature(&data, 0), Some(10));
    }

    #[test]
    fn test_alternative_signature_near_buffer_start() {
        let mut data = b"md".to_vec();
        data.extend_from_slice(b"mdat");
        // Tag at 2; fewer than 4 bytes precede it, so no back-up
        assert_eq!(alternative_signature(&data, 0), Some(2));
    }

    #[test]
    fn test_generic_signature_tag_priority() {
        // trak appears first in the buffer, but mvhd outranks it
        let mut data = vec![0u8; 8];
        data.extend_from_slice(b"trak");
        data.extend_from_slice(&[0u8; 20]);
        data.extend_from_slice(b"mvhd");
        data.extend_from_slice(&[0u8; 8]);

        assert_eq!(generic_signature(&data), Some(28));
    }

    #[test]
    fn test_metadata_guided_accepts_close_variance() {
        // Declared 2,000,000 with 2,005,000 remaining: 0.25% variance
        let total = 2_005_000usize;
        let video_start = 0usize;
        let mut data = Vec::with_capacity(total);
        data.extend_from_slice(&0x18u32.to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.resize(total, 0);

        let found = locate(&data, 0, &hint(2_000_000)).unwrap();
        assert_eq!(found.offset, video_start);
        assert_eq!(found.strategy, Strategy::MetadataGuided);
    }

    #[test]
    fn test_metadata_guided_skips_bad_candidate() {
        // First ftyp has a zero box size; second is corroborated by the hint
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.resize(5_000, 0xAA);
        let second = data.len();
        data.extend_from_slice(&0x18u32.to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.resize(second + 200_000, 0);

        assert_eq!(metadata_guided(&data, &hint(200_000)), Some(second));
    }

    #[test]
    fn test_metadata_guided_large_box_acceptance() {
        // Box size over 1 MB within 100 bytes of the remainder, hint way off
        let box_size = 1_500_000u32;
        let total = 1_500_040usize;
        let mut data = Vec::with_capacity(total + 10);
        data.extend_from_slice(&[0xAA; 10]);
        data.extend_from_slice(&box_size.to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.resize(10 + total, 0);

        assert_eq!(metadata_guided(&data, &hint(90_000_000)), Some(10));
    }

    #[test]
    fn test_metadata_guided_deep_scan_acceptance() {
        // Hint and box size both off, but the remainder is substantial and
        // a deep scan finds all three essential boxes
        let mut video = Vec::new();
        video.extend_from_slice(&24u32.to_be_bytes());
        video.extend_from_slice(b"ftyp");
        video.extend_from_slice(&[0u8; 16]);
        video.extend_from_slice(&108u32.to_be_bytes());
        video.extend_from_slice(b"moov");
        video.extend_from_slice(&[0u8; 100]);
        let mdat_payload = 1_100_000usize;
        video.extend_from_slice(&((mdat_payload + 8) as u32).to_be_bytes());
        video.extend_from_slice(b"mdat");
        video.resize(video.len() + mdat_payload, 0);

        let mut data = vec![0xBB; 32];
        data.extend_from_slice(&video);

        assert_eq!(metadata_guided(&data, &hint(500_000)), Some(32));
    }

    #[test]
    fn test_metadata_guided_requires_declared_hint() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x18u32.to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.resize(200_000, 0);

        assert_eq!(metadata_guided(&data, &VideoHint::default()), None);
    }

    #[test]
    fn test_nothing_located() {
        let data = vec![0x42u8; 4096];
        assert_eq!(locate(&data, 0, &VideoHint::default()), None);
    }
}
