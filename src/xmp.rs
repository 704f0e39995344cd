//! XMP video hint extraction
//!
//! Motion-photo XMP declares the attached clip as a container item with
//! `Item:Mime="video/mp4"` and `Item:Length="<bytes>"`. The packet can sit
//! anywhere in the file (including extended-XMP segments), and the file as a
//! whole is not valid XML, so the attributes are matched as text over a lossy
//! UTF-8 decode of the full buffer rather than parsed as a document.

use std::sync::LazyLock;

use regex::Regex;

/// Declared lengths at or below this are metadata noise (thumbnails,
/// padding declarations) and are ignored.
pub const HINT_NOISE_FLOOR: u64 = 100_000;

static MIME_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Item:Mime="video/mp4""#).expect("valid regex"));

static LENGTH_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Item:Length="(\d+)""#).expect("valid regex"));

/// Best-effort metadata hint for the embedded video
///
/// `declared_length` is only meaningful when `declared` is true. The hint is
/// used to corroborate a guessed video offset, never as an authoritative
/// container descriptor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VideoHint {
    pub declared: bool,
    pub declared_length: u64,
}

/// Scan raw file bytes for a declared `video/mp4` attachment.
///
/// Requires the MIME attribute to be present, then accepts the first
/// declared length above [`HINT_NOISE_FLOOR`]. Anything else yields an
/// undeclared hint.
pub fn parse_video_hint(data: &[u8]) -> VideoHint {
    let content = String::from_utf8_lossy(data);

    if !MIME_ATTR.is_match(&content) {
        return VideoHint::default();
    }

    for capture in LENGTH_ATTR.captures_iter(&content) {
        if let Ok(length) = capture[1].parse::<u64>() {
            if length > HINT_NOISE_FLOOR {
                return VideoHint {
                    declared: true,
                    declared_length: length,
                };
            }
        }
    }

    VideoHint::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_video() {
        let xmp = br#"<Container:Item Item:Mime="video/mp4" Item:Semantic="MotionPhoto" Item:Length="2000000"/>"#;
        let hint = parse_video_hint(xmp);
        assert!(hint.declared);
        assert_eq!(hint.declared_length, 2_000_000);
    }

    #[test]
    fn test_first_qualifying_length_wins() {
        let xmp = br#"Item:Mime="video/mp4" Item:Length="4096" Item:Length="1500000" Item:Length="9000000""#;
        let hint = parse_video_hint(xmp);
        assert!(hint.declared);
        assert_eq!(hint.declared_length, 1_500_000);
    }

    #[test]
    fn test_no_mime_marker() {
        let xmp = br#"Item:Length="2000000""#;
        assert_eq!(parse_video_hint(xmp), VideoHint::default());
    }

    #[test]
    fn test_only_noise_lengths() {
        let xmp = br#"Item:Mime="video/mp4" Item:Length="4096" Item:Length="100000""#;
        assert_eq!(parse_video_hint(xmp), VideoHint::default());
    }

    #[test]
    fn test_binary_surroundings_are_tolerated() {
        let mut data = vec![0xFF, 0xD8, 0x80, 0xFE];
        data.extend_from_slice(br#"Item:Mime="video/mp4" Item:Length="250000""#);
        data.extend_from_slice(&[0x80, 0xFF, 0xD9]);
        let hint = parse_video_hint(&data);
        assert!(hint.declared);
        assert_eq!(hint.declared_length, 250_000);
    }
}
