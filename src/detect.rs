//! Motion-photo detection heuristics

use std::path::Path;

/// Substrings that identify motion-photo metadata in the raw file text.
///
/// `GCamera:MotionPhoto` is the attribute written by Google camera XMP; the
/// bare forms catch other vendors' spellings.
const METADATA_MARKERS: [&str; 3] = ["MotionPhoto", "motionphoto", "GCamera:MotionPhoto"];

/// Decide whether a file is a motion photo.
///
/// An OR of two independent heuristics, either sufficient:
/// filename convention (`MP.` / `.MP.` in the case-folded name) or a
/// metadata marker in the file content. The content check decodes the whole
/// buffer as lossy UTF-8, so binary regions never abort detection; a file
/// matching neither heuristic yields `false`, not an error.
pub fn is_motion_photo(path: &Path, data: &[u8]) -> bool {
    has_motion_photo_file_name(path) || has_motion_photo_metadata(data)
}

fn has_motion_photo_file_name(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let name = name.to_uppercase();
    name.contains("MP.") || name.contains(".MP.")
}

fn has_motion_photo_metadata(data: &[u8]) -> bool {
    let content = String::from_utf8_lossy(data);
    METADATA_MARKERS.iter().any(|marker| content.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_heuristic() {
        assert!(is_motion_photo(Path::new("IMG_0001.MP.COVER.jpg"), b""));
        assert!(is_motion_photo(Path::new("PXL_1234.MP.jpg"), b""));
        assert!(is_motion_photo(Path::new("img_0001.mp.jpg"), b""));
        assert!(!is_motion_photo(Path::new("IMG_0001.jpg"), b""));
    }

    #[test]
    fn test_metadata_heuristic() {
        let xmp = b"<rdf:Description GCamera:MotionPhoto=\"1\"/>";
        assert!(is_motion_photo(Path::new("plain.jpg"), xmp));
        assert!(is_motion_photo(Path::new("plain.jpg"), b"...motionphoto..."));
        assert!(!is_motion_photo(Path::new("plain.jpg"), b"ordinary jpeg"));
    }

    #[test]
    fn test_metadata_scan_is_lossy() {
        // Invalid UTF-8 around the marker must not abort the scan
        let mut data = vec![0xFF, 0xD8, 0xFE, 0x80, 0x80];
        data.extend_from_slice(b"MotionPhoto");
        data.extend_from_slice(&[0x80, 0xFF, 0xD9]);
        assert!(is_motion_photo(Path::new("plain.jpg"), &data));
    }

    #[test]
    fn test_heuristics_are_order_independent() {
        // Either heuristic alone, or both, yields the same positive answer
        let marked = b"GCamera:MotionPhoto".as_slice();
        assert!(is_motion_photo(Path::new("IMG.MP.jpg"), b""));
        assert!(is_motion_photo(Path::new("IMG.jpg"), marked));
        assert!(is_motion_photo(Path::new("IMG.MP.jpg"), marked));
        assert!(!is_motion_photo(Path::new("IMG.jpg"), b""));
    }
}
