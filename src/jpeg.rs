//! JPEG still-image boundary location

use crate::scan;

/// JPEG end-of-image marker (EOI)
pub const EOI_MARKER: [u8; 2] = [0xFF, 0xD9];

/// Find the offset of the `FF` of the rightmost `FF D9` pair.
///
/// Motion-photo containers append video after the JPEG, and the video
/// payload can itself contain earlier `FF D9` byte pairs, so the true image
/// boundary is the *last* EOI marker in the file. The still image is
/// `data[..=offset + 1]`.
pub fn find_jpeg_end(data: &[u8]) -> Option<usize> {
    scan::rfind_pattern(data, &EOI_MARKER)
}
