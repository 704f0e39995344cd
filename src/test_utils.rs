//! Synthetic fixture builders for tests.
//!
//! Motion photos are easy to fabricate byte-for-byte, so the test suite
//! builds its fixtures in memory instead of committing binary files. All
//! builders keep the payload regions free of `FF D9` pairs and box tags so
//! the boundary and signature scans see exactly what a test intends.

/// Canonical embedded video header: a size-0x18 `ftyp` box.
pub const FTYP_HEADER: [u8; 8] = [0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p'];

/// A minimal JPEG with no motion-photo markers: SOI, an ASCII comment body,
/// EOI.
pub fn minimal_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(b"plain picture payload ");
    data.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// A JPEG carrying the `GCamera:MotionPhoto` metadata marker, so content
/// detection passes regardless of filename. No video MIME declaration.
pub fn tagged_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(b"<rdf:Description GCamera:MotionPhoto=\"1\"/> ");
    data.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// A JPEG whose metadata additionally declares an attached `video/mp4` of
/// `declared_length` bytes, for exercising the metadata-guided strategy.
pub fn hinted_jpeg(declared_length: u64) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(b"<rdf:Description GCamera:MotionPhoto=\"1\"/> ");
    data.extend_from_slice(
        format!(r#"<Container:Item Item:Mime="video/mp4" Item:Length="{declared_length}"/> "#)
            .as_bytes(),
    );
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// Append a canonical `ftyp` header plus `payload_len` filler bytes to a
/// still image, producing a complete embedded motion photo.
pub fn embedded_motion_photo(jpeg: &[u8], payload_len: usize) -> Vec<u8> {
    let mut data = jpeg.to_vec();
    data.extend_from_slice(&FTYP_HEADER);
    data.extend(std::iter::repeat(0x11u8).take(payload_len));
    data
}
