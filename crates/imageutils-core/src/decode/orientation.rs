//! EXIF orientation lookup.
//!
//! Orientation is read straight from the container metadata, independent of
//! pixel decoding, so a file whose pixels fail to decode can still report an
//! orientation and a file without metadata reports `Normal`.

use std::io::Cursor;

use exif::{In, Reader, Tag};

use super::{Orientation, OrientationDegrees};

/// Read the EXIF orientation of the primary image.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the orientation
/// field cannot be read.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Clockwise rotation needed to display `bytes` upright. Never fails.
pub fn resolve_rotation(bytes: &[u8]) -> OrientationDegrees {
    read_orientation(bytes).rotation()
}
