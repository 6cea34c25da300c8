//! Conversion between decoded photos and the bytes stored in the database.
//!
//! Photos are stored as PNG so that a round trip through the database keeps
//! every pixel. Encoded bytes are deterministic for a given `image` crate
//! version, but callers should only rely on decoding them again, not on
//! byte-for-byte equality across versions.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::error::{Error, Result};

/// Encode a photo as PNG bytes.
///
/// # Errors
///
/// Returns [`Error::ImageEncode`] if the pixel layout cannot be written as
/// PNG (for example 32-bit float images).
pub fn encode(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(Error::ImageEncode)?;
    debug!(
        "Encoded {}x{} photo into {} bytes",
        image.width(),
        image.height(),
        bytes.len()
    );
    Ok(bytes)
}

/// Decode stored bytes back into a photo.
///
/// The container format is detected from the bytes, so photos written by
/// other tools in any supported format still load.
///
/// # Errors
///
/// Returns [`Error::ImageDecode`] on empty or malformed input.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(Error::ImageDecode)
}

/// Read a photo from a file on disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or
/// [`Error::ImageDecode`] if its contents are not an image.
pub fn load(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let bytes = std::fs::read(path.as_ref())?;
    decode(&bytes)
}

/// Write a photo to disk as PNG.
///
/// # Errors
///
/// Returns an error if encoding or writing the file fails.
pub fn save_png(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let bytes = encode(image)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            Rgb([(x * 7) as u8, (y * 13) as u8, ((x + y) * 3) as u8])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_round_trip_preserves_pixels() {
        let original = gradient(17, 9);
        let bytes = encode(&original).unwrap();
        let decoded = decode(&bytes).unwrap();

        assert_eq!(decoded.width(), 17);
        assert_eq!(decoded.height(), 9);
        assert_eq!(decoded.to_rgb8().into_raw(), original.to_rgb8().into_raw());
    }

    #[test]
    fn test_round_trip_keeps_alpha() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 40]));
        let original = DynamicImage::ImageRgba8(img);

        let decoded = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(decoded.to_rgba8().get_pixel(1, 1), &Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn test_encode_produces_png_signature() {
        let bytes = encode(&gradient(2, 2)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let img = gradient(8, 8);
        assert_eq!(encode(&img).unwrap(), encode(&img).unwrap());
    }

    #[test]
    fn test_decode_malformed_bytes() {
        let err = decode(b"not an image at all").unwrap_err();
        assert!(matches!(err, Error::ImageDecode(_)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode(&[]), Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encode(&gradient(16, 16)).unwrap();
        let truncated = &bytes[..bytes.len() / 2];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let original = gradient(5, 4);

        save_png(&original, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.to_rgb8().into_raw(), original.to_rgb8().into_raw());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/nonexistent/photo.png").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
