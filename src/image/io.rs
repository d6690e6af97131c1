//! Decoding helpers and JSON output.
//!
//! - `decode_path` / `decode_bytes`: read BMP/GIF/JPEG/PNG/WebP/… into a
//!   `DynamicImage`, optionally capturing the embedded ICC profile.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::adapter::AdapterError;
use image::{DynamicImage, ImageDecoder, ImageReader};
use serde::Serialize;
use std::fs;
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

/// Decoded image plus the ICC profile it carried, if any.
pub struct Decoded {
    pub image: DynamicImage,
    pub icc_profile: Option<Vec<u8>>,
}

/// Decode an image file, guessing the format from its content.
pub fn decode_path(path: &Path) -> Result<Decoded, AdapterError> {
    let reader = ImageReader::open(path).map_err(|source| AdapterError::Io {
        what: path.display().to_string(),
        source,
    })?;
    decode_reader(reader, &path.display().to_string())
}

/// Decode an in-memory encoded image.
pub fn decode_bytes(data: &[u8]) -> Result<Decoded, AdapterError> {
    decode_reader(ImageReader::new(Cursor::new(data)), "in-memory image")
}

fn decode_reader<R: BufRead + Seek>(
    reader: ImageReader<R>,
    what: &str,
) -> Result<Decoded, AdapterError> {
    let reader = reader
        .with_guessed_format()
        .map_err(|source| AdapterError::Io {
            what: what.to_string(),
            source,
        })?;
    let mut decoder = reader.into_decoder()?;
    // Unreadable profiles are dropped; the pixels are still used.
    let icc_profile = decoder.icc_profile().unwrap_or(None);
    let image = DynamicImage::from_decoder(decoder)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(AdapterError::EmptyImage);
    }
    Ok(Decoded { image, icc_profile })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
