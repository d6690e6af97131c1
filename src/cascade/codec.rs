//! Compact serialised cascade form and transparent (de)compression.
//!
//! The compact form is the JSON rendition of the model types:
//!
//! ```json
//! { "sizeX": 24, "sizeY": 24,
//!   "stages": [ { "threshold": 0.82,
//!                 "features": [ { "threshold": -0.03, "left": 2.08, "right": -2.21,
//!                                 "size": [24, 24],
//!                                 "rects": [[6, 4, 12, 9, -1.0], [6, 7, 12, 3, 3.0]] } ] } ] }
//! ```
//!
//! Serialisation is the exact structural inverse of parsing, so a cascade read
//! once from markup can be stored compactly (optionally compressed) and loaded
//! quickly afterwards.
//!
//! Compression is selected by file-name suffix only: `.gz`, `.bz2`, `.zst`.
//! Any other suffix means the bytes are used as they are.
use super::error::CascadeError;
use super::xml;
use super::Cascade;
use log::{debug, warn};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Byte-stream wrapping recognised on cascade files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Zstd,
}

impl Compression {
    /// Infer the wrapping from the last suffix of `name`.
    pub fn from_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Compression::None,
        };
        match ext.as_str() {
            "gz" | "gzip" => Compression::Gzip,
            "bz2" | "bzip2" => Compression::Bzip2,
            "zst" | "zstd" => Compression::Zstd,
            _ => Compression::None,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(Self::from_name)
            .unwrap_or(Compression::None)
    }

    fn label(self) -> &'static str {
        match self {
            Compression::None => "plain",
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
            Compression::Zstd => "zstd",
        }
    }

    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>, CascadeError> {
        let wrap = |source| CascadeError::Compression {
            op: "decompress",
            format: self.label(),
            source,
        };
        let mut out = Vec::new();
        match self {
            Compression::None => out.extend_from_slice(data),
            Compression::Gzip => {
                flate2::read::GzDecoder::new(data)
                    .read_to_end(&mut out)
                    .map_err(wrap)?;
            }
            Compression::Bzip2 => {
                bzip2::read::BzDecoder::new(data)
                    .read_to_end(&mut out)
                    .map_err(wrap)?;
            }
            Compression::Zstd => out = zstd::stream::decode_all(data).map_err(wrap)?,
        }
        Ok(out)
    }

    pub fn compress(self, data: &[u8]) -> Result<Vec<u8>, CascadeError> {
        let wrap = |source| CascadeError::Compression {
            op: "compress",
            format: self.label(),
            source,
        };
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Gzip => {
                let mut enc =
                    flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
                enc.write_all(data).map_err(wrap)?;
                enc.finish().map_err(wrap)
            }
            Compression::Bzip2 => {
                let mut enc =
                    bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
                enc.write_all(data).map_err(wrap)?;
                enc.finish().map_err(wrap)
            }
            Compression::Zstd => zstd::stream::encode_all(data, 0).map_err(wrap),
        }
    }
}

/// Strip a recognised compression suffix: `face.xml.gz` -> `face.xml`.
fn inner_name(name: &str) -> &str {
    match Compression::from_name(name) {
        Compression::None => name,
        _ => name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name),
    }
}

fn looks_like_markup(name: &str, data: &[u8]) -> bool {
    if inner_name(name).to_ascii_lowercase().ends_with(".xml") {
        return true;
    }
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'<')
}

impl Cascade {
    /// Parse the compact JSON form.
    pub fn from_json_slice(data: &[u8]) -> Result<Cascade, CascadeError> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn from_json_str(data: &str) -> Result<Cascade, CascadeError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String, CascadeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CascadeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a cascade blob. `name` is a file-name hint whose suffixes pick
    /// the compression and the markup/compact form.
    pub fn try_from_bytes(data: &[u8], name: &str) -> Result<Cascade, CascadeError> {
        let compression = Compression::from_name(name);
        let raw = compression.decompress(data)?;
        if looks_like_markup(name, &raw) {
            let text = std::str::from_utf8(&raw)
                .map_err(|e| CascadeError::structure(format!("markup is not UTF-8: {e}")))?;
            xml::parse(text)
        } else {
            Cascade::from_json_slice(&raw)
        }
    }

    /// Best-effort variant of [`Cascade::try_from_bytes`]; failures yield the
    /// null cascade.
    pub fn from_bytes(data: &[u8], name: &str) -> Cascade {
        Cascade::try_from_bytes(data, name).unwrap_or_else(|err| {
            warn!("cascade {name} unusable, detection disabled: {err}");
            Cascade::null()
        })
    }

    /// Read and decode a cascade file (markup or compact, optionally compressed).
    pub fn try_load(path: &Path) -> Result<Cascade, CascadeError> {
        let data = fs::read(path).map_err(|source| CascadeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let cascade = Cascade::try_from_bytes(&data, name)?;
        debug!(
            "loaded cascade {} size={}x{} stages={} features={}",
            path.display(),
            cascade.size_x(),
            cascade.size_y(),
            cascade.stage_count(),
            cascade.feature_count()
        );
        Ok(cascade)
    }

    /// Best-effort load; any failure yields the null cascade.
    pub fn load(path: &Path) -> Cascade {
        Cascade::try_load(path).unwrap_or_else(|err| {
            warn!("{err}; falling back to the null cascade");
            Cascade::null()
        })
    }

    /// Write the compact form to `path`, compressed according to its suffix.
    pub fn save(&self, path: &Path) -> Result<(), CascadeError> {
        let json = self.to_json()?;
        let bytes = Compression::from_path(path).compress(json.as_bytes())?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CascadeError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, bytes).map_err(|source| CascadeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::tests::tiny_cascade;

    #[test]
    fn compression_follows_last_suffix() {
        assert_eq!(Compression::from_name("face.json.gz"), Compression::Gzip);
        assert_eq!(Compression::from_name("face.BZ2"), Compression::Bzip2);
        assert_eq!(Compression::from_name("face.dat.zst"), Compression::Zstd);
        assert_eq!(Compression::from_name("face.json"), Compression::None);
        assert_eq!(Compression::from_name("face"), Compression::None);
    }

    #[test]
    fn each_compression_roundtrips_bytes() {
        let payload = tiny_cascade().to_json().unwrap();
        for c in [
            Compression::None,
            Compression::Gzip,
            Compression::Bzip2,
            Compression::Zstd,
        ] {
            let packed = c.compress(payload.as_bytes()).unwrap();
            let unpacked = c.decompress(&packed).unwrap();
            assert_eq!(unpacked, payload.as_bytes(), "format {:?}", c);
        }
    }

    #[test]
    fn compressed_blob_is_decoded_by_name_hint() {
        let cascade = tiny_cascade();
        let packed = Compression::Zstd
            .compress(cascade.to_json().unwrap().as_bytes())
            .unwrap();
        let back = Cascade::try_from_bytes(&packed, "frontal.json.zst").unwrap();
        assert_eq!(back, cascade);
    }

    #[test]
    fn corrupt_input_degrades_to_null() {
        let garbage = b"\x1f\x8b\x08not really gzip";
        assert!(Cascade::try_from_bytes(garbage, "x.gz").is_err());
        assert_eq!(Cascade::from_bytes(garbage, "x.gz"), Cascade::null());
        assert_eq!(Cascade::from_bytes(b"{\"sizeX\": 3", "x.json"), Cascade::null());
    }

    #[test]
    fn missing_file_loads_null() {
        let c = Cascade::load(Path::new("/definitely/not/here/cascade.json"));
        assert!(!c.is_valid());
    }

    #[test]
    fn markup_is_sniffed_without_suffix() {
        let text = r#"<opencv_storage><c><size>20 20</size><stages></stages></c></opencv_storage>"#;
        let c = Cascade::try_from_bytes(text.as_bytes(), "cascade").unwrap();
        assert_eq!(c.size(), [20, 20]);
        assert_eq!(c.stage_count(), 0);
    }
}
