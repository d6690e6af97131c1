//! Backend selection for pixel sources.
//!
//! Each backend is a plain constructor; selection walks an ordered list of
//! supported kinds and keeps the first one that loads the image. Backends are
//! compiled in through the `raster` and `wide` cargo features and
//! [`AdapterKind::is_supported`] reflects what this build carries.
use super::io::{decode_bytes, Decoded};
#[cfg(feature = "raster")]
use super::raster::RasterAdapter;
use super::traits::PixelSource;
#[cfg(feature = "wide")]
use super::wide::WideAdapter;
use image::DynamicImage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Failure to produce a pixel source.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Failed to read {what}: {source}")]
    Io {
        what: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("{0:?} pixel backend is not available in this build")]
    Unsupported(AdapterKind),
    #[error("Image has no pixels")]
    EmptyImage,
}

/// Available decoding backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// 8-bit true-colour raster.
    Raster,
    /// 16-bit wide-format raster with ICC profile capture.
    Wide,
}

impl AdapterKind {
    /// Automatic selection order.
    pub const ALL: [AdapterKind; 2] = [AdapterKind::Raster, AdapterKind::Wide];

    pub fn is_supported(self) -> bool {
        match self {
            AdapterKind::Raster => cfg!(feature = "raster"),
            AdapterKind::Wide => cfg!(feature = "wide"),
        }
    }

    fn ensure_supported(self) -> Result<(), AdapterError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(AdapterError::Unsupported(self))
        }
    }

    /// Decode `path` with this backend.
    pub fn open_path(self, path: &Path) -> Result<Box<dyn PixelSource>, AdapterError> {
        match self {
            #[cfg(feature = "raster")]
            AdapterKind::Raster => Ok(Box::new(RasterAdapter::open(path)?)),
            #[cfg(feature = "wide")]
            AdapterKind::Wide => Ok(Box::new(WideAdapter::open(path)?)),
            #[allow(unreachable_patterns)]
            unsupported => Err(AdapterError::Unsupported(unsupported)),
        }
    }

    /// Decode an encoded in-memory image with this backend.
    pub fn open_bytes(self, data: &[u8]) -> Result<Box<dyn PixelSource>, AdapterError> {
        self.ensure_supported()?;
        self.adopt(decode_bytes(data)?)
    }

    fn adopt(self, decoded: Decoded) -> Result<Box<dyn PixelSource>, AdapterError> {
        match self {
            #[cfg(feature = "raster")]
            AdapterKind::Raster => Ok(Box::new(RasterAdapter::from_dynamic_owned(decoded.image))),
            #[cfg(feature = "wide")]
            AdapterKind::Wide => Ok(Box::new(WideAdapter::from_decoded(decoded))),
            #[allow(unreachable_patterns)]
            unsupported => Err(AdapterError::Unsupported(unsupported)),
        }
    }

    /// View an already decoded image. The caller keeps ownership; pixel
    /// buffers are only copied when the layout differs from the backend's.
    pub fn wrap<'a>(
        self,
        image: &'a DynamicImage,
    ) -> Result<Box<dyn PixelSource + 'a>, AdapterError> {
        self.ensure_supported()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(AdapterError::EmptyImage);
        }
        match self {
            #[cfg(feature = "raster")]
            AdapterKind::Raster => Ok(Box::new(RasterAdapter::from_dynamic(image))),
            #[cfg(feature = "wide")]
            AdapterKind::Wide => Ok(Box::new(WideAdapter::from_dynamic(image))),
            #[allow(unreachable_patterns)]
            unsupported => Err(AdapterError::Unsupported(unsupported)),
        }
    }
}

/// Caller's backend choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterPreference {
    /// First supported backend in [`AdapterKind::ALL`] order.
    #[default]
    Auto,
    Raster,
    Wide,
}

impl AdapterPreference {
    /// Backends to try, in order.
    pub fn candidates(self) -> Vec<AdapterKind> {
        match self {
            AdapterPreference::Auto => AdapterKind::ALL
                .into_iter()
                .filter(|k| k.is_supported())
                .collect(),
            AdapterPreference::Raster => vec![AdapterKind::Raster],
            AdapterPreference::Wide => vec![AdapterKind::Wide],
        }
    }
}

fn first_success<'a, F>(
    preference: AdapterPreference,
    mut open: F,
) -> Result<Box<dyn PixelSource + 'a>, AdapterError>
where
    F: FnMut(AdapterKind) -> Result<Box<dyn PixelSource + 'a>, AdapterError>,
{
    let mut last_err = None;
    for kind in preference.candidates() {
        match open(kind) {
            Ok(source) => return Ok(source),
            Err(err) => {
                debug!("{kind:?} backend failed: {err}");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or(AdapterError::Unsupported(AdapterKind::Raster)))
}

/// Open `path` with the preferred backend(s).
pub fn open_path(
    path: &Path,
    preference: AdapterPreference,
) -> Result<Box<dyn PixelSource>, AdapterError> {
    first_success(preference, |kind| kind.open_path(path))
}

/// Open encoded bytes with the preferred backend(s).
pub fn open_bytes(
    data: &[u8],
    preference: AdapterPreference,
) -> Result<Box<dyn PixelSource>, AdapterError> {
    first_success(preference, |kind| kind.open_bytes(data))
}

/// Borrow a decoded image through the preferred backend(s).
pub fn wrap(
    image: &DynamicImage,
    preference: AdapterPreference,
) -> Result<Box<dyn PixelSource + '_>, AdapterError> {
    first_success(preference, |kind| kind.wrap(image))
}
