//! 8-bit true-colour pixel source.
use super::adapter::{AdapterError, AdapterKind};
use super::io::decode_path;
use super::scaling::SizeCap;
use super::traits::{PixelColor, PixelSource};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::borrow::Cow;
use std::path::Path;

/// Pixel source over an `RgbaImage`.
///
/// Wraps either a caller-owned buffer (borrowed, never released here) or a
/// buffer the adapter decoded or resampled itself (owned, released on drop or
/// when another image is loaded).
pub struct RasterAdapter<'a> {
    image: Cow<'a, RgbaImage>,
    scaling_factor: f64,
}

impl<'a> RasterAdapter<'a> {
    /// Borrow a caller-owned buffer.
    pub fn from_rgba(image: &'a RgbaImage) -> Self {
        Self {
            image: Cow::Borrowed(image),
            scaling_factor: 1.0,
        }
    }

    /// Borrow a decoded image, converting only when it is not RGBA8 already.
    pub fn from_dynamic(image: &'a DynamicImage) -> Self {
        let image = match image.as_rgba8() {
            Some(buffer) => Cow::Borrowed(buffer),
            None => Cow::Owned(image.to_rgba8()),
        };
        Self {
            image,
            scaling_factor: 1.0,
        }
    }

    /// Replace the current image with the file at `path`.
    pub fn load_path(&mut self, path: &Path) -> Result<(), AdapterError> {
        let decoded = decode_path(path)?;
        self.image = Cow::Owned(decoded.image.into_rgba8());
        self.scaling_factor = 1.0;
        Ok(())
    }

    /// `true` while the pixels belong to the caller.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.image, Cow::Borrowed(_))
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }
}

impl RasterAdapter<'static> {
    pub fn from_rgba_owned(image: RgbaImage) -> Self {
        Self {
            image: Cow::Owned(image),
            scaling_factor: 1.0,
        }
    }

    pub fn from_dynamic_owned(image: DynamicImage) -> Self {
        Self::from_rgba_owned(image.into_rgba8())
    }

    /// Decode an image file.
    pub fn open(path: &Path) -> Result<Self, AdapterError> {
        Ok(Self::from_dynamic_owned(decode_path(path)?.image))
    }
}

impl PixelSource for RasterAdapter<'_> {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Raster
    }

    #[inline]
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    #[inline]
    fn height(&self) -> usize {
        self.image.height() as usize
    }

    #[inline]
    fn color_at(&self, x: usize, y: usize) -> PixelColor {
        let [r, g, b, a] = self.image.get_pixel(x as u32, y as u32).0;
        PixelColor::new(r, g, b, PixelColor::alpha127(a))
    }

    fn fit_to(&mut self, cap: &SizeCap) -> f64 {
        if let Some(plan) = cap.plan(self.image.width(), self.image.height()) {
            let resized = imageops::resize(&*self.image, plan.width, plan.height, FilterType::Triangle);
            self.image = Cow::Owned(resized);
            self.scaling_factor *= plan.factor;
        }
        self.scaling_factor
    }

    fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }
}
