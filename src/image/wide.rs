//! 16-bit wide-format pixel source.
//!
//! Keeps sixteen bits per channel through decoding and resampling so that
//! high-bit-depth sources (16-bit PNG/TIFF) are only quantised at the point
//! the detector reads a pixel. The embedded ICC profile, when the decoder
//! reports one, is retained for callers that colour-manage.
use super::adapter::{AdapterError, AdapterKind};
use super::io::{decode_path, Decoded};
use super::scaling::SizeCap;
use super::traits::{PixelColor, PixelSource};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Rgba};
use std::borrow::Cow;
use std::path::Path;

pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

#[inline]
fn to_u8(v: u16) -> u8 {
    ((v as u32 + 128) / 257) as u8
}

pub struct WideAdapter<'a> {
    image: Cow<'a, Rgba16Image>,
    icc_profile: Option<Vec<u8>>,
    scaling_factor: f64,
}

impl<'a> WideAdapter<'a> {
    /// Borrow a caller-owned 16-bit buffer.
    pub fn from_rgba16(image: &'a Rgba16Image) -> Self {
        Self {
            image: Cow::Borrowed(image),
            icc_profile: None,
            scaling_factor: 1.0,
        }
    }

    /// Borrow a decoded image, widening only when it is not RGBA16 already.
    pub fn from_dynamic(image: &'a DynamicImage) -> Self {
        let image = match image.as_rgba16() {
            Some(buffer) => Cow::Borrowed(buffer),
            None => Cow::Owned(image.to_rgba16()),
        };
        Self {
            image,
            icc_profile: None,
            scaling_factor: 1.0,
        }
    }

    /// Replace the current image with the file at `path`.
    pub fn load_path(&mut self, path: &Path) -> Result<(), AdapterError> {
        let Decoded { image, icc_profile } = decode_path(path)?;
        self.image = Cow::Owned(image.into_rgba16());
        self.icc_profile = icc_profile;
        self.scaling_factor = 1.0;
        Ok(())
    }

    /// ICC profile embedded in the decoded file, if any.
    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.icc_profile.as_deref()
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.image, Cow::Borrowed(_))
    }
}

impl WideAdapter<'static> {
    pub fn from_decoded(decoded: Decoded) -> Self {
        Self {
            image: Cow::Owned(decoded.image.into_rgba16()),
            icc_profile: decoded.icc_profile,
            scaling_factor: 1.0,
        }
    }

    /// Decode an image file, keeping its ICC profile.
    pub fn open(path: &Path) -> Result<Self, AdapterError> {
        Ok(Self::from_decoded(decode_path(path)?))
    }
}

impl PixelSource for WideAdapter<'_> {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Wide
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
        PixelColor::new(to_u8(r), to_u8(g), to_u8(b), PixelColor::alpha127(to_u8(a)))
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
