use super::adapter::AdapterKind;
use super::scaling::SizeCap;

/// Colour of one pixel as seen by the detector.
///
/// Channels are 8-bit; `a` uses the 0–127 scale where 0 is opaque and 127 is
/// fully transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PixelColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Map an 8-bit straight alpha (255 = opaque) onto the 0–127 scale.
    #[inline]
    pub fn alpha127(alpha8: u8) -> u8 {
        127 - (alpha8 >> 1)
    }

    /// Integer-ratio luma `(30 R + 59 G + 11 B) / 100`.
    ///
    /// Reference cascades were calibrated against exactly these weights; the
    /// division is not truncated.
    #[inline]
    pub fn luma(&self) -> f64 {
        (30 * self.r as u32 + 59 * self.g as u32 + 11 * self.b as u32) as f64 / 100.0
    }
}

/// Pixel-addressable image the scanner reads from.
///
/// Implemented once per decoding backend. An implementor owns at most one
/// decoded image; borrowed images stay owned by the caller.
pub trait PixelSource {
    /// Backend that produced this source.
    fn kind(&self) -> AdapterKind;

    /// Working width in pixels.
    fn width(&self) -> usize;

    /// Working height in pixels.
    fn height(&self) -> usize;

    /// Colour at `(x, y)`; callers stay within `width × height`.
    fn color_at(&self, x: usize, y: usize) -> PixelColor;

    /// Downscale once when the image exceeds `cap`. Returns the resulting
    /// scaling factor (original / working), `1.0` when nothing changed.
    fn fit_to(&mut self, cap: &SizeCap) -> f64;

    /// Factor mapping working coordinates back to the original image.
    fn scaling_factor(&self) -> f64;

    #[inline]
    fn luma_at(&self, x: usize, y: usize) -> f64 {
        self.color_at(x, y).luma()
    }

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::PixelColor;

    #[test]
    fn luma_uses_integer_ratio_weights() {
        assert_eq!(PixelColor::new(255, 255, 255, 0).luma(), 255.0);
        assert_eq!(PixelColor::new(0, 0, 0, 0).luma(), 0.0);
        assert_eq!(PixelColor::new(1, 0, 0, 0).luma(), 0.3);
        assert_eq!(PixelColor::new(10, 20, 30, 0).luma(), 18.1);
    }

    #[test]
    fn alpha_maps_to_half_scale() {
        assert_eq!(PixelColor::alpha127(255), 0);
        assert_eq!(PixelColor::alpha127(0), 127);
        assert_eq!(PixelColor::alpha127(128), 63);
    }
}
