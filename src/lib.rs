#![doc = include_str!("../README.md")]

// Public modules
pub mod cascade;
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod types;

// --- High-level re-exports -------------------------------------------------

// Main entry points: cascade, detector and results.
pub use crate::cascade::{Cascade, CascadeError, Feature, Rect, Stage};
pub use crate::detector::{detect, DetectorParams, ObjectDetector};
pub use crate::types::{Candidate, Detection};

// Diagnostics returned by the detector.
pub use crate::diagnostics::{DetectionReport, ScanStats, TimingBreakdown};

// Pixel sources.
pub use crate::image::{AdapterKind, AdapterPreference, PixelSource, SizeCap};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use haar_detector::prelude::*;
/// use std::path::Path;
///
/// # fn main() {
/// let img = image::RgbaImage::new(640, 480);
/// let detector = ObjectDetector::new(
///     Cascade::load(Path::new("haarcascade_frontalface_default.xml")),
///     DetectorParams::default(),
/// );
/// let faces = detector.detect(&mut RasterAdapter::from_rgba(&img));
/// println!("found {}", faces.len());
/// # }
/// ```
pub mod prelude {
    pub use crate::image::PixelSource;
    #[cfg(feature = "raster")]
    pub use crate::image::RasterAdapter;
    #[cfg(feature = "wide")]
    pub use crate::image::WideAdapter;
    pub use crate::{Cascade, Detection, DetectorParams, ObjectDetector};
}
