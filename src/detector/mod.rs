//! Viola–Jones cascade detector.
//!
//! Overview
//! - The pixel source is capped to a pixel budget once (see
//!   [`SizeCap`](crate::image::SizeCap)) and converted to two summed-area
//!   tables of integer-ratio luma and squared luma.
//! - The scanner slides square windows over a geometric scale ladder and runs
//!   the cascade stages in order, stopping at the first rejecting stage.
//! - Accepted windows are clustered with a near-duplicate test and averaged;
//!   clusters below `min_neighbours` members are dropped.
//! - Candidates are mapped back to original-image coordinates before
//!   merging when the image was downscaled.
//!
//! Modules
//! - [`params`] – scan and merge parameters.
//! - [`integral`] – summed-area tables.
//! - [`scan`] – scale ladder, feature/stage evaluation, [`ScanObserver`].
//! - [`merge`] – clustering and averaging.
//! - `pipeline` – the [`ObjectDetector`] facade.

pub mod integral;
pub mod merge;
pub mod params;
mod pipeline;
pub mod scan;

pub use integral::IntegralImage;
pub use merge::merge;
pub use params::{DetectorParams, MIN_NEIGHBOURS_RANGE};
pub use pipeline::ObjectDetector;
pub use scan::{ScaleStep, ScanObserver, Scanner};

use crate::cascade::Cascade;
use crate::diagnostics::TimingBreakdown;
use crate::image::PixelSource;
use crate::types::Detection;
use std::time::Instant;

/// One-shot detection with default parameters and the given neighbour
/// threshold (clamped to [`MIN_NEIGHBOURS_RANGE`]).
pub fn detect<S: PixelSource + ?Sized>(
    cascade: &Cascade,
    source: &mut S,
    min_neighbours: u32,
) -> Vec<Detection> {
    if !cascade.is_valid() {
        return Vec::new();
    }
    let params = DetectorParams::default().with_min_neighbours(min_neighbours);
    let mut timings = TimingBreakdown::default();
    pipeline::guarded(|| {
        pipeline::scan_source(cascade, &params, source, &mut (), &mut timings, Instant::now())
    })
    .map(|out| merge(&out.candidates, params.effective_min_neighbours()))
    .unwrap_or_default()
}
