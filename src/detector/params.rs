//! Parameter types configuring the detector.
//!
//! Defaults reproduce the reference scan exactly: scales start at 2.0 and
//! grow by 1.25, windows are `round(scale * 24)` pixels with a step of 10% of
//! the window, images above 768×768 are capped to a 386-pixel larger side,
//! and merged boxes need at least two supporting windows.

use crate::image::{AdapterPreference, SizeCap};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Allowed range for [`DetectorParams::min_neighbours`] on the public API.
pub const MIN_NEIGHBOURS_RANGE: RangeInclusive<u32> = 2..=10;

/// Detector-wide parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Windows a merged box needs; clamped to [`MIN_NEIGHBOURS_RANGE`].
    pub min_neighbours: u32,
    /// First scale scanned.
    pub start_scale: f64,
    /// Multiplicative step between scales (> 1).
    pub scale_factor: f64,
    /// Canonical training patch edge used to size windows.
    pub base_window: u32,
    /// Window step as a fraction of the window size.
    pub step_ratio: f64,
    /// Resolution cap applied before scanning.
    pub size_cap: SizeCap,
    /// Backend used when the detector opens images itself.
    pub adapter: AdapterPreference,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_neighbours: 2,
            start_scale: 2.0,
            scale_factor: 1.25,
            base_window: 24,
            step_ratio: 0.1,
            size_cap: SizeCap::default(),
            adapter: AdapterPreference::Auto,
        }
    }
}

impl DetectorParams {
    pub fn with_min_neighbours(mut self, min_neighbours: u32) -> Self {
        self.min_neighbours = min_neighbours;
        self
    }

    pub fn with_size_cap(mut self, size_cap: SizeCap) -> Self {
        self.size_cap = size_cap;
        self
    }

    pub fn with_adapter(mut self, adapter: AdapterPreference) -> Self {
        self.adapter = adapter;
        self
    }

    /// `min_neighbours` forced into [`MIN_NEIGHBOURS_RANGE`].
    pub fn effective_min_neighbours(&self) -> u32 {
        self.min_neighbours
            .clamp(*MIN_NEIGHBOURS_RANGE.start(), *MIN_NEIGHBOURS_RANGE.end())
    }

    /// Guard against configurations that would never terminate or never
    /// advance the window.
    pub(crate) fn scan_is_well_formed(&self) -> bool {
        self.scale_factor.is_finite()
            && self.scale_factor > 1.0
            && self.start_scale.is_finite()
            && self.start_scale > 0.0
            && self.base_window > 0
            && self.step_ratio.is_finite()
            && self.step_ratio > 0.0
    }
}
