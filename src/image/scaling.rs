//! Resolution cap applied before scanning.
//!
//! Scan cost grows with pixel area times the number of windows, so images
//! above a pixel budget are shrunk once so that their larger side becomes
//! `target_max_dim`. The factor `original_max_dim / target_max_dim` is kept
//! so detections can be mapped back to original coordinates.
use serde::{Deserialize, Serialize};

/// Deviation from `1.0` below which a scaling factor is treated as identity.
pub const SCALE_EPS: f64 = 0.001;

/// Pixel-area budget and downscale target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeCap {
    pub enabled: bool,
    /// Largest `width * height` scanned at full resolution (768 × 768).
    pub max_pixels: u64,
    /// Larger side after downscaling.
    pub target_max_dim: u32,
}

impl Default for SizeCap {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pixels: 589_824,
            target_max_dim: 386,
        }
    }
}

/// Resize decision for one image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePlan {
    pub width: u32,
    pub height: u32,
    /// `original_max_dim / target_max_dim`.
    pub factor: f64,
}

impl SizeCap {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Returns the target size when `width × height` exceeds the budget.
    pub fn plan(&self, width: u32, height: u32) -> Option<ScalePlan> {
        if !self.enabled || self.target_max_dim == 0 {
            return None;
        }
        if (width as u64) * (height as u64) <= self.max_pixels {
            return None;
        }
        let max_dim = width.max(height) as u64;
        let target = self.target_max_dim as u64;
        let shrink = |side: u32| ((side as u64 * target / max_dim) as u32).max(1);
        Some(ScalePlan {
            width: shrink(width),
            height: shrink(height),
            factor: max_dim as f64 / target as f64,
        })
    }
}

/// `true` when `factor` is far enough from one to require rescaling.
#[inline]
pub fn needs_rescale(factor: f64) -> bool {
    (factor - 1.0).abs() > SCALE_EPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_images_are_left_alone() {
        let cap = SizeCap::default();
        assert_eq!(cap.plan(768, 768), None);
        assert_eq!(cap.plan(640, 480), None);
    }

    #[test]
    fn large_square_shrinks_to_target() {
        let plan = SizeCap::default().plan(1200, 1200).unwrap();
        assert_eq!((plan.width, plan.height), (386, 386));
        assert!((plan.factor - 1200.0 / 386.0).abs() < 1e-12);
    }

    #[test]
    fn aspect_ratio_is_kept() {
        let plan = SizeCap::default().plan(1930, 965).unwrap();
        assert_eq!(plan.width, 386);
        assert_eq!(plan.height, 193);
        assert!((plan.factor - 5.0).abs() < 1e-12);
    }

    #[test]
    fn disabled_cap_never_plans() {
        assert_eq!(SizeCap::disabled().plan(5000, 5000), None);
    }

    #[test]
    fn rescale_tolerance() {
        assert!(!needs_rescale(1.0));
        assert!(!needs_rescale(1.0005));
        assert!(needs_rescale(1.01));
    }
}
