//! Haar cascade data model.
//!
//! A [`Cascade`] is an ordered list of boosted [`Stage`]s trained at a fixed
//! window size (`size_x × size_y`). Each stage sums the binary contributions
//! of its [`Feature`]s and passes a window when that sum exceeds the stage
//! threshold. A feature is a weighted combination of two or three [`Rect`]s.
//!
//! All types are immutable once built; the only way to change a cascade is to
//! construct a new one, typically through [`codec`] or [`xml`].
//!
//! Rect geometry
//! - `x1`/`x2` are the x/y offsets of the rectangle inside the training window
//!   and `y1`/`y2` are its width/height. The names follow the compact
//!   serialised form `[x1, x2, y1, y2, weight]`, which in turn mirrors the
//!   `x y w h weight` text of the markup form. The scanner therefore spans
//!   `x1 .. x1 + y1` horizontally and `x2 .. x2 + y2` vertically.
//!
//! The default value is the *null cascade* (`0 × 0`, no stages). It is a
//! valid value meaning "detect nothing" and is what every lossy loader
//! returns on failure.

pub mod codec;
pub mod error;
pub mod xml;

pub use codec::Compression;
pub use error::CascadeError;

use serde::{Deserialize, Serialize};

/// Weighted rectangle of a Haar feature, in training-window units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectRepr", into = "RectRepr")]
pub struct Rect {
    x1: i32,
    x2: i32,
    y1: i32,
    y2: i32,
    weight: f64,
}

/// Compact on-disk encoding `[x1, x2, y1, y2, weight]`.
#[derive(Serialize, Deserialize)]
struct RectRepr(i32, i32, i32, i32, f64);

impl From<RectRepr> for Rect {
    fn from(r: RectRepr) -> Self {
        Rect::new(r.0, r.1, r.2, r.3, r.4)
    }
}

impl From<Rect> for RectRepr {
    fn from(r: Rect) -> Self {
        RectRepr(r.x1, r.x2, r.y1, r.y2, r.weight)
    }
}

impl Rect {
    pub const fn new(x1: i32, x2: i32, y1: i32, y2: i32, weight: f64) -> Self {
        Self {
            x1,
            x2,
            y1,
            y2,
            weight,
        }
    }

    /// Horizontal offset inside the training window.
    #[inline]
    pub fn x1(&self) -> i32 {
        self.x1
    }
    /// Vertical offset inside the training window.
    #[inline]
    pub fn x2(&self) -> i32 {
        self.x2
    }
    /// Horizontal extent.
    #[inline]
    pub fn y1(&self) -> i32 {
        self.y1
    }
    /// Vertical extent.
    #[inline]
    pub fn y2(&self) -> i32 {
        self.y2
    }
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Decision stump over a weighted rectangle combination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    threshold: f64,
    #[serde(rename = "left")]
    left_val: f64,
    #[serde(rename = "right")]
    right_val: f64,
    size: [i32; 2],
    rects: Vec<Rect>,
}

impl Feature {
    /// `size` is the cascade training window, copied into every feature.
    pub fn new(
        threshold: f64,
        left_val: f64,
        right_val: f64,
        size: [i32; 2],
        rects: Vec<Rect>,
    ) -> Self {
        Self {
            threshold,
            left_val,
            right_val,
            size,
            rects,
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
    /// Contribution when the normalised response is below threshold.
    #[inline]
    pub fn left_val(&self) -> f64 {
        self.left_val
    }
    /// Contribution otherwise.
    #[inline]
    pub fn right_val(&self) -> f64 {
        self.right_val
    }
    #[inline]
    pub fn size(&self) -> [i32; 2] {
        self.size
    }
    #[inline]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }
}

/// One boosted rejection stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    threshold: f64,
    features: Vec<Feature>,
}

impl Stage {
    pub fn new(threshold: f64, features: Vec<Feature>) -> Self {
        Self {
            threshold,
            features,
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

/// Trained Haar cascade.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cascade {
    #[serde(rename = "sizeX")]
    size_x: i32,
    #[serde(rename = "sizeY")]
    size_y: i32,
    stages: Vec<Stage>,
}

impl Cascade {
    pub fn new(size_x: i32, size_y: i32, stages: Vec<Stage>) -> Self {
        Self {
            size_x,
            size_y,
            stages,
        }
    }

    /// The "detect nothing" cascade.
    pub fn null() -> Self {
        Self::default()
    }

    /// `true` when the training window has a positive area.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.size_x > 0 && self.size_y > 0
    }

    #[inline]
    pub fn size_x(&self) -> i32 {
        self.size_x
    }
    #[inline]
    pub fn size_y(&self) -> i32 {
        self.size_y
    }
    #[inline]
    pub fn size(&self) -> [i32; 2] {
        [self.size_x, self.size_y]
    }
    #[inline]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Total number of features across all stages.
    pub fn feature_count(&self) -> usize {
        self.stages.iter().map(|s| s.features.len()).sum()
    }
}
