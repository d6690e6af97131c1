use serde::{Deserialize, Serialize};

/// Final bounding box in source-image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Detection {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Detection {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Window accepted by the cascade, before merging.
///
/// Kept in floating point so the size-cap rescale and the merge average do
/// not round twice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Candidate {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Multiply every field by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// `true` when `self` lies entirely inside `other`.
    pub fn is_inside(&self, other: &Candidate) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.x + self.width <= other.x + other.width
            && self.y + self.height <= other.y + other.height
    }
}

impl From<Detection> for Candidate {
    fn from(d: Detection) -> Self {
        Candidate::new(d.x as f64, d.y as f64, d.width as f64, d.height as f64)
    }
}
