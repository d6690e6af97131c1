//! Pixel sources the detector scans.
//!
//! - [`PixelSource`] is the capability trait: size, per-pixel colour and a
//!   one-time downscale under a [`SizeCap`].
//! - [`RasterAdapter`] (8-bit) and [`WideAdapter`] (16-bit, ICC-aware) are
//!   the two backends; [`adapter`] selects between them. Each backend is
//!   compiled only with its cargo feature (`raster`, `wide`).
pub mod adapter;
pub mod io;
#[cfg(feature = "raster")]
pub mod raster;
pub mod scaling;
pub mod traits;
#[cfg(feature = "wide")]
pub mod wide;

pub use self::adapter::{AdapterError, AdapterKind, AdapterPreference};
#[cfg(feature = "raster")]
pub use self::raster::RasterAdapter;
pub use self::scaling::{ScalePlan, SizeCap};
pub use self::traits::{PixelColor, PixelSource};
#[cfg(feature = "wide")]
pub use self::wide::{Rgba16Image, WideAdapter};
