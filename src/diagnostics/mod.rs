//! Diagnostics returned alongside detections.
//!
//! [`DetectionReport`] is the main entry point: input geometry, the scan
//! histogram gathered by [`ScanStats`] and a per-phase [`TimingBreakdown`].
//! Everything serialises to camelCase JSON for the command-line tools.

pub mod report;
pub mod scan;
pub mod timing;

pub use report::{DetectionReport, InputDescriptor};
pub use scan::{ScaleSummary, ScanStats};
pub use timing::{StageTiming, TimingBreakdown};
