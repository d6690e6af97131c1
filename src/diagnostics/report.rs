use super::scan::ScanStats;
use super::timing::TimingBreakdown;
use crate::image::AdapterKind;
use crate::types::Detection;
use serde::Serialize;

/// Image dimensions before and after the size cap.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<AdapterKind>,
    pub original_width: usize,
    pub original_height: usize,
    pub working_width: usize,
    pub working_height: usize,
    /// Original / working; `1.0` when the image was not resampled.
    pub scaling_factor: f64,
}

/// Result of [`ObjectDetector::detect_with_diagnostics`](crate::ObjectDetector::detect_with_diagnostics).
///
/// `error` is set when the image or cascade could not be used; the detection
/// list is empty in that case.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub input: InputDescriptor,
    pub stage_count: usize,
    pub raw_candidates: usize,
    pub stats: ScanStats,
    pub detections: Vec<Detection>,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionReport {
    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
