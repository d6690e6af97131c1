use crate::detector::scan::{ScaleStep, ScanObserver};
use serde::Serialize;

/// Window counts for one scale.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSummary {
    pub scale: f64,
    pub window: usize,
    pub step: usize,
    pub windows: usize,
    pub accepted: usize,
}

/// Scan statistics gathered through [`ScanObserver`].
///
/// `rejections_per_stage[k]` counts windows dropped at stage `k`; the
/// histogram grows as deeper stages are reached.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub scales: Vec<ScaleSummary>,
    pub windows: usize,
    pub accepted: usize,
    pub stage_evaluations: usize,
    pub rejections_per_stage: Vec<usize>,
}

impl ScanStats {
    pub fn rejected(&self) -> usize {
        self.windows - self.accepted
    }
}

impl ScanObserver for ScanStats {
    fn scale_started(&mut self, step: &ScaleStep) {
        self.scales.push(ScaleSummary {
            scale: step.scale,
            window: step.window,
            step: step.step,
            windows: 0,
            accepted: 0,
        });
    }

    fn stage_evaluated(&mut self, stage: usize, _sum: f64, passed: bool) {
        self.stage_evaluations += 1;
        if !passed {
            if self.rejections_per_stage.len() <= stage {
                self.rejections_per_stage.resize(stage + 1, 0);
            }
            self.rejections_per_stage[stage] += 1;
        }
    }

    fn window_finished(&mut self, _x: usize, _y: usize, accepted: bool) {
        self.windows += 1;
        if accepted {
            self.accepted += 1;
        }
        if let Some(current) = self.scales.last_mut() {
            current.windows += 1;
            if accepted {
                current.accepted += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_tracks_rejecting_stage() {
        let mut stats = ScanStats::default();
        stats.scale_started(&ScaleStep {
            scale: 2.0,
            window: 48,
            step: 5,
        });
        stats.stage_evaluated(0, -1.0, false);
        stats.window_finished(0, 0, false);
        stats.stage_evaluated(0, 1.0, true);
        stats.stage_evaluated(1, 0.0, false);
        stats.window_finished(5, 0, false);
        stats.stage_evaluated(0, 1.0, true);
        stats.stage_evaluated(1, 1.0, true);
        stats.window_finished(10, 0, true);

        assert_eq!(stats.windows, 3);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected(), 2);
        assert_eq!(stats.stage_evaluations, 5);
        assert_eq!(stats.rejections_per_stage, vec![1, 1]);
        assert_eq!(stats.scales[0].windows, 3);
        assert_eq!(stats.scales[0].accepted, 1);
    }
}
