//! Multi-scale sliding-window cascade evaluation.
//!
//! Overview
//! - Scales start at `start_scale` and grow by `scale_factor` while they stay
//!   below `min(width / size_x, height / size_y)`.
//! - Each scale scans square windows of `round(scale * base_window)` pixels,
//!   stepped by `round(window * step_ratio)` (at least one pixel), with
//!   origins in `[0, width - window) × [0, height - window)`. Columns are the
//!   outer loop: all rows of `x = 0` come before `x = step`. Merging depends
//!   on this order.
//! - A window runs the stages in order and is dropped at the first stage
//!   whose feature sum does not exceed the stage threshold. Later stages are
//!   never evaluated for that window.
//!
//! Candidates are reported in working-image coordinates; the pipeline maps
//! them back to the original image.
use super::integral::IntegralImage;
use super::params::DetectorParams;
use crate::cascade::{Cascade, Feature, Stage};
use crate::types::Candidate;
use log::debug;

/// Hook into the scan loop.
///
/// Every method has an empty default so observers implement only what they
/// need. `()` is the no-op observer.
pub trait ScanObserver {
    fn scale_started(&mut self, _step: &ScaleStep) {}

    /// Called once per evaluated stage, before the window is accepted or
    /// rejected.
    fn stage_evaluated(&mut self, _stage: usize, _sum: f64, _passed: bool) {}

    fn window_finished(&mut self, _x: usize, _y: usize, _accepted: bool) {}
}

impl ScanObserver for () {}

/// One scale of the scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleStep {
    pub scale: f64,
    /// Window edge in pixels.
    pub window: usize,
    /// Distance between neighbouring window origins.
    pub step: usize,
}

/// Scales visited for an image of `width × height`.
pub fn scale_steps(
    cascade: &Cascade,
    params: &DetectorParams,
    width: usize,
    height: usize,
) -> Vec<ScaleStep> {
    let mut steps = Vec::new();
    if !cascade.is_valid() || !params.scan_is_well_formed() {
        return steps;
    }
    let max_scale =
        (width as f64 / cascade.size_x() as f64).min(height as f64 / cascade.size_y() as f64);
    let mut scale = params.start_scale;
    while scale < max_scale {
        let window = (scale * params.base_window as f64).round() as usize;
        let step = ((window as f64 * params.step_ratio).round() as usize).max(1);
        steps.push(ScaleStep {
            scale,
            window,
            step,
        });
        scale *= params.scale_factor;
    }
    steps
}

/// Contribution of one feature for the window at `(x, y)` and `scale`.
///
/// The rectangle sum is normalised by the window area and compared against
/// `threshold * norm`, where `norm` is the luma standard deviation over the
/// feature window (or `1` on flat regions).
pub fn feature_value(feature: &Feature, ii: &IntegralImage, x: i64, y: i64, scale: f64) -> f64 {
    let [size_x, size_y] = feature.size();
    let w = (scale * size_x as f64).round() as i64;
    let h = (scale * size_y as f64).round() as i64;
    let area = (w * h).max(1) as f64;
    let inv_area = 1.0 / area;

    let total_x = ii.rect_sum(x, y, x + w, y + h);
    let total_x2 = ii.rect_square_sum(x, y, x + w, y + h);
    let mean = total_x * inv_area;
    let variance = total_x2 * inv_area - mean * mean;
    let norm = if variance > 1.0 { variance.sqrt() } else { 1.0 };

    let mut rect_sum = 0.0;
    for r in feature.rects() {
        let x0 = x + (scale * r.x1() as f64) as i64;
        let x1 = x + (scale * (r.x1() + r.y1()) as f64) as i64;
        let y0 = y + (scale * r.x2() as f64) as i64;
        let y1 = y + (scale * (r.x2() + r.y2()) as f64) as i64;
        rect_sum += (ii.rect_sum(x0, y0, x1, y1) * r.weight()).round();
    }

    if rect_sum * inv_area < feature.threshold() * norm {
        feature.left_val()
    } else {
        feature.right_val()
    }
}

/// Sum of all feature contributions of `stage`.
pub fn stage_sum(stage: &Stage, ii: &IntegralImage, x: i64, y: i64, scale: f64) -> f64 {
    stage
        .features()
        .iter()
        .map(|f| feature_value(f, ii, x, y, scale))
        .sum()
}

/// Cascade evaluator bound to one integral image.
pub struct Scanner<'a> {
    cascade: &'a Cascade,
    integral: &'a IntegralImage,
    params: &'a DetectorParams,
}

impl<'a> Scanner<'a> {
    pub fn new(cascade: &'a Cascade, integral: &'a IntegralImage, params: &'a DetectorParams) -> Self {
        Self {
            cascade,
            integral,
            params,
        }
    }

    pub fn scale_steps(&self) -> Vec<ScaleStep> {
        scale_steps(
            self.cascade,
            self.params,
            self.integral.width(),
            self.integral.height(),
        )
    }

    /// Run every stage on one window, stopping at the first rejection.
    pub fn accepts<O: ScanObserver + ?Sized>(
        &self,
        x: usize,
        y: usize,
        scale: f64,
        observer: &mut O,
    ) -> bool {
        for (k, stage) in self.cascade.stages().iter().enumerate() {
            let sum = stage_sum(stage, self.integral, x as i64, y as i64, scale);
            let passed = sum > stage.threshold();
            observer.stage_evaluated(k, sum, passed);
            if !passed {
                observer.window_finished(x, y, false);
                return false;
            }
        }
        observer.window_finished(x, y, true);
        true
    }

    /// Raw candidates across all scales.
    pub fn run<O: ScanObserver + ?Sized>(&self, observer: &mut O) -> Vec<Candidate> {
        let (width, height) = (self.integral.width(), self.integral.height());
        let mut candidates = Vec::new();
        for step in self.scale_steps() {
            observer.scale_started(&step);
            let before = candidates.len();
            let x_end = width.saturating_sub(step.window);
            let y_end = height.saturating_sub(step.window);
            for x in (0..x_end).step_by(step.step) {
                for y in (0..y_end).step_by(step.step) {
                    if self.accepts(x, y, step.scale, observer) {
                        let size = step.window as f64;
                        candidates.push(Candidate::new(x as f64, y as f64, size, size));
                    }
                }
            }
            debug!(
                "scale {:.4}: window={} step={} accepted={}",
                step.scale,
                step.window,
                step.step,
                candidates.len() - before
            );
        }
        candidates
    }
}

#[cfg(all(test, feature = "raster"))]
pub(crate) mod tests {
    use super::*;
    use crate::cascade::tests::tiny_cascade;
    use crate::cascade::Rect;
    use crate::image::RasterAdapter;
    use image::{Rgba, RgbaImage};

    pub(crate) fn checkerboard(size: u32, cell: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let v = if ((x / cell) + (y / cell)) % 2 == 0 { 255 } else { 0 };
            Rgba([v, v, v, 255])
        })
    }

    fn integral_of(img: &RgbaImage) -> IntegralImage {
        IntegralImage::from_source(&RasterAdapter::from_rgba(img))
    }

    /// Two stages that together accept only the window at (5, 5) of a
    /// 64×64 checkerboard with 8-pixel cells.
    pub(crate) fn corner_cascade() -> Cascade {
        let size = [31, 31];
        let diff = |other: Rect| {
            Feature::new(0.001, 0.0, 1.0, size, vec![Rect::new(0, 0, 1, 1, 1.0), other])
        };
        Cascade::new(
            31,
            31,
            vec![
                Stage::new(0.5, vec![diff(Rect::new(1, 0, 1, 1, -1.0))]),
                Stage::new(0.5, vec![diff(Rect::new(0, 1, 1, 1, -1.0))]),
            ],
        )
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Stage(usize, bool),
        Window(bool),
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl ScanObserver for Recorder {
        fn stage_evaluated(&mut self, stage: usize, _sum: f64, passed: bool) {
            self.0.push(Event::Stage(stage, passed));
        }
        fn window_finished(&mut self, _x: usize, _y: usize, accepted: bool) {
            self.0.push(Event::Window(accepted));
        }
    }

    #[test]
    fn scale_schedule_for_default_params() {
        let steps = scale_steps(&tiny_cascade(), &DetectorParams::default(), 64, 64);
        assert_eq!(
            steps,
            vec![
                ScaleStep {
                    scale: 2.0,
                    window: 48,
                    step: 5
                },
                ScaleStep {
                    scale: 2.5,
                    window: 60,
                    step: 6
                },
            ]
        );
    }

    #[test]
    fn null_cascade_has_no_scales() {
        assert!(scale_steps(&Cascade::null(), &DetectorParams::default(), 500, 500).is_empty());
    }

    #[test]
    fn flat_region_uses_unit_norm() {
        let img = RgbaImage::from_pixel(40, 40, Rgba([100, 100, 100, 255]));
        let ii = integral_of(&img);
        // 1×1 training rect at scale 2 covers four pixels: 400 * 0.5 = 200.
        let f = Feature::new(0.2, -1.0, 1.0, [10, 10], vec![Rect::new(0, 0, 1, 1, 0.5)]);
        // 200 / 400 = 0.5 against 0.2 * 1.
        assert_eq!(feature_value(&f, &ii, 3, 3, 2.0), 1.0);
        let f = Feature::new(0.6, -1.0, 1.0, [10, 10], vec![Rect::new(0, 0, 1, 1, 0.5)]);
        assert_eq!(feature_value(&f, &ii, 3, 3, 2.0), -1.0);
    }

    #[test]
    fn rejected_windows_skip_later_stages() {
        // Bright vertical bar at columns 20..40.
        let img = RgbaImage::from_fn(64, 64, |x, _| {
            let v = if (20..40).contains(&x) { 255 } else { 0 };
            Rgba([v, v, v, 255])
        });
        let ii = integral_of(&img);
        let cascade = tiny_cascade();
        let params = DetectorParams::default();
        let mut rec = Recorder::default();
        Scanner::new(&cascade, &ii, &params).run(&mut rec);

        let events = &rec.0;
        assert!(events.contains(&Event::Stage(0, true)));
        assert!(events.contains(&Event::Stage(0, false)));
        let mut expected_stage = 0;
        for pair in events.windows(2) {
            match pair[0] {
                Event::Stage(k, passed) => {
                    assert_eq!(k, expected_stage);
                    if passed {
                        expected_stage += 1;
                    } else {
                        assert_eq!(pair[1], Event::Window(false));
                    }
                }
                Event::Window(_) => expected_stage = 0,
            }
        }
        let passed_first = events.iter().filter(|e| **e == Event::Stage(0, true)).count();
        let reached_second = events.iter().filter(|e| matches!(e, Event::Stage(1, _))).count();
        assert_eq!(passed_first, reached_second);
    }

    #[test]
    fn checkerboard_yields_one_candidate() {
        let img = checkerboard(64, 8);
        let ii = integral_of(&img);
        let cascade = corner_cascade();
        let params = DetectorParams::default();
        let scanner = Scanner::new(&cascade, &ii, &params);
        assert_eq!(scanner.scale_steps().len(), 1);
        let candidates = scanner.run(&mut ());
        assert_eq!(candidates, vec![Candidate::new(5.0, 5.0, 48.0, 48.0)]);
    }

    #[test]
    fn windows_are_emitted_column_by_column() {
        let img = checkerboard(60, 6);
        let ii = integral_of(&img);
        let pass_all = Cascade::new(
            24,
            24,
            vec![Stage::new(
                -1.0,
                vec![Feature::new(0.0, 0.0, 0.0, [24, 24], vec![Rect::new(0, 0, 24, 24, 1.0)])],
            )],
        );
        let params = DetectorParams::default();
        let origins: Vec<(f64, f64)> = Scanner::new(&pass_all, &ii, &params)
            .run(&mut ())
            .iter()
            .map(|c| (c.x, c.y))
            .collect();
        assert_eq!(
            origins,
            vec![
                (0.0, 0.0),
                (0.0, 5.0),
                (0.0, 10.0),
                (5.0, 0.0),
                (5.0, 5.0),
                (5.0, 10.0),
                (10.0, 0.0),
                (10.0, 5.0),
                (10.0, 10.0),
            ]
        );
    }

    #[test]
    fn repeated_scans_are_identical() {
        let img = checkerboard(96, 6);
        let ii = integral_of(&img);
        let cascade = tiny_cascade();
        let params = DetectorParams::default();
        let a = Scanner::new(&cascade, &ii, &params).run(&mut ());
        let b = Scanner::new(&cascade, &ii, &params).run(&mut ());
        assert_eq!(a, b);
    }
}
