//! Detection facade over the cascade, pixel sources, scanner and merge.
//!
//! Typical usage:
//! ```no_run
//! use haar_detector::{Cascade, DetectorParams, ObjectDetector};
//! use std::path::Path;
//!
//! let cascade = Cascade::load(Path::new("haarcascade_frontalface_alt.json.gz"));
//! let detector = ObjectDetector::new(cascade, DetectorParams::default());
//! for face in detector.detect_path(Path::new("group.jpg")) {
//!     println!("{} {} {}x{}", face.x, face.y, face.width, face.height);
//! }
//! ```
//!
//! Detection is best-effort: an invalid cascade, an unreadable image or an
//! unsupported backend all produce an empty list, logged at `warn`.
use super::integral::IntegralImage;
use super::merge::merge;
use super::params::DetectorParams;
use super::scan::{ScanObserver, Scanner};
use crate::cascade::Cascade;
use crate::diagnostics::{DetectionReport, InputDescriptor, ScanStats, TimingBreakdown};
use crate::image::adapter;
use crate::image::scaling::needs_rescale;
use crate::image::PixelSource;
use crate::types::{Candidate, Detection};
use image::DynamicImage;
use log::{debug, warn};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

/// Haar-cascade object detector.
///
/// Holds a read-only cascade and parameters; every call builds its own
/// integral tables, so one detector can serve many threads.
#[derive(Clone, Debug)]
pub struct ObjectDetector {
    cascade: Cascade,
    params: DetectorParams,
}

pub(crate) struct ScanOutput {
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) input: InputDescriptor,
}

impl ObjectDetector {
    pub fn new(cascade: Cascade, params: DetectorParams) -> Self {
        if !cascade.is_valid() {
            warn!("detector created with a null cascade; every call returns no detections");
        }
        Self { cascade, params }
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    fn min_neighbours(&self) -> u32 {
        self.params.effective_min_neighbours()
    }

    /// Detections in original-image coordinates.
    pub fn detect<S: PixelSource + ?Sized>(&self, source: &mut S) -> Vec<Detection> {
        if !self.cascade.is_valid() {
            return Vec::new();
        }
        guarded(|| {
            self.scan(source, &mut (), &mut TimingBreakdown::default(), Instant::now())
                .candidates
        })
        .map(|candidates| merge(&candidates, self.min_neighbours()))
        .unwrap_or_default()
    }

    /// Accepted windows before merging, in original-image coordinates.
    pub fn raw_candidates<S: PixelSource + ?Sized>(&self, source: &mut S) -> Vec<Candidate> {
        if !self.cascade.is_valid() {
            return Vec::new();
        }
        guarded(|| {
            self.scan(source, &mut (), &mut TimingBreakdown::default(), Instant::now())
                .candidates
        })
        .unwrap_or_default()
    }

    /// Decode `path` with the configured backend preference and detect.
    pub fn detect_path(&self, path: &Path) -> Vec<Detection> {
        if !self.cascade.is_valid() {
            return Vec::new();
        }
        match adapter::open_path(path, self.params.adapter) {
            Ok(mut source) => self.detect(&mut *source),
            Err(err) => {
                warn!("{}: {err}; no detections", path.display());
                Vec::new()
            }
        }
    }

    /// Decode an encoded in-memory image and detect.
    pub fn detect_bytes(&self, data: &[u8]) -> Vec<Detection> {
        if !self.cascade.is_valid() {
            return Vec::new();
        }
        match adapter::open_bytes(data, self.params.adapter) {
            Ok(mut source) => self.detect(&mut *source),
            Err(err) => {
                warn!("in-memory image: {err}; no detections");
                Vec::new()
            }
        }
    }

    /// Detect on a caller-owned decoded image. The image is only borrowed.
    pub fn detect_image(&self, image: &DynamicImage) -> Vec<Detection> {
        if !self.cascade.is_valid() {
            return Vec::new();
        }
        match adapter::wrap(image, self.params.adapter) {
            Ok(mut source) => self.detect(&mut *source),
            Err(err) => {
                warn!("decoded image: {err}; no detections");
                Vec::new()
            }
        }
    }

    /// Detect on every path in parallel; results keep the input order.
    pub fn detect_batch<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<Vec<Detection>> {
        paths
            .par_iter()
            .map(|p| self.detect_path(p.as_ref()))
            .collect()
    }

    /// Detect and report scan statistics and timings.
    pub fn detect_with_diagnostics<S: PixelSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> DetectionReport {
        let start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let report = self.report(source, start, &mut timings);
        finish(report, start, timings)
    }

    /// [`detect_with_diagnostics`](Self::detect_with_diagnostics) on a file,
    /// including decode time.
    pub fn detect_path_with_diagnostics(&self, path: &Path) -> DetectionReport {
        if !self.cascade.is_valid() {
            return DetectionReport::failed("cascade is not valid");
        }
        let start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let opened = adapter::open_path(path, self.params.adapter);
        let t = timings.lap("load", start);
        let report = match opened {
            Ok(mut source) => self.report(&mut *source, t, &mut timings),
            Err(err) => {
                warn!("{}: {err}; no detections", path.display());
                DetectionReport::failed(err.to_string())
            }
        };
        finish(report, start, timings)
    }

    fn report<S: PixelSource + ?Sized>(
        &self,
        source: &mut S,
        start: Instant,
        timings: &mut TimingBreakdown,
    ) -> DetectionReport {
        if !self.cascade.is_valid() {
            return DetectionReport::failed("cascade is not valid");
        }
        let mut stats = ScanStats::default();
        let Some(ScanOutput { candidates, input }) =
            guarded(|| self.scan(source, &mut stats, timings, start))
        else {
            return DetectionReport::failed("scan aborted");
        };
        let t = Instant::now();
        let detections = merge(&candidates, self.min_neighbours());
        timings.lap("merge", t);
        DetectionReport {
            input,
            stage_count: self.cascade.stage_count(),
            raw_candidates: candidates.len(),
            stats,
            detections,
            timings: TimingBreakdown::default(),
            error: None,
        }
    }

    fn scan<S, O>(
        &self,
        source: &mut S,
        observer: &mut O,
        timings: &mut TimingBreakdown,
        start: Instant,
    ) -> ScanOutput
    where
        S: PixelSource + ?Sized,
        O: ScanObserver + ?Sized,
    {
        scan_source(&self.cascade, &self.params, source, observer, timings, start)
    }
}

/// Cap the resolution, build the integral tables, scan, and map the
/// candidates back to original-image coordinates.
pub(crate) fn scan_source<S, O>(
    cascade: &Cascade,
    params: &DetectorParams,
    source: &mut S,
    observer: &mut O,
    timings: &mut TimingBreakdown,
    start: Instant,
) -> ScanOutput
where
    S: PixelSource + ?Sized,
    O: ScanObserver + ?Sized,
{
    let (original_width, original_height) = (source.width(), source.height());
    let factor = source.fit_to(&params.size_cap);
    let input = InputDescriptor {
        adapter: Some(source.kind()),
        original_width,
        original_height,
        working_width: source.width(),
        working_height: source.height(),
        scaling_factor: factor,
    };
    debug!(
        "detect: {}x{} -> {}x{} (factor {:.4}), {} stages, backend {:?}",
        original_width,
        original_height,
        input.working_width,
        input.working_height,
        factor,
        cascade.stage_count(),
        input.adapter
    );

    let integral = IntegralImage::from_source(source);
    let t = timings.lap("integral", start);

    let mut candidates = Scanner::new(cascade, &integral, params).run(observer);
    if needs_rescale(factor) {
        for c in candidates.iter_mut() {
            *c = c.scaled(factor);
        }
    }
    timings.lap("scan", t);
    ScanOutput { candidates, input }
}

/// Run a scan, turning a panic inside it into `None`.
pub(crate) fn guarded<T>(scan: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(scan)) {
        Ok(out) => Some(out),
        Err(_) => {
            warn!("scan aborted by a panic; no detections");
            None
        }
    }
}

fn finish(mut report: DetectionReport, start: Instant, mut timings: TimingBreakdown) -> DetectionReport {
    timings.finish(start);
    report.timings = timings;
    report
}
