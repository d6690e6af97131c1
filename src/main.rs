use haar_detector::config::{self, detect::DetectToolConfig};
use haar_detector::diagnostics::DetectionReport;
use haar_detector::image::io::write_json_file;
use haar_detector::{Cascade, Detection, ObjectDetector};
use serde::Serialize;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    input: PathBuf,
    detections: Vec<Detection>,
}

fn run() -> Result<(), String> {
    let config_path = config::config_path_from_args("haar_detect")?;
    let config = config::detect::load_config(&config_path)?;

    let cascade = Cascade::try_load(&config.cascade)
        .map_err(|e| format!("Failed to load cascade {}: {e}", config.cascade.display()))?;
    let detector = ObjectDetector::new(cascade, config.params.clone());

    if let [input] = config.inputs.as_slice() {
        let report = detector.detect_path_with_diagnostics(input);
        if config.output.format.includes_text() {
            print_text_summary(input, &report);
        }
        emit_json(&config, &report)
    } else {
        let results = detector.detect_batch(&config.inputs);
        let entries: Vec<BatchEntry> = config
            .inputs
            .iter()
            .cloned()
            .zip(results)
            .map(|(input, detections)| BatchEntry { input, detections })
            .collect();
        if config.output.format.includes_text() {
            for entry in &entries {
                println!("{}: {} detection(s)", entry.input.display(), entry.detections.len());
                print_detections(&entry.detections);
            }
        }
        emit_json(&config, &entries)
    }
}

fn emit_json<T: Serialize>(config: &DetectToolConfig, value: &T) -> Result<(), String> {
    if !config.output.format.includes_json() {
        return Ok(());
    }
    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, value)?;
            println!("JSON report written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_detections(detections: &[Detection]) {
    for d in detections {
        println!("  [{}, {}] {}x{}", d.x, d.y, d.width, d.height);
    }
}

fn print_text_summary(input: &std::path::Path, report: &DetectionReport) {
    println!("Detection summary for {}", input.display());
    if let Some(err) = &report.error {
        println!("  error: {err}");
        return;
    }
    let inp = &report.input;
    println!(
        "  image: {}x{} scanned at {}x{} (factor {:.4}, backend {:?})",
        inp.original_width,
        inp.original_height,
        inp.working_width,
        inp.working_height,
        inp.scaling_factor,
        inp.adapter
    );
    let stats = &report.stats;
    println!(
        "  windows: {} over {} scales, accepted={} stage_evaluations={}",
        stats.windows,
        stats.scales.len(),
        stats.accepted,
        stats.stage_evaluations
    );
    if !stats.rejections_per_stage.is_empty() {
        let hist: Vec<String> = stats
            .rejections_per_stage
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(k, n)| format!("s{k}={n}"))
            .collect();
        println!("  rejections: {}", hist.join(" "));
    }
    println!(
        "  detections: {} (from {} raw windows, {} stages)",
        report.detections.len(),
        report.raw_candidates,
        report.stage_count
    );
    print_detections(&report.detections);
    let t = &report.timings;
    let stage_ms: Vec<String> = t
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!("  timings (ms): {} total={:.3}", stage_ms.join(" "), t.total_ms);
}
