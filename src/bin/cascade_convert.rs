use haar_detector::cascade::Compression;
use haar_detector::config;
use haar_detector::image::io::ensure_parent_dir;
use haar_detector::Cascade;
use std::fs;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = config::config_path_from_args("cascade_convert")?;
    let config = config::convert::load_config(&config_path)?;

    let cascade = Cascade::try_load(&config.input)
        .map_err(|e| format!("Failed to load cascade {}: {e}", config.input.display()))?;

    let compression = Compression::from_path(&config.output);
    if config.pretty && compression == Compression::None {
        ensure_parent_dir(&config.output)?;
        let json = cascade
            .to_json_pretty()
            .map_err(|e| format!("Failed to serialize cascade: {e}"))?;
        fs::write(&config.output, json)
            .map_err(|e| format!("Failed to write {}: {e}", config.output.display()))?;
    } else {
        cascade
            .save(&config.output)
            .map_err(|e| format!("Failed to write {}: {e}", config.output.display()))?;
    }

    println!(
        "Converted {} -> {} ({}x{}, {} stages, {} features, {:?})",
        config.input.display(),
        config.output.display(),
        cascade.size_x(),
        cascade.size_y(),
        cascade.stage_count(),
        cascade.feature_count(),
        compression
    );
    Ok(())
}
