use poly_decoder::config::polygonize::{self, PolygonizeConfig};
use poly_decoder::io::{read_json_file, write_json_file};
use poly_decoder::pipeline::{ModelOutputDump, PipelineReport, PolygonPipeline};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "polygonize".to_string());
    let config_path = env::args()
        .nth(1)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = polygonize::load_config(Path::new(&config_path))?;

    let dump: ModelOutputDump = read_json_file(&config.input)?;
    let pipeline = PolygonPipeline::new(config.resolve_params()?).map_err(|e| e.to_string())?;
    let report = pipeline.run_recorded(&dump).map_err(|e| e.to_string())?;

    if config.output.print_summary {
        print_text_summary(&config, &report);
    }

    let out_path = config.output.result_path();
    write_json_file(&out_path, &report)?;
    println!("Polygons written to {}", out_path.display());
    Ok(())
}

fn print_text_summary(config: &PolygonizeConfig, report: &PipelineReport) {
    let s = &report.summary;
    println!("Polygonize summary ({})", config.input.display());
    println!("  samples: {} (valid {})", s.samples, s.valid_samples);
    println!(
        "  rings: {} (degenerate {}), polygons: {}",
        s.rings, s.degenerate_rings, s.polygons
    );
    for stage in &report.timing.stages {
        println!("  {}: {:.3} ms", stage.label, stage.elapsed_ms);
    }
    println!("  total: {:.3} ms", report.timing.total_ms);
}
