//! Example: Analyze many MIDI tempo maps in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] <file1.mid> <file2.mid> ...
//!
//! Without `--jobs` the files are spread over rayon's global pool.

use rayon::prelude::*;
use std::env;
use std::time::Instant;
use tempo_profile::{analyze_timeline, read_tempo_map_file, AnalysisConfig, TempoProfile};

const USAGE: &str = "Usage: analyze_batch [--jobs N] [--json] <file1.mid> <file2.mid> ...";

struct ItemOut {
    path: String,
    result: Result<TempoProfile, String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let value = args.next().ok_or("--jobs requires a value")?;
                jobs = Some(value.parse::<usize>()?.max(1));
            }
            "--help" | "-h" => {
                eprintln!("{}", USAGE);
                return Ok(());
            }
            _ => paths.push(arg),
        }
    }

    if paths.is_empty() {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config = AnalysisConfig::default();

    let t0 = Instant::now();
    let analyze_all = || -> Vec<ItemOut> {
        paths
            .par_iter()
            .map(|path| {
                let result = read_tempo_map_file(path)
                    .map_err(|e| format!("read failed: {e}"))
                    .and_then(|timeline| {
                        analyze_timeline(&timeline, &config)
                            .map_err(|e| format!("analysis failed: {e}"))
                    });
                ItemOut {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    };

    let outs = match jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()?
            .install(analyze_all),
        None => analyze_all(),
    };

    for (idx, o) in outs.iter().enumerate() {
        match (&o.result, json) {
            (Ok(profile), true) => println!(
                "{}",
                serde_json::json!({
                    "file": o.path,
                    "dominant_bpm": profile.dominant_bpm(),
                    "regime": profile.regime.name(),
                    "tempo_class": profile.label(),
                    "change_points": profile.metadata.change_points,
                    "flags": profile.metadata.flags,
                    "processing_time_ms": profile.metadata.processing_time_ms,
                })
            ),
            (Err(e), true) => println!("{}", serde_json::json!({ "file": o.path, "error": e })),
            (Ok(profile), false) => println!(
                "[{}/{}] {}: {:.2} BPM {} ({}) points={} time={:.2}ms",
                idx + 1,
                outs.len(),
                o.path,
                profile.dominant_bpm(),
                profile.label(),
                profile.regime.name(),
                profile.metadata.change_points,
                profile.metadata.processing_time_ms
            ),
            (Err(e), false) => {
                println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), o.path, e)
            }
        }
    }

    let ok = outs.iter().filter(|o| o.result.is_ok()).count();
    let change_points: usize = outs
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|p| p.metadata.change_points)
        .sum();

    eprintln!(
        "Done: ok={}/{} change_points={} wall={:.0}ms",
        ok,
        outs.len(),
        change_points,
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
