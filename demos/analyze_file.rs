//! Example: Analyze the tempo map of a single MIDI file
//!
//! Usage:
//!   cargo run --example analyze_file -- <score.mid> [--json]

use std::env;

use tempo_profile::{analyze_timeline, read_tempo_map_file, AnalysisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or("Usage: analyze_file <score.mid> [--json]")?;

    let timeline = read_tempo_map_file(path)?;
    let profile = analyze_timeline(&timeline, &AnalysisConfig::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("Tempo map:");
    for (time, bpm) in timeline.iter() {
        println!("  At {:.2} seconds, the tempo is {:.2} BPM", time, bpm);
    }

    println!("Analysis Results:");
    println!("  Dominant tempo: {:.2} BPM", profile.dominant_bpm());
    println!("  Regime: {}", profile.regime.name());
    println!("  Tempo class: {}", profile.label());
    if profile.candidates.len() > 1 {
        let others: Vec<&str> = profile
            .candidates
            .iter()
            .skip(1)
            .map(|c| c.label.as_str())
            .collect();
        println!("  Also matched: {}", others.join(", "));
    }
    println!(
        "  Tolerance band: {} .. {}",
        fmt_bound(profile.tolerance_band.lower),
        fmt_bound(profile.tolerance_band.upper)
    );
    println!("  Smoothed curve:");
    for ((time, raw), smooth) in profile
        .change_times
        .iter()
        .zip(&profile.tempos)
        .zip(&profile.smoothed_tempos)
    {
        println!("    {:>8.2}s  {:>7.2} -> {:>7.2} BPM", time, raw, smooth);
    }
    println!("  Flags: {:?}", profile.metadata.flags);
    println!("  Processing time: {:.2} ms", profile.metadata.processing_time_ms);

    Ok(())
}

fn fmt_bound(bound: Option<f32>) -> String {
    bound.map_or_else(|| "open".to_string(), |v| format!("{:.1}", v))
}
