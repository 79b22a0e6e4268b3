//! # Tempo Profile
//!
//! Tempo-map analysis for scores and performance timelines: find the tempo
//! that dominates a piece, name it with a classical tempo marking, and produce
//! a smoothed tempo curve kept within that marking's range.
//!
//! ## Features
//!
//! - **Dominant Tempo**: Duration-weighted majority over tempo change points
//! - **Tempo Classes**: Larghissimo to Prestissimo with priority tie-breaks over overlapping bands
//! - **Curve Smoothing**: Savitzky-Golay filtering clamped to the class tolerance band
//! - **MIDI Input**: Tempo maps read from Standard MIDI Files (`midi` feature)
//!
//! ## Quick Start
//!
//! ```
//! use tempo_profile::{analyze_timeline, AnalysisConfig, TempoTimeline};
//!
//! let timeline = TempoTimeline::new(
//!     vec![0.0, 10.0, 20.0, 30.0],
//!     vec![60.0, 60.0, 120.0, 120.0],
//! )?;
//!
//! let profile = analyze_timeline(&timeline, &AnalysisConfig::default())?;
//!
//! println!("Dominant: {:.2} BPM ({})", profile.dominant_bpm(), profile.label());
//! # Ok::<(), tempo_profile::TempoError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Tempo Timeline → Dominant Tempo → Tempo Class → Smoothed Curve → Profile
//! ```
//!
//! Every stage is a pure function over slices; rendering the curves is left
//! to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod timeline;

use rayon::prelude::*;

// Re-export main types
pub use analysis::classifier::{classify_tempo, classify_tempo_detailed};
pub use analysis::dominant::{resolve_dominant_tempo, resolve_dominant_tempo_with_share};
pub use analysis::result::{ProfileFlag, ProfileMetadata, TempoProfile};
pub use analysis::smoothing::{smooth_tempo_curve, smooth_tempo_curve_with};
pub use analysis::{TempoClassTable, TempoRegime};
pub use config::{AnalysisConfig, SmoothingConfig};
pub use error::TempoError;
pub use timeline::TempoTimeline;

#[cfg(feature = "midi")]
pub use timeline::midi::{read_tempo_map, read_tempo_map_file};

/// Main analysis function
///
/// Resolves the dominant tempo, classifies it and smooths the tempo curve.
///
/// # Arguments
///
/// * `timeline` - Validated tempo change points
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `TempoProfile` with the dominant tempo, winning class, candidates and the
/// original and smoothed curves aligned with the change times
///
/// # Errors
///
/// - `TempoError::InvalidInput` if the configuration is invalid
/// - `TempoError::UnknownLabel` if no tempo class matches, since the curve
///   cannot be clamped without one
pub fn analyze_timeline(
    timeline: &TempoTimeline,
    config: &AnalysisConfig,
) -> Result<TempoProfile, TempoError> {
    use analysis::classifier::TempoClassifier;
    use analysis::dominant::{resolve_dominant_tempo_with_share, DominantResolution};
    use analysis::smoothing::smooth_curve;
    use std::time::Instant;

    let start_time = Instant::now();
    config.validate()?;

    log::debug!(
        "Starting tempo analysis: {} change points over {:.2}s",
        timeline.len(),
        timeline.duration_seconds()
    );

    let change_times = timeline.change_times();
    let tempos = timeline.tempos();
    let mut flags = Vec::new();

    // Stage 1: dominant tempo
    let dominant = resolve_dominant_tempo_with_share(change_times, tempos, config.majority_share)?;
    match dominant.resolution {
        DominantResolution::ZeroDuration => flags.push(ProfileFlag::ZeroDuration),
        DominantResolution::MajorityNotReached => flags.push(ProfileFlag::MajorityNotReached),
        _ => {}
    }

    // Stage 2: classification
    let classifier = TempoClassifier::standard()?;
    let classification = classifier.classify_detailed(dominant.bpm, tempos);
    let (regime, winner) = match (classification.regime, classification.winner()) {
        (Some(regime), Some(winner)) => (regime, winner.clone()),
        _ => {
            return Err(TempoError::UnknownLabel(format!(
                "no tempo class matches dominant tempo {:.2} BPM",
                dominant.bpm
            )));
        }
    };
    if classification.candidates.len() > 1 {
        flags.push(ProfileFlag::MultipleCandidates);
    }

    // Stage 3: smoothing
    let entry = classifier.table().lookup(&winner.label)?;
    let smoothing = config.smoothing();
    let band = entry.rule.tolerance_band(smoothing.tolerance_bpm);
    let curve = smooth_curve(tempos, band, &smoothing)?;
    if curve.window.is_none() {
        flags.push(ProfileFlag::SmoothingBypassed);
    }
    if curve.clamped_points > 0 {
        flags.push(ProfileFlag::CurveClamped);
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Tempo analysis complete: {:.2} BPM, {} ({} regime), {:.2}ms",
        dominant.bpm,
        winner.label,
        regime.name(),
        processing_time_ms
    );

    Ok(TempoProfile {
        dominant,
        regime,
        tempo_class: winner,
        candidates: classification.candidates,
        tolerance_band: curve.band,
        change_times: change_times.to_vec(),
        tempos: tempos.to_vec(),
        smoothed_tempos: curve.values,
        metadata: ProfileMetadata {
            duration_seconds: timeline.duration_seconds(),
            change_points: timeline.len(),
            smoothing_window: curve.window,
            processing_time_ms,
            flags,
            ..ProfileMetadata::default()
        },
    })
}

/// Analyze many independent timelines in parallel
///
/// Results are returned in input order; one failing timeline does not stop
/// the others.
pub fn analyze_timelines(
    timelines: &[TempoTimeline],
    config: &AnalysisConfig,
) -> Vec<Result<TempoProfile, TempoError>> {
    log::debug!("Analyzing {} tempo timelines in parallel", timelines.len());
    timelines
        .par_iter()
        .map(|timeline| analyze_timeline(timeline, config))
        .collect()
}
