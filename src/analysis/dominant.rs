//! Dominant tempo resolution
//!
//! Finds the tempo that governs the majority of a timeline's duration.
//!
//! A change at time `t[i]` applies going forward, so the interval
//! `[t[i], t[i+1])` is weighted under the tempo recorded at its end,
//! `tempos[i+1]`, following the tempo-change-event convention of the score
//! timelines this crate reads.
//!
//! # Algorithm
//!
//! 1. A single change point is returned as is
//! 2. Compute interval durations and their share of the total duration
//! 3. Scan intervals in time order, accumulating shares
//! 4. The first interval whose inclusion pushes the cumulative share strictly
//!    past the majority threshold (0.5) gives the dominant tempo
//! 5. Zero total duration, or a scan that never crosses, falls back to the
//!    last tempo

use serde::{Deserialize, Serialize};

use crate::error::TempoError;
use crate::timeline::check_aligned;

/// Default majority threshold (strictly exceeded)
pub const MAJORITY_SHARE: f32 = 0.5;

/// How a dominant tempo was reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DominantResolution {
    /// Only one change point, no duration to weigh
    SinglePoint,
    /// Cumulative share crossed the threshold at this interval index
    /// (the interval ending at change point `interval + 1`)
    MajorityCrossing {
        /// Index into the interval list
        interval: usize,
        /// Cumulative share once this interval was included
        cumulative_share: f32,
    },
    /// All change points share one timestamp; last tempo used
    ZeroDuration,
    /// Scan ended without crossing the threshold; last tempo used
    MajorityNotReached,
}

/// Dominant tempo of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantTempo {
    /// Tempo in BPM
    pub bpm: f32,

    /// Which rule produced `bpm`
    pub resolution: DominantResolution,
}

impl DominantTempo {
    /// True when the value came from a fallback rather than a real majority
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.resolution,
            DominantResolution::ZeroDuration | DominantResolution::MajorityNotReached
        )
    }
}

/// Resolve the dominant tempo with the default 50% majority threshold
///
/// # Arguments
///
/// * `change_times` - Change point times in seconds (non-decreasing)
/// * `tempos` - Tempo in BPM at each change point
///
/// # Errors
///
/// Returns `TempoError::InvalidInput` if the slices are empty or differ in length
///
/// # Example
///
/// ```
/// use tempo_profile::resolve_dominant_tempo;
///
/// let dominant = resolve_dominant_tempo(&[0.0, 10.0, 20.0, 30.0], &[60.0, 60.0, 120.0, 120.0])?;
/// assert_eq!(dominant.bpm, 120.0);
/// # Ok::<(), tempo_profile::TempoError>(())
/// ```
pub fn resolve_dominant_tempo(
    change_times: &[f32],
    tempos: &[f32],
) -> Result<DominantTempo, TempoError> {
    resolve_dominant_tempo_with_share(change_times, tempos, MAJORITY_SHARE)
}

/// Resolve the dominant tempo with an explicit majority threshold
pub fn resolve_dominant_tempo_with_share(
    change_times: &[f32],
    tempos: &[f32],
    majority_share: f32,
) -> Result<DominantTempo, TempoError> {
    check_aligned(change_times, tempos)?;

    let last_bpm = tempos[tempos.len() - 1];

    if tempos.len() == 1 {
        return Ok(DominantTempo {
            bpm: tempos[0],
            resolution: DominantResolution::SinglePoint,
        });
    }

    // Durations are accumulated in f64 so an exact half stays exactly half
    let intervals: Vec<f64> = change_times
        .windows(2)
        .map(|w| f64::from(w[1]) - f64::from(w[0]))
        .collect();
    let total: f64 = intervals.iter().sum();

    if total == 0.0 {
        log::warn!(
            "Tempo timeline has zero duration over {} change points, using last tempo {:.2} BPM",
            tempos.len(),
            last_bpm
        );
        return Ok(DominantTempo {
            bpm: last_bpm,
            resolution: DominantResolution::ZeroDuration,
        });
    }

    let threshold = f64::from(majority_share) * total;
    let mut cumulative = 0.0f64;
    for (i, (&interval, &bpm)) in intervals.iter().zip(&tempos[1..]).enumerate() {
        cumulative += interval;
        if cumulative > threshold {
            let cumulative_share = (cumulative / total) as f32;
            log::debug!(
                "Dominant tempo {:.2} BPM at interval {} (cumulative share {:.3})",
                bpm,
                i,
                cumulative_share
            );
            return Ok(DominantTempo {
                bpm,
                resolution: DominantResolution::MajorityCrossing {
                    interval: i,
                    cumulative_share,
                },
            });
        }
    }

    log::warn!(
        "Cumulative share {:.6} never exceeded {:.3}, using last tempo {:.2} BPM",
        cumulative / total,
        majority_share,
        last_bpm
    );
    Ok(DominantTempo {
        bpm: last_bpm,
        resolution: DominantResolution::MajorityNotReached,
    })
}
