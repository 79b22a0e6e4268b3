//! Tempo profile result types

use serde::{Deserialize, Serialize};

use super::classes::{TempoRegime, ToleranceBand};
use super::classifier::TempoClassMatch;
use super::dominant::DominantTempo;

/// Profile flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileFlag {
    /// All change points share one timestamp; dominant tempo is the last tempo
    ZeroDuration,
    /// Cumulative share never crossed the majority threshold
    MajorityNotReached,
    /// Curve too short to smooth; returned as is
    SmoothingBypassed,
    /// Some smoothed values were moved into the tolerance band
    CurveClamped,
    /// More than one tempo class matched before resolution
    MultipleCandidates,
}

/// Complete tempo profile of one timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempoProfile {
    /// Dominant tempo and how it was resolved
    pub dominant: DominantTempo,

    /// Regime selected by the dominant tempo
    pub regime: TempoRegime,

    /// Winning tempo class
    pub tempo_class: TempoClassMatch,

    /// All matching classes, best first (includes the winner)
    pub candidates: Vec<TempoClassMatch>,

    /// Band the smoothed curve was clamped to
    pub tolerance_band: ToleranceBand,

    /// Change times in seconds
    pub change_times: Vec<f32>,

    /// Original tempos in BPM
    pub tempos: Vec<f32>,

    /// Smoothed, clamped tempos in BPM, aligned with `change_times`
    pub smoothed_tempos: Vec<f32>,

    /// Profile metadata
    pub metadata: ProfileMetadata,
}

impl TempoProfile {
    /// Dominant tempo in BPM
    pub fn dominant_bpm(&self) -> f32 {
        self.dominant.bpm
    }

    /// Winning tempo class label
    pub fn label(&self) -> &str {
        &self.tempo_class.label
    }

    /// Whether a flag was raised
    pub fn has_flag(&self, flag: ProfileFlag) -> bool {
        self.metadata.flags.contains(&flag)
    }
}

/// Profile metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Time from first to last change point in seconds
    pub duration_seconds: f32,

    /// Number of change points
    pub change_points: usize,

    /// Savitzky-Golay window used, if the curve was smoothed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing_window: Option<usize>,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Crate version that produced the profile
    pub algorithm_version: String,

    /// Profile flags
    pub flags: Vec<ProfileFlag>,
}

impl Default for ProfileMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            change_points: 0,
            smoothing_window: None,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            flags: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dominant::DominantResolution;

    fn sample_profile() -> TempoProfile {
        let winner = TempoClassMatch {
            label: "Andante".to_string(),
            priority: 10,
            representative_bpm: 96.0,
        };
        TempoProfile {
            dominant: DominantTempo {
                bpm: 96.0,
                resolution: DominantResolution::SinglePoint,
            },
            regime: TempoRegime::Moderate,
            tempo_class: winner.clone(),
            candidates: vec![winner],
            tolerance_band: ToleranceBand {
                lower: Some(66.0),
                upper: Some(118.0),
            },
            change_times: vec![0.0],
            tempos: vec![96.0],
            smoothed_tempos: vec![96.0],
            metadata: ProfileMetadata {
                change_points: 1,
                flags: vec![ProfileFlag::SmoothingBypassed],
                ..ProfileMetadata::default()
            },
        }
    }

    #[test]
    fn test_profile_accessors() {
        let profile = sample_profile();
        assert_eq!(profile.dominant_bpm(), 96.0);
        assert_eq!(profile.label(), "Andante");
        assert!(profile.has_flag(ProfileFlag::SmoothingBypassed));
        assert!(!profile.has_flag(ProfileFlag::CurveClamped));
    }

    #[test]
    fn test_metadata_default_version() {
        let metadata = ProfileMetadata::default();
        assert_eq!(metadata.algorithm_version, env!("CARGO_PKG_VERSION"));
        assert!(metadata.flags.is_empty());
    }
}
