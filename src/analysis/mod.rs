//! Tempo analysis modules
//!
//! The three pipeline stages plus the result types they feed:
//! - Dominant tempo resolution
//! - Tempo class table and classification
//! - Curve smoothing
//! - Result types

pub mod classes;
pub mod classifier;
pub mod dominant;
pub mod result;
pub mod smoothing;

pub use classes::{
    BandRule, TempoClassEntry, TempoClassTable, TempoRegime, ToleranceBand, TEMPO_CLASSES,
};
pub use classifier::{
    classify_tempo, classify_tempo_detailed, ClassificationResult, TempoClassMatch,
    TempoClassifier,
};
pub use dominant::{
    resolve_dominant_tempo, resolve_dominant_tempo_with_share, DominantResolution, DominantTempo,
};
pub use result::{ProfileFlag, ProfileMetadata, TempoProfile};
pub use smoothing::{
    clamp_curve, savgol_filter, smooth_curve, smooth_tempo_curve, smooth_tempo_curve_with,
    SmoothedCurve,
};
