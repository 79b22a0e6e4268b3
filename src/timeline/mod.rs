//! Tempo timeline model
//!
//! A tempo timeline is the tempo map of a score or performance: a list of
//! change points, each pairing a time in seconds with the tempo in BPM that
//! takes effect from that time onwards.
//!
//! - `TempoTimeline`: validated, immutable change points
//! - `midi`: tempo map extraction from Standard MIDI Files

#[cfg(feature = "midi")]
pub mod midi;

use crate::error::TempoError;
use serde::{Deserialize, Serialize};

/// Ordered tempo change points
///
/// Invariants, checked on construction:
/// - `change_times.len() == tempos.len() >= 1`
/// - all values finite, change times non-decreasing
/// - tempos strictly positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoTimeline {
    change_times: Vec<f32>,
    tempos: Vec<f32>,
}

impl TempoTimeline {
    /// Build a timeline from aligned change times (seconds) and tempos (BPM)
    ///
    /// # Errors
    ///
    /// Returns `TempoError::InvalidInput` if the sequences are empty, differ in
    /// length, contain non-finite values, go backwards in time, or hold a
    /// non-positive tempo.
    ///
    /// # Example
    ///
    /// ```
    /// use tempo_profile::TempoTimeline;
    ///
    /// let timeline = TempoTimeline::new(vec![0.0, 10.0], vec![90.0, 120.0])?;
    /// assert_eq!(timeline.len(), 2);
    /// # Ok::<(), tempo_profile::TempoError>(())
    /// ```
    pub fn new(change_times: Vec<f32>, tempos: Vec<f32>) -> Result<Self, TempoError> {
        check_aligned(&change_times, &tempos)?;

        if let Some(i) = change_times.iter().position(|t| !t.is_finite()) {
            return Err(TempoError::InvalidInput(format!(
                "Change time at index {} is not finite",
                i
            )));
        }

        if let Some(i) = change_times.windows(2).position(|w| w[1] < w[0]) {
            return Err(TempoError::InvalidInput(format!(
                "Change times must be non-decreasing: {:.3}s follows {:.3}s at index {}",
                change_times[i + 1],
                change_times[i],
                i + 1
            )));
        }

        if let Some(i) = tempos.iter().position(|&bpm| !bpm.is_finite() || bpm <= 0.0) {
            return Err(TempoError::InvalidInput(format!(
                "Tempo at index {} must be a positive BPM value, got {}",
                i, tempos[i]
            )));
        }

        Ok(Self {
            change_times,
            tempos,
        })
    }

    /// A timeline holding one constant tempo
    pub fn constant(bpm: f32) -> Result<Self, TempoError> {
        Self::new(vec![0.0], vec![bpm])
    }

    /// Change times in seconds
    pub fn change_times(&self) -> &[f32] {
        &self.change_times
    }

    /// Tempo values in BPM, aligned with `change_times`
    pub fn tempos(&self) -> &[f32] {
        &self.tempos
    }

    /// Number of change points (always >= 1)
    pub fn len(&self) -> usize {
        self.tempos.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tempos.is_empty()
    }

    /// Time spanned from the first to the last change point
    pub fn duration_seconds(&self) -> f32 {
        match (self.change_times.first(), self.change_times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Iterate over `(time, bpm)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.change_times
            .iter()
            .copied()
            .zip(self.tempos.iter().copied())
    }
}

/// Shared shape check for raw change-time/tempo slices
pub(crate) fn check_aligned(change_times: &[f32], tempos: &[f32]) -> Result<(), TempoError> {
    if change_times.is_empty() || tempos.is_empty() {
        return Err(TempoError::InvalidInput(
            "Tempo timeline must contain at least one change point".to_string(),
        ));
    }

    if change_times.len() != tempos.len() {
        return Err(TempoError::InvalidInput(format!(
            "Change times and tempos differ in length: {} vs {}",
            change_times.len(),
            tempos.len()
        )));
    }

    Ok(())
}
