//! Tempo classification
//!
//! Picks one tempo marking for a piece from its dominant tempo and the full
//! list of tempos it visits.
//!
//! # Algorithm
//!
//! 1. The dominant tempo selects a regime: slow (< 76), moderate ([76, 120])
//!    or fast (> 120)
//! 2. Only classes of that regime are considered; each class rule is checked
//!    against the whole tempo array and yields a representative BPM on match
//! 3. Classes are walked in ascending priority; the first priority level with
//!    a match wins, and within that level the larger representative BPM wins
//!
//! # Example
//!
//! ```
//! use tempo_profile::classify_tempo;
//!
//! let label = classify_tempo(60.0, &[55.0, 58.0, 60.0, 62.0])?;
//! assert_eq!(label, Some("Largo"));
//! # Ok::<(), tempo_profile::TempoError>(())
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::classes::{TempoClassEntry, TempoClassTable, TempoRegime};
use crate::error::TempoError;

/// A tempo class that matched, with its representative tempo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoClassMatch {
    /// Tempo marking
    pub label: String,

    /// Resolution priority (lower wins)
    pub priority: u32,

    /// Mean BPM of the tempos supporting this class
    pub representative_bpm: f32,
}

impl TempoClassMatch {
    fn new(entry: &TempoClassEntry, representative_bpm: f32) -> Self {
        Self {
            label: entry.label.to_string(),
            priority: entry.priority,
            representative_bpm,
        }
    }
}

/// Full classification outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Regime selected by the dominant tempo (`None` for a non-finite tempo)
    pub regime: Option<TempoRegime>,

    /// Every matching class, best first
    pub candidates: Vec<TempoClassMatch>,
}

impl ClassificationResult {
    /// The winning class, if any matched
    pub fn winner(&self) -> Option<&TempoClassMatch> {
        self.candidates.first()
    }

    /// Label of the winning class
    pub fn label(&self) -> Option<&str> {
        self.winner().map(|m| m.label.as_str())
    }
}

/// Classifier bound to a validated tempo class table
#[derive(Debug, Clone, Copy)]
pub struct TempoClassifier<'a> {
    table: &'a TempoClassTable,
}

impl TempoClassifier<'static> {
    /// Classifier over the built-in table
    pub fn standard() -> Result<Self, TempoError> {
        Ok(Self::new(TempoClassTable::standard()?))
    }
}

impl<'a> TempoClassifier<'a> {
    /// Classifier over a custom table
    pub fn new(table: &'a TempoClassTable) -> Self {
        Self { table }
    }

    /// The table this classifier reads
    pub fn table(&self) -> &'a TempoClassTable {
        self.table
    }

    /// Winning class entry, walking priorities and stopping at the first
    /// level that matches
    pub fn classify(&self, dominant_bpm: f32, tempos: &[f32]) -> Option<&'a TempoClassEntry> {
        let regime = TempoRegime::for_bpm(dominant_bpm)?;

        let mut best: Option<(&'a TempoClassEntry, f32)> = None;
        for entry in self.table.regime_entries(regime) {
            if let Some((winner, _)) = best {
                if entry.priority > winner.priority {
                    break;
                }
            }
            if let Some(representative) = entry.rule.evaluate(tempos) {
                match best {
                    Some((_, best_representative)) if best_representative >= representative => {}
                    _ => best = Some((entry, representative)),
                }
            }
        }

        match best {
            Some((entry, representative)) => {
                log::debug!(
                    "Classified {:.2} BPM ({} regime) as {} (representative {:.2} BPM)",
                    dominant_bpm,
                    regime.name(),
                    entry.label,
                    representative
                );
                Some(entry)
            }
            None => {
                log::debug!(
                    "No {} tempo class matched dominant tempo {:.2} BPM",
                    regime.name(),
                    dominant_bpm
                );
                None
            }
        }
    }

    /// Every matching class of the regime, ordered by priority then by
    /// descending representative BPM
    pub fn classify_detailed(&self, dominant_bpm: f32, tempos: &[f32]) -> ClassificationResult {
        let regime = TempoRegime::for_bpm(dominant_bpm);

        let mut candidates: Vec<TempoClassMatch> = match regime {
            Some(regime) => self
                .table
                .regime_entries(regime)
                .filter_map(|entry| {
                    entry
                        .rule
                        .evaluate(tempos)
                        .map(|representative| TempoClassMatch::new(entry, representative))
                })
                .collect(),
            None => Vec::new(),
        };

        // Stable: equal priority and representative keep table order
        candidates.sort_by(|a, b| {
            a.priority.cmp(&b.priority).then_with(|| {
                b.representative_bpm
                    .partial_cmp(&a.representative_bpm)
                    .unwrap_or(Ordering::Equal)
            })
        });

        ClassificationResult { regime, candidates }
    }
}

/// Classify with the built-in table, returning the winning label
///
/// # Arguments
///
/// * `dominant_bpm` - Dominant tempo of the piece
/// * `tempos` - All tempo values of the timeline
///
/// # Returns
///
/// The winning label, or `None` if no class of the selected regime matched
///
/// # Errors
///
/// Returns `TempoError::Configuration` only if the built-in table fails validation
pub fn classify_tempo(
    dominant_bpm: f32,
    tempos: &[f32],
) -> Result<Option<&'static str>, TempoError> {
    let classifier = TempoClassifier::standard()?;
    Ok(classifier
        .classify(dominant_bpm, tempos)
        .map(|entry| entry.label))
}

/// Classify with the built-in table, returning every candidate
pub fn classify_tempo_detailed(
    dominant_bpm: f32,
    tempos: &[f32],
) -> Result<ClassificationResult, TempoError> {
    Ok(TempoClassifier::standard()?.classify_detailed(dominant_bpm, tempos))
}
