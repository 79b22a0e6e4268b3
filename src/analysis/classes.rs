//! Tempo class taxonomy
//!
//! Musicological tempo markings with their BPM bands, grouped into three
//! coarse regimes. Bands overlap on purpose; ties are settled by an explicit
//! priority (lower value wins) carried by each entry.
//!
//! The table is an ordered list rather than a label-keyed map so that a
//! repeated label is caught by `TempoClassTable::new` instead of silently
//! replacing an earlier entry.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::TempoError;

/// Upper edge (exclusive) of the slow regime
pub const SLOW_CEILING_BPM: f32 = 76.0;

/// Upper edge (inclusive) of the moderate regime
pub const FAST_FLOOR_BPM: f32 = 120.0;

/// Coarse tempo regime selected by the dominant tempo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TempoRegime {
    /// Dominant tempo below 76 BPM
    Slow,
    /// Dominant tempo in [76, 120] BPM
    Moderate,
    /// Dominant tempo above 120 BPM
    Fast,
}

impl TempoRegime {
    /// Regime for a dominant tempo, `None` if the value is not finite
    pub fn for_bpm(bpm: f32) -> Option<Self> {
        if !bpm.is_finite() {
            None
        } else if bpm < SLOW_CEILING_BPM {
            Some(TempoRegime::Slow)
        } else if bpm <= FAST_FLOOR_BPM {
            Some(TempoRegime::Moderate)
        } else {
            Some(TempoRegime::Fast)
        }
    }

    /// Lowercase name, e.g. "slow"
    pub fn name(&self) -> &'static str {
        match self {
            TempoRegime::Slow => "slow",
            TempoRegime::Moderate => "moderate",
            TempoRegime::Fast => "fast",
        }
    }
}

/// Membership rule of a tempo class against a whole tempo array
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BandRule {
    /// Every tempo is strictly below `ceiling`; representative is the overall mean
    AllBelow {
        /// Exclusive ceiling in BPM
        ceiling: f32,
    },
    /// At least one tempo in `[lower, upper]`; representative is the in-band mean
    Range {
        /// Inclusive lower bound in BPM
        lower: f32,
        /// Inclusive upper bound in BPM
        upper: f32,
    },
    /// Mean of tempos in `[lower, upper]` is at least `threshold`
    MeanAtLeast {
        /// Inclusive lower bound in BPM
        lower: f32,
        /// Inclusive upper bound in BPM
        upper: f32,
        /// Minimum in-band mean in BPM
        threshold: f32,
    },
    /// At least one tempo strictly above `floor`; representative is the in-band mean
    Above {
        /// Exclusive floor in BPM
        floor: f32,
    },
}

impl BandRule {
    /// Representative BPM if the rule matches `tempos`, `None` otherwise
    ///
    /// Empty in-band subsets never match, so no mean of an empty set is taken.
    pub fn evaluate(&self, tempos: &[f32]) -> Option<f32> {
        match *self {
            BandRule::AllBelow { ceiling } => {
                if !tempos.is_empty() && tempos.iter().all(|&bpm| bpm < ceiling) {
                    mean(tempos.iter().copied())
                } else {
                    None
                }
            }
            BandRule::Range { lower, upper } => {
                mean(tempos.iter().copied().filter(|&bpm| bpm >= lower && bpm <= upper))
            }
            BandRule::MeanAtLeast {
                lower,
                upper,
                threshold,
            } => mean(tempos.iter().copied().filter(|&bpm| bpm >= lower && bpm <= upper))
                .filter(|&m| m >= threshold),
            BandRule::Above { floor } => mean(tempos.iter().copied().filter(|&bpm| bpm > floor)),
        }
    }

    /// Tolerance band used to clamp a smoothed curve, widened by `tolerance`
    ///
    /// Whole-array rules (`AllBelow`, `MeanAtLeast`) only constrain from above;
    /// `Above` only from below.
    pub fn tolerance_band(&self, tolerance: f32) -> ToleranceBand {
        match *self {
            BandRule::AllBelow { ceiling } => ToleranceBand {
                lower: None,
                upper: Some(ceiling + tolerance),
            },
            BandRule::Range { lower, upper } => ToleranceBand {
                lower: Some(lower - tolerance),
                upper: Some(upper + tolerance),
            },
            BandRule::MeanAtLeast { upper, .. } => ToleranceBand {
                lower: None,
                upper: Some(upper + tolerance),
            },
            BandRule::Above { floor } => ToleranceBand {
                lower: Some(floor - tolerance),
                upper: None,
            },
        }
    }
}

/// Clamping bounds for a smoothed tempo curve; `None` leaves that side open
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    /// Floor in BPM
    pub lower: Option<f32>,
    /// Ceiling in BPM
    pub upper: Option<f32>,
}

impl ToleranceBand {
    /// Clamp a single value into the band
    pub fn clamp(&self, bpm: f32) -> f32 {
        let mut value = bpm;
        if let Some(lower) = self.lower {
            value = value.max(lower);
        }
        if let Some(upper) = self.upper {
            value = value.min(upper);
        }
        value
    }

    /// Whether `bpm` already lies inside the band
    pub fn contains(&self, bpm: f32) -> bool {
        self.lower.map_or(true, |lower| bpm >= lower)
            && self.upper.map_or(true, |upper| bpm <= upper)
    }
}

/// One tempo class of the taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TempoClassEntry {
    /// Tempo marking, e.g. "Andante"
    pub label: &'static str,
    /// Resolution priority (lower wins)
    pub priority: u32,
    /// Regime in which the class is considered
    pub regime: TempoRegime,
    /// Membership rule
    pub rule: BandRule,
}

const fn range(
    label: &'static str,
    priority: u32,
    regime: TempoRegime,
    lower: f32,
    upper: f32,
) -> TempoClassEntry {
    TempoClassEntry {
        label,
        priority,
        regime,
        rule: BandRule::Range { lower, upper },
    }
}

/// Built-in tempo class table, in regime then band order
///
/// The two Lentissimo rules carry distinct labels; both keep priority 6.
pub const TEMPO_CLASSES: &[TempoClassEntry] = &[
    TempoClassEntry {
        label: "Larghissimo",
        priority: 1,
        regime: TempoRegime::Slow,
        rule: BandRule::AllBelow { ceiling: 24.0 },
    },
    TempoClassEntry {
        label: "Lentissimo (coarse)",
        priority: 6,
        regime: TempoRegime::Slow,
        rule: BandRule::AllBelow { ceiling: 48.0 },
    },
    TempoClassEntry {
        label: "Tranquillo",
        priority: 3,
        regime: TempoRegime::Slow,
        rule: BandRule::MeanAtLeast {
            lower: 73.0,
            upper: 83.0,
            threshold: 80.0,
        },
    },
    range("Solenelle/Grave", 4, TempoRegime::Slow, 25.0, 45.0),
    range("Largo", 5, TempoRegime::Slow, 40.0, 60.0),
    range("Lentissimo (fine)", 6, TempoRegime::Slow, 45.0, 60.0),
    range("Larghetto", 7, TempoRegime::Slow, 60.0, 66.0),
    range("Adagio", 8, TempoRegime::Slow, 66.0, 76.0),
    range("Adagietto", 9, TempoRegime::Slow, 72.0, 76.0),
    range("Andante", 10, TempoRegime::Moderate, 76.0, 108.0),
    range("Andantino", 11, TempoRegime::Moderate, 80.0, 108.0),
    range("Marcia_moderato", 12, TempoRegime::Moderate, 83.0, 85.0),
    range("Andante_moderato", 13, TempoRegime::Moderate, 92.0, 112.0),
    range("Moderato", 14, TempoRegime::Moderate, 108.0, 120.0),
    range("Allegretto", 15, TempoRegime::Moderate, 112.0, 120.0),
    range("Allegro_moderato", 17, TempoRegime::Fast, 116.0, 120.0),
    // Ranked above Allegro_moderato so it wins their overlap
    range("Allegro", 16, TempoRegime::Fast, 120.0, 168.0),
    range("Vivace", 18, TempoRegime::Fast, 168.0, 176.0),
    range("Vivacissimo/Allegrissimo", 19, TempoRegime::Fast, 172.0, 176.0),
    range("Presto", 20, TempoRegime::Fast, 168.0, 200.0),
    TempoClassEntry {
        label: "Prestissimo",
        priority: 21,
        regime: TempoRegime::Fast,
        rule: BandRule::Above { floor: 200.0 },
    },
];

/// Validated tempo class table, held in ascending priority order
#[derive(Debug, Clone)]
pub struct TempoClassTable {
    entries: Vec<TempoClassEntry>,
}

impl TempoClassTable {
    /// Validate entries and order them by priority
    ///
    /// Entries with equal priority keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns `TempoError::Configuration` if the table is empty or a label
    /// appears more than once.
    pub fn new(entries: &[TempoClassEntry]) -> Result<Self, TempoError> {
        if entries.is_empty() {
            return Err(TempoError::Configuration(
                "Tempo class table is empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.label) {
                return Err(TempoError::Configuration(format!(
                    "Duplicate tempo class label '{}'",
                    entry.label
                )));
            }
        }

        let mut entries = entries.to_vec();
        entries.sort_by_key(|entry| entry.priority);
        Ok(Self { entries })
    }

    /// The built-in table, validated once per process
    pub fn standard() -> Result<&'static TempoClassTable, TempoError> {
        static TABLE: OnceLock<Result<TempoClassTable, TempoError>> = OnceLock::new();
        TABLE
            .get_or_init(|| TempoClassTable::new(TEMPO_CLASSES))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Entries in ascending priority order
    pub fn entries(&self) -> &[TempoClassEntry] {
        &self.entries
    }

    /// Entries of one regime, in ascending priority order
    pub fn regime_entries(&self, regime: TempoRegime) -> impl Iterator<Item = &TempoClassEntry> {
        self.entries.iter().filter(move |entry| entry.regime == regime)
    }

    /// Look up an entry by its exact label
    pub fn get(&self, label: &str) -> Option<&TempoClassEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// Look up an entry, failing with `TempoError::UnknownLabel`
    pub fn lookup(&self, label: &str) -> Result<&TempoClassEntry, TempoError> {
        self.get(label)
            .ok_or_else(|| TempoError::UnknownLabel(format!("'{}' is not a tempo class", label)))
    }
}

fn mean(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values.fold((0.0f32, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}
