//! Configuration parameters for tempo profiling

use crate::error::TempoError;

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Dominant tempo
    /// Cumulative share of total duration that must be strictly exceeded
    /// for an interval's tempo to be dominant (default: 0.5)
    pub majority_share: f32,

    // Curve smoothing
    /// BPM added to each bounded side of a class band before clamping
    /// the smoothed curve (default: 10.0)
    pub smoothing_tolerance_bpm: f32,

    /// Largest Savitzky-Golay window in points (default: 5)
    /// The effective window is the largest odd value <= min(len, this)
    pub max_smoothing_window: usize,

    /// Savitzky-Golay polynomial order (default: 2)
    pub smoothing_poly_order: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            majority_share: 0.5,
            smoothing_tolerance_bpm: 10.0,
            max_smoothing_window: 5,
            smoothing_poly_order: 2,
        }
    }
}

impl AnalysisConfig {
    /// Check that parameters are usable before running the pipeline
    pub fn validate(&self) -> Result<(), TempoError> {
        if !(self.majority_share > 0.0 && self.majority_share < 1.0) {
            return Err(TempoError::InvalidInput(format!(
                "majority_share must be in (0, 1), got {}",
                self.majority_share
            )));
        }

        if !self.smoothing_tolerance_bpm.is_finite() || self.smoothing_tolerance_bpm < 0.0 {
            return Err(TempoError::InvalidInput(format!(
                "smoothing_tolerance_bpm must be finite and non-negative, got {}",
                self.smoothing_tolerance_bpm
            )));
        }

        if self.max_smoothing_window < 3 {
            return Err(TempoError::InvalidInput(format!(
                "max_smoothing_window must be at least 3, got {}",
                self.max_smoothing_window
            )));
        }

        // The largest usable window must still leave room for the fit
        let largest_odd = if self.max_smoothing_window % 2 == 0 {
            self.max_smoothing_window - 1
        } else {
            self.max_smoothing_window
        };
        if self.smoothing_poly_order >= largest_odd {
            return Err(TempoError::InvalidInput(format!(
                "smoothing_poly_order ({}) must be less than the smoothing window ({})",
                self.smoothing_poly_order, largest_odd
            )));
        }

        Ok(())
    }

    /// Smoothing parameters derived from this configuration
    pub fn smoothing(&self) -> SmoothingConfig {
        SmoothingConfig {
            tolerance_bpm: self.smoothing_tolerance_bpm,
            max_window: self.max_smoothing_window,
            poly_order: self.smoothing_poly_order,
        }
    }
}

/// Parameters for the curve smoother
#[derive(Debug, Clone, Copy)]
pub struct SmoothingConfig {
    /// Widening applied to each bounded side of the class band (default: 10.0)
    pub tolerance_bpm: f32,

    /// Largest filter window (default: 5)
    pub max_window: usize,

    /// Polynomial order of the local fit (default: 2)
    pub poly_order: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        AnalysisConfig::default().smoothing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_majority_share_out_of_range() {
        let config = AnalysisConfig {
            majority_share: 1.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(TempoError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_poly_order_not_below_window() {
        // Window 4 rounds down to 3, which cannot host an order-3 fit
        let config = AnalysisConfig {
            max_smoothing_window: 4,
            smoothing_poly_order: 3,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_smoothing_config_mirrors_analysis_config() {
        let smoothing = SmoothingConfig::default();
        assert_eq!(smoothing.tolerance_bpm, 10.0);
        assert_eq!(smoothing.max_window, 5);
        assert_eq!(smoothing.poly_order, 2);
    }
}
