//! Tempo curve smoothing
//!
//! Smooths a raw tempo curve with a Savitzky-Golay filter and clamps the
//! result to the tolerance band of the piece's tempo class.
//!
//! # Algorithm
//!
//! 1. Look up the tolerance band of the class label (class band widened by
//!    10 BPM on each bounded side)
//! 2. Window = largest odd value <= min(len, 5); curves shorter than 3 points
//!    are returned unchanged
//! 3. Savitzky-Golay filter (order 2): each interior point is the value at the
//!    window centre of a least-squares quadratic fit; the first and last
//!    `window / 2` points are read off the fit of the first/last full window
//! 4. Clamp every value into the tolerance band
//!
//! # Example
//!
//! ```
//! use tempo_profile::smooth_tempo_curve;
//!
//! let smoothed = smooth_tempo_curve(&[100.0, 100.0, 130.0, 100.0, 100.0], "Andante")?;
//! assert_eq!(smoothed.len(), 5);
//! assert!(smoothed[2] < 130.0);
//! # Ok::<(), tempo_profile::TempoError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::classes::{TempoClassTable, ToleranceBand};
use crate::config::SmoothingConfig;
use crate::error::TempoError;

/// Curves shorter than this bypass smoothing and clamping
pub const MIN_SMOOTHING_POINTS: usize = 3;

/// Singular-matrix guard for the least-squares solve
const EPSILON: f64 = 1e-12;

/// Smoothed and clamped tempo curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCurve {
    /// Smoothed tempos in BPM, aligned with the input
    pub values: Vec<f32>,

    /// Band the values were clamped to
    pub band: ToleranceBand,

    /// Filter window, `None` when the curve was passed through
    pub window: Option<usize>,

    /// Number of values moved by clamping
    pub clamped_points: usize,
}

/// Smooth a tempo curve for a class label with default parameters
///
/// # Errors
///
/// Returns `TempoError::UnknownLabel` if `label` is not a tempo class
pub fn smooth_tempo_curve(tempos: &[f32], label: &str) -> Result<Vec<f32>, TempoError> {
    smooth_tempo_curve_with(tempos, label, &SmoothingConfig::default())
}

/// Smooth a tempo curve for a class label with explicit parameters
pub fn smooth_tempo_curve_with(
    tempos: &[f32],
    label: &str,
    config: &SmoothingConfig,
) -> Result<Vec<f32>, TempoError> {
    let entry = TempoClassTable::standard()?.lookup(label)?;
    let band = entry.rule.tolerance_band(config.tolerance_bpm);
    Ok(smooth_curve(tempos, band, config)?.values)
}

/// Smooth a tempo curve and clamp it into `band`
///
/// # Errors
///
/// Returns `TempoError::InvalidInput` if `config.max_window` leaves no usable
/// window
pub fn smooth_curve(
    tempos: &[f32],
    band: ToleranceBand,
    config: &SmoothingConfig,
) -> Result<SmoothedCurve, TempoError> {
    if tempos.len() < MIN_SMOOTHING_POINTS {
        log::debug!("Tempo curve has {} points, passing through unsmoothed", tempos.len());
        return Ok(SmoothedCurve {
            values: tempos.to_vec(),
            band,
            window: None,
            clamped_points: 0,
        });
    }

    let window = smoothing_window(tempos.len(), config.max_window);
    // Short curves shrink the window; the fit order shrinks with it
    let poly_order = config.poly_order.min(window.saturating_sub(1));

    let smoothed = savgol_filter(tempos, window, poly_order)?;
    let clamped_points = smoothed.iter().filter(|&&v| !band.contains(v)).count();
    let values = clamp_curve(&smoothed, band);

    log::debug!(
        "Smoothed {} tempo points (window {}, order {}), clamped {} into [{:?}, {:?}]",
        tempos.len(),
        window,
        poly_order,
        clamped_points,
        band.lower,
        band.upper
    );

    Ok(SmoothedCurve {
        values,
        band,
        window: Some(window),
        clamped_points,
    })
}

/// Largest odd window not exceeding `min(len, max_window)`
pub fn smoothing_window(len: usize, max_window: usize) -> usize {
    let window = len.min(max_window);
    if window % 2 == 0 {
        window.saturating_sub(1)
    } else {
        window
    }
}

/// Clamp every value into `band`; applying it twice changes nothing
pub fn clamp_curve(values: &[f32], band: ToleranceBand) -> Vec<f32> {
    values.iter().map(|&v| band.clamp(v)).collect()
}

/// Savitzky-Golay filter with interpolated edges
///
/// # Arguments
///
/// * `values` - Input sequence
/// * `window` - Odd window length, at most `values.len()`
/// * `poly_order` - Polynomial order, less than `window`
pub fn savgol_filter(
    values: &[f32],
    window: usize,
    poly_order: usize,
) -> Result<Vec<f32>, TempoError> {
    if window % 2 == 0 || window == 0 {
        return Err(TempoError::InvalidInput(format!(
            "Savitzky-Golay window must be odd, got {}",
            window
        )));
    }
    if window > values.len() {
        return Err(TempoError::InvalidInput(format!(
            "Savitzky-Golay window {} exceeds {} input points",
            window,
            values.len()
        )));
    }
    if poly_order >= window {
        return Err(TempoError::InvalidInput(format!(
            "Polynomial order {} must be less than window {}",
            poly_order, window
        )));
    }

    let n = values.len();
    let half = window / 2;
    let mut output = vec![0.0f32; n];

    let centre = fit_weights(window, poly_order, half as f64)?;
    for i in half..n - half {
        output[i] = apply(&centre, &values[i - half..=i + half]);
    }

    // Edges: evaluate the fit of the first/last full window off-centre
    let head = &values[..window];
    let tail = &values[n - window..];
    for offset in 0..half {
        let weights = fit_weights(window, poly_order, offset as f64)?;
        output[offset] = apply(&weights, head);

        let tail_offset = window - half + offset;
        let weights = fit_weights(window, poly_order, tail_offset as f64)?;
        output[n - half + offset] = apply(&weights, tail);
    }

    Ok(output)
}

fn apply(weights: &[f64], values: &[f32]) -> f32 {
    weights
        .iter()
        .zip(values)
        .map(|(&w, &v)| w * f64::from(v))
        .sum::<f64>() as f32
}

/// Least-squares weights that evaluate the order-`poly_order` fit of a
/// `window`-point sequence at position `at` (0 = first point)
fn fit_weights(window: usize, poly_order: usize, at: f64) -> Result<Vec<f64>, TempoError> {
    let terms = poly_order + 1;
    // Positions centred on the window keep the normal equations well conditioned
    let shift = (window / 2) as f64;
    let powers = |x: f64| -> Vec<f64> {
        let mut p = Vec::with_capacity(terms);
        let mut acc = 1.0;
        for _ in 0..terms {
            p.push(acc);
            acc *= x;
        }
        p
    };

    let design: Vec<Vec<f64>> = (0..window).map(|j| powers(j as f64 - shift)).collect();

    // Normal matrix A^T A
    let mut normal = vec![vec![0.0f64; terms]; terms];
    for row in &design {
        for r in 0..terms {
            for c in 0..terms {
                normal[r][c] += row[r] * row[c];
            }
        }
    }

    let z = solve(normal, powers(at - shift))?;

    Ok(design
        .iter()
        .map(|row| row.iter().zip(&z).map(|(a, b)| a * b).sum::<f64>())
        .collect())
}

/// Gaussian elimination with partial pivoting
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>, TempoError> {
    let n = rhs.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if matrix[pivot][col].abs() < EPSILON {
            return Err(TempoError::InvalidInput(
                "Savitzky-Golay normal equations are singular".to_string(),
            ));
        }

        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row][k] * x[k]).sum();
        x[row] = (rhs[row] - tail) / matrix[row][row];
    }

    Ok(x)
}
