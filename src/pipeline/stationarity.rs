//! Augmented Dickey-Fuller unit-root test
//!
//! H0: the series has a unit root (non-stationary).
//! H1: the series is stationary.
//!
//! The test regression includes a constant:
//! `Δy_t = c + γ·y_{t-1} + Σ δ_i·Δy_{t-i} + ε_t`, with the lag count chosen
//! by AIC. p-values follow MacKinnon (1994), critical values MacKinnon (2010).

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use super::columns::numeric_values;
use super::error::StatsError;
use super::ols::{design_matrix, fit_ols, OlsFit};

/// Statistic beyond which the p-value is 1
const TAU_MAX_C: f64 = 2.74;
/// Statistic below which the p-value is 0
const TAU_MIN_C: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials
const TAU_STAR_C: f64 = -1.61;
const TAU_SMALLP_C: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGEP_C: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Response-surface coefficients for the 1%, 5% and 10% critical values
const CRIT_C: [(&str, [f64; 4]); 3] = [
    ("1%", [-3.43035, -6.5393, -16.786, -79.433]),
    ("5%", [-2.86154, -2.8903, -4.234, -40.04]),
    ("10%", [-2.56677, -1.5384, -2.809, 0.0]),
];

/// ADF result for one series
#[derive(Debug, Clone, Serialize)]
pub struct AdfResult {
    pub column: String,
    pub statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
    pub critical_values: Vec<(String, f64)>,
    pub alpha: f64,
    /// True when the unit root is rejected (p < alpha)
    pub stationary: bool,
}

/// MacKinnon approximate p-value for a constant-only ADF regression.
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX_C {
        return 1.0;
    }
    if statistic < TAU_MIN_C {
        return 0.0;
    }

    let poly = |coefs: &[f64]| {
        coefs
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * statistic + c)
    };
    let z = if statistic <= TAU_STAR_C {
        poly(&TAU_SMALLP_C)
    } else {
        poly(&TAU_LARGEP_C)
    };

    // Normal(0, 1) construction cannot fail
    Normal::new(0.0, 1.0).map(|n| n.cdf(z)).unwrap_or(f64::NAN)
}

/// MacKinnon (2010) critical values for a sample of `nobs` observations.
pub fn mackinnon_critical_values(nobs: usize) -> Vec<(String, f64)> {
    let n = nobs as f64;
    CRIT_C
        .iter()
        .map(|(label, b)| {
            let value = b[0] + b[1] / n + b[2] / (n * n) + b[3] / (n * n * n);
            (label.to_string(), value)
        })
        .collect()
}

/// Default maximum lag: ceil(12 * (n/100)^(1/4)), capped so the regression is estimable.
pub fn default_max_lag(n: usize) -> Option<usize> {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let cap = (n / 2).checked_sub(2)?;
    Some(schwert.min(cap))
}

/// Regress Δy on [1, y_{t-1}, Δy_{t-1}..Δy_{t-lag}] using the last `nobs` differences.
fn adf_regression(
    values: &[f64],
    diffs: &[f64],
    lag: usize,
    nobs: usize,
) -> Result<OlsFit, StatsError> {
    let start = diffs.len() - nobs;
    let rows: Vec<Vec<f64>> = (start..diffs.len())
        .map(|t| {
            let mut row = Vec::with_capacity(lag + 2);
            row.push(1.0);
            row.push(values[t]);
            row.extend((1..=lag).map(|i| diffs[t - i]));
            row
        })
        .collect();
    let y = &diffs[start..];
    fit_ols(&design_matrix(&rows), y, "ADF regression")
}

/// Run the ADF test on a series.
///
/// `max_lag` defaults to the Schwert rule. The lag is selected by minimum AIC
/// over a common sample, then the regression is re-estimated on all
/// observations available at that lag.
pub fn adf_test(
    column: &str,
    values: &[f64],
    max_lag: Option<usize>,
    alpha: f64,
) -> Result<AdfResult, StatsError> {
    let n = values.len();
    let insufficient = || StatsError::InsufficientData {
        procedure: "ADF test",
        required: 6,
        actual: n,
    };

    let cap = default_max_lag(n).ok_or_else(insufficient)?;
    let max_lag = max_lag.map_or(cap, |m| m.min(cap));

    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    // diffs[t] = y[t+1] - y[t]; its level regressor is values[t]
    let common_nobs = diffs.len() - max_lag;
    if common_nobs <= max_lag + 2 {
        return Err(insufficient());
    }

    let mut best: Option<(f64, usize)> = None;
    for lag in 0..=max_lag {
        let fit = match adf_regression(values, &diffs, lag, common_nobs) {
            Ok(fit) => fit,
            Err(StatsError::SingularMatrix { .. }) => continue,
            Err(e) => return Err(e),
        };
        let aic = fit.aic();
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lag));
        }
    }

    let (_, used_lag) = best.ok_or(StatsError::ZeroVariance {
        column: column.to_string(),
    })?;

    let nobs = diffs.len() - used_lag;
    let fit = adf_regression(values, &diffs, used_lag, nobs).map_err(|e| match e {
        StatsError::SingularMatrix { .. } => StatsError::ZeroVariance {
            column: column.to_string(),
        },
        other => other,
    })?;

    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return Err(StatsError::ZeroVariance {
            column: column.to_string(),
        });
    }
    let p_value = mackinnon_p_value(statistic);

    Ok(AdfResult {
        column: column.to_string(),
        statistic,
        p_value,
        used_lag,
        nobs,
        critical_values: mackinnon_critical_values(nobs),
        alpha,
        stationary: p_value < alpha,
    })
}

/// Run the ADF test on several columns of the table in parallel.
///
/// Results keep the order of `columns`.
pub fn check_stationarity<S: AsRef<str> + Sync>(
    df: &DataFrame,
    columns: &[S],
    alpha: f64,
) -> Result<Vec<AdfResult>, StatsError> {
    let series: Vec<(String, Vec<f64>)> = columns
        .iter()
        .map(|c| Ok((c.as_ref().to_string(), numeric_values(df, c.as_ref())?)))
        .collect::<Result<_, StatsError>>()?;

    series
        .par_iter()
        .map(|(name, values)| adf_test(name, values, None, alpha))
        .collect()
}
