//! ARIMA forecasting with automatic order selection
//!
//! The series is differenced (optionally seasonally, then regularly until the
//! ADF test rejects a unit root), a grid of multiplicative ARMA(p, q)(P, Q)[m]
//! models is fitted by least squares on the differenced series and scored by
//! AIC over a common sample, and the lowest-AIC model produces an
//! h-step forecast integrated back to the original scale. Confidence bands
//! come from the ψ-weights of the full model including the differencing
//! polynomials.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use super::columns::require_columns;
use super::error::StatsError;
use super::ols::{design_matrix, fit_ols};
use super::stationarity::adf_test;
use crate::utils::create_fit_bar;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reflection coefficients at or beyond this magnitude count as a unit root
const UNIT_ROOT_MARGIN: f64 = 1.0 - 1e-6;

/// Forecasting parameters
#[derive(Debug, Clone, Serialize)]
pub struct ForecastConfig {
    pub horizon: usize,
    /// Two-sided coverage of the forecast band, e.g. 0.95
    pub confidence: f64,
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
    /// Seasonal period m; enables seasonal differencing (D = 1) and the
    /// seasonal AR/MA terms
    pub seasonal_period: Option<usize>,
    pub max_seasonal_p: usize,
    pub max_seasonal_q: usize,
    /// Significance level used when choosing the differencing order
    pub alpha: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 365,
            confidence: 0.95,
            max_p: 3,
            max_d: 2,
            max_q: 3,
            seasonal_period: None,
            max_seasonal_p: 1,
            max_seasonal_q: 1,
            alpha: 0.05,
        }
    }
}

/// Order of the selected model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub seasonal_p: usize,
    /// Seasonal differencing order (0 or 1)
    pub seasonal_d: usize,
    pub seasonal_q: usize,
    pub period: Option<usize>,
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)?;
        if let (1, Some(m)) = (self.seasonal_d, self.period) {
            write!(f, "({},1,{})[{}]", self.seasonal_p, self.seasonal_q, m)?;
        }
        Ok(())
    }
}

/// Forecast output with the fitted model summary
#[derive(Debug, Clone, Serialize)]
pub struct ArimaForecast {
    pub column: String,
    pub order: ArimaOrder,
    pub ar_coefficients: Vec<f64>,
    pub ma_coefficients: Vec<f64>,
    pub seasonal_ar_coefficients: Vec<f64>,
    pub seasonal_ma_coefficients: Vec<f64>,
    /// Mean of the differenced series (0 when no intercept)
    pub intercept: f64,
    pub sigma2: f64,
    pub aic: f64,
    pub n_obs: usize,
    pub candidates_evaluated: usize,
    /// True when no ARMA candidate fitted and ARIMA(0,d,0) was used
    pub fallback: bool,
    pub horizon: usize,
    pub confidence: f64,
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// A numeric column as an ordered, evenly spaced sequence
#[derive(Debug, Clone)]
pub struct TimeSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub timestamps: Option<Vec<NaiveDateTime>>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse the timestamp layouts found in weather exports.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Pull a numeric column out as a time series.
///
/// When `timestamp_column` names a column present in the table, rows are
/// stably sorted by its parsed value; an absent timestamp column keeps row
/// order. Rows with a missing value are skipped.
pub fn extract_series(
    df: &DataFrame,
    value_column: &str,
    timestamp_column: Option<&str>,
) -> Result<TimeSeries, StatsError> {
    require_columns(df, &[value_column])?;
    let values = df.column(value_column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let ts_column = timestamp_column.filter(|name| {
        df.get_column_names()
            .iter()
            .any(|c| c.as_str() == *name)
    });

    let Some(ts_name) = ts_column else {
        return Ok(TimeSeries {
            name: value_column.to_string(),
            values: values.iter().flatten().filter(|v| v.is_finite()).collect(),
            timestamps: None,
        });
    };

    let stamps = df.column(ts_name)?.cast(&DataType::String)?;
    let stamps = stamps.str()?;

    let mut rows: Vec<(NaiveDateTime, f64)> = Vec::with_capacity(values.len());
    for (row, (value, stamp)) in values.iter().zip(stamps.iter()).enumerate() {
        let (Some(value), Some(stamp)) = (value, stamp) else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        let parsed = parse_timestamp(stamp).ok_or_else(|| StatsError::InvalidTimestamp {
            column: ts_name.to_string(),
            row,
            value: stamp.to_string(),
        })?;
        rows.push((parsed, value));
    }
    rows.sort_by_key(|(ts, _)| *ts);

    let (timestamps, values): (Vec<NaiveDateTime>, Vec<f64>) = rows.into_iter().unzip();
    Ok(TimeSeries {
        name: value_column.to_string(),
        values,
        timestamps: Some(timestamps),
    })
}

/// Lag-`lag` difference of a series.
pub fn difference(data: &[f64], lag: usize) -> Vec<f64> {
    if lag == 0 || data.len() <= lag {
        return Vec::new();
    }
    (lag..data.len()).map(|t| data[t] - data[t - lag]).collect()
}

/// Undo a lag-`lag` difference for forecast values that follow `history`.
fn undifference(history: &[f64], forecasts: &[f64], lag: usize) -> Vec<f64> {
    let mut extended = history.to_vec();
    for &f in forecasts {
        let base = extended[extended.len() - lag];
        extended.push(f + base);
    }
    extended.split_off(history.len())
}

fn is_constant(data: &[f64]) -> bool {
    data.windows(2).all(|w| w[0] == w[1])
}

/// Smallest d in 0..=max_d whose d-th difference passes the ADF test.
///
/// Stops early when the series becomes constant or too short to test.
pub fn select_differencing_order(data: &[f64], max_d: usize, alpha: f64) -> usize {
    let mut current = data.to_vec();
    for d in 0..max_d {
        if is_constant(&current) {
            return d;
        }
        match adf_test("differenced", &current, None, alpha) {
            Ok(result) if result.stationary => return d,
            Ok(_) => {}
            Err(_) => return d,
        }
        let next = difference(&current, 1);
        if next.is_empty() {
            return d;
        }
        current = next;
    }
    max_d
}

/// Step-down test: true when 1 - Σ c_i z^i has all roots outside the unit circle.
pub fn is_stationary_polynomial(coefficients: &[f64]) -> bool {
    let mut a = coefficients.to_vec();
    for k in (1..=a.len()).rev() {
        let kappa = a[k - 1];
        if !kappa.is_finite() || kappa.abs() >= UNIT_ROOT_MARGIN {
            return false;
        }
        let denom = 1.0 - kappa * kappa;
        let previous: Vec<f64> = (1..k)
            .map(|i| (a[i - 1] + kappa * a[k - i - 1]) / denom)
            .collect();
        a = previous;
    }
    true
}

/// One point of the order grid: ARMA(p, q) x seasonal ARMA(P, Q) at lag m
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    p: usize,
    q: usize,
    seasonal_p: usize,
    seasonal_q: usize,
}

impl Candidate {
    fn n_params(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Highest lag of the expanded AR polynomial
    fn ar_span(&self, m: usize) -> usize {
        self.p + self.seasonal_p * m
    }

    fn has_enough_data(&self, n: usize, m: usize) -> bool {
        let span = self.p + self.q + (self.seasonal_p + self.seasonal_q) * m;
        self.n_params() == 0 || n >= 2 * span + 10
    }
}

/// Non-seasonal and seasonal factors of a multiplicative ARMA model
#[derive(Debug, Clone, Default)]
struct ArmaCoefficients {
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
}

/// Fitted ARMA model on a (differenced) series
#[derive(Debug, Clone)]
struct ArmaFit {
    candidate: Candidate,
    coefficients: ArmaCoefficients,
    /// AR and MA polynomials with the seasonal factors multiplied in
    full_ar: Vec<f64>,
    full_ma: Vec<f64>,
    mean: f64,
    sigma2: f64,
    aic: f64,
    /// Conditional residuals aligned with the series (zero before the AR span)
    residuals: Vec<f64>,
}

/// Conditional residuals e_t = x_t - Σ ar_i·x_{t-i·lag} - Σ ma_j·e_{t-j·lag}.
fn arma_filter(x: &[f64], ar: &[f64], ma: &[f64], lag: usize) -> Vec<f64> {
    let start = ar.len() * lag;
    let mut residuals = vec![0.0; x.len()];
    for t in start..x.len() {
        let ar_part: f64 = ar
            .iter()
            .enumerate()
            .map(|(i, c)| c * x[t - (i + 1) * lag])
            .sum();
        let ma_part: f64 = ma
            .iter()
            .enumerate()
            .filter(|(j, _)| t >= (j + 1) * lag)
            .map(|(j, c)| c * residuals[t - (j + 1) * lag])
            .sum();
        residuals[t] = x[t] - ar_part - ma_part;
    }
    residuals
}

/// OLS fit of x_t on x_{t-lag}, ..., x_{t-p·lag} (series already centered).
fn estimate_ar(x: &[f64], p: usize, lag: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    let n = x.len();
    let span = p * lag;
    if n <= 2 * span {
        return None;
    }
    let rows: Vec<Vec<f64>> = (span..n)
        .map(|t| (1..=p).map(|i| x[t - i * lag]).collect())
        .collect();
    let fit = fit_ols(&design_matrix(&rows), &x[span..], "AR estimation").ok()?;
    Some((fit.coefficients, fit.residuals))
}

/// Hannan-Rissanen two-stage regression for ARMA(p, q) at lag spacing `lag`, q > 0.
fn estimate_arma(x: &[f64], p: usize, q: usize, lag: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    let n = x.len();
    let long_order = (p + q).max(10).min(n / (4 * lag));
    if long_order == 0 {
        return None;
    }

    // Stage 1: long AR residuals approximate the innovations
    let (_, long_residuals) = estimate_ar(x, long_order, lag)?;
    let mut innovations = vec![0.0; n];
    innovations[long_order * lag..].copy_from_slice(&long_residuals);

    // Stage 2: regress on lagged values and lagged innovations
    let start = (long_order + q) * lag;
    if n <= start + p + q + 1 {
        return None;
    }
    let rows: Vec<Vec<f64>> = (start..n)
        .map(|t| {
            (1..=p)
                .map(|i| x[t - i * lag])
                .chain((1..=q).map(|j| innovations[t - j * lag]))
                .collect()
        })
        .collect();
    let fit = fit_ols(&design_matrix(&rows), &x[start..], "ARMA estimation").ok()?;

    let ar = fit.coefficients[..p].to_vec();
    let ma = fit.coefficients[p..].to_vec();
    Some((ar, ma))
}

/// Estimate one ARMA factor: OLS for pure AR, Hannan-Rissanen otherwise.
fn estimate_factor(x: &[f64], p: usize, q: usize, lag: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    match (p, q) {
        (0, 0) => Some((Vec::new(), Vec::new())),
        (_, 0) => Some((estimate_ar(x, p, lag)?.0, Vec::new())),
        _ => estimate_arma(x, p, q, lag),
    }
}

fn is_invertible(ma: &[f64]) -> bool {
    let negated: Vec<f64> = ma.iter().map(|t| -t).collect();
    is_stationary_polynomial(&negated)
}

/// Number of alternating passes between the seasonal and non-seasonal factors
const SEASONAL_PASSES: usize = 3;

/// Estimate both factors by alternating: the seasonal factor is fitted on the
/// series with the non-seasonal factor filtered out, and vice versa.
fn estimate_seasonal_arma(x: &[f64], candidate: Candidate, m: usize) -> Option<ArmaCoefficients> {
    if candidate.seasonal_p + candidate.seasonal_q == 0 {
        let (ar, ma) = estimate_factor(x, candidate.p, candidate.q, 1)?;
        return Some(ArmaCoefficients {
            ar,
            ma,
            ..ArmaCoefficients::default()
        });
    }

    let mut coefficients = ArmaCoefficients::default();
    for _ in 0..SEASONAL_PASSES {
        let v = arma_filter(x, &coefficients.ar, &coefficients.ma, 1);
        let (seasonal_ar, seasonal_ma) = estimate_factor(
            v.get(coefficients.ar.len()..)?,
            candidate.seasonal_p,
            candidate.seasonal_q,
            m,
        )?;
        if !is_invertible(&seasonal_ma) {
            return None;
        }

        let u = arma_filter(x, &seasonal_ar, &seasonal_ma, m);
        let (ar, ma) = estimate_factor(
            u.get(seasonal_ar.len() * m..)?,
            candidate.p,
            candidate.q,
            1,
        )?;
        if !is_invertible(&ma) {
            return None;
        }

        coefficients = ArmaCoefficients {
            ar,
            ma,
            seasonal_ar,
            seasonal_ma,
        };
    }
    Some(coefficients)
}

/// Dense backshift polynomial 1 + sign·Σ c_i·B^{i·lag}.
fn lag_polynomial(coefficients: &[f64], lag: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * lag + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * lag] = sign * c;
    }
    poly
}

/// Multiply two polynomials in the backshift operator.
fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// AR coefficients of φ(B)·Φ(B^m) in the `x_t = Σ c_i x_{t-i}` convention.
fn expand_ar(ar: &[f64], seasonal_ar: &[f64], m: usize) -> Vec<f64> {
    let poly = poly_mul(&lag_polynomial(ar, 1, -1.0), &lag_polynomial(seasonal_ar, m, -1.0));
    poly[1..].iter().map(|c| -c).collect()
}

/// MA coefficients of θ(B)·Θ(B^m).
fn expand_ma(ma: &[f64], seasonal_ma: &[f64], m: usize) -> Vec<f64> {
    poly_mul(&lag_polynomial(ma, 1, 1.0), &lag_polynomial(seasonal_ma, m, 1.0))[1..].to_vec()
}

/// Fit one candidate to `w` and score it on `w[score_start..]`.
///
/// Every candidate of a grid shares `score_start`, so their AIC values are
/// computed over the same observations. Returns None when the model cannot
/// be estimated or is non-stationary / non-invertible.
fn fit_arma(
    w: &[f64],
    candidate: Candidate,
    m: usize,
    include_mean: bool,
    score_start: usize,
) -> Option<ArmaFit> {
    let n = w.len();
    if n == 0 || score_start >= n || !candidate.has_enough_data(n, m) {
        return None;
    }

    let mean = if include_mean {
        w.iter().sum::<f64>() / n as f64
    } else {
        0.0
    };
    let x: Vec<f64> = w.iter().map(|v| v - mean).collect();

    let coefficients = estimate_seasonal_arma(&x, candidate, m)?;
    if !is_stationary_polynomial(&coefficients.ar)
        || !is_stationary_polynomial(&coefficients.seasonal_ar)
        || !is_invertible(&coefficients.ma)
        || !is_invertible(&coefficients.seasonal_ma)
    {
        return None;
    }

    let full_ar = expand_ar(&coefficients.ar, &coefficients.seasonal_ar, m);
    let full_ma = expand_ma(&coefficients.ma, &coefficients.seasonal_ma, m);
    let residuals = arma_filter(&x, &full_ar, &full_ma, 1);

    let effective = &residuals[score_start.max(full_ar.len())..];
    let n_eff = effective.len() as f64;
    let sigma2 = effective.iter().map(|e| e * e).sum::<f64>() / n_eff;
    if !sigma2.is_finite() {
        return None;
    }

    let k = (candidate.n_params() + usize::from(include_mean) + 1) as f64;
    let aic = if sigma2 > 0.0 {
        n_eff * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0) + 2.0 * k
    } else {
        f64::NEG_INFINITY
    };

    Some(ArmaFit {
        candidate,
        coefficients,
        full_ar,
        full_ma,
        mean,
        sigma2,
        aic,
        residuals,
    })
}

/// Recursive h-step forecast of the differenced series.
fn forecast_arma(fit: &ArmaFit, w: &[f64], horizon: usize) -> Vec<f64> {
    let mut x: Vec<f64> = w.iter().map(|v| v - fit.mean).collect();
    let mut e = fit.residuals.clone();
    let mut out = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let len = x.len();
        let ar_part: f64 = (1..=fit.full_ar.len())
            .filter(|&i| len >= i)
            .map(|i| fit.full_ar[i - 1] * x[len - i])
            .sum();
        let ma_part: f64 = (1..=fit.full_ma.len())
            .filter(|&j| len >= j)
            .map(|j| fit.full_ma[j - 1] * e[len - j])
            .sum();
        let next = ar_part + ma_part;
        x.push(next);
        e.push(0.0);
        out.push(next + fit.mean);
    }
    out
}

/// MA(∞) weights ψ_0..ψ_{h-1} of φ(B)(1-B)^d(1-B^m)^D x_t = θ(B) e_t.
fn psi_weights(ar: &[f64], ma: &[f64], d: usize, seasonal: Option<usize>, horizon: usize) -> Vec<f64> {
    let mut poly = lag_polynomial(ar, 1, -1.0);
    for _ in 0..d {
        poly = poly_mul(&poly, &[1.0, -1.0]);
    }
    if let Some(m) = seasonal {
        poly = poly_mul(&poly, &lag_polynomial(&[1.0], m, -1.0));
    }
    let full_ar: Vec<f64> = poly.iter().skip(1).map(|c| -c).collect();

    let mut psi = Vec::with_capacity(horizon);
    for j in 0..horizon {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let theta = if j <= ma.len() { ma[j - 1] } else { 0.0 };
        let ar_part: f64 = (1..=full_ar.len().min(j))
            .map(|i| full_ar[i - 1] * psi[j - i])
            .sum();
        psi.push(theta + ar_part);
    }
    psi
}

/// Seasonal period actually used: at least 2 and short enough to leave
/// more than `2m + 10` observations.
fn usable_period(seasonal_period: Option<usize>, n: usize) -> Option<usize> {
    seasonal_period.filter(|&m| {
        m >= 2
            && m.checked_mul(2)
                .and_then(|v| v.checked_add(10))
                .is_some_and(|limit| n > limit)
    })
}

fn candidate_grid(config: &ForecastConfig, seasonal: bool) -> Vec<Candidate> {
    let (max_sp, max_sq) = if seasonal {
        (config.max_seasonal_p, config.max_seasonal_q)
    } else {
        (0, 0)
    };

    let mut grid = Vec::new();
    for p in 0..=config.max_p {
        for q in 0..=config.max_q {
            for seasonal_p in 0..=max_sp {
                for seasonal_q in 0..=max_sq {
                    grid.push(Candidate {
                        p,
                        q,
                        seasonal_p,
                        seasonal_q,
                    });
                }
            }
        }
    }
    grid
}

/// Fit an automatically order-selected ARIMA model and forecast `config.horizon` steps.
pub fn forecast_arima(
    column: &str,
    values: &[f64],
    config: &ForecastConfig,
) -> Result<ArimaForecast, StatsError> {
    let n = values.len();
    if n == 0 {
        return Err(StatsError::InsufficientData {
            procedure: "ARIMA forecast",
            required: 1,
            actual: 0,
        });
    }

    // Each stage keeps the series before differencing and the lag used
    let mut stages: Vec<(Vec<f64>, usize)> = Vec::new();
    let mut w = values.to_vec();

    let period = usable_period(config.seasonal_period, n);
    if let Some(m) = period {
        let next = difference(&w, m);
        stages.push((std::mem::replace(&mut w, next), m));
    }

    let d = select_differencing_order(&w, config.max_d, config.alpha);
    for _ in 0..d {
        let next = difference(&w, 1);
        stages.push((std::mem::replace(&mut w, next), 1));
    }

    let seasonal_d = usize::from(period.is_some());
    let include_mean = d + seasonal_d < 2;
    let m = period.unwrap_or(1);

    let grid = candidate_grid(config, period.is_some());
    let score_start = grid
        .iter()
        .filter(|c| c.has_enough_data(w.len(), m))
        .map(|c| c.ar_span(m))
        .max()
        .unwrap_or(0);

    let pb = create_fit_bar(grid.len() as u64);
    let fits: Vec<ArmaFit> = grid
        .par_iter()
        .filter_map(|&candidate| {
            let fit = fit_arma(&w, candidate, m, include_mean, score_start);
            pb.inc(1);
            fit
        })
        .collect();
    pb.finish_and_clear();

    let candidates_evaluated = grid.len();
    let best = fits.into_iter().min_by(|a, b| {
        a.aic
            .partial_cmp(&b.aic)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.candidate.n_params().cmp(&b.candidate.n_params()))
    });

    let (fit, fallback) = match best {
        Some(fit) => (fit, false),
        None => {
            let white_noise = Candidate {
                p: 0,
                q: 0,
                seasonal_p: 0,
                seasonal_q: 0,
            };
            let fit = fit_arma(&w, white_noise, m, include_mean, 0).ok_or(
                StatsError::InsufficientData {
                    procedure: "ARIMA forecast",
                    required: 1,
                    actual: w.len(),
                },
            )?;
            (fit, true)
        }
    };

    let mut point = forecast_arma(&fit, &w, config.horizon);
    for (history, lag) in stages.iter().rev() {
        point = undifference(history, &point, *lag);
    }

    let psi = psi_weights(&fit.full_ar, &fit.full_ma, d, period, config.horizon);
    let z = Normal::new(0.0, 1.0)
        .map_err(|e| StatsError::Distribution(e.to_string()))?
        .inverse_cdf(0.5 + config.confidence / 2.0);

    let mut cumulative = 0.0;
    let (lower, upper): (Vec<f64>, Vec<f64>) = point
        .iter()
        .zip(psi.iter())
        .map(|(&f, &psi_j)| {
            cumulative += psi_j * psi_j;
            let se = (fit.sigma2 * cumulative).sqrt();
            (f - z * se, f + z * se)
        })
        .unzip();

    let candidate = fit.candidate;
    Ok(ArimaForecast {
        column: column.to_string(),
        order: ArimaOrder {
            p: candidate.p,
            d,
            q: candidate.q,
            seasonal_p: candidate.seasonal_p,
            seasonal_d,
            seasonal_q: candidate.seasonal_q,
            period,
        },
        ar_coefficients: fit.coefficients.ar,
        ma_coefficients: fit.coefficients.ma,
        seasonal_ar_coefficients: fit.coefficients.seasonal_ar,
        seasonal_ma_coefficients: fit.coefficients.seasonal_ma,
        intercept: fit.mean,
        sigma2: fit.sigma2,
        aic: fit.aic,
        n_obs: n,
        candidates_evaluated,
        fallback,
        horizon: config.horizon,
        confidence: config.confidence,
        point,
        lower,
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_difference() {
        let data = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&data, 1), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(difference(&data, 2), vec![5.0, 7.0, 9.0]);
        assert!(difference(&data, 5).is_empty());
    }

    #[test]
    fn test_undifference_inverts_difference() {
        let data = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        let restored = undifference(&data[..2], &difference(&data, 1)[1..], 1);
        assert_eq!(restored, vec![6.0, 10.0, 15.0]);
    }

    #[test]
    fn test_stationary_polynomial() {
        assert!(is_stationary_polynomial(&[]));
        assert!(is_stationary_polynomial(&[0.5]));
        assert!(!is_stationary_polynomial(&[1.0]));
        assert!(!is_stationary_polynomial(&[-1.2]));
        // 1 - 0.5B - 0.3B^2 is stationary; 1 - 0.5B - 0.6B^2 is not
        assert!(is_stationary_polynomial(&[0.5, 0.3]));
        assert!(!is_stationary_polynomial(&[0.5, 0.6]));
    }

    #[test]
    fn test_psi_weights_random_walk() {
        let psi = psi_weights(&[], &[], 1, None, 5);
        assert_eq!(psi, vec![1.0; 5]);
    }

    #[test]
    fn test_psi_weights_ar1() {
        let psi = psi_weights(&[0.5], &[], 0, None, 4);
        let expected = [1.0, 0.5, 0.25, 0.125];
        for (a, b) in psi.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_seasonal_psi_weights_repeat_every_period() {
        let psi = psi_weights(&[], &[], 0, Some(3), 7);
        assert_eq!(psi, vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_arma_filter_with_lag() {
        let residuals = arma_filter(&[1.0, 2.0, 3.0, 4.0], &[0.5], &[], 2);
        assert_eq!(residuals, vec![0.0, 0.0, 2.5, 3.0]);
    }

    #[test]
    fn test_expand_multiplicative_polynomials() {
        // (1 - 0.5B)(1 - 0.3B^4)
        let ar = expand_ar(&[0.5], &[0.3], 4);
        let expected = [0.5, 0.0, 0.0, 0.3, -0.15];
        assert_eq!(ar.len(), expected.len());
        for (a, b) in ar.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }

        // (1 + 0.4B)(1 + 0.2B^3)
        let ma = expand_ma(&[0.4], &[0.2], 3);
        let expected = [0.4, 0.0, 0.2, 0.08];
        for (a, b) in ma.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(expand_ar(&[0.5], &[], 12), vec![0.5]);
    }

    #[test]
    fn test_usable_period() {
        assert_eq!(usable_period(Some(7), 30), Some(7));
        assert_eq!(usable_period(Some(7), 24), None);
        assert_eq!(usable_period(Some(1), 500), None);
        assert_eq!(usable_period(None, 500), None);
        assert_eq!(usable_period(Some(usize::MAX), 500), None);
        assert_eq!(usable_period(Some(usize::MAX / 2), 500), None);
    }

    #[test]
    fn test_aic_differences_do_not_depend_on_scale() {
        let mut rng = StdRng::seed_from_u64(11);
        let base: Vec<f64> = (0..300).map(|_| rng.gen::<f64>() - 0.5).collect();
        let candidate = |p| Candidate {
            p,
            q: 0,
            seasonal_p: 0,
            seasonal_q: 0,
        };

        let gaps: Vec<f64> = [0.1, 1.0, 20.0]
            .iter()
            .map(|scale| {
                let w: Vec<f64> = base.iter().map(|v| v * scale).collect();
                let white = fit_arma(&w, candidate(0), 1, true, 3).unwrap();
                let ar3 = fit_arma(&w, candidate(3), 1, true, 3).unwrap();
                ar3.aic - white.aic
            })
            .collect();

        assert!((gaps[0] - gaps[1]).abs() < 1e-6, "{:?}", gaps);
        assert!((gaps[1] - gaps[2]).abs() < 1e-6, "{:?}", gaps);
    }

    #[test]
    fn test_candidate_grid_sizes() {
        let config = ForecastConfig::default();
        assert_eq!(candidate_grid(&config, false).len(), 16);
        assert_eq!(candidate_grid(&config, true).len(), 64);
        assert!(candidate_grid(&config, false)
            .iter()
            .all(|c| c.seasonal_p == 0 && c.seasonal_q == 0));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-16 13:15").is_some());
        assert!(parse_timestamp("2024-05-16 13:15:42").is_some());
        assert!(parse_timestamp("2024-05-16T13:15:42").is_some());
        assert!(parse_timestamp("2024-05-16").is_some());
        assert!(parse_timestamp("16/05/2024").is_none());
    }
}
