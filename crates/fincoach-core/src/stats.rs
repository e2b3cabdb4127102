//! Descriptive statistics over plain amount slices
//!
//! All variance figures are population statistics (divide by N). Every
//! division is guarded so degenerate inputs produce 0 instead of NaN.

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn stddev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Standard score of `value`; 0 when the spread is 0
pub fn z_score(value: f64, mean: f64, stddev: f64) -> f64 {
    if stddev > 0.0 {
        (value - mean) / stddev
    } else {
        0.0
    }
}

/// `part` as a percentage of `whole`; 0 when `whole` is 0
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Least-squares slope over equally spaced points (x = 0, 1, 2, ...)
pub fn linear_trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Coefficient of variation as a percentage
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    percentage_of(stddev(values), mean(values))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
