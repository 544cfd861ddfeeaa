//! Ordinary least squares of price against sample index.

/// Fit of `price = intercept + slope·i` for `i = 0..n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient, in [-1, 1]. Zero for a flat series.
    pub r_value: f64,
}

impl LinearFit {
    /// |R|, used as trend strength.
    pub fn strength(&self) -> f64 {
        self.r_value.abs()
    }
}

/// Fit a line through the series. Needs at least two prices.
pub fn linear_regression(prices: &[f64]) -> Option<LinearFit> {
    let n = prices.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = prices.iter().sum::<f64>() / n_f;

    let mut ss_xy = 0.0;
    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    for (i, &price) in prices.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = price - mean_y;
        ss_xy += dx * dy;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
    }

    let slope = ss_xy / ss_xx;
    let r_value = if ss_yy == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
    };

    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r_value,
    })
}
