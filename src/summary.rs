//! Small numeric helpers shared by the derived views.

use crate::error::FitError;

/// Quantile of an ascending slice, linearly interpolated between ranks.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Centered sums of squares and cross products over paired values.
#[derive(Debug, Clone, Copy)]
pub struct PairMoments {
    pub n: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    pub sxx: f64,
    pub syy: f64,
    pub sxy: f64,
}

impl PairMoments {
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Option<Self> {
        let n = pairs.len();
        if n == 0 {
            return None;
        }
        let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for (x, y) in pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        Some(Self {
            n,
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
        })
    }
}

/// Pearson coefficient; `None` when fewer than two pairs or either side is constant.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let m = PairMoments::from_pairs(pairs)?;
    if m.n < 2 || m.sxx == 0.0 || m.syy == 0.0 {
        return None;
    }
    Some((m.sxy / (m.sxx * m.syy).sqrt()).clamp(-1.0, 1.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsCoefficients {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: Option<f64>,
}

pub fn ordinary_least_squares(pairs: &[(f64, f64)]) -> Result<OlsCoefficients, FitError> {
    if pairs.len() < 2 {
        return Err(FitError::TooFewPoints);
    }
    let m = PairMoments::from_pairs(pairs).ok_or(FitError::TooFewPoints)?;
    if m.sxx == 0.0 {
        return Err(FitError::ZeroVariance);
    }
    let slope = m.sxy / m.sxx;
    let intercept = m.mean_y - slope * m.mean_x;
    let r_squared = (m.syy != 0.0).then(|| (m.sxy * m.sxy) / (m.sxx * m.syy));
    Ok(OlsCoefficients {
        slope,
        intercept,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&v, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&v, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&v, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn ols_recovers_exact_line() {
        let pairs = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
        let fit = ordinary_least_squares(&pairs).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_x_has_no_fit() {
        let pairs = [(1.0, 1.0), (1.0, 3.0)];
        assert_eq!(ordinary_least_squares(&pairs), Err(FitError::ZeroVariance));
        assert_eq!(pearson(&pairs), None);
    }
}
