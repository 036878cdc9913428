//! Welch's t-test and Pearson correlation over sentence compounds.
//!
//! Degenerate inputs never panic and never produce non-finite numbers:
//! too-small samples fall back to p = 1.0, and zero-variance comparisons
//! resolve by whether the means actually differ.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided significance level used across the pipeline.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

const EPS: f64 = 1e-12;

/// Welch's unequal-variance t-test between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    pub mean_a: f64,
    pub mean_b: f64,
}

/// Pearson correlation with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStrength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
}

impl Correlation {
    pub fn strength(&self) -> CorrelationStrength {
        let magnitude = self.r.abs();
        if magnitude < 0.3 {
            CorrelationStrength::VeryWeak
        } else if magnitude < 0.5 {
            CorrelationStrength::Weak
        } else if magnitude < 0.7 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Strong
        }
    }
}

impl CorrelationStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationStrength::VeryWeak => "very weak",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
        }
    }
}

/// Compare two samples without assuming equal variances. Either side with
/// fewer than two points yields p = 1.0.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> TTest {
    let mean_a = mean(a);
    let mean_b = mean(b);
    if a.len() < 2 || b.len() < 2 {
        return TTest {
            statistic: 0.0,
            p_value: 1.0,
            significant: false,
            mean_a,
            mean_b,
        };
    }

    let se_a = sample_variance(a) / a.len() as f64;
    let se_b = sample_variance(b) / b.len() as f64;
    let denom = (se_a + se_b).sqrt();
    let (statistic, p_value) = if denom <= EPS {
        if (mean_a - mean_b).abs() <= EPS {
            (0.0, 1.0)
        } else {
            // Constant samples with different means: keep the statistic
            // finite so the result stays JSON-representable.
            ((mean_a - mean_b) / EPS, 0.0)
        }
    } else {
        let statistic = (mean_a - mean_b) / denom;
        let df = (se_a + se_b).powi(2)
            / (se_a.powi(2) / (a.len() - 1) as f64 + se_b.powi(2) / (b.len() - 1) as f64);
        (statistic, two_sided_p(statistic, df))
    };

    TTest {
        statistic,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
        mean_a,
        mean_b,
    }
}

/// Pearson's r over paired values, with a t-distribution p-value. Fewer
/// than two pairs or a zero-variance side yields r = 0.0, p = 1.0.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Correlation {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Correlation { r: 0.0, p_value: 1.0 };
    }
    let mean_x = mean(&xs[..n]);
    let mean_y = mean(&ys[..n]);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= EPS || var_y <= EPS {
        return Correlation { r: 0.0, p_value: 1.0 };
    }
    let r = (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0);

    let df = (n - 2) as f64;
    let spread = 1.0 - r * r;
    let p_value = if df < 1.0 {
        1.0
    } else if spread <= EPS {
        0.0
    } else {
        two_sided_p(r * (df / spread).sqrt(), df)
    };
    Correlation { r, p_value }
}

fn two_sided_p(statistic: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased (n - 1) sample variance; 0.0 below two points.
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_samples_are_not_significant() {
        let t = welch_t_test(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!(t.statistic, 0.0);
        assert!(t.p_value > 0.95);
        assert!(!t.significant);
    }

    #[test]
    fn small_samples_fall_back_to_p_one() {
        let t = welch_t_test(&[1.0], &[2.0, 3.0]);
        assert_eq!(t.statistic, 0.0);
        assert_eq!(t.p_value, 1.0);
        assert!(!t.significant);
        assert_eq!(t.mean_a, 1.0);
        assert_eq!(t.mean_b, 2.5);
    }

    #[test]
    fn separated_samples_are_significant() {
        let a = [0.9, 1.0, 1.1, 1.0];
        let b = [-0.9, -1.0, -1.1, -1.0];
        let t = welch_t_test(&a, &b);
        assert!(t.statistic > 10.0);
        assert!(t.p_value < 0.001);
        assert!(t.significant);
    }

    #[test]
    fn welch_matches_a_worked_example() {
        // Equal variances and a one-unit mean gap: t = -1, df = 8.
        let t = welch_t_test(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!((t.statistic + 1.0).abs() < 1e-9);
        assert!(t.p_value > 0.3 && t.p_value < 0.4);
        assert!(!t.significant);
    }

    #[test]
    fn constant_samples_with_equal_means() {
        let t = welch_t_test(&[1.0, 1.0], &[1.0, 1.0]);
        assert_eq!(t.statistic, 0.0);
        assert_eq!(t.p_value, 1.0);
        assert!(!t.significant);
    }

    #[test]
    fn constant_samples_with_different_means() {
        let t = welch_t_test(&[1.0, 1.0], &[2.0, 2.0]);
        assert!(t.statistic.is_finite());
        assert!(t.statistic < 0.0);
        assert_eq!(t.p_value, 0.0);
        assert!(t.significant);
    }

    #[test]
    fn perfectly_correlated_pairs() {
        let c = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!(c.r > 0.999);
        assert_eq!(c.p_value, 0.0);
        assert_eq!(c.strength(), CorrelationStrength::Strong);
    }

    #[test]
    fn inverse_correlation_keeps_the_sign() {
        let c = pearson(&[1.0, 2.0, 3.0], &[-2.0, -4.0, -6.0]);
        assert!(c.r < -0.999);
        assert_eq!(c.strength(), CorrelationStrength::Strong);
    }

    #[test]
    fn pearson_p_value_sanity() {
        let c = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 6.0]);
        assert!(c.r > 0.8 && c.r < 0.85);
        assert!(c.p_value > 0.05 && c.p_value < 0.15);
    }

    #[test]
    fn degenerate_pearson_inputs() {
        assert_eq!(pearson(&[], &[]), Correlation { r: 0.0, p_value: 1.0 });
        assert_eq!(
            pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]),
            Correlation { r: 0.0, p_value: 1.0 }
        );
    }

    #[test]
    fn strength_bands() {
        let band = |r: f64| Correlation { r, p_value: 1.0 }.strength();
        assert_eq!(band(0.1), CorrelationStrength::VeryWeak);
        assert_eq!(band(-0.35), CorrelationStrength::Weak);
        assert_eq!(band(0.6), CorrelationStrength::Moderate);
        assert_eq!(band(-0.9), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::Moderate.as_str(), "moderate");
    }
}
