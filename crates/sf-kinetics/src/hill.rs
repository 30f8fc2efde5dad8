//! Hill-type response curves.

use sf_core::Real;

/// Which Hill curve an edge uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HillForm {
    /// Rescaled so that f(0) = 0, f(EC50) = 0.5 and f(1) = 1.
    ///
    /// Only defined while `EC50^n < 0.5`. At or past that point the curve
    /// falls back to [`HillForm::Standard`], so `f(1)` drops from 1 to
    /// `1 / (1 + EC50^n)`: the response jumps as EC50 or `n` crosses the
    /// boundary.
    #[default]
    Normalized,
    /// Plain `x^n / (EC50^n + x^n)`.
    Standard,
}

/// Precomputed constants of one edge's response `f(x) = beta x^n / (k_n + x^n)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillCurve {
    form: HillForm,
    n: Real,
    beta: Real,
    k_n: Real,
}

impl HillCurve {
    /// Build the curve for Hill coefficient `n` and half-max point `ec50`.
    ///
    /// The normalized form needs `ec50^n < 0.5`; otherwise the standard form
    /// is used and `form()` reports it.
    pub fn new(form: HillForm, n: Real, ec50: Real) -> Self {
        let e = ec50.powf(n);
        match form {
            HillForm::Normalized if e < 0.5 - 1e-12 => {
                let beta = (e - 1.0) / (2.0 * e - 1.0);
                Self {
                    form,
                    n,
                    beta,
                    k_n: beta - 1.0,
                }
            }
            _ => Self {
                form: HillForm::Standard,
                n,
                beta: 1.0,
                k_n: e,
            },
        }
    }

    /// The form actually in effect after any fallback.
    pub fn form(&self) -> HillForm {
        self.form
    }

    /// Response at activity `x`. Non-positive activity gives 0; activity above
    /// 1 extrapolates the same formula.
    pub fn eval(&self, x: Real) -> Real {
        if !(x > 0.0) {
            return 0.0;
        }
        let xn = x.powf(self.n);
        if !xn.is_finite() {
            return self.beta;
        }
        self.beta * xn / (self.k_n + xn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_hits_anchor_points() {
        let c = HillCurve::new(HillForm::Normalized, 1.4, 0.5);
        assert_eq!(c.form(), HillForm::Normalized);
        assert_eq!(c.eval(0.0), 0.0);
        assert!((c.eval(0.5) - 0.5).abs() < 1e-12);
        assert!((c.eval(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn standard_half_max_at_ec50() {
        let c = HillCurve::new(HillForm::Standard, 2.0, 0.3);
        assert!((c.eval(0.3) - 0.5).abs() < 1e-12);
        assert!(c.eval(1.0) < 1.0);
    }

    #[test]
    fn falls_back_when_normalization_undefined() {
        // 0.9^2 = 0.81 >= 0.5
        let c = HillCurve::new(HillForm::Normalized, 2.0, 0.9);
        assert_eq!(c.form(), HillForm::Standard);
        assert!((c.eval(0.9) - 0.5).abs() < 1e-12);
        assert!((c.eval(1.0) - 1.0 / 1.81).abs() < 1e-12);
    }

    #[test]
    fn ceiling_jumps_at_fallback_boundary() {
        // n = 1: EC50 = 0.5 is the first value without a normalized form.
        let below = HillCurve::new(HillForm::Normalized, 1.0, 0.499);
        let at = HillCurve::new(HillForm::Normalized, 1.0, 0.5);
        assert_eq!(below.form(), HillForm::Normalized);
        assert_eq!(at.form(), HillForm::Standard);
        assert!((below.eval(1.0) - 1.0).abs() < 1e-9);
        assert!((at.eval(1.0) - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn negative_activity_is_zero() {
        let c = HillCurve::new(HillForm::Normalized, 1.4, 0.5);
        assert_eq!(c.eval(-0.3), 0.0);
        assert_eq!(c.eval(Real::NAN), 0.0);
    }

    #[test]
    fn extrapolates_above_one() {
        let c = HillCurve::new(HillForm::Normalized, 1.4, 0.5);
        let v = c.eval(2.0);
        assert!(v > 1.0 && v.is_finite());
    }

    #[test]
    fn monotone_on_unit_interval() {
        let c = HillCurve::new(HillForm::Normalized, 3.0, 0.4);
        let mut prev = 0.0;
        for k in 1..=100 {
            let v = c.eval(k as Real / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }
}
