use crate::SfError;

/// Floating point type used throughout the system.
pub type Real = f64;

/// Absolute/relative tolerance pair for integrator step acceptance: a step
/// is accepted when `|err_i| <= abs + rel * |y_i|` for every component.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

/// Step acceptance used for network simulations: absolute bound only.
impl Default for Tolerances {
    fn default() -> Self {
        Self { abs: 1e-6, rel: 0.0 }
    }
}

impl Tolerances {
    /// Per-component error scale `abs + rel * |y|`.
    pub fn scale(&self, y: Real) -> Real {
        self.abs + self.rel * y.abs()
    }
}

/// Check every entry of a slice, reporting the first non-finite value.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), SfError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(SfError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// Check that a slice has the expected length.
pub fn ensure_len(values: &[Real], expected: usize, what: &'static str) -> Result<(), SfError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(SfError::LengthMismatch {
            what,
            expected,
            actual: values.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerance_is_absolute() {
        let tol = Tolerances::default();
        assert_eq!(tol.rel, 0.0);
        assert_eq!(tol.scale(1000.0), tol.scale(0.0));
    }

    #[test]
    fn ensure_all_finite_reports_first_bad_value() {
        let err = ensure_all_finite(&[0.0, Real::INFINITY, Real::NAN], "y").unwrap_err();
        assert!(matches!(err, SfError::NonFinite { value, .. } if value.is_infinite()));
    }

    #[test]
    fn ensure_len_mismatch() {
        let err = ensure_len(&[1.0, 2.0], 3, "tau").unwrap_err();
        assert_eq!(
            err,
            SfError::LengthMismatch {
                what: "tau",
                expected: 3,
                actual: 2
            }
        );
    }

    proptest::proptest! {
        #[test]
        fn scale_never_below_abs(y in -1e9f64..1e9) {
            let tol = Tolerances { abs: 1e-6, rel: 1e-3 };
            proptest::prop_assert!(tol.scale(y) >= tol.abs);
        }
    }
}
