use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{classify::ValueClass, common::ClassifyError, map::ZoneLayer};

/// Four non-decreasing thresholds partitioning values into five ordered classes.
/// Deserialization goes through [`ClassBreakpoints::new`], so invalid sets are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]")]
pub struct ClassBreakpoints([f64; 4]);

impl Default for ClassBreakpoints {
    fn default() -> Self { Self::DEFAULT }
}

impl TryFrom<[f64; 4]> for ClassBreakpoints {
    type Error = ClassifyError;

    fn try_from(values: [f64; 4]) -> Result<Self, Self::Error> { Self::new(values) }
}

impl ClassBreakpoints {
    /// Fixed thresholds used by the jobs dashboards.
    pub const DEFAULT: ClassBreakpoints = ClassBreakpoints([591.0, 1097.0, 1356.0, 2742.0]);

    /// Validate and wrap four thresholds.
    pub fn new(values: [f64; 4]) -> Result<Self, ClassifyError> {
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() { return Err(ClassifyError::NonFinite { index, value }) }
        }
        for index in 1..values.len() {
            let (prev, next) = (values[index - 1], values[index]);
            if prev > next { return Err(ClassifyError::Decreasing { index, prev, next }) }
        }
        Ok(Self(values))
    }

    /// Validate thresholds from a slice. Fewer than four falls back to [`Self::DEFAULT`];
    /// anything past the fourth is ignored.
    pub fn from_slice(values: &[f64]) -> Result<Self, ClassifyError> {
        match values {
            [a, b, c, d, ..] => Self::new([*a, *b, *c, *d]),
            _ => {
                warn!(count = values.len(), "fewer than 4 breakpoints supplied, using defaults");
                Ok(Self::DEFAULT)
            }
        }
    }

    /// Five equal intervals from 0 to the maximum value over all zones of all layers.
    /// Without a positive finite maximum the defaults are used.
    pub fn dynamic<'a>(layers: impl IntoIterator<Item = &'a ZoneLayer>) -> Self {
        Self::equal_intervals(layers.into_iter().flat_map(|layer| layer.values()))
    }

    /// Five equal intervals from 0 to the maximum of `values` (non-finite values ignored).
    pub fn equal_intervals(values: impl IntoIterator<Item = f64>) -> Self {
        let max = values.into_iter()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);

        if !(max.is_finite() && max > 0.0) {
            warn!("no positive values to derive dynamic breakpoints from, using defaults");
            return Self::DEFAULT;
        }
        let step = max / 5.0;
        Self([step, 2.0 * step, 3.0 * step, 4.0 * step])
    }

    /// Get the thresholds.
    #[inline] pub fn values(&self) -> &[f64; 4] { &self.0 }

    /// Classify a value. Non-finite values fall in the lowest class.
    pub fn classify(&self, value: f64) -> ValueClass {
        if !value.is_finite() { return ValueClass::VeryLow }
        let index = self.0.iter().take_while(|&&threshold| value >= threshold).count();
        ValueClass::ALL[index]
    }
}

/// Classify `value` against loose breakpoints: `v < b[0]` is class 0, `b[i-1] <= v < b[i]`
/// is class `i`, `v >= b[3]` is class 4. Fewer than four breakpoints, or an invalid set,
/// falls back to the defaults.
pub fn classify(value: f64, breakpoints: &[f64]) -> ValueClass {
    ClassBreakpoints::from_slice(breakpoints)
        .unwrap_or_else(|e| {
            warn!(error = %e, "invalid breakpoints, using defaults");
            ClassBreakpoints::DEFAULT
        })
        .classify(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_breakpoint_examples() {
        let b = ClassBreakpoints::DEFAULT;
        assert_eq!(b.classify(590.0), ValueClass::VeryLow);
        assert_eq!(b.classify(591.0), ValueClass::Low);
        assert_eq!(b.classify(1356.0), ValueClass::High);
        assert_eq!(b.classify(5000.0), ValueClass::VeryHigh);
        assert_eq!(b.classify(0.0), ValueClass::VeryLow);
    }

    #[test]
    fn thresholds_have_no_off_by_one() {
        let b = ClassBreakpoints::DEFAULT;
        for (i, &threshold) in b.values().iter().enumerate() {
            let below = threshold - 1e-9;
            assert_eq!(b.classify(below).index(), i, "just below {threshold}");
            assert_eq!(b.classify(threshold).index(), i + 1, "at {threshold}");
        }
    }

    #[test]
    fn classification_is_monotonic() {
        let b = ClassBreakpoints::DEFAULT;
        let mut previous = ValueClass::VeryLow;
        for step in 0..4000 {
            let class = b.classify(step as f64);
            assert!(class >= previous);
            previous = class;
        }
    }

    #[test]
    fn non_finite_and_negative_values_are_lowest() {
        let b = ClassBreakpoints::DEFAULT;
        assert_eq!(b.classify(f64::NAN), ValueClass::VeryLow);
        assert_eq!(b.classify(f64::INFINITY), ValueClass::VeryLow);
        assert_eq!(b.classify(-10.0), ValueClass::VeryLow);
    }

    #[test]
    fn short_slices_fall_back_to_defaults() {
        assert_eq!(classify(1356.0, &[1.0, 2.0]), ValueClass::High);
        assert_eq!(classify(3.0, &[1.0, 2.0, 3.0, 4.0]), ValueClass::High);
        assert_eq!(classify(3.0, &[1.0, 2.0, 3.0, 4.0, 5.0]), ValueClass::High);
    }

    #[test]
    fn equal_breakpoints_skip_empty_classes() {
        let b = ClassBreakpoints::new([10.0, 10.0, 20.0, 20.0]).unwrap();
        assert_eq!(b.classify(9.0), ValueClass::VeryLow);
        assert_eq!(b.classify(10.0), ValueClass::Medium);
        assert_eq!(b.classify(20.0), ValueClass::VeryHigh);
    }

    #[test]
    fn invalid_breakpoints_are_rejected() {
        assert_eq!(
            ClassBreakpoints::new([1.0, 3.0, 2.0, 4.0]),
            Err(ClassifyError::Decreasing { index: 2, prev: 3.0, next: 2.0 }),
        );
        assert!(matches!(ClassBreakpoints::new([1.0, f64::NAN, 2.0, 4.0]), Err(ClassifyError::NonFinite { index: 1, .. })));
        // The loose entry point falls back instead of failing.
        assert_eq!(classify(1356.0, &[4.0, 3.0, 2.0, 1.0]), ValueClass::High);
    }

    #[test]
    fn deserialization_validates() {
        let parsed: ClassBreakpoints = serde_json::from_str("[1.0, 2.0, 2.0, 8.0]").unwrap();
        assert_eq!(parsed.values(), &[1.0, 2.0, 2.0, 8.0]);
        assert_eq!(serde_json::to_string(&ClassBreakpoints::DEFAULT).unwrap(), "[591.0,1097.0,1356.0,2742.0]");

        let err = serde_json::from_str::<ClassBreakpoints>("[1.0, 3.0, 2.0, 4.0]").unwrap_err();
        assert!(err.to_string().contains("non-decreasing"), "{err}");
        assert!(serde_json::from_str::<ClassBreakpoints>("[1.0, 2.0, 3.0]").is_err());
    }

    #[test]
    fn equal_intervals_over_maximum() {
        let b = ClassBreakpoints::equal_intervals([100.0, 5000.0, f64::NAN, 2500.0]);
        assert_eq!(b.values(), &[1000.0, 2000.0, 3000.0, 4000.0]);
        assert_eq!(b.classify(4999.0), ValueClass::VeryHigh);
    }

    #[test]
    fn equal_intervals_without_positive_values() {
        assert_eq!(ClassBreakpoints::equal_intervals(std::iter::empty()), ClassBreakpoints::DEFAULT);
        assert_eq!(ClassBreakpoints::equal_intervals([0.0, -3.0]), ClassBreakpoints::DEFAULT);
    }
}
