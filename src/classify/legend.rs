use serde::Serialize;

use crate::classify::{ClassBreakpoints, ValueClass};

/// One legend row: a class and the half-open value range `[lower, upper)` it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub class: ValueClass,
    /// `None` for the lowest class.
    pub lower: Option<f64>,
    /// `None` for the highest class.
    pub upper: Option<f64>,
}

impl LegendEntry {
    /// Human-readable range, e.g. `below 591`, `591 to 1097`, `2742 and above`.
    pub fn range_label(&self) -> String {
        match (self.lower, self.upper) {
            (None, Some(upper)) => format!("below {}", format_bound(upper)),
            (Some(lower), Some(upper)) => format!("{} to {}", format_bound(lower), format_bound(upper)),
            (Some(lower), None) => format!("{} and above", format_bound(lower)),
            (None, None) => "all values".to_string(),
        }
    }
}

/// Integers print bare; fractional bounds (dynamic breakpoints) keep one decimal.
fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value:.1}") }
}

impl ClassBreakpoints {
    /// Legend rows for all five classes, lowest first.
    pub fn legend(&self) -> Vec<LegendEntry> {
        let b = self.values();
        ValueClass::ALL.iter()
            .map(|&class| {
                let i = class.index();
                LegendEntry {
                    class,
                    lower: i.checked_sub(1).map(|j| b[j]),
                    upper: b.get(i).copied(),
                }
            })
            .collect()
    }
}
