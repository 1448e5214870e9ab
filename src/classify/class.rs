use std::fmt;

use serde::{Deserialize, Serialize};

/// One of five ordered qualitative classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueClass {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl ValueClass {
    /// All classes, lowest first.
    pub const ALL: [ValueClass; 5] = [
        ValueClass::VeryLow,
        ValueClass::Low,
        ValueClass::Medium,
        ValueClass::High,
        ValueClass::VeryHigh,
    ];

    /// Class index, 0 (very low) to 4 (very high).
    #[inline] pub fn index(self) -> usize { self as usize }

    /// Class for an index, `None` past the highest class.
    #[inline] pub fn from_index(index: usize) -> Option<Self> { Self::ALL.get(index).copied() }

    pub fn label(self) -> &'static str {
        match self {
            ValueClass::VeryLow => "very low",
            ValueClass::Low => "low",
            ValueClass::Medium => "medium",
            ValueClass::High => "high",
            ValueClass::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
