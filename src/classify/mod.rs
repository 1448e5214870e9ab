mod breaks;
mod class;
mod legend;

pub use breaks::{classify, ClassBreakpoints};
pub use class::ValueClass;
pub use legend::LegendEntry;
