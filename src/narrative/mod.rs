mod format;
mod narrative;

pub use format::{format_percent, join_list};
pub use narrative::generate_narrative;
