mod config;
mod error;
mod fallback;
mod io;

pub use config::{AtlasConfig, BreakpointConfig, RemoteConfig, YearSource, DATA_DIR_ENV};
pub(crate) use config::{DEFAULT_INDICATOR, DEFAULT_SCALE_LABEL};
pub use error::{ClassifyError, ConfigError, FallbackError, OverlayError};
pub use fallback::attempt_with_fallback;
pub(crate) use io::*;
