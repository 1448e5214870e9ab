mod io;
mod layer;
mod precinct;
mod zone;

pub use layer::ZoneLayer;
pub use precinct::{Precinct, PrecinctSet};
pub use zone::Zone;
