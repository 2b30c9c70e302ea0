//! Catalog module: the track data model, demo seed data, local imports and
//! the filter/sort view used by the marketplace grid.

mod display;
mod model;
mod scan;
mod seed;
mod view;

pub use display::*;
pub use model::*;
pub use scan::scan;
pub use seed::{DEFAULT_COVER, demo_tracks};
pub use view::*;
