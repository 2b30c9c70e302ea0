//! Application module: the page controller driven by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the track list, the
//! cursor, the playback selection and the filter/sort/modal state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
