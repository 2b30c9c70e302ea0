//! Audio module: the playback control bound to the current track, the
//! `MediaSource` seam it drives, and the rodio-backed source that runs on
//! its own thread.

mod control;
mod player;
mod sink;
mod source;
mod thread;
mod types;

pub use control::*;
pub use player::AudioPlayer;
pub use source::MediaSource;
pub use types::*;

#[cfg(test)]
mod tests;
