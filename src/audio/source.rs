use crate::catalog::MediaRef;
use crate::error::MediaError;

/// The capability the playback control drives.
///
/// Implementations report progress asynchronously as `SourceEvent`s tagged
/// with the `generation` passed to the most recent `load`.
pub trait MediaSource {
    /// Replace whatever is loaded with `media`.
    fn load(&mut self, generation: u64, media: &MediaRef);

    /// Request playback. An `Err` means the request was refused outright.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Jump to `position` seconds.
    fn seek(&mut self, position: f64);

    /// Output level in `[0, 1]`.
    fn set_volume(&mut self, level: f64);

    /// Stop and drop the loaded media.
    fn unload(&mut self);
}
