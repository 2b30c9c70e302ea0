use crate::app::App;
use crate::audio::{MediaSource, PlaybackControl};

/// Bind the control to the app's playback selection, or unbind it when the
/// selection is gone. Re-selecting the bound track is a no-op.
pub fn sync_playback<S: MediaSource>(app: &App, control: &mut PlaybackControl<S>) {
    match app.current_track() {
        Some(track) => control.bind(track),
        None => control.unbind(),
    }
}
