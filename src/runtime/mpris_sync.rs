use crate::app::App;
use crate::audio::{MediaSource, PlaybackControl};
use crate::mpris::MprisHandle;

pub fn update_mpris<S: MediaSource>(mpris: &MprisHandle, app: &App, control: &PlaybackControl<S>) {
    mpris.set_track_metadata(app.current_track(), control.duration());
    mpris.set_playback(control.state());
    mpris.set_position(control.position());
}
