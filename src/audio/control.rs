//! Playback control: transport state for the one track bound to the footer
//! player.
//!
//! The control keeps its own copy of everything it displays (playing flag,
//! position, duration, volume) so the UI reflects the latest user intent
//! before the source reports anything back.

use crate::catalog::{Track, TrackId};

use super::source::MediaSource;
use super::types::{MediaEvent, PlaybackState, SourceEvent, VolumeIcon};

/// Render seconds as `m:ss`. Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub struct PlaybackControl<S> {
    source: S,
    bound: Option<TrackId>,
    generation: u64,
    playing: bool,
    position: f64,
    duration: Option<f64>,
    volume: f64,
    volume_popover: bool,
}

impl<S: MediaSource> PlaybackControl<S> {
    pub fn new(source: S, volume: f64) -> Self {
        Self {
            source,
            bound: None,
            generation: 0,
            playing: false,
            position: 0.0,
            duration: None,
            volume: volume.clamp(0.0, 1.0),
            volume_popover: false,
        }
    }

    /// Bind `track`, restarting from zero when its identity differs from the
    /// bound one. A refused play leaves the control paused.
    pub fn bind(&mut self, track: &Track) {
        if self.bound.as_ref() == Some(&track.id) {
            return;
        }

        self.generation += 1;
        self.bound = Some(track.id.clone());
        self.position = 0.0;
        self.duration = None;

        log::info!("binding track {} ({})", track.id, track.audio_url);
        self.source.load(self.generation, &track.audio_url);
        self.source.set_volume(self.volume);
        match self.source.play() {
            Ok(()) => self.playing = true,
            Err(e) => {
                log::warn!("autoplay prevented: {e}");
                self.playing = false;
            }
        }
    }

    /// Drop the bound track (e.g. it was deleted).
    pub fn unbind(&mut self) {
        if self.bound.is_none() {
            return;
        }
        self.generation += 1;
        self.source.unload();
        self.bound = None;
        self.playing = false;
        self.position = 0.0;
        self.duration = None;
    }

    pub fn toggle_play(&mut self) {
        if self.bound.is_none() {
            return;
        }
        if self.playing {
            self.source.pause();
            self.playing = false;
        } else {
            match self.source.play() {
                Ok(()) => self.playing = true,
                Err(e) => log::warn!("play request refused: {e}"),
            }
        }
    }

    /// Jump to `fraction` (0 = start, 1 = end) of the known duration.
    ///
    /// The displayed position updates immediately. Ignored while the
    /// duration is still unknown.
    pub fn seek(&mut self, fraction: f64) {
        if self.bound.is_none() {
            return;
        }
        let Some(duration) = self.duration else {
            log::debug!("seek ignored, duration not known yet");
            return;
        };
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = fraction * duration;
        self.source.seek(target);
        self.position = target;
    }

    /// Pause and rewind to the start. Works before the duration is known.
    pub fn stop(&mut self) {
        if self.bound.is_none() {
            return;
        }
        if self.playing {
            self.source.pause();
            self.playing = false;
        }
        self.source.seek(0.0);
        self.position = 0.0;
    }

    /// Seek relative to the current position by `delta` fractions of the duration.
    pub fn seek_by(&mut self, delta: f64) {
        if let Some(duration) = self.duration.filter(|d| *d > 0.0) {
            self.seek(self.position / duration + delta);
        }
    }

    pub fn set_volume(&mut self, level: f64) {
        let level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
        self.volume = level;
        self.source.set_volume(level);
    }

    pub fn toggle_volume_popover(&mut self) {
        self.volume_popover = !self.volume_popover;
    }

    pub fn set_volume_popover(&mut self, visible: bool) {
        self.volume_popover = visible;
    }

    pub fn on_time_advance(&mut self, position: f64) {
        self.position = position;
    }

    pub fn on_metadata_ready(&mut self, duration: f64) {
        self.duration = Some(duration);
    }

    pub fn on_ended(&mut self) {
        self.playing = false;
        self.position = 0.0;
        self.source.seek(0.0);
    }

    /// Apply an event reported by the source. Events from an older binding
    /// are dropped.
    pub fn handle_event(&mut self, ev: SourceEvent) {
        if ev.generation != self.generation || self.bound.is_none() {
            log::trace!("dropping stale event {:?}", ev.event);
            return;
        }
        match ev.event {
            MediaEvent::TimeAdvanced(p) => self.on_time_advance(p),
            MediaEvent::MetadataReady(d) => self.on_metadata_ready(d),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::PlayRejected(reason) => {
                log::warn!("autoplay prevented: {reason}");
                self.playing = false;
            }
        }
    }

    pub fn bound(&self) -> Option<&TrackId> {
        self.bound.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn volume_popover(&self) -> bool {
        self.volume_popover
    }

    pub fn volume_icon(&self) -> VolumeIcon {
        VolumeIcon::for_level(self.volume)
    }

    /// `position / duration * 100`. NaN until the duration is known, and
    /// infinite for a zero-length media with a non-zero position.
    pub fn progress_percent(&self) -> f64 {
        self.position / self.duration.unwrap_or(f64::NAN) * 100.0
    }

    pub fn state(&self) -> PlaybackState {
        match (self.bound.is_some(), self.playing) {
            (false, _) => PlaybackState::Stopped,
            (true, true) => PlaybackState::Playing,
            (true, false) => PlaybackState::Paused,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
