//! Audio-related small types and handles.
//!
//! Commands sent to the audio thread, events reported back from it, and the
//! derived states the UI and MPRIS render.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::MediaRef;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the loaded media; events carry `generation` from now on.
    Load { generation: u64, media: MediaRef },
    /// Start or resume playback.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Jump to an absolute position.
    Seek(Duration),
    /// Output level in `[0, 1]`.
    SetVolume(f32),
    /// Drop the loaded media.
    Unload,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Something the media source reports while it loads and plays.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback progressed to this position (seconds).
    TimeAdvanced(f64),
    /// Total length is known (seconds).
    MetadataReady(f64),
    /// Playback reached the end.
    Ended,
    /// A play request was refused after it was issued.
    PlayRejected(String),
}

/// A `MediaEvent` tagged with the binding it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub generation: u64,
    pub event: MediaEvent,
}

/// Coarse playback state, as rendered in the footer and exposed over MPRIS.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track bound.
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Which speaker glyph the volume button shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VolumeIcon {
    Off,
    Down,
    Up,
}

impl VolumeIcon {
    pub fn for_level(level: f64) -> Self {
        if level <= 0.0 {
            VolumeIcon::Off
        } else if level < 0.5 {
            VolumeIcon::Down
        } else {
            VolumeIcon::Up
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            VolumeIcon::Off => "🔇",
            VolumeIcon::Down => "🔉",
            VolumeIcon::Up => "🔊",
        }
    }
}

/// Whether the audio thread managed to open an output device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceStatus {
    /// The thread has not opened the stream yet.
    Pending,
    Ready,
    Unavailable,
}

pub type DeviceHandle = Arc<Mutex<DeviceStatus>>;
