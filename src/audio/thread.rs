use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::MediaRef;
use crate::config::AudioSettings;
use crate::error::MediaError;

use super::sink::{MediaBytes, create_sink_at, media_duration, media_position, read_media};
use super::types::{AudioCmd, DeviceHandle, DeviceStatus, MediaEvent, SourceEvent};

/// Everything the audio thread owns between commands.
struct Deck {
    stream: Option<OutputStream>,
    events: Sender<SourceEvent>,
    generation: u64,
    media: Option<MediaBytes>,
    sink: Option<Sink>,
    playing: bool,
    position: Duration,
    /// Where in the media the current sink started.
    offset: Duration,
    volume: f32,
    fetch_timeout: Duration,
}

impl Deck {
    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(SourceEvent {
            generation: self.generation,
            event,
        });
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn load(&mut self, generation: u64, media: MediaRef) {
        self.drop_sink();
        self.generation = generation;
        self.media = None;
        self.playing = false;
        self.position = Duration::ZERO;

        let bytes = match read_media(&media, self.fetch_timeout) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("failed to load {media}: {e}");
                return;
            }
        };

        if let Some(d) = media_duration(&bytes) {
            self.emit(MediaEvent::MetadataReady(d.as_secs_f64()));
        } else {
            log::debug!("duration of {media} is unknown");
        }
        self.media = Some(bytes);
        if let Err(e) = self.rebuild_sink() {
            log::warn!("failed to decode {media}: {e}");
            self.media = None;
        }
    }

    /// Replace the sink with a fresh one at `self.position`, keeping the
    /// play/pause state.
    fn rebuild_sink(&mut self) -> Result<(), MediaError> {
        self.drop_sink();
        self.offset = self.position;
        let (Some(stream), Some(bytes)) = (self.stream.as_ref(), self.media.as_ref()) else {
            return Ok(());
        };
        let sink = create_sink_at(stream, bytes, self.position, self.volume)?;
        if self.playing {
            sink.play();
        }
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) {
        if self.stream.is_none() {
            self.emit(MediaEvent::PlayRejected(MediaError::NoOutputDevice.to_string()));
            return;
        }
        if self.media.is_none() {
            self.emit(MediaEvent::PlayRejected(MediaError::NothingLoaded.to_string()));
            return;
        }
        self.playing = true;
        let needs_rebuild = self.sink.as_ref().map(|s| s.empty()).unwrap_or(true);
        if needs_rebuild {
            if let Err(e) = self.rebuild_sink() {
                log::warn!("failed to restart playback: {e}");
                self.playing = false;
                self.emit(MediaEvent::PlayRejected(e.to_string()));
            }
        } else if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn pause(&mut self) {
        self.playing = false;
        if let Some(s) = self.sink.as_ref() {
            self.position = media_position(self.offset, s);
            s.pause();
        }
    }

    fn seek(&mut self, to: Duration) {
        self.position = to;
        let seeked = match self.sink.as_ref() {
            Some(s) if !s.empty() => s.try_seek(to).is_ok(),
            _ => false,
        };
        if seeked {
            // The sink now reports positions from the start of the media.
            self.offset = Duration::ZERO;
        } else {
            // Not every decoder seeks; rebuild and skip into the media instead.
            if let Err(e) = self.rebuild_sink() {
                log::warn!("seek failed: {e}");
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn unload(&mut self) {
        self.drop_sink();
        self.media = None;
        self.playing = false;
        self.position = Duration::ZERO;
        self.offset = Duration::ZERO;
    }

    /// Periodic progress report and end-of-media detection.
    fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if s.empty() {
            self.playing = false;
            self.emit(MediaEvent::Ended);
        } else {
            self.position = media_position(self.offset, s);
            self.emit(MediaEvent::TimeAdvanced(self.position.as_secs_f64()));
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || !self.playing {
            sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.set_volume(0.0);
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<SourceEvent>,
    device: DeviceHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                log::error!("no audio output device: {e}");
                None
            }
        };
        if let Ok(mut status) = device.lock() {
            *status = if stream.is_some() {
                DeviceStatus::Ready
            } else {
                DeviceStatus::Unavailable
            };
        }

        let mut deck = Deck {
            stream,
            events,
            generation: 0,
            media: None,
            sink: None,
            playing: false,
            position: Duration::ZERO,
            offset: Duration::ZERO,
            volume: audio_settings.initial_volume as f32,
            fetch_timeout: Duration::from_secs(audio_settings.fetch_timeout_secs),
        };
        let tick = Duration::from_millis(audio_settings.tick_ms.max(10));

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { generation, media } => deck.load(generation, media),
                    AudioCmd::Play => deck.play(),
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::Seek(to) => deck.seek(to),
                    AudioCmd::SetVolume(v) => deck.set_volume(v),
                    AudioCmd::Unload => deck.unload(),
                    AudioCmd::Quit { fade_out_ms } => {
                        deck.fade_out(fade_out_ms);
                        deck.drop_sink();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::debug!("audio thread finished");
    })
}
