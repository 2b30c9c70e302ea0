use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::catalog::MediaRef;
use crate::config::AudioSettings;
use crate::error::MediaError;

use super::source::MediaSource;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, DeviceHandle, DeviceStatus, SourceEvent};

/// Handle to the rodio audio thread; the production `MediaSource`.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    device: DeviceHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Source events are reported on `events`.
    pub fn new(audio_settings: AudioSettings, events: Sender<SourceEvent>) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let device: DeviceHandle = Arc::new(Mutex::new(DeviceStatus::Pending));

        let audio_handle = spawn_audio_thread(rx, events, device.clone(), audio_settings);

        Self {
            tx,
            device,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn device_status(&self) -> DeviceStatus {
        self.device
            .lock()
            .map(|s| *s)
            .unwrap_or(DeviceStatus::Unavailable)
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    fn send_or_log(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            log::warn!("audio thread gone, dropped {:?}", e.0);
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaSource for AudioPlayer {
    fn load(&mut self, generation: u64, media: &MediaRef) {
        self.send_or_log(AudioCmd::Load {
            generation,
            media: media.clone(),
        });
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.device_status() == DeviceStatus::Unavailable {
            return Err(MediaError::NoOutputDevice);
        }
        self.send(AudioCmd::Play)
            .map_err(|_| MediaError::Disconnected)
    }

    fn pause(&mut self) {
        self.send_or_log(AudioCmd::Pause);
    }

    fn seek(&mut self, position: f64) {
        let position = if position.is_finite() { position.max(0.0) } else { 0.0 };
        self.send_or_log(AudioCmd::Seek(Duration::from_secs_f64(position)));
    }

    fn set_volume(&mut self, level: f64) {
        self.send_or_log(AudioCmd::SetVolume(level as f32));
    }

    fn unload(&mut self) {
        self.send_or_log(AudioCmd::Unload);
    }
}
