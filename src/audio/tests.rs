use super::*;
use crate::catalog::{MediaRef, Track, TrackId, TrackKind};
use crate::error::MediaError;
use chrono::Utc;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(u64, MediaRef),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
    Unload,
}

#[derive(Default)]
struct FakeSource {
    calls: Vec<Call>,
    reject_play: bool,
}

impl MediaSource for FakeSource {
    fn load(&mut self, generation: u64, media: &MediaRef) {
        self.calls.push(Call::Load(generation, media.clone()));
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.calls.push(Call::Play);
        if self.reject_play {
            Err(MediaError::NoOutputDevice)
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn seek(&mut self, position: f64) {
        self.calls.push(Call::Seek(position));
    }

    fn set_volume(&mut self, level: f64) {
        self.calls.push(Call::Volume(level));
    }

    fn unload(&mut self) {
        self.calls.push(Call::Unload);
    }
}

fn track(id: &str) -> Track {
    Track {
        id: TrackId::new(id),
        title: format!("Track {id}"),
        description: String::new(),
        cover_image: MediaRef::Asset("/images/default-cover.jpg".into()),
        audio_url: MediaRef::Url(format!("https://example.test/{id}.wav")),
        price: 10.0,
        kind: TrackKind::Beat,
        tags: Vec::new(),
        created_at: Utc::now(),
        user_id: "1".into(),
        plays: 0,
        likes: 0,
    }
}

fn control() -> PlaybackControl<FakeSource> {
    PlaybackControl::new(FakeSource::default(), 1.0)
}

fn event(generation: u64, event: MediaEvent) -> SourceEvent {
    SourceEvent { generation, event }
}

#[test]
fn format_time_pads_seconds() {
    assert_eq!(format_time(125.0), "2:05");
    assert_eq!(format_time(59.0), "0:59");
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(3600.9), "60:00");
    assert_eq!(format_time(f64::NAN), "0:00");
}

#[test]
fn starts_unbound_and_stopped() {
    let c = control();
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert!(c.bound().is_none());
    assert!(c.progress_percent().is_nan());
}

#[test]
fn bind_resets_position_loads_applies_volume_and_plays() {
    let mut c = control();
    c.set_volume(0.4);
    c.bind(&track("a"));
    c.on_metadata_ready(100.0);
    c.on_time_advance(42.0);

    c.bind(&track("b"));
    assert_eq!(c.position(), 0.0);
    assert_eq!(c.duration(), None);
    assert_eq!(c.state(), PlaybackState::Playing);

    let calls = &c.source().calls;
    let tail = &calls[calls.len() - 3..];
    assert_eq!(
        tail,
        &[
            Call::Load(2, MediaRef::Url("https://example.test/b.wav".into())),
            Call::Volume(0.4),
            Call::Play,
        ]
    );
}

#[test]
fn rebinding_same_track_is_a_no_op() {
    let mut c = control();
    c.bind(&track("a"));
    c.on_time_advance(12.0);
    let n = c.source().calls.len();

    c.bind(&track("a"));
    assert_eq!(c.source().calls.len(), n);
    assert_eq!(c.position(), 12.0);
}

#[test]
fn autoplay_rejection_falls_back_to_paused() {
    let mut c = PlaybackControl::new(
        FakeSource {
            reject_play: true,
            ..FakeSource::default()
        },
        1.0,
    );
    c.bind(&track("a"));
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(c.position(), 0.0);
}

#[test]
fn asynchronous_rejection_also_pauses() {
    let mut c = control();
    c.bind(&track("a"));
    c.handle_event(event(1, MediaEvent::PlayRejected("no device".into())));
    assert_eq!(c.state(), PlaybackState::Paused);
}

#[test]
fn toggle_play_flips_between_playing_and_paused() {
    let mut c = control();
    c.toggle_play();
    assert_eq!(c.state(), PlaybackState::Stopped);

    c.bind(&track("a"));
    c.toggle_play();
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(c.source().calls.last(), Some(&Call::Pause));

    c.toggle_play();
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.source().calls.last(), Some(&Call::Play));
}

#[test]
fn seek_sets_fraction_of_duration_optimistically() {
    let mut c = control();
    c.bind(&track("a"));
    c.on_metadata_ready(200.0);

    c.seek(0.25);
    assert_eq!(c.position(), 50.0);
    assert_eq!(c.source().calls.last(), Some(&Call::Seek(50.0)));

    c.seek(1.5);
    assert_eq!(c.position(), 200.0);
    c.seek(-1.0);
    assert_eq!(c.position(), 0.0);
    assert_eq!(c.progress_percent(), 0.0);
}

#[test]
fn seek_is_ignored_until_duration_is_known() {
    let mut c = control();
    c.bind(&track("a"));
    let n = c.source().calls.len();
    c.seek(0.5);
    assert_eq!(c.source().calls.len(), n);
    assert_eq!(c.position(), 0.0);
}

#[test]
fn stop_rewinds_even_without_a_duration() {
    let mut c = control();
    c.bind(&track("a"));
    c.handle_event(event(1, MediaEvent::TimeAdvanced(12.0)));
    assert!(c.duration().is_none());

    c.stop();
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(c.position(), 0.0);
    let calls = &c.source().calls;
    assert_eq!(&calls[calls.len() - 2..], &[Call::Pause, Call::Seek(0.0)]);

    // Already paused: only rewinds.
    c.stop();
    assert_eq!(c.source().calls.last(), Some(&Call::Seek(0.0)));
    assert_eq!(c.state(), PlaybackState::Paused);
}

#[test]
fn stop_without_a_binding_does_nothing() {
    let mut c = control();
    c.stop();
    assert!(c.source().calls.is_empty());
}

#[test]
fn seek_by_moves_relative_to_position() {
    let mut c = control();
    c.bind(&track("a"));
    c.on_metadata_ready(100.0);
    c.on_time_advance(20.0);
    c.seek_by(0.1);
    assert!((c.position() - 30.0).abs() < 1e-9);
}

#[test]
fn set_volume_is_idempotent_and_drives_icon() {
    let mut c = control();
    c.set_volume(0.3);
    c.set_volume(0.3);
    assert_eq!(c.volume(), 0.3);
    assert_eq!(c.volume_icon(), VolumeIcon::Down);

    c.set_volume(0.0);
    assert_eq!(c.volume_icon(), VolumeIcon::Off);
    c.set_volume(0.5);
    assert_eq!(c.volume_icon(), VolumeIcon::Up);
    c.set_volume(7.0);
    assert_eq!(c.volume(), 1.0);
    assert_eq!(c.source().calls.last(), Some(&Call::Volume(1.0)));
}

#[test]
fn ended_resets_to_paused_at_zero() {
    let mut c = control();
    c.bind(&track("a"));
    c.handle_event(event(1, MediaEvent::MetadataReady(60.0)));
    c.handle_event(event(1, MediaEvent::TimeAdvanced(59.5)));
    assert!((c.progress_percent() - 99.1666).abs() < 0.01);

    c.handle_event(event(1, MediaEvent::Ended));
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(c.position(), 0.0);
    assert_eq!(c.source().calls.last(), Some(&Call::Seek(0.0)));
}

#[test]
fn events_from_previous_binding_are_dropped() {
    let mut c = control();
    c.bind(&track("a"));
    c.bind(&track("b"));
    c.handle_event(event(1, MediaEvent::TimeAdvanced(33.0)));
    c.handle_event(event(1, MediaEvent::MetadataReady(90.0)));
    assert_eq!(c.position(), 0.0);
    assert_eq!(c.duration(), None);

    c.handle_event(event(2, MediaEvent::MetadataReady(90.0)));
    assert_eq!(c.duration(), Some(90.0));
}

#[test]
fn unbind_unloads_and_returns_to_stopped() {
    let mut c = control();
    c.bind(&track("a"));
    c.unbind();
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert_eq!(c.source().calls.last(), Some(&Call::Unload));

    // Binding the same id again after unbind starts fresh.
    c.bind(&track("a"));
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn volume_popover_toggles() {
    let mut c = control();
    assert!(!c.volume_popover());
    c.toggle_volume_popover();
    assert!(c.volume_popover());
    c.set_volume_popover(false);
    assert!(!c.volume_popover());
}

/// A silent 16-bit mono PCM WAV file, 8 kHz, `secs` long.
pub(super) fn wav_bytes(secs: u32) -> Vec<u8> {
    let rate: u32 = 8000;
    let data_len = rate * secs * 2;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&rate.to_le_bytes());
    out.extend_from_slice(&(rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}

mod backend {
    use super::wav_bytes;
    use crate::audio::sink::{MediaBytes, decoder, fill_sink, media_duration, media_position, read_media};
    use crate::catalog::MediaRef;
    use crate::error::MediaError;
    use rodio::{Sink, Source};
    use std::time::Duration;

    fn bytes(secs: u32) -> MediaBytes {
        wav_bytes(secs).into()
    }

    #[test]
    fn duration_reads_wav_length() {
        let d = media_duration(&bytes(3)).unwrap();
        assert!((d.as_secs_f64() - 3.0).abs() < 0.01, "got {d:?}");
    }

    #[test]
    fn duration_of_garbage_is_none() {
        let junk: MediaBytes = vec![7u8; 512].into();
        assert!(media_duration(&junk).is_none());
    }

    #[test]
    fn decoder_over_shared_bytes_can_seek() {
        let mut d = decoder(&bytes(10)).unwrap();
        assert!(d.try_seek(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn asset_media_is_rejected() {
        let media = MediaRef::Asset("/images/default-cover.jpg".into());
        let err = read_media(&media, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, MediaError::Unsupported(_)));
    }

    #[test]
    fn file_media_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beat.wav");
        std::fs::write(&path, wav_bytes(1)).unwrap();

        let read = read_media(&MediaRef::File(path), Duration::from_secs(1)).unwrap();
        assert_eq!(read.as_ref(), wav_bytes(1).as_slice());

        let missing = read_media(&MediaRef::File(dir.path().join("gone.wav")), Duration::from_secs(1));
        assert!(matches!(missing, Err(MediaError::Io(_))));
    }

    #[test]
    fn filled_sink_is_paused_and_counts_from_its_offset() {
        let (sink, _output) = Sink::new();
        fill_sink(&sink, &bytes(10), Duration::from_secs(6), 0.5).unwrap();
        assert!(sink.is_paused());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.volume(), 0.5);
        assert_eq!(media_position(Duration::from_secs(6), &sink), Duration::from_secs(6));
    }

    #[test]
    fn fill_sink_rejects_undecodable_bytes() {
        let (sink, _output) = Sink::new();
        let junk: MediaBytes = vec![7u8; 512].into();
        assert!(matches!(
            fill_sink(&sink, &junk, Duration::ZERO, 1.0),
            Err(MediaError::Decode(_))
        ));
        assert!(sink.empty());
    }
}
