//! Utilities for turning a `MediaRef` into bytes and `rodio` sinks.
//!
//! Media is read fully into memory once per bind; sinks are cheap to rebuild
//! from the shared bytes whenever seeking needs a fresh decoder.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;
use rodio::decoder::DecoderBuilder;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::catalog::MediaRef;
use crate::error::MediaError;

pub(super) type MediaBytes = Arc<[u8]>;

/// Read the bytes behind `media`: from disk, or over HTTP(S) for remote URLs.
pub(super) fn read_media(media: &MediaRef, fetch_timeout: Duration) -> Result<MediaBytes, MediaError> {
    match media {
        MediaRef::File(path) => Ok(std::fs::read(path)?.into()),
        MediaRef::Url(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(fetch_timeout)
                .build()?;
            let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
            Ok(bytes.to_vec().into())
        }
        MediaRef::Asset(a) => Err(MediaError::Unsupported(a.clone())),
    }
}

/// Decoder over the shared bytes. The byte length must be known for the
/// decoder to seek.
pub(super) fn decoder(bytes: &MediaBytes) -> Result<Decoder<Cursor<MediaBytes>>, MediaError> {
    Ok(DecoderBuilder::new()
        .with_data(Cursor::new(bytes.clone()))
        .with_byte_len(bytes.len() as u64)
        .with_seekable(true)
        .build()?)
}

/// Total length of the media: what the decoder reports, else what lofty reads
/// from the container headers.
pub(super) fn media_duration(bytes: &MediaBytes) -> Option<Duration> {
    if let Some(d) = decoder(bytes).ok().and_then(|d| d.total_duration()) {
        return Some(d);
    }
    Probe::new(Cursor::new(bytes.as_ref()))
        .guess_file_type()
        .ok()?
        .read()
        .ok()
        .map(|f| f.properties().duration())
        .filter(|d| !d.is_zero())
}

/// Queue `bytes` from `start_at` on `sink` and leave it paused.
///
/// The sink counts its position from `start_at`, not from the start of the
/// media; see [`media_position`].
pub(super) fn fill_sink(
    sink: &Sink,
    bytes: &MediaBytes,
    start_at: Duration,
    volume: f32,
) -> Result<(), MediaError> {
    // `skip_duration` is our fallback seeking primitive; even Duration::ZERO is fine.
    let source = decoder(bytes)?.skip_duration(start_at);

    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(())
}

/// Create a paused `Sink` on `stream` playing `bytes` from `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &MediaBytes,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, MediaError> {
    let sink = Sink::connect_new(stream.mixer());
    fill_sink(&sink, bytes, start_at, volume)?;
    Ok(sink)
}

/// Position in the media of a sink filled `offset` into it.
pub(super) fn media_position(offset: Duration, sink: &Sink) -> Duration {
    offset + sink.get_pos()
}
