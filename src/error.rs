use std::path::PathBuf;

use thiserror::Error;

/// Failures of the media source behind the playback control.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("audio thread is not running")]
    Disconnected,

    #[error("nothing is loaded")]
    NothingLoaded,

    #[error("{0} is not playable")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("decode failed: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Why the upload form refused a file or a submission.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("title, price and an audio file are required")]
    Incomplete,

    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    #[error("unsupported file type: {0}")]
    UnsupportedType(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
