use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// Audio media types the form accepts.
pub const ACCEPTED_AUDIO: [&str; 2] = ["audio/mpeg", "audio/wav"];

/// Media type of `path`, guessed from its extension.
pub fn media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

pub fn is_accepted_audio(mime: &str) -> bool {
    ACCEPTED_AUDIO.contains(&mime)
}

pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// A file chosen in the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: &'static str,
}

impl PickedFile {
    /// Inspect `path`; fails when it is not an existing file of a known type.
    pub fn inspect(path: &Path) -> Result<Self, UploadError> {
        if !path.is_file() {
            return Err(UploadError::NotAFile(path.to_path_buf()));
        }
        let mime = media_type(path).ok_or_else(|| UploadError::UnsupportedType(path.to_path_buf()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime,
        })
    }
}

/// Split text pasted into the terminal (a file drop) into paths.
///
/// Terminals paste dropped files as one path per line or space-separated,
/// quoted or backslash-escaped, sometimes as `file://` URIs.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    let flush = |current: &mut String, paths: &mut Vec<PathBuf>| {
        if !current.is_empty() {
            let raw = current.as_str();
            paths.push(PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw)));
            current.clear();
        }
    };

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, c) if c.is_whitespace() => flush(&mut current, &mut paths),
            (None, c) => current.push(c),
        }
    }
    flush(&mut current, &mut paths);
    paths
}
