use std::path::Path;

use chrono::{DateTime, Utc};
use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::CatalogSettings;

use super::model::{MediaRef, Track, TrackId};
use super::seed::DEFAULT_COVER;

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Tag-derived fields of an imported file.
#[derive(Default)]
struct FileTags {
    title: Option<String>,
    artist: Option<String>,
    genre: Option<String>,
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn read_tags(path: &Path) -> FileTags {
    let Ok(tagged) = lofty::read_from_path(path) else {
        log::debug!("no readable tags in {}", path.display());
        return FileTags::default();
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return FileTags::default();
    };
    FileTags {
        title: non_empty(tag.title()),
        artist: non_empty(tag.artist()),
        genre: non_empty(tag.genre()),
    }
}

/// Import the audio files under `dir` as catalog tracks.
///
/// Imported tracks get ids `local-0`, `local-1`, ... in title order, the
/// configured kind and price, and `created_at` from the file mtime.
pub fn scan(dir: &Path, settings: &CatalogSettings, now: DateTime<Utc>) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }

        let tags = read_tags(path);
        let title = tags.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        });
        let description = tags
            .artist
            .map(|a| format!("by {a}"))
            .unwrap_or_default();
        let mut track_tags = vec!["local".to_string()];
        if let Some(genre) = tags.genre {
            track_tags.push(genre.to_lowercase());
        }
        let created_at = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or(now);

        tracks.push(Track {
            // Real ids are assigned after sorting.
            id: TrackId::new(""),
            title,
            description,
            cover_image: MediaRef::Asset(DEFAULT_COVER.to_string()),
            audio_url: MediaRef::File(path.to_path_buf()),
            price: settings.import_price,
            kind: settings.import_kind,
            tags: track_tags,
            created_at,
            user_id: "local".to_string(),
            plays: 0,
            likes: 0,
        });
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    for (i, t) in tracks.iter_mut().enumerate() {
        t.id = TrackId::new(format!("local-{i}"));
    }
    log::info!("imported {} tracks from {}", tracks.len(), dir.display());
    tracks
}
