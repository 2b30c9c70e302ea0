use chrono::{DateTime, Utc};

use super::model::{MediaRef, Track, TrackId, TrackKind};

/// Placeholder cover used when a track has no artwork of its own.
pub const DEFAULT_COVER: &str = "/images/default-cover.jpg";

/// The demo catalog shown when `catalog.seed_demo` is on.
pub fn demo_tracks(now: DateTime<Utc>) -> Vec<Track> {
    vec![
        Track {
            id: TrackId::new("1"),
            title: "Summer Vibes".to_string(),
            description: "Chill summer beat perfect for your next track".to_string(),
            cover_image: MediaRef::Asset("/images/summer-vibes.jpg".to_string()),
            audio_url: MediaRef::Url(
                "https://www2.cs.uic.edu/~i101/SoundFiles/BabyElephantWalk60.wav".to_string(),
            ),
            price: 29.99,
            kind: TrackKind::Beat,
            tags: vec!["summer".into(), "chill".into(), "hip-hop".into()],
            created_at: now,
            user_id: "1".to_string(),
            plays: 1200,
            likes: 340,
        },
        Track {
            id: TrackId::new("2"),
            title: "Night Drive".to_string(),
            description: "Deep house vibes for late night drives".to_string(),
            cover_image: MediaRef::Asset("/images/night-drive.jpg".to_string()),
            audio_url: MediaRef::Url(
                "https://www2.cs.uic.edu/~i101/SoundFiles/CantinaBand60.wav".to_string(),
            ),
            price: 34.99,
            kind: TrackKind::Beat,
            tags: vec!["house".into(), "electronic".into(), "night".into()],
            created_at: now,
            user_id: "1".to_string(),
            plays: 800,
            likes: 220,
        },
    ]
}
