use chrono::{DateTime, Utc};

use crate::app::App;
use crate::catalog::{KindFilter, SortKey, Track, TrackKind, demo_tracks, scan};
use crate::config;

pub fn filter_from_setting(setting: config::FilterSetting) -> KindFilter {
    match setting {
        config::FilterSetting::All => KindFilter::All,
        config::FilterSetting::Beat => KindFilter::Only(TrackKind::Beat),
        config::FilterSetting::Track => KindFilter::Only(TrackKind::Track),
        config::FilterSetting::Album => KindFilter::Only(TrackKind::Album),
    }
}

pub fn sort_from_setting(setting: config::SortSetting) -> SortKey {
    match setting {
        config::SortSetting::Newest => SortKey::Newest,
        config::SortSetting::Popular => SortKey::Popular,
        config::SortSetting::PriceLow => SortKey::PriceLow,
        config::SortSetting::PriceHigh => SortKey::PriceHigh,
    }
}

/// Demo tracks (when enabled) followed by the imported directory, if any.
pub fn initial_catalog(settings: &config::CatalogSettings, now: DateTime<Utc>) -> Vec<Track> {
    let mut tracks = if settings.seed_demo {
        demo_tracks(now)
    } else {
        Vec::new()
    };

    if let Some(dir) = &settings.import_dir {
        tracks.extend(scan(dir, settings, now));
    }
    tracks
}

pub fn apply_browse_defaults(app: &mut App, settings: &config::BrowseSettings) {
    app.set_filter(filter_from_setting(settings.filter));
    app.set_sort(sort_from_setting(settings.sort));
}
