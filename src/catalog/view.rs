//! Filter and sort transformations applied before the grid is rendered.
//!
//! Both are pure: they never touch the track list, they only compute the
//! order of indices into it.

use std::cmp::Ordering;

use super::model::{Track, TrackKind};

/// Which kinds of tracks are visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KindFilter {
    /// Passthrough.
    All,
    /// Exact match against `Track::kind`.
    Only(TrackKind),
}

impl Default for KindFilter {
    fn default() -> Self {
        Self::All
    }
}

impl KindFilter {
    pub fn matches(self, track: &Track) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(kind) => track.kind == kind,
        }
    }

    /// Cycle `All -> Beat -> Track -> Album -> All`.
    pub fn cycle(self) -> Self {
        match self {
            KindFilter::All => KindFilter::Only(TrackKind::Beat),
            KindFilter::Only(TrackKind::Beat) => KindFilter::Only(TrackKind::Track),
            KindFilter::Only(TrackKind::Track) => KindFilter::Only(TrackKind::Album),
            KindFilter::Only(TrackKind::Album) => KindFilter::All,
        }
    }

    /// Tab label used in the header.
    pub fn label(self) -> &'static str {
        match self {
            KindFilter::All => "All",
            KindFilter::Only(TrackKind::Beat) => "Beats",
            KindFilter::Only(TrackKind::Track) => "Tracks",
            KindFilter::Only(TrackKind::Album) => "Albums",
        }
    }

    /// Every filter in tab order.
    pub fn tabs() -> [KindFilter; 4] {
        [
            KindFilter::All,
            KindFilter::Only(TrackKind::Beat),
            KindFilter::Only(TrackKind::Track),
            KindFilter::Only(TrackKind::Album),
        ]
    }
}

/// Ordering applied after filtering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Most recent `created_at` first.
    Newest,
    /// Highest play count first.
    Popular,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
}

impl Default for SortKey {
    fn default() -> Self {
        Self::Newest
    }
}

impl SortKey {
    pub fn cycle(self) -> Self {
        match self {
            SortKey::Newest => SortKey::Popular,
            SortKey::Popular => SortKey::PriceLow,
            SortKey::PriceLow => SortKey::PriceHigh,
            SortKey::PriceHigh => SortKey::Newest,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::Popular => "Most Popular",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
        }
    }

    fn compare(self, a: &Track, b: &Track) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Popular => b.plays.cmp(&a.plays),
            SortKey::PriceLow => a.price.total_cmp(&b.price),
            SortKey::PriceHigh => b.price.total_cmp(&a.price),
        }
    }
}

/// Indices of `tracks` that pass `filter`, ordered by `sort`.
///
/// The sort is stable, so ties keep their list order (newest uploads are
/// prepended, which keeps them ahead of equal-timestamp seeds).
pub fn visible_indices(tracks: &[Track], filter: KindFilter, sort: SortKey) -> Vec<usize> {
    let mut indices: Vec<usize> = tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| filter.matches(t))
        .map(|(i, _)| i)
        .collect();
    indices.sort_by(|&a, &b| sort.compare(&tracks[a], &tracks[b]));
    indices
}
