//! Application model: the page controller.
//!
//! `App` owns the authoritative track list, the cursor, the playback
//! selection, the active filter/sort and the modal state. It never touches
//! audio; the runtime syncs `current` into the playback control.

use crate::catalog::{KindFilter, SortKey, Track, TrackId, format_price, visible_indices};
use crate::upload::UploadForm;

pub struct App {
    pub tracks: Vec<Track>,
    /// Cursor, as an index into `tracks`.
    pub selected: usize,
    /// Playback selection: the track bound to the footer player, if any.
    pub current: Option<TrackId>,
    pub filter: KindFilter,
    pub sort: SortKey,

    pub upload: UploadForm,
    pub upload_open: bool,
    pub card_menu: bool,
    pub details_window: bool,
    /// One-line message shown in the status bar until the next action.
    pub notice: Option<String>,
}

impl App {
    /// Create a new `App` listing `tracks` in the given order.
    pub fn new(tracks: Vec<Track>, upload: UploadForm) -> Self {
        let mut app = Self {
            tracks,
            selected: 0,
            current: None,
            filter: KindFilter::All,
            sort: SortKey::Newest,
            upload,
            upload_open: false,
            card_menu: false,
            details_window: false,
            notice: None,
        };
        app.ensure_selected_visible();
        app
    }

    /// Indices of the visible tracks: filtered, then sorted.
    pub fn display_indices(&self) -> Vec<usize> {
        visible_indices(&self.tracks, self.filter, self.sort)
    }

    fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// Track under the cursor, if the visible list is not empty.
    pub fn selected_track(&self) -> Option<&Track> {
        let display = self.display_indices();
        if display.contains(&self.selected) {
            self.tracks.get(self.selected)
        } else {
            None
        }
    }

    /// Track bound to the player, if any.
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref().and_then(|id| self.track(id))
    }

    /// Make `id` the playback selection.
    pub fn play(&mut self, id: &TrackId) {
        if self.index_of(id).is_some() {
            self.current = Some(id.clone());
        }
    }

    /// Play the track under the cursor.
    pub fn play_selected(&mut self) {
        if let Some(id) = self.selected_track().map(|t| t.id.clone()) {
            self.play(&id);
        }
    }

    /// Play the visible track after the current one, wrapping around.
    pub fn play_next_in_view(&mut self) {
        let from = self.current.as_ref().and_then(|id| self.index_of(id));
        let target = from
            .and_then(|i| self.next_in_view_from(i))
            .or_else(|| self.display_indices().first().copied());
        if let Some(next) = target {
            let id = self.tracks[next].id.clone();
            self.play(&id);
            self.selected = next;
        }
    }

    /// Play the visible track before the current one, wrapping around.
    pub fn play_prev_in_view(&mut self) {
        let from = self.current.as_ref().and_then(|id| self.index_of(id));
        let target = from
            .and_then(|i| self.prev_in_view_from(i))
            .or_else(|| self.display_indices().last().copied());
        if let Some(prev) = target {
            let id = self.tracks[prev].id.clone();
            self.play(&id);
            self.selected = prev;
        }
    }

    /// Remove `id` from the list. Clears the playback selection when it was
    /// the current track.
    pub fn delete(&mut self, id: &TrackId) -> Option<Track> {
        let idx = self.index_of(id)?;
        let removed = self.tracks.remove(idx);
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
        if idx < self.selected {
            self.selected -= 1;
        } else if idx == self.selected {
            self.selected = self.selected.min(self.tracks.len().saturating_sub(1));
        }
        self.card_menu = false;
        self.ensure_selected_visible();
        log::info!("deleted track {}", removed.id);
        Some(removed)
    }

    pub fn delete_selected(&mut self) -> Option<Track> {
        let id = self.selected_track().map(|t| t.id.clone())?;
        self.delete(&id)
    }

    /// Prepend a freshly uploaded track and put the cursor on it.
    ///
    /// A colliding timestamp id is bumped until it is unique.
    pub fn upload(&mut self, mut track: Track) {
        if self.index_of(&track.id).is_some() {
            let mut n: i64 = track.id.as_str().parse().unwrap_or(track.created_at.timestamp_millis());
            loop {
                n += 1;
                let candidate = TrackId::new(n.to_string());
                if self.index_of(&candidate).is_none() {
                    track.id = candidate;
                    break;
                }
            }
        }
        self.tracks.insert(0, track);
        self.selected = 0;
        self.ensure_selected_visible();
    }

    pub fn set_filter(&mut self, filter: KindFilter) {
        self.filter = filter;
        self.ensure_selected_visible();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.cycle());
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.cycle();
    }

    pub fn open_upload(&mut self) {
        self.upload_open = true;
        self.card_menu = false;
        self.details_window = false;
    }

    /// Close the modal. Field contents survive until a successful submit.
    pub fn close_upload(&mut self) {
        self.upload_open = false;
    }

    pub fn toggle_card_menu(&mut self) {
        self.card_menu = !self.card_menu && self.selected_track().is_some();
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }

    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some(msg.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// "Buy Now": there is no checkout; explain that instead.
    pub fn buy_selected(&mut self) {
        let msg = self.selected_track().map(|t| {
            format!(
                "{} ({}) costs {}; checkout is not available in this session",
                t.title,
                t.kind,
                format_price(t.price)
            )
        });
        if let Some(msg) = msg {
            self.set_notice(msg);
        }
    }

    /// Return the next visible index after `current`, wrapping around.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index before `current`, wrapping around.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
            None => Some(display[display.len() - 1]),
        }
    }

    /// Keep the cursor on a visible track, moving it to the first one if needed.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }
}
