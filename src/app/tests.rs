use super::*;
use crate::catalog::{KindFilter, MediaRef, SortKey, Track, TrackId, TrackKind};
use crate::upload::UploadForm;
use chrono::{TimeZone, Utc};

fn t(id: &str, kind: TrackKind, price: f64, plays: u64, day: u32) -> Track {
    Track {
        id: TrackId::new(id),
        title: format!("Track {id}"),
        description: String::new(),
        cover_image: MediaRef::Asset("/images/default-cover.jpg".into()),
        audio_url: MediaRef::Url(format!("https://example.com/{id}.wav")),
        price,
        kind,
        tags: Vec::new(),
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        user_id: "1".into(),
        plays,
        likes: 0,
    }
}

fn app() -> App {
    let tracks = vec![
        t("a", TrackKind::Beat, 29.99, 1200, 1),
        t("b", TrackKind::Track, 34.99, 800, 3),
        t("c", TrackKind::Beat, 9.99, 50, 2),
    ];
    App::new(tracks, UploadForm::new(TrackKind::Beat, "1"))
}

fn ids(app: &App) -> Vec<String> {
    app.display_indices()
        .into_iter()
        .map(|i| app.tracks[i].id.to_string())
        .collect()
}

#[test]
fn display_indices_apply_filter_then_sort() {
    let mut app = app();
    assert_eq!(ids(&app), vec!["b", "c", "a"]);

    app.set_sort(SortKey::PriceLow);
    assert_eq!(ids(&app), vec!["c", "a", "b"]);

    app.set_filter(KindFilter::Only(TrackKind::Beat));
    assert_eq!(ids(&app), vec!["c", "a"]);

    app.set_filter(KindFilter::Only(TrackKind::Album));
    assert!(ids(&app).is_empty());
    assert!(app.selected_track().is_none());
}

#[test]
fn cursor_moves_through_visible_order_and_wraps() {
    let mut app = app();
    app.first();
    assert_eq!(app.selected_track().unwrap().id.as_str(), "b");
    app.next();
    assert_eq!(app.selected_track().unwrap().id.as_str(), "c");
    app.last();
    assert_eq!(app.selected_track().unwrap().id.as_str(), "a");
    app.next();
    assert_eq!(app.selected_track().unwrap().id.as_str(), "b");
    app.prev();
    assert_eq!(app.selected_track().unwrap().id.as_str(), "a");
}

#[test]
fn filter_change_moves_hidden_cursor_to_first_visible() {
    let mut app = app();
    app.selected = 1; // "b", a Track
    app.set_filter(KindFilter::Only(TrackKind::Beat));
    assert_eq!(app.selected_track().unwrap().id.as_str(), "c");
}

#[test]
fn play_selected_sets_current() {
    let mut app = app();
    assert!(app.current_track().is_none());
    app.first();
    app.play_selected();
    assert_eq!(app.current_track().unwrap().id.as_str(), "b");

    app.play(&TrackId::new("missing"));
    assert_eq!(app.current.as_ref().unwrap().as_str(), "b");
}

#[test]
fn deleting_current_track_clears_playback_selection() {
    let mut app = app();
    app.play(&TrackId::new("a"));
    let removed = app.delete(&TrackId::new("a")).unwrap();
    assert_eq!(removed.id.as_str(), "a");
    assert!(app.current.is_none());
    assert_eq!(app.tracks.len(), 2);
    assert!(app.delete(&TrackId::new("a")).is_none());
}

#[test]
fn deleting_other_track_keeps_current() {
    let mut app = app();
    app.play(&TrackId::new("b"));
    app.delete(&TrackId::new("c"));
    assert_eq!(app.current_track().unwrap().id.as_str(), "b");
    assert!(app.selected_track().is_some());
}

#[test]
fn delete_selected_keeps_cursor_in_view() {
    let mut app = app();
    app.first();
    app.delete_selected();
    assert_eq!(app.tracks.len(), 2);
    assert!(app.selected_track().is_some());
    app.delete_selected();
    app.delete_selected();
    assert!(app.tracks.is_empty());
    assert!(app.selected_track().is_none());
    assert!(app.delete_selected().is_none());
}

#[test]
fn upload_prepends_and_selects_new_track() {
    let mut app = app();
    let mut fresh = t("1700000000000", TrackKind::Album, 5.0, 0, 4);
    fresh.title = "Fresh".into();
    app.upload(fresh);
    assert_eq!(app.tracks[0].title, "Fresh");
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_track().unwrap().title, "Fresh");
}

#[test]
fn upload_with_colliding_id_gets_a_unique_one() {
    let mut app = app();
    app.upload(t("1700000000000", TrackKind::Beat, 1.0, 0, 4));
    app.upload(t("1700000000000", TrackKind::Beat, 1.0, 0, 4));
    assert_eq!(app.tracks[0].id.as_str(), "1700000000001");
    assert_eq!(app.tracks[1].id.as_str(), "1700000000000");
}

#[test]
fn upload_hidden_by_filter_leaves_cursor_visible() {
    let mut app = app();
    app.set_filter(KindFilter::Only(TrackKind::Track));
    app.upload(t("9", TrackKind::Beat, 1.0, 0, 4));
    assert_eq!(app.selected_track().unwrap().id.as_str(), "b");
}

#[test]
fn next_and_prev_in_view_play_neighbours() {
    let mut app = app();
    app.play_next_in_view();
    assert_eq!(app.current.as_ref().unwrap().as_str(), "b");
    app.play_next_in_view();
    assert_eq!(app.current.as_ref().unwrap().as_str(), "c");
    app.play_prev_in_view();
    app.play_prev_in_view();
    assert_eq!(app.current.as_ref().unwrap().as_str(), "a");
    assert_eq!(app.selected_track().unwrap().id.as_str(), "a");
}

#[test]
fn card_menu_needs_a_selection() {
    let mut app = app();
    app.toggle_card_menu();
    assert!(app.card_menu);
    app.toggle_card_menu();
    assert!(!app.card_menu);

    app.set_filter(KindFilter::Only(TrackKind::Album));
    app.toggle_card_menu();
    assert!(!app.card_menu);
}

#[test]
fn upload_modal_open_close() {
    let mut app = app();
    app.toggle_card_menu();
    app.open_upload();
    assert!(app.upload_open);
    assert!(!app.card_menu);
    app.upload.title = "draft".into();
    app.close_upload();
    assert!(!app.upload_open);
    assert_eq!(app.upload.title, "draft");
}

#[test]
fn buy_sets_notice_for_selected_track() {
    let mut app = app();
    app.first();
    app.buy_selected();
    let notice = app.notice.clone().unwrap();
    assert!(notice.contains("Track b"));
    assert!(notice.contains("$34.99"));
    app.clear_notice();
    assert!(app.notice.is_none());
}
