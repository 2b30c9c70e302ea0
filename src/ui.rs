//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Tabs, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::audio::{MediaSource, PlaybackControl, format_time};
use crate::catalog::{KindFilter, Track, format_price, stats_line, tag_line};
use crate::config::UiSettings;
use crate::upload::{FormField, PickedFile, UploadForm};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "jump".to_string());
    map.insert("+/-".to_string(), "volume".to_string());
    map.insert("v".to_string(), "volume popover".to_string());
    map.insert("f".to_string(), "filter".to_string());
    map.insert("s".to_string(), "sort".to_string());
    map.insert("m".to_string(), "card menu".to_string());
    map.insert("K".to_string(), "details".to_string());
    map.insert("u".to_string(), "upload".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_step: f64) -> String {
    let order = [
        "j/k", "h/l", "H/L", "0-9", "enter", "space/p", "+/-", "v", "gg/G", "f", "s", "m", "K",
        "u", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}%", (seek_step * 100.0).round()))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Two-line card: title and kind, then counters and tags.
fn card_item<'a>(track: &'a Track, now_playing: bool) -> ListItem<'a> {
    let marker = if now_playing { "♪ " } else { "  " };
    let mut title = vec![
        Span::raw(marker),
        Span::styled(track.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(format!("[{}]", track.kind), Style::default().fg(Color::Cyan)),
    ];
    if !track.description.is_empty() {
        title.push(Span::raw("  "));
        title.push(Span::styled(track.description.as_str(), Style::default().dim()));
    }

    let mut meta = format!("    {}", stats_line(track));
    let tags = tag_line(&track.tags);
    if !tags.is_empty() {
        meta.push_str("  ");
        meta.push_str(&tags);
    }

    ListItem::new(Text::from(vec![Line::from(title), Line::from(meta).dim()]))
}

fn picked_label(file: Option<&PickedFile>, typed: &str, focused: bool) -> String {
    match file {
        Some(f) if typed.is_empty() => format!("{} ({})", f.name, f.mime),
        _ if focused || !typed.is_empty() => format!("{typed}_"),
        _ => "drop a file or type a path".to_string(),
    }
}

fn upload_lines(form: &UploadForm) -> Vec<Line<'static>> {
    let field = |f: FormField, label: &str, value: String| {
        let focused = form.focus == f;
        let style = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(if focused { "› " } else { "  " }),
            Span::styled(format!("{label:<12}"), Style::default().bold()),
            Span::styled(value, style),
        ])
    };

    let text_value = |f: FormField, value: &str| {
        if form.focus == f {
            format!("{value}_")
        } else {
            value.to_string()
        }
    };

    let submit = if form.can_submit() {
        Line::from("[Enter] upload track").green()
    } else {
        Line::from("audio file, title and price are required").dim()
    };

    vec![
        field(
            FormField::Audio,
            "Audio",
            picked_label(
                form.audio_file.as_ref(),
                &form.audio_input,
                form.focus == FormField::Audio,
            ),
        ),
        field(
            FormField::Cover,
            "Cover",
            picked_label(
                form.cover_image.as_ref(),
                &form.cover_input,
                form.focus == FormField::Cover,
            ),
        ),
        field(FormField::Title, "Title", text_value(FormField::Title, &form.title)),
        field(FormField::Price, "Price", text_value(FormField::Price, &form.price)),
        field(FormField::Kind, "Type", format!("< {} >", form.kind)),
        field(FormField::Tags, "Tags", text_value(FormField::Tags, &form.tags)),
        Line::from(""),
        submit,
    ]
}

fn details_text(track: &Track) -> String {
    format!(
        "Title: {}\nDescription: {}\nType: {}\nPrice: {}\nTags: {}\nPlays: {}  Likes: {}\nAdded: {}\nOwner: {}\nAudio: {}\nCover: {}",
        track.title,
        if track.description.is_empty() { "-" } else { track.description.as_str() },
        track.kind,
        format_price(track.price),
        if track.tags.is_empty() { "-".to_string() } else { tag_line(&track.tags) },
        track.plays,
        track.likes,
        track.created_at.format("%Y-%m-%d %H:%M"),
        track.user_id,
        track.audio_url,
        track.cover_image,
    )
}

/// Render the entire UI into `frame`. Returns the area of the progress bar
/// (empty when no track is bound) so mouse clicks can be mapped to a seek.
pub fn draw<S: MediaSource>(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    control: &PlaybackControl<S>,
    ui_settings: &UiSettings,
    seek_step: f64,
) -> Rect {
    let bound = app.current_track();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(if bound.is_some() { 4 } else { 0 }),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" djuzzwave ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Filter tabs and sort order
    {
        let tabs_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(28)])
            .split(chunks[1]);
        let selected = KindFilter::tabs()
            .iter()
            .position(|f| *f == app.filter)
            .unwrap_or(0);
        let tabs = Tabs::new(KindFilter::tabs().iter().map(|f| f.label()))
            .select(selected)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .block(Block::default().borders(Borders::ALL).title(" filter "));
        frame.render_widget(tabs, tabs_row[0]);

        let sort = Paragraph::new(app.sort.label())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" sort "));
        frame.render_widget(sort, tabs_row[1]);
    }

    // Card list
    {
        let list_area = chunks[2];
        let title = format!(" tracks ({}) ", display.len());
        let total = display.len();
        if total == 0 {
            let what = match app.filter {
                KindFilter::All => "tracks".to_string(),
                other => other.label().to_lowercase(),
            };
            let empty = Paragraph::new(format!("No {what} to show. Press u to upload one."))
            .alignment(Alignment::Center)
            .dim()
            .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(empty, list_area);
        } else {
            // Center the selected card when possible; only build the visible window.
            let per_page = (list_area.height.saturating_sub(2) / 2) as usize;
            let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
            let (start, end, selected_pos_in_visible) = if total <= per_page || per_page == 0 {
                (0, total, sel_pos)
            } else {
                let half = per_page / 2;
                let mut start = sel_pos.saturating_sub(half);
                if start + per_page > total {
                    start = total - per_page;
                }
                (start, start + per_page, sel_pos - start)
            };

            let items: Vec<ListItem> = display[start..end]
                .iter()
                .map(|&i| {
                    let track = &app.tracks[i];
                    card_item(track, app.current.as_ref() == Some(&track.id))
                })
                .collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default();
            state.select(Some(selected_pos_in_visible));
            frame.render_stateful_widget(list, list_area, &mut state);
        }

        if app.card_menu {
            let popup_area = centered_rect_sized(28, 6, list_area);
            frame.render_widget(Clear, popup_area);
            let menu = Paragraph::new("[d] delete\n[b] buy now\n[Esc] close")
                .block(left_padded(" card "));
            frame.render_widget(menu, popup_area);
        }

        if app.details_window {
            let popup_area = centered_rect_sized(72, 13, list_area);
            frame.render_widget(Clear, popup_area);
            let text = app
                .selected_track()
                .map(details_text)
                .unwrap_or_else(|| "No track selected".to_string());
            let details = Paragraph::new(text)
                .block(left_padded(" details (K closes) "))
                .wrap(Wrap { trim: true });
            frame.render_widget(details, popup_area);
        }
    }

    // Footer player
    let mut progress_area = Rect::default();
    if let Some(track) = bound {
        let player_area = chunks[3];
        let block = left_padded(" now playing ");
        let inner = block.inner(player_area);
        frame.render_widget(block, player_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let glyph = if control.is_playing() { "⏸" } else { "▶" };
        let duration = control.duration().map(format_time).unwrap_or_else(|| "0:00".to_string());
        let line = Line::from(vec![
            Span::raw(format!("{glyph}  ")),
            Span::styled(track.title.as_str(), Style::default().bold()),
            Span::raw(format!(" · {}  ", track.kind)),
            Span::raw(format!("{} / {}  ", format_time(control.position()), duration)),
            Span::raw(control.volume_icon().glyph()),
        ]);
        frame.render_widget(Paragraph::new(line), rows[0]);

        let percent = control.progress_percent();
        let ratio = if percent.is_finite() {
            (percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(ratio)
            .label("");
        frame.render_widget(gauge, rows[1]);
        progress_area = rows[1];

        if control.volume_popover() {
            let width = 20.min(player_area.width);
            let popover = Rect {
                x: player_area.x + player_area.width.saturating_sub(width),
                y: player_area.y.saturating_sub(3),
                width,
                height: 3.min(player_area.y),
            };
            frame.render_widget(Clear, popover);
            let volume = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(" volume "))
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(control.volume().clamp(0.0, 1.0))
                .label(format!("{:.0}%", control.volume() * 100.0));
            frame.render_widget(volume, popover);
        }
    }

    // Upload modal
    if app.upload_open {
        let area = centered_rect_sized(72, 12, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(upload_lines(&app.upload))
            .block(left_padded(" upload (Tab moves, Ctrl-S submits, Esc closes) "))
            .wrap(Wrap { trim: false });
        frame.render_widget(modal, area);
    }

    let footer = match app.notice.as_deref() {
        Some(msg) => Paragraph::new(msg).yellow(),
        None => Paragraph::new(controls_text(seek_step)),
    }
    .block(left_padded(" controls "))
    .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    progress_area
}
