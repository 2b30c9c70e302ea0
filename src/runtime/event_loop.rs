use std::sync::mpsc;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::app::App;
use crate::audio::{AudioPlayer, PlaybackControl, SourceEvent};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::playback_sync::sync_playback;
use crate::ui;
use crate::upload::{FormField, SessionStore, parse_dropped_paths};

pub type Control = PlaybackControl<AudioPlayer>;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Where the progress bar was last drawn; clicks inside it seek.
    progress_area: Rect,
}

/// Everything the handlers need besides the app itself.
pub struct Context<'a> {
    pub settings: &'a config::Settings,
    pub control: &'a mut Control,
    pub session: &'a mut SessionStore,
    pub control_tx: &'a mpsc::Sender<ControlCmd>,
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    ctx: &mut Context<'_>,
    mpris: &MprisHandle,
    events_rx: &mpsc::Receiver<SourceEvent>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = events_rx.try_recv() {
            ctx.control.handle_event(ev);
        }

        sync_playback(app, ctx.control);
        update_mpris(mpris, app, &*ctx.control);

        let display = app.display_indices();
        let mut progress_area = Rect::default();
        terminal.draw(|f| {
            progress_area = ui::draw(
                f,
                app,
                &display,
                &*ctx.control,
                &ctx.settings.ui,
                ctx.settings.audio.seek_step,
            );
        })?;
        state.progress_area = progress_area;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, ctx) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, app, ctx, state) {
                        break;
                    }
                }
                Event::Paste(text) => handle_paste(&text, app),
                Event::Mouse(mouse) => handle_mouse(mouse, app, ctx.control, state),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Commands from MPRIS and the transport keys. Returns `true` on quit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App, ctx: &mut Context<'_>) -> bool {
    match cmd {
        ControlCmd::Quit => {
            quit(ctx);
            return true;
        }
        ControlCmd::Play => {
            if ctx.control.bound().is_none() {
                app.play_selected();
            } else if !ctx.control.is_playing() {
                ctx.control.toggle_play();
            }
        }
        ControlCmd::Pause => {
            if ctx.control.is_playing() {
                ctx.control.toggle_play();
            }
        }
        ControlCmd::PlayPause => {
            if ctx.control.bound().is_none() {
                app.play_selected();
            } else {
                ctx.control.toggle_play();
            }
        }
        ControlCmd::Stop => ctx.control.stop(),
        ControlCmd::Next => app.play_next_in_view(),
        ControlCmd::Prev => app.play_prev_in_view(),
    }

    sync_playback(app, ctx.control);
    false
}

fn quit(ctx: &mut Context<'_>) {
    ctx.control
        .source()
        .quit_softly(Duration::from_millis(ctx.settings.audio.quit_fade_out_ms));
}

/// Returns `true` when shutdown is requested.
fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    ctx: &mut Context<'_>,
    state: &mut EventLoopState,
) -> bool {
    if app.upload_open {
        state.pending_gg = false;
        handle_upload_key(key, app, ctx);
        return false;
    }

    app.clear_notice();

    if app.card_menu {
        state.pending_gg = false;
        match key.code {
            KeyCode::Char('d') => {
                app.delete_selected();
                sync_playback(app, ctx.control);
            }
            KeyCode::Char('b') => {
                app.buy_selected();
                app.toggle_card_menu();
            }
            KeyCode::Esc | KeyCode::Char('m') => app.toggle_card_menu(),
            KeyCode::Char('q') => {
                quit(ctx);
                return true;
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            quit(ctx);
            return true;
        }
        KeyCode::Esc => {
            state.pending_gg = false;
            app.details_window = false;
            ctx.control.set_volume_popover(false);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            let selected_is_bound = app
                .selected_track()
                .map(|t| ctx.control.bound() == Some(&t.id))
                .unwrap_or(false);
            if selected_is_bound {
                if !ctx.control.is_playing() {
                    ctx.control.toggle_play();
                }
            } else {
                app.play_selected();
                sync_playback(app, ctx.control);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = ctx.control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = ctx.control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = ctx.control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            ctx.control.seek_by(ctx.settings.audio.seek_step);
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            ctx.control.seek_by(-ctx.settings.audio.seek_step);
        }
        KeyCode::Char(c @ '0'..='9') => {
            state.pending_gg = false;
            let tenths = c.to_digit(10).unwrap_or(0);
            ctx.control.seek(f64::from(tenths) / 10.0);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            let v = ctx.control.volume() + ctx.settings.audio.volume_step;
            ctx.control.set_volume(v);
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            let v = ctx.control.volume() - ctx.settings.audio.volume_step;
            ctx.control.set_volume(v);
        }
        KeyCode::Char('v') => {
            state.pending_gg = false;
            ctx.control.toggle_volume_popover();
        }
        KeyCode::Char('f') => {
            state.pending_gg = false;
            app.cycle_filter();
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            app.cycle_sort();
        }
        KeyCode::Char('u') => {
            state.pending_gg = false;
            app.open_upload();
        }
        KeyCode::Char('m') => {
            state.pending_gg = false;
            app.toggle_card_menu();
        }
        KeyCode::Char('b') => {
            state.pending_gg = false;
            app.buy_selected();
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            app.toggle_details_window();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}

fn handle_upload_key(key: KeyEvent, app: &mut App, ctx: &mut Context<'_>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.close_upload(),
        KeyCode::Tab | KeyCode::Down => app.upload.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.upload.focus_prev(),
        KeyCode::Left | KeyCode::Right if app.upload.focus == FormField::Kind => {
            app.upload.cycle_kind();
        }
        KeyCode::Char('s') if ctrl => submit_upload(app, ctx),
        KeyCode::Enter => {
            let typed = match app.upload.focus {
                FormField::Audio => !app.upload.audio_input.trim().is_empty(),
                FormField::Cover => !app.upload.cover_input.trim().is_empty(),
                _ => false,
            };
            if typed {
                match app.upload.commit_input() {
                    Ok(()) => {
                        app.clear_notice();
                        app.upload.focus_next();
                    }
                    Err(e) => app.set_notice(e.to_string()),
                }
            } else {
                submit_upload(app, ctx);
            }
        }
        KeyCode::Backspace => app.upload.pop_char(),
        KeyCode::Char(c) if !ctrl => app.upload.push_char(c),
        _ => {}
    }
}

fn submit_upload(app: &mut App, ctx: &mut Context<'_>) {
    match app.upload.submit(ctx.session, Utc::now()) {
        Ok(track) => {
            let title = track.title.clone();
            app.upload(track);
            app.close_upload();
            app.set_notice(format!("Uploaded \"{title}\""));
        }
        Err(e) => {
            log::info!("upload rejected: {e}");
            app.set_notice(e.to_string());
        }
    }
}

/// A terminal "drop": the emulator pastes the dropped paths.
fn handle_paste(text: &str, app: &mut App) {
    let typing = app.upload_open
        && matches!(
            app.upload.focus,
            FormField::Title | FormField::Price | FormField::Tags
        );
    if typing {
        for c in text.chars().filter(|c| !c.is_control()) {
            app.upload.push_char(c);
        }
        return;
    }

    let paths = parse_dropped_paths(text);
    let outcome = app.upload.drop_files(&paths);
    if outcome.audio || outcome.image {
        app.open_upload();
        app.clear_notice();
    } else {
        app.set_notice("Nothing to upload: drop an MP3 or WAV file, or an image");
    }
}

fn handle_mouse(mouse: MouseEvent, app: &mut App, control: &mut Control, state: &EventLoopState) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(fraction) = progress_fraction(state.progress_area, mouse.column, mouse.row) {
                control.seek(fraction);
            }
        }
        MouseEventKind::ScrollDown if !app.upload_open => app.next(),
        MouseEventKind::ScrollUp if !app.upload_open => app.prev(),
        _ => {}
    }
}

/// Horizontal position of a click inside `area`: 0.0 at the left edge, 1.0
/// at the right edge. `None` when the click lands outside.
fn progress_fraction(area: Rect, column: u16, row: u16) -> Option<f64> {
    if area.width == 0
        || column < area.x
        || column >= area.right()
        || row < area.y
        || row >= area.bottom()
    {
        return None;
    }
    let span = area.width.saturating_sub(1).max(1);
    Some(f64::from(column - area.x) / f64::from(span))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction_maps_edges() {
        let area = Rect::new(10, 5, 11, 1);
        assert_eq!(progress_fraction(area, 10, 5), Some(0.0));
        assert_eq!(progress_fraction(area, 20, 5), Some(1.0));
        assert_eq!(progress_fraction(area, 15, 5), Some(0.5));
    }

    #[test]
    fn progress_fraction_ignores_outside_clicks() {
        let area = Rect::new(10, 5, 11, 1);
        assert_eq!(progress_fraction(area, 9, 5), None);
        assert_eq!(progress_fraction(area, 21, 5), None);
        assert_eq!(progress_fraction(area, 12, 6), None);
        assert_eq!(progress_fraction(Rect::default(), 0, 0), None);
    }
}
