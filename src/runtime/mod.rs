use std::sync::mpsc;

use chrono::Utc;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, PlaybackControl, SourceEvent};
use crate::mpris::ControlCmd;
use crate::upload::{SessionStore, UploadForm};

mod event_loop;
mod logging;
mod mpris_sync;
mod playback_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warning) = settings::load_settings();
    let logging = logging::init(&settings.logging);
    if let Some(msg) = warning {
        if logging {
            log::warn!("{msg}");
        } else {
            eprintln!("djuzzwave: {msg}");
        }
    }

    let tracks = startup::initial_catalog(&settings.catalog, Utc::now());
    let upload = UploadForm::new(
        settings.upload.default_kind,
        settings.upload.owner_id.clone(),
    );
    let mut app = App::new(tracks, upload);
    startup::apply_browse_defaults(&mut app, &settings.browse);

    let mut session = SessionStore::new()?;

    let (events_tx, events_rx) = mpsc::channel::<SourceEvent>();
    let audio_player = AudioPlayer::new(settings.audio.clone(), events_tx);
    let mut control = PlaybackControl::new(audio_player, settings.audio.initial_volume);
    control.set_volume_popover(settings.ui.show_volume_popover);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());
    mpris_sync::update_mpris(&mpris, &app, &control);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        let mut ctx = event_loop::Context {
            settings: &settings,
            control: &mut control,
            session: &mut session,
            control_tx: &control_tx,
        };

        event_loop::run(
            &mut terminal,
            &mut app,
            &mut ctx,
            &mpris,
            &events_rx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        log::error!("event loop failed: {e}");
    }
    run_result
}
