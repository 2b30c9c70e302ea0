use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    mpsc::{self, Receiver, Sender},
};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, interface, object_server::InterfaceRef};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::audio::PlaybackState;
use crate::catalog::{MediaRef, Track, TrackId};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.djuzzwave";

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    genre: Vec<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    position_micros: i64,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        let changed = match self.state.lock() {
            Ok(mut s) if s.playback != playback => {
                s.playback = playback;
                true
            }
            _ => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }

    /// Publish the bound track (or clear it) together with its length in seconds.
    pub fn set_track_metadata(&self, track: Option<&Track>, duration: Option<f64>) {
        let changed = match self.state.lock() {
            Ok(mut s) => {
                let track_id = track.and_then(|t| track_object_path(&t.id));
                let length_micros = duration
                    .filter(|d| d.is_finite() && *d >= 0.0)
                    .map(|d| (d * 1_000_000.0).round() as i64);
                let changed = s.track_id != track_id || s.length_micros != length_micros;

                s.track_id = track_id;
                s.length_micros = length_micros;
                s.title = track.map(|t| t.title.clone());
                s.genre = track
                    .map(|t| {
                        std::iter::once(t.kind.to_string())
                            .chain(t.tags.iter().cloned())
                            .collect()
                    })
                    .unwrap_or_default();
                s.url = track.and_then(|t| media_url(&t.audio_url));
                s.art_url = track.and_then(|t| media_url(&t.cover_image));
                changed
            }
            Err(_) => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }

    pub fn set_position(&self, seconds: f64) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = if seconds.is_finite() && seconds > 0.0 {
                (seconds * 1_000_000.0).round() as i64
            } else {
                0
            };
        }
    }
}

/// `/org/mpris/MediaPlayer2/track/<id>`, with every character outside
/// `[A-Za-z0-9]` replaced by `_`.
fn track_object_path(id: &TrackId) -> Option<OwnedObjectPath> {
    let mut element: String = id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if element.is_empty() {
        element.push('_');
    }
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{element}"))
        .ok()
        .map(OwnedObjectPath::from)
}

fn media_url(media: &MediaRef) -> Option<String> {
    match media {
        MediaRef::Url(url) => Some(url.clone()),
        MediaRef::File(path) => Some(format!("file://{}", path.display())),
        MediaRef::Asset(_) => None,
    }
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "DJuzzwave"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/mpeg".to_string(), "audio/wav".to_string()]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut insert = |key: &str, value: Option<Value<'_>>| {
            if let Some(v) = value.and_then(owned) {
                map.insert(key.to_string(), v);
            }
        };
        insert(
            "mpris:trackid",
            s.track_id.clone().map(|id| Value::from(id.into_inner())),
        );
        insert(
            "xesam:title",
            Some(Value::from(s.title.clone().unwrap_or_default())),
        );
        insert(
            "xesam:genre",
            Some(s.genre.clone())
                .filter(|g| !g.is_empty())
                .map(Value::from),
        );
        insert("xesam:url", s.url.clone().map(Value::from));
        insert("mpris:artUrl", s.art_url.clone().map(Value::from));
        if let Some(len) = s.length_micros {
            map.insert("mpris:length".to_string(), OwnedValue::from(len));
        }
        map
    }
}

async fn emit_changes(iface: &InterfaceRef<PlayerIface>) {
    let emitter = iface.signal_emitter();
    let player = iface.get().await;
    if let Err(e) = player.playback_status_changed(emitter).await {
        log::debug!("MPRIS: failed to signal PlaybackStatus: {e}");
    }
    if let Err(e) = player.metadata_changed(emitter).await {
        log::debug!("MPRIS: failed to signal Metadata: {e}");
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify_rx: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;
    log::info!("MPRIS: registered as {BUS_NAME}");

    // Coalesce change notifications and forward them as PropertiesChanged.
    loop {
        Timer::after(Duration::from_millis(200)).await;
        let mut pending = false;
        loop {
            match notify_rx.try_recv() {
                Ok(()) => pending = true,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if pending {
            emit_changes(&player).await;
        }
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            log::warn!("MPRIS: service unavailable: {e}");
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
