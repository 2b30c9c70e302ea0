use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::catalog::TrackKind;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_djuzzwave_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("DJUZZWAVE_CONFIG_PATH", "/tmp/djuzzwave-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/djuzzwave-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("djuzzwave")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("djuzzwave")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 0.4
volume_step = 0.1
quit_fade_out_ms = 123

[ui]
header_text = "hello"
show_volume_popover = true

[browse]
filter = "beats"
sort = "price-low"

[catalog]
seed_demo = false
import_dir = "/srv/beats"
extensions = ["wav"]
recursive = false
import_kind = "album"
import_price = 4.99

[upload]
owner_id = "producer-7"
default_kind = "track"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("DJUZZWAVE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("DJUZZWAVE__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 0.4);
    assert_eq!(s.audio.volume_step, 0.1);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.audio.tick_ms, 250);
    assert_eq!(s.ui.header_text, "hello");
    assert!(s.ui.show_volume_popover);
    assert!(matches!(s.browse.filter, FilterSetting::Beat));
    assert!(matches!(s.browse.sort, SortSetting::PriceLow));
    assert!(!s.catalog.seed_demo);
    assert_eq!(
        s.catalog.import_dir,
        Some(std::path::PathBuf::from("/srv/beats"))
    );
    assert_eq!(s.catalog.extensions, vec!["wav".to_string()]);
    assert!(!s.catalog.recursive);
    assert_eq!(s.catalog.import_kind, TrackKind::Album);
    assert_eq!(s.catalog.import_price, 4.99);
    assert_eq!(s.upload.owner_id, "producer-7");
    assert_eq!(s.upload.default_kind, TrackKind::Track);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("DJUZZWAVE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("DJUZZWAVE__AUDIO__QUIT_FADE_OUT_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 0);
}

#[test]
fn defaults_parse_from_empty_toml_and_validate() {
    let s: Settings = toml::from_str("").unwrap();
    assert!(s.catalog.seed_demo);
    assert_eq!(s.audio.initial_volume, 1.0);
    assert!(matches!(s.browse.sort, SortSetting::Newest));
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.seek_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.catalog.import_price = -2.0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_zero_fetch_timeout() {
    let mut s = Settings::default();
    s.audio.fetch_timeout_secs = 0;
    let err = s.validate().unwrap_err();
    assert!(err.contains("fetch_timeout_secs"));

    s.audio.fetch_timeout_secs = 1;
    assert!(s.validate().is_ok());
}
