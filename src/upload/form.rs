//! Upload form state and submission.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::catalog::{DEFAULT_COVER, MediaRef, Track, TrackId, TrackKind};
use crate::error::UploadError;

use super::files::{PickedFile, is_accepted_audio, is_image};
use super::session::SessionStore;

/// Input focus inside the upload modal, in Tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Audio,
    Cover,
    Title,
    Price,
    Kind,
    Tags,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        FormField::Audio,
        FormField::Cover,
        FormField::Title,
        FormField::Price,
        FormField::Kind,
        FormField::Tags,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|&f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// What a file drop changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DropOutcome {
    pub audio: bool,
    pub image: bool,
}

pub struct UploadForm {
    pub audio_file: Option<PickedFile>,
    pub cover_image: Option<PickedFile>,
    pub title: String,
    pub price: String,
    pub kind: TrackKind,
    pub tags: String,
    /// Path typed into the audio field, selected on Enter.
    pub audio_input: String,
    /// Path typed into the cover field, selected on Enter.
    pub cover_input: String,
    pub focus: FormField,
    default_kind: TrackKind,
    owner_id: String,
}

impl UploadForm {
    pub fn new(default_kind: TrackKind, owner_id: impl Into<String>) -> Self {
        Self {
            audio_file: None,
            cover_image: None,
            title: String::new(),
            price: String::new(),
            kind: default_kind,
            tags: String::new(),
            audio_input: String::new(),
            cover_input: String::new(),
            focus: FormField::Audio,
            default_kind,
            owner_id: owner_id.into(),
        }
    }

    /// Take the first accepted audio file and the first image among `paths`.
    /// Everything else is ignored.
    pub fn drop_files(&mut self, paths: &[PathBuf]) -> DropOutcome {
        let picked: Vec<PickedFile> = paths
            .iter()
            .filter_map(|p| PickedFile::inspect(p).ok())
            .collect();

        let mut outcome = DropOutcome::default();
        if let Some(audio) = picked.iter().find(|f| is_accepted_audio(f.mime)) {
            self.audio_file = Some(audio.clone());
            outcome.audio = true;
        }
        if let Some(image) = picked.iter().find(|f| is_image(f.mime)) {
            self.cover_image = Some(image.clone());
            outcome.image = true;
        }
        log::debug!("dropped {} paths: {:?}", paths.len(), outcome);
        outcome
    }

    /// Explicitly choose the audio file.
    pub fn select_audio(&mut self, path: &Path) -> Result<(), UploadError> {
        let file = PickedFile::inspect(path)?;
        if !is_accepted_audio(file.mime) {
            return Err(UploadError::UnsupportedType(path.to_path_buf()));
        }
        self.audio_file = Some(file);
        Ok(())
    }

    /// Explicitly choose the cover image.
    pub fn select_image(&mut self, path: &Path) -> Result<(), UploadError> {
        let file = PickedFile::inspect(path)?;
        if !is_image(file.mime) {
            return Err(UploadError::UnsupportedType(path.to_path_buf()));
        }
        self.cover_image = Some(file);
        Ok(())
    }

    /// Select the path typed into the focused file field.
    pub fn commit_input(&mut self) -> Result<(), UploadError> {
        match self.focus {
            FormField::Audio => {
                let path = PathBuf::from(self.audio_input.trim());
                self.select_audio(&path)?;
                self.audio_input.clear();
            }
            FormField::Cover => {
                let path = PathBuf::from(self.cover_input.trim());
                self.select_image(&path)?;
                self.cover_input.clear();
            }
            _ => {}
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.audio_file.is_some() && !self.title.trim().is_empty() && !self.price.trim().is_empty()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Audio => Some(&mut self.audio_input),
            FormField::Cover => Some(&mut self.cover_input),
            FormField::Title => Some(&mut self.title),
            FormField::Price => Some(&mut self.price),
            FormField::Tags => Some(&mut self.tags),
            FormField::Kind => None,
        }
    }

    /// Type `c` into the focused field. The price field only takes numbers.
    pub fn push_char(&mut self, c: char) {
        if self.focus == FormField::Kind {
            if c == ' ' {
                self.kind = self.kind.cycle();
            }
            return;
        }
        if self.focus == FormField::Price && !(c.is_ascii_digit() || c == '.') {
            return;
        }
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    pub fn cycle_kind(&mut self) {
        self.kind = self.kind.cycle();
    }

    /// Build the new track, copying its files into `store`, and reset the form.
    pub fn submit(&mut self, store: &mut SessionStore, now: DateTime<Utc>) -> Result<Track, UploadError> {
        let Some(audio) = self.audio_file.as_ref().filter(|_| self.can_submit()) else {
            return Err(UploadError::Incomplete);
        };
        let price = parse_price(&self.price)?;

        let audio_url = MediaRef::File(store.store(audio)?);
        let cover_image = match self.cover_image.as_ref() {
            Some(cover) => MediaRef::File(store.store(cover)?),
            None => MediaRef::Asset(DEFAULT_COVER.to_string()),
        };

        let track = Track {
            id: TrackId::from_timestamp(now),
            title: self.title.trim().to_string(),
            description: String::new(),
            cover_image,
            audio_url,
            price,
            kind: self.kind,
            tags: split_tags(&self.tags),
            created_at: now,
            user_id: self.owner_id.clone(),
            plays: 0,
            likes: 0,
        };
        log::info!("uploaded {:?} as {}", track.title, track.id);

        self.clear();
        Ok(track)
    }

    /// Reset every field, keeping the configured defaults.
    pub fn clear(&mut self) {
        self.audio_file = None;
        self.cover_image = None;
        self.title.clear();
        self.price.clear();
        self.kind = self.default_kind;
        self.tags.clear();
        self.audio_input.clear();
        self.cover_input.clear();
        self.focus = FormField::Audio;
    }
}

/// Parse a price field: a finite, non-negative number.
pub fn parse_price(text: &str) -> Result<f64, UploadError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => Ok(p),
        _ => Err(UploadError::InvalidPrice(trimmed.to_string())),
    }
}

/// Comma-separated tags, trimmed, empty entries dropped.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
