//! Upload form: collects an audio file, an optional cover and the listing
//! fields, then turns them into a new `Track` backed by session-local copies.

mod files;
mod form;
mod session;

pub use files::*;
pub use form::*;
pub use session::SessionStore;
