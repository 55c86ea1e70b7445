//! Persistent user data: playlists and favorites.
//!
//! Both live in small JSON preference files under the data directory. Every
//! mutation is written through immediately.

mod error;
mod favorites;
mod playlists;
mod prefs;

pub use error::Result;
pub use favorites::Favorites;
pub use playlists::Playlists;

#[cfg(test)]
mod tests;
