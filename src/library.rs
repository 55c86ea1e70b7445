//! Music library: track model, directory scanning and the media index.
//!
//! A single `walkdir` pass over the library root produces both the playable
//! tracks and the caption files that the lyrics resolver can query later.

mod display;
mod index;
mod model;
mod scan;

pub use display::display_from_fields;
pub use index::{LibraryIndex, MediaIndex};
pub use model::Track;
#[cfg(test)]
pub use model::track_id_for;
