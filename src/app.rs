//! Application module: the state behind the terminal front-end.
//!
//! `App` (in `app::model`) holds the tracks of the active view, the cursor,
//! the filter and prompt line, and the lyrics pane.

mod model;
mod pane;
mod view;

pub use model::*;
pub use pane::LyricsPane;
pub use view::{InputMode, PromptKind, View};

#[cfg(test)]
mod tests;
