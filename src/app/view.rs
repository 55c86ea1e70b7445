/// Which list the track pane is showing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Library,
    Favorites,
    Playlist(u64),
}

impl View {
    /// The view after `self` in the `Tab` order: Library, Favorites, then
    /// each playlist in `playlist_ids`, then back to Library.
    pub fn next(self, playlist_ids: &[u64]) -> Self {
        let playlist_at = |i: usize| {
            playlist_ids
                .get(i)
                .map_or(Self::Library, |&id| Self::Playlist(id))
        };
        match self {
            Self::Library => Self::Favorites,
            Self::Favorites => playlist_at(0),
            Self::Playlist(id) => match playlist_ids.iter().position(|&p| p == id) {
                Some(i) => playlist_at(i + 1),
                None => Self::Library,
            },
        }
    }

    pub fn playlist_id(self) -> Option<u64> {
        match self {
            Self::Playlist(id) => Some(id),
            _ => None,
        }
    }
}

/// What the bottom input line is collecting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    AddToPlaylist,
    NewPlaylist,
    RenamePlaylist,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::AddToPlaylist => "add to playlist",
            Self::NewPlaylist => "new playlist",
            Self::RenamePlaylist => "rename playlist",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
    Prompt(PromptKind),
}
