use std::path::Path;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// Blank metadata is skipped. When nothing survives, the title is used as-is
/// so a track never renders as an empty row.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    fn non_blank(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    let mut parts: Vec<String> = Vec::new();
    for field in fields {
        match field {
            TrackDisplayField::Display => {
                parts.extend(non_blank(artist).map(str::to_string));
                parts.extend(non_blank(Some(title)).map(str::to_string));
            }
            TrackDisplayField::Title => parts.extend(non_blank(Some(title)).map(str::to_string)),
            TrackDisplayField::Artist => parts.extend(non_blank(artist).map(str::to_string)),
            TrackDisplayField::Album => parts.extend(non_blank(album).map(str::to_string)),
            TrackDisplayField::Filename => {
                let stem = path.file_stem().and_then(|s| s.to_str());
                parts.extend(non_blank(stem).map(str::to_string));
            }
            TrackDisplayField::Path => parts.push(path.display().to_string()),
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
